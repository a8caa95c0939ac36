//! Scan metadata inferred from the filename.
//!
//! None of the supported detectors record a frame number or rotation angle in
//! the file, so both are derived from the trailing digits of the name:
//! `sample_023.tif` is image 23 and starts at 11.0 degrees.

use std::path::Path;
use std::sync::OnceLock;

use edtiff_core::Scan;
use regex::Regex;
use tracing::warn;

/// Oscillation width assumed for every image, in degrees.
pub const OSCILLATION_WIDTH: f64 = 0.5;

fn trailing_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.*?([0-9]+)$").unwrap())
}

/// Image index parsed from the file name, if it ends in digits.
///
/// Only the part after the last underscore and before the first dot is
/// examined. Numbers beyond `i64::MAX` saturate.
pub fn parse_image_index(path: impl AsRef<Path>) -> Option<i64> {
    let name = path.as_ref().file_name()?.to_string_lossy();
    let tail = name.rsplit('_').next().unwrap_or(&name);
    let stem = tail.split('.').next().unwrap_or(tail);

    let digits = trailing_digits().captures(stem)?.get(1)?.as_str();
    // Only overflow can fail on a run of ASCII digits.
    Some(digits.parse().unwrap_or(i64::MAX))
}

/// Image index for `path`, falling back to 1 when the name carries none.
pub fn image_index(path: impl AsRef<Path>) -> i64 {
    let path = path.as_ref();
    match parse_image_index(path) {
        Some(i64::MAX) => {
            warn!(
                path = %path.display(),
                "Image number out of range, saturating at i64::MAX"
            );
            i64::MAX
        }
        Some(index) => index,
        None => {
            warn!(
                path = %path.display(),
                "No image number in filename, assuming image 1"
            );
            1
        }
    }
}

/// Single-image scan for `path` with zero exposure and a fixed 0.5 degree
/// oscillation.
pub fn dummy_scan(path: impl AsRef<Path>) -> Scan {
    let index = image_index(path);
    let frame = index - 1;
    Scan::single_image(
        index,
        0.0,
        (OSCILLATION_WIDTH * frame as f64, OSCILLATION_WIDTH),
    )
}

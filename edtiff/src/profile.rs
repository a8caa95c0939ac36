//! Detector profiles.
//!
//! A profile pairs a detection predicate with fixed placeholder geometry for
//! a detector that writes no calibration into its TIFF files.

use std::path::Path;

use edtiff_core::{
    beam_centre_for, trusted_range_for_bits, Beam, Detector, DetectorKind, Goniometer, Scan, Vec3,
};
use edtiff_tiff::{tags::tag, Page, TiffContainer, TiffError};
use tracing::{debug, warn};

use crate::config::{DetectionConfig, Gate};
use crate::error::Result;
use crate::scan::dummy_scan;

/// Direction from the sample back to the source.
pub const SAMPLE_TO_SOURCE: Vec3 = [0.0, 0.0, 1.0];

/// Normal of the polarization plane.
pub const POLARIZATION_NORMAL: Vec3 = [0.0, 1.0, 0.0];

pub const POLARIZATION_FRACTION: f64 = 0.5;

pub const FAST_AXIS: &str = "+x";
pub const SLOW_AXIS: &str = "-y";

/// Extra tag requirement on the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCheck {
    /// ImageDescription (270) contains the text.
    DescriptionContains(&'static str),
    /// The `cameraname` field of the Olympus SIS tag (33560) contains the text.
    OlympusCameraContains(&'static str),
}

impl TagCheck {
    /// Evaluate against `page`. A missing tag or a value of the wrong type
    /// fails the check.
    pub fn matches(&self, page: &Page) -> bool {
        match *self {
            TagCheck::DescriptionContains(needle) => page
                .description()
                .map_or(false, |text| text.contains(needle)),
            TagCheck::OlympusCameraContains(needle) => page
                .tag(tag::OLYMPUS_SIS)
                .and_then(|sis| sis.field("cameraname"))
                .and_then(|camera| camera.as_str())
                .map_or(false, |camera| camera.contains(needle)),
        }
    }
}

/// Placeholder instrument geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryStub {
    pub kind: DetectorKind,
    /// Nominal sample to detector distance (mm).
    pub distance: f64,
    /// Pixel size (fast, slow) in mm.
    pub pixel_size: (f64, f64),
    /// Image size (fast, slow) in pixels.
    pub image_size: (usize, usize),
    /// Dynamic range in bits.
    pub dynamic_range: u32,
    /// Wavelength in Angstrom.
    pub wavelength: f64,
}

impl GeometryStub {
    pub fn trusted_range(&self) -> (f64, f64) {
        trusted_range_for_bits(self.dynamic_range)
    }

    pub fn beam_centre(&self) -> (f64, f64) {
        beam_centre_for(self.pixel_size, self.image_size)
    }

    pub fn beam(&self) -> Beam {
        Beam::polarized(
            SAMPLE_TO_SOURCE,
            self.wavelength,
            POLARIZATION_NORMAL,
            POLARIZATION_FRACTION,
        )
    }

    pub fn detector(&self) -> Result<Detector> {
        Ok(Detector::simple(
            self.kind,
            self.distance,
            self.beam_centre(),
            FAST_AXIS,
            SLOW_AXIS,
            self.pixel_size,
            self.image_size,
            self.trusted_range(),
        )?)
    }
}

/// How the images of a profile were acquired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageKind {
    /// Rotation about a goniometer axis, one oscillation per image.
    Rotation { axis: Vec3 },
    /// Still shot without goniometer or scan.
    Still,
}

/// One detector format.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorProfile {
    /// Short unique name used by the registry.
    pub name: &'static str,
    pub description: &'static str,
    /// Flag that must be set before the profile may match.
    pub gate: Option<Gate>,
    /// Required first page shape (height, width).
    pub shape: (u32, u32),
    pub tag_check: Option<TagCheck>,
    pub geometry: GeometryStub,
    pub image: ImageKind,
}

impl DetectorProfile {
    /// Profile-specific predicate: gate, then page shape, then tag check.
    ///
    /// `container` is assumed to have passed [`accepts_container`].
    pub fn matches(&self, container: &TiffContainer, config: &DetectionConfig) -> bool {
        if let Some(gate) = self.gate {
            if !config.allows(gate) {
                return false;
            }
        }

        let page = match container.first_page() {
            Ok(page) => page,
            Err(_) => return false,
        };
        if page.shape() != self.shape {
            return false;
        }

        self.tag_check.map_or(true, |check| check.matches(page))
    }

    /// Full predicate for a file on disk.
    ///
    /// Never fails: anything that prevents reading the file means the
    /// profile does not understand it.
    pub fn understand(&self, path: impl AsRef<Path>, config: &DetectionConfig) -> bool {
        if let Some(gate) = self.gate {
            if !config.allows(gate) {
                return false;
            }
        }

        let matched = open_candidate(path.as_ref())
            .map_or(false, |container| self.matches(&container, config));
        debug!(profile = self.name, matched, "Profile check");
        matched
    }

    pub fn beam(&self) -> Beam {
        self.geometry.beam()
    }

    /// Goniometer, or `None` for still images.
    pub fn goniometer(&self) -> Option<Goniometer> {
        match self.image {
            ImageKind::Rotation { axis } => Some(Goniometer::known_axis(axis)),
            ImageKind::Still => None,
        }
    }

    pub fn detector(&self) -> Result<Detector> {
        self.geometry.detector()
    }

    /// Scan inferred from the filename, or `None` for still images.
    pub fn scan(&self, path: impl AsRef<Path>) -> Option<Scan> {
        match self.image {
            ImageKind::Rotation { .. } => Some(dummy_scan(path)),
            ImageKind::Still => None,
        }
    }

    pub fn is_still(&self) -> bool {
        self.image == ImageKind::Still
    }
}

/// Generic single-image predicate: exactly one page in exactly one series.
pub fn accepts_container(container: &TiffContainer) -> bool {
    container.is_single_image()
}

/// Open `path` and apply [`accepts_container`].
///
/// Returns the container for further checks. The file itself is closed
/// before this returns.
pub fn open_candidate(path: &Path) -> Option<TiffContainer> {
    let container = match TiffContainer::open(path) {
        Ok(container) => container,
        Err(TiffError::CodecUnavailable) => {
            warn!(
                path = %path.display(),
                "TIFF codec not compiled in, cannot read image"
            );
            return None;
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Not a readable TIFF");
            return None;
        }
    };

    if !accepts_container(&container) {
        debug!(
            path = %path.display(),
            pages = container.pages().len(),
            series = container.series().len(),
            "Not a single-image TIFF"
        );
        return None;
    }

    Some(container)
}

/// Generic predicate for a file on disk.
pub fn understand_generic(path: impl AsRef<Path>) -> bool {
    open_candidate(path.as_ref()).is_some()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use edtiff_tiff::TagValue;

    use super::*;
    use crate::profiles;

    fn page(width: u32, height: u32, tags: BTreeMap<u16, TagValue>) -> Page {
        Page::new(0, width, height, tags)
    }

    fn container(pages: Vec<Page>) -> TiffContainer {
        TiffContainer::from_pages("test.tif", pages)
    }

    #[test]
    fn test_accepts_single_page() {
        assert!(accepts_container(&container(vec![page(8, 8, BTreeMap::new())])));
        assert!(!accepts_container(&container(vec![])));
        assert!(!accepts_container(&container(vec![
            page(8, 8, BTreeMap::new()),
            Page::new(1, 8, 8, BTreeMap::new()),
        ])));
    }

    #[test]
    fn test_description_check() {
        let mut tags = BTreeMap::new();
        tags.insert(
            tag::IMAGE_DESCRIPTION,
            TagValue::Ascii("ImageCameraName: timepix\nExposure: 1".into()),
        );
        let check = TagCheck::DescriptionContains("ImageCameraName: timepix");
        assert!(check.matches(&page(4, 4, tags)));
        assert!(!check.matches(&page(4, 4, BTreeMap::new())));

        let mut wrong_type = BTreeMap::new();
        wrong_type.insert(tag::IMAGE_DESCRIPTION, TagValue::Unsigned(vec![7]));
        assert!(!check.matches(&page(4, 4, wrong_type)));
    }

    #[test]
    fn test_olympus_check() {
        let mut sis = BTreeMap::new();
        sis.insert("cameraname".to_string(), TagValue::Ascii("Veleta 2k".into()));
        let mut tags = BTreeMap::new();
        tags.insert(tag::OLYMPUS_SIS, TagValue::Map(sis));

        let check = TagCheck::OlympusCameraContains("Veleta");
        assert!(check.matches(&page(4, 4, tags)));

        let mut raw = BTreeMap::new();
        raw.insert(tag::OLYMPUS_SIS, TagValue::Bytes(b"SIS0".to_vec()));
        assert!(!check.matches(&page(4, 4, raw)));
    }

    #[test]
    fn test_gate_checked_first() {
        let merlin = &profiles::MERLIN;
        let c = container(vec![page(512, 512, BTreeMap::new())]);
        assert!(!merlin.matches(&c, &DetectionConfig::new()));
        assert!(merlin.matches(&c, &DetectionConfig::new().merlin(true)));
    }

    #[test]
    fn test_shape_is_height_by_width() {
        let ued = &profiles::UED;
        let right = container(vec![page(1340, 1300, BTreeMap::new())]);
        let swapped = container(vec![page(1300, 1340, BTreeMap::new())]);
        assert!(ued.matches(&right, &DetectionConfig::new()));
        assert!(!ued.matches(&swapped, &DetectionConfig::new()));
    }

    #[test]
    fn test_still_has_no_scan() {
        let bnl = &profiles::UED_BNL;
        assert!(bnl.is_still());
        assert!(bnl.scan("img_004.tif").is_none());
        assert!(bnl.goniometer().is_none());

        let medipix = &profiles::MEDIPIX;
        assert_eq!(medipix.scan("img_004.tif").unwrap().image_range, (4, 4));
        assert_eq!(
            medipix.goniometer().unwrap().rotation_axis,
            [0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_geometry_stub() {
        let geometry = profiles::MERLIN.geometry;
        assert_eq!(geometry.trusted_range(), (-1.0, 4095.0));
        let (x, y) = geometry.beam_centre();
        assert!((x - 14.08).abs() < 1e-9 && (y - 14.08).abs() < 1e-9);

        let detector = geometry.detector().unwrap();
        let panel = detector.panel().unwrap();
        assert_eq!(panel.image_size, (512, 512));
        assert_eq!(panel.distance, 2440.0);
    }
}

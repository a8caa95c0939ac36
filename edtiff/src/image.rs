//! Models assembled for a recognised image.

use std::path::{Path, PathBuf};

use edtiff_core::{Beam, Detector, Goniometer, Panel, Scan, SiteOverrides};
use ndarray::Array2;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::profile::DetectorProfile;

/// One image file with the geometry of the profile that recognised it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedImage {
    pub path: PathBuf,
    /// Name of the matching profile.
    pub profile: &'static str,
    /// `None` for still images.
    pub scan: Option<Scan>,
    pub beam: Beam,
    /// `None` for still images.
    pub goniometer: Option<Goniometer>,
    pub detector: Detector,
}

impl ImportedImage {
    /// Build the models `profile` attaches to `path`. The file is not read.
    pub fn from_profile(path: impl AsRef<Path>, profile: &DetectorProfile) -> Result<Self> {
        let path = path.as_ref();
        Ok(Self {
            path: path.to_path_buf(),
            profile: profile.name,
            scan: profile.scan(path),
            beam: profile.beam(),
            goniometer: profile.goniometer(),
            detector: profile.detector()?,
        })
    }

    /// Replace stub geometry with site values.
    pub fn with_overrides(mut self, overrides: &SiteOverrides) -> Result<Self> {
        if overrides.is_empty() {
            return Ok(self);
        }
        overrides.apply_to_beam(&mut self.beam)?;
        overrides.apply_to_goniometer(self.goniometer.as_mut())?;
        overrides.apply_to_detector(&mut self.detector)?;
        debug!(path = %self.path.display(), "Applied site overrides");
        Ok(self)
    }

    /// Decode the pixels as `f64`, rows first. Read from disk on every call.
    pub fn raw_data(&self) -> Result<Array2<f64>> {
        let raw = edtiff_tiff::decode(&self.path)?;
        Ok(raw.to_f64_array()?)
    }

    /// Decode the pixels and summarise them against the first panel.
    /// `None` when the image or the detector is empty.
    pub fn pixel_stats(&self) -> Result<Option<PixelStats>> {
        let data = self.raw_data()?;
        Ok(self
            .detector
            .panel()
            .and_then(|panel| PixelStats::compute(&data, panel)))
    }
}

/// Summary of pixel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Pixels outside the trusted range.
    pub untrusted: usize,
}

impl PixelStats {
    /// Statistics of `data` read by `panel`, or `None` when it is empty.
    pub fn compute(data: &Array2<f64>, panel: &Panel) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut untrusted = 0;
        for &value in data.iter() {
            min = min.min(value);
            max = max.max(value);
            sum += value;
            if !panel.is_trusted(value) {
                untrusted += 1;
            }
        }

        Some(Self {
            min,
            max,
            mean: sum / data.len() as f64,
            untrusted,
        })
    }
}

//! Site overrides for placeholder geometry.
//!
//! Profiles attach provisional geometry to images whose files carry no
//! calibration. A site configuration replaces any subset of those values
//! after import. Overrides are read from JSON:
//!
//! ```json
//! {
//!   "distance": 1890.0,
//!   "beam_centre": [14.2, 13.9],
//!   "wavelength": 0.0197
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::beam::Beam;
use crate::detector::{AxisDirection, Detector};
use crate::error::{Error, Result};
use crate::goniometer::Goniometer;
use crate::vector::Vec3;

/// Optional replacements for profile geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteOverrides {
    /// Sample to detector distance (mm).
    pub distance: Option<f64>,
    /// Beam centre (fast, slow) in mm.
    pub beam_centre: Option<(f64, f64)>,
    /// Pixel size (fast, slow) in mm.
    pub pixel_size: Option<(f64, f64)>,
    /// Trusted intensity range.
    pub trusted_range: Option<(f64, f64)>,
    /// Fast axis direction.
    pub fast_axis: Option<AxisDirection>,
    /// Slow axis direction.
    pub slow_axis: Option<AxisDirection>,
    /// Beam wavelength (Angstrom).
    pub wavelength: Option<f64>,
    /// Goniometer rotation axis.
    pub rotation_axis: Option<Vec3>,
}

impl SiteOverrides {
    /// Parse overrides from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: Self = serde_json::from_str(json)?;
        overrides.validate()?;
        Ok(overrides)
    }

    /// Read overrides from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// True when no value is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn validate(&self) -> Result<()> {
        if let Some(distance) = self.distance {
            if !distance.is_finite() || distance <= 0.0 {
                return Err(Error::Config(format!(
                    "distance must be positive, got {}",
                    distance
                )));
            }
        }
        if let Some((fast, slow)) = self.pixel_size {
            if fast <= 0.0 || slow <= 0.0 {
                return Err(Error::Config(format!(
                    "pixel size must be positive, got ({}, {})",
                    fast, slow
                )));
            }
        }
        if let Some((low, high)) = self.trusted_range {
            if low > high {
                return Err(Error::Config(format!(
                    "trusted range ({}, {}) is reversed",
                    low, high
                )));
            }
        }
        Ok(())
    }

    /// Apply beam overrides.
    pub fn apply_to_beam(&self, beam: &mut Beam) -> Result<()> {
        if let Some(wavelength) = self.wavelength {
            beam.set_wavelength(wavelength)?;
        }
        Ok(())
    }

    /// Apply goniometer overrides. Still images have no goniometer and
    /// ignore a rotation axis override.
    pub fn apply_to_goniometer(&self, goniometer: Option<&mut Goniometer>) -> Result<()> {
        if let (Some(axis), Some(goniometer)) = (self.rotation_axis, goniometer) {
            goniometer.set_rotation_axis(axis)?;
        }
        Ok(())
    }

    /// Apply panel overrides to every panel of `detector`.
    pub fn apply_to_detector(&self, detector: &mut Detector) -> Result<()> {
        for panel in &mut detector.panels {
            if let Some(distance) = self.distance {
                panel.distance = distance;
            }
            if let Some(beam_centre) = self.beam_centre {
                panel.beam_centre = beam_centre;
            }
            if let Some(pixel_size) = self.pixel_size {
                panel.pixel_size = pixel_size;
            }
            if let Some(trusted_range) = self.trusted_range {
                panel.trusted_range = trusted_range;
            }
            if let Some(fast) = self.fast_axis {
                panel.fast_axis = fast;
            }
            if let Some(slow) = self.slow_axis {
                panel.slow_axis = slow;
            }
            if panel.normal() == [0.0, 0.0, 0.0] {
                return Err(Error::Config(format!(
                    "fast axis {} and slow axis {} are parallel",
                    panel.fast_axis, panel.slow_axis
                )));
            }
        }
        Ok(())
    }
}

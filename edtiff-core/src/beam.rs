//! Incident beam model.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector::{normalize, Vec3};

/// A monochromatic, partially polarized incident beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    /// Unit vector pointing from the sample back towards the source.
    pub sample_to_source: Vec3,
    /// Wavelength in Angstrom.
    pub wavelength: f64,
    /// Unit normal of the polarization plane.
    pub polarization_normal: Vec3,
    /// Fraction of the beam polarized in the plane.
    pub polarization_fraction: f64,
}

impl Beam {
    /// Create a polarized beam. Direction vectors are normalised.
    pub fn polarized(
        sample_to_source: Vec3,
        wavelength: f64,
        polarization_normal: Vec3,
        polarization_fraction: f64,
    ) -> Self {
        Self {
            sample_to_source: normalize(sample_to_source),
            wavelength,
            polarization_normal: normalize(polarization_normal),
            polarization_fraction,
        }
    }

    /// Replace the wavelength, rejecting non-positive values.
    pub fn set_wavelength(&mut self, wavelength: f64) -> Result<()> {
        if !wavelength.is_finite() || wavelength <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "wavelength must be positive, got {}",
                wavelength
            )));
        }
        self.wavelength = wavelength;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarized_normalises() {
        let beam = Beam::polarized([0.0, 0.0, 2.0], 0.02508, [0.0, 5.0, 0.0], 0.5);
        assert_eq!(beam.sample_to_source, [0.0, 0.0, 1.0]);
        assert_eq!(beam.polarization_normal, [0.0, 1.0, 0.0]);
        assert_eq!(beam.polarization_fraction, 0.5);
    }

    #[test]
    fn test_set_wavelength() {
        let mut beam = Beam::polarized([0.0, 0.0, 1.0], 0.02508, [0.0, 1.0, 0.0], 0.5);
        beam.set_wavelength(0.0197).unwrap();
        assert_eq!(beam.wavelength, 0.0197);
        assert!(beam.set_wavelength(0.0).is_err());
        assert!(beam.set_wavelength(f64::NAN).is_err());
        assert_eq!(beam.wavelength, 0.0197);
    }
}

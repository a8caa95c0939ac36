//! Rotation scan model.

use serde::{Deserialize, Serialize};

/// A contiguous run of images with a constant oscillation per image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    /// First and last image numbers, inclusive.
    pub image_range: (i64, i64),
    /// Oscillation (start, width) of the first image in degrees.
    pub oscillation: (f64, f64),
    /// Exposure time of each image in seconds.
    pub exposure_times: Vec<f64>,
    /// Acquisition epoch of each image.
    pub epochs: Vec<f64>,
}

impl Scan {
    /// Scan covering the single image `index`, acquired at epoch 0.
    pub fn single_image(index: i64, exposure_time: f64, oscillation: (f64, f64)) -> Self {
        Self {
            image_range: (index, index),
            oscillation,
            exposure_times: vec![exposure_time],
            epochs: vec![0.0],
        }
    }

    /// Number of images in the scan.
    pub fn num_images(&self) -> usize {
        (self.image_range.1 - self.image_range.0 + 1) as usize
    }

    /// Angular range (start, end) in degrees covered by the whole scan.
    pub fn oscillation_range(&self) -> (f64, f64) {
        let (start, width) = self.oscillation;
        (start, start + width * self.num_images() as f64)
    }
}

//! # edtiff
//!
//! Detector profiles for single-page TIFF images from electron-diffraction
//! detectors that record no usable calibration.
//!
//! Each profile recognises files by page shape, optionally a tag value and an
//! opt-in flag, and attaches placeholder geometry: a scan inferred from the
//! filename, a polarized beam, a goniometer for rotation data and a
//! single-panel detector.
//!
//! ## Supported detectors
//!
//! | Profile | Page shape | Requires |
//! |---|---|---|
//! | `merlin` | 512x512 | `QD_MERLIN_TIFF` / [`DetectionConfig::merlin`] |
//! | `asi` | 516x516 | ImageDescription contains `ImageCameraName: timepix` |
//! | `tecnai-g2` | 1024x1024 | Olympus SIS camera name contains `Veleta` |
//! | `medipix` | 514x514 | |
//! | `ued` | 1300x1340 | |
//! | `ued-bnl` | 512x512 | `UED_BNL_TIFF` / [`DetectionConfig::ued_bnl`] |
//!
//! ## Quick Start
//!
//! ```no_run
//! use edtiff::prelude::*;
//!
//! let registry = FormatRegistry::with_builtin();
//! let config = DetectionConfig::from_env();
//!
//! let image = registry.open("grid_0023.tif", &config)?;
//! println!("{} {:?}", image.profile, image.scan);
//!
//! let pixels = image.raw_data()?;
//! println!("{:?}", pixels.dim());
//! # Ok::<(), edtiff::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod image;
pub mod prelude;
pub mod profile;
pub mod profiles;
pub mod registry;
pub mod scan;

pub use config::{DetectionConfig, Gate, MERLIN_ENV, UED_BNL_ENV};
pub use error::{Error, Result};
pub use image::{ImportedImage, PixelStats};
pub use profile::{
    accepts_container, understand_generic, DetectorProfile, GeometryStub, ImageKind, TagCheck,
};
pub use registry::FormatRegistry;
pub use scan::{dummy_scan, image_index, parse_image_index};

pub use edtiff_core::{Beam, Detector, DetectorKind, Goniometer, Panel, Scan, SiteOverrides};
pub use edtiff_tiff::{TiffContainer, TiffError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

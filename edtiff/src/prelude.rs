//! Prelude module for convenient imports.
//!
//! ```rust
//! use edtiff::prelude::*;
//! ```

// Error types
pub use crate::{Error, Result};

// Detection
pub use crate::{DetectionConfig, DetectorProfile, FormatRegistry, Gate};

// Assembled models
pub use crate::{Beam, Detector, Goniometer, ImportedImage, PixelStats, Scan, SiteOverrides};

//! # edtiff Core
//!
//! Image model types shared by the edtiff crates.
//!
//! This crate provides the experimental geometry attached to every recognised
//! image:
//! - Error handling types
//! - Beam, goniometer and detector models
//! - Scan (image range and oscillation) models
//! - Site overrides for replacing placeholder geometry after import

pub mod error;
pub mod beam;
pub mod goniometer;
pub mod detector;
pub mod scan;
pub mod overrides;
mod vector;

pub use error::{Error, Result};
pub use beam::Beam;
pub use goniometer::Goniometer;
pub use detector::{
    beam_centre_for, trusted_range_for_bits, AxisDirection, Detector, DetectorKind, Panel,
};
pub use scan::Scan;
pub use overrides::SiteOverrides;
pub use vector::Vec3;

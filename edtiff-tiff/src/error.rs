//! TIFF error types

use thiserror::Error;

/// Result type for TIFF operations
pub type Result<T> = std::result::Result<T, TiffError>;

/// TIFF error types
#[derive(Error, Debug)]
pub enum TiffError {
    /// The crate was built without the `codec` feature
    #[error("TIFF codec not available: edtiff-tiff was built without the `codec` feature")]
    CodecUnavailable,

    /// The file is not a readable TIFF container
    #[error("Malformed TIFF container: {0}")]
    Malformed(String),

    /// Container holds no image pages
    #[error("TIFF container has no pages")]
    NoPages,

    /// Olympus SIS block could not be parsed
    #[error("Invalid Olympus SIS block: {0}")]
    InvalidSis(String),

    /// Pixel data could not be decoded
    #[error("Decoding error: {0}")]
    DecodingError(String),

    /// Image cannot be represented as a single 2-D plane
    #[error("Unsupported sample layout: {samples_per_pixel} samples per pixel")]
    UnsupportedSampleLayout { samples_per_pixel: usize },

    /// Decoded sample count does not match the image dimensions
    #[error("Sample count mismatch: {width}x{height} image, got {available} samples")]
    SampleCountMismatch {
        width: usize,
        height: usize,
        available: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(feature = "codec")]
impl From<tiff::TiffError> for TiffError {
    fn from(err: tiff::TiffError) -> Self {
        match err {
            tiff::TiffError::IoError(e) => TiffError::IoError(e),
            other => TiffError::Malformed(other.to_string()),
        }
    }
}

//! Error types for the edtiff facade.

use thiserror::Error;

/// Main error type for edtiff.
#[derive(Error, Debug)]
pub enum Error {
    /// Model construction or site override errors.
    #[error(transparent)]
    Core(#[from] edtiff_core::Error),

    /// Container or decoding errors.
    #[error(transparent)]
    Tiff(#[from] edtiff_tiff::TiffError),

    /// No registered profile understands the file.
    #[error("No detector profile recognises {path}")]
    Unrecognized { path: String },

    /// Profile name already taken.
    #[error("Profile '{name}' already registered")]
    AlreadyRegistered { name: String },

    /// Profile lookup by name failed.
    #[error("Profile '{name}' not found")]
    NotFound { name: String },
}

/// Result type for edtiff operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Unrecognized {
            path: "frame_0001.tif".into(),
        };
        assert_eq!(err.to_string(), "No detector profile recognises frame_0001.tif");

        let err: Error = edtiff_tiff::TiffError::NoPages.into();
        assert_eq!(err.to_string(), "TIFF container has no pages");
    }
}

//! Error types for the edtiff models.

use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or adjusting image models.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unknown axis direction string.
    #[error("Unknown axis direction: {0:?}")]
    UnknownAxis(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

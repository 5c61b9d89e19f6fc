//! Error types for encoding and decoding.

use thiserror::Error;

/// Export / codec error.
#[derive(Debug, Error)]
pub enum IoError {
    /// Encoder rejected the image.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Input bytes could not be decoded.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Unknown or unsupported format name.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Buffer construction failed.
    #[error(transparent)]
    Core(#[from] remold_core::Error),

    /// Resize failed.
    #[error(transparent)]
    Ops(#[from] remold_ops::OpsError),
}

/// Result type for codec operations.
pub type IoResult<T> = Result<T, IoError>;

//! Error types for remold-core operations.
//!
//! Every failure that can happen while constructing or combining raster
//! buffers is expressed through [`Error`]. Higher crates wrap it in their own
//! error enums (`OpsError`, `IoError`, `EditError`) via `#[from]`.
//!
//! # Usage
//!
//! ```rust
//! use remold_core::{Error, Result};
//!
//! fn check(width: u32, height: u32) -> Result<()> {
//!     if width == 0 || height == 0 {
//!         return Err(Error::invalid_dimensions(width, height, "zero-sized raster"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(0, 10).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by raster buffer construction and buffer-to-buffer copies.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid raster dimensions.
    ///
    /// Returned when width or height is zero, or when the byte size of
    /// `width * height * 4` would overflow `usize`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Raw pixel data does not match the declared dimensions.
    #[error("buffer size mismatch: expected {expected} bytes, got {got}")]
    BufferSize {
        /// Expected byte length (`width * height * 4`)
        expected: usize,
        /// Actual byte length
        got: usize,
    },

    /// Two buffers that must share dimensions do not.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First buffer width
        a_width: u32,
        /// First buffer height
        a_height: u32,
        /// Second buffer width
        b_width: u32,
        /// Second buffer height
        b_height: u32,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }
}

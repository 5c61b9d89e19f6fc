//! Error types for raster kernels.

use thiserror::Error;

/// Error type for kernel operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Buffer construction or copy failed.
    #[error(transparent)]
    Core(#[from] remold_core::Error),
}

/// Result type for kernel operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Rejects non-finite or non-positive values.
pub(crate) fn require_positive(name: &str, value: f64) -> OpsResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(OpsError::InvalidParameter(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}

/// Rejects non-finite values.
pub(crate) fn require_finite(name: &str, value: f64) -> OpsResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OpsError::InvalidParameter(format!("{name} must be finite, got {value}")))
    }
}

/// Fails with [`remold_core::Error::DimensionMismatch`] unless both rasters match.
pub(crate) fn ensure_same_dimensions(
    a: &remold_core::RasterBuffer,
    b: &remold_core::RasterBuffer,
) -> OpsResult<()> {
    if a.same_dimensions(b) {
        Ok(())
    } else {
        Err(remold_core::Error::dimension_mismatch((a.width(), a.height()), (b.width(), b.height())).into())
    }
}

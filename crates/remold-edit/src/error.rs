//! Error types for the edit layer.

use thiserror::Error;

/// Errors surfaced by sessions, the dispatcher and the engine.
#[derive(Debug, Error)]
pub enum EditError {
    /// No such session, no regions, or otherwise not ready.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Tool id not in the catalog.
    #[error("unsupported tool: {0}")]
    UnsupportedTool(String),

    /// Region geometry or parameters cannot be applied.
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// Export encoder failed.
    #[error("encoding failed: {0}")]
    Encoding(#[from] remold_io::IoError),

    /// Configuration could not be parsed or is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    /// Buffer error.
    #[error(transparent)]
    Core(#[from] remold_core::Error),

    /// Kernel error.
    #[error(transparent)]
    Ops(#[from] remold_ops::OpsError),
}

impl From<serde_yaml::Error> for EditError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result type for the edit layer.
pub type EditResult<T> = Result<T, EditError>;

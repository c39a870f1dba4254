//! Error types for pixel operations.

use thiserror::Error;

/// Error type for pixel operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid parameter value (malformed kernel, non-finite amount, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Buffer-level failure.
    #[error(transparent)]
    Core(#[from] retouch_core::Error),
}

/// Result type for pixel operations.
pub type OpsResult<T> = Result<T, OpsError>;

//! Error types for image operations.

use brow_core::CoreError;
use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Images have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Buffer construction failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Fails with [`OpsError::SizeMismatch`] unless both sizes agree.
pub(crate) fn ensure_same_size(what: &str, a: (u32, u32), b: (u32, u32)) -> OpsResult<()> {
    if a != b {
        return Err(OpsError::SizeMismatch(format!(
            "{}: {}x{} vs {}x{}",
            what, a.0, a.1, b.0, b.1
        )));
    }
    Ok(())
}

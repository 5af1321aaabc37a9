//! Error types for file I/O.

use std::io;
use std::path::PathBuf;

use brow_core::CoreError;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File could not be opened or created.
    #[error("{}: {source}", path.display())]
    File {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Pixel layout the reader does not handle.
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    /// Malformed landmark document.
    #[error("landmark file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Landmark document parsed but is not usable.
    #[error("invalid landmarks: {0}")]
    InvalidLandmarks(String),

    /// Decoded buffer rejected by the core types.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

impl IoError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}

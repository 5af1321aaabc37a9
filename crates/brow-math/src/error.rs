//! Error types for geometry operations.

use thiserror::Error;

/// Errors raised by landmark and polygon operations.
///
/// Every operation that needs a specific number of points reports a wrong
/// count through [`GeometryError::PointCount`] instead of returning an empty
/// or zero-point placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A landmark set did not have the required number of points.
    #[error("expected {expected} points, got {got}")]
    PointCount {
        /// Required point count
        expected: usize,
        /// Actual point count
        got: usize,
    },

    /// A boundary polygon had a vertex count no matte variant accepts.
    #[error("unsupported boundary with {0} vertices (expected 6, 10, 11 or 12)")]
    UnsupportedBoundary(usize),
}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

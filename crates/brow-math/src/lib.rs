//! # brow-math
//!
//! Geometry kernel for turning eyebrow landmarks into a closed cutout region.
//!
//! - [`Point`] - 2D image-space point ([`glam::DVec2`]) with rounded-trig
//!   rotation ([`PointExt`])
//! - [`eyebrow`] - weighted center, anisotropic expansion, stitching of two
//!   eyebrows into one boundary, junction self-intersection correction
//! - [`polygon`] - segment intersection, [`Boundary`] with point-in-polygon
//! - Interpolation utilities (lerp, smoothstep) used by the gradient map
//!
//! # Usage
//!
//! ```rust
//! use brow_math::{eyebrow, Point};
//!
//! let brow = [
//!     Point::new(10.0, 40.0), Point::new(25.0, 35.0), Point::new(40.0, 38.0),
//!     Point::new(40.0, 45.0), Point::new(25.0, 44.0), Point::new(10.0, 46.0),
//! ];
//! let grown = eyebrow::expand(&brow, 0.2, 1.5, 0.0).unwrap();
//! assert_eq!(grown.len(), 6);
//! ```
//!
//! # Coordinates
//!
//! Image space: origin top-left, y down, pixel `(x, y)` sampled at its
//! center `(x + 0.5, y + 0.5)`.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod interp;
mod point;

pub mod eyebrow;
pub mod polygon;

pub use error::{GeometryError, GeometryResult};
pub use interp::*;
pub use point::*;
pub use polygon::{segment_intersection, Boundary, BoundaryKind, Segment};

/// Re-export glam types for direct use
pub mod glam {
    pub use ::glam::DVec2;
}

//! # brow-core
//!
//! Core types shared by every crate of the eyebrow recoloring workspace.
//!
//! - [`Image`] - straight-alpha RGBA `f32` buffer (photos, cutouts, layers)
//! - [`Matte`] - single-channel `f32` opacity buffer (hair, skin, portrait,
//!   eyebrow region membership)
//! - [`luminance_rec709`] - the luma weights used for grayscale conversion
//!   and lightness statistics
//!
//! ## Crate Structure
//!
//! ```text
//! brow-core (this crate)
//!    ^
//!    |
//!    +-- brow-math (points, polygons)
//!    +-- brow-ops (image operators)
//!    +-- brow-io (PNG / landmark files)
//!    +-- brow-pipeline (matte builder, colorists, ColorChanger)
//! ```
//!
//! Pixel buffers are stored row-major, top-to-bottom, behind an `Arc` so
//! cloning a layer is cheap and mutation is copy-on-write.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod matte;
pub mod pixel;

pub use error::{CoreError, CoreResult};
pub use image::Image;
pub use matte::Matte;
pub use pixel::{
    luminance_rec709, Rgba, BLACK, REC709_LUMA, REC709_LUMA_B, REC709_LUMA_G, REC709_LUMA_R,
    TRANSPARENT, WHITE,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::image::Image;
    pub use crate::matte::Matte;
    pub use crate::pixel::{luminance_rec709, Rgba};
}

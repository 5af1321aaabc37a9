//! # brow-ops
//!
//! Image operators used by the recoloring pipeline. Every operator is a pure
//! function: inputs are borrowed, a new [`Image`](brow_core::Image) or
//! [`Matte`](brow_core::Matte) is returned, nothing is configured in place.
//!
//! # Modules
//!
//! - [`composite`] - Porter-Duff over / in, mask-to-alpha, matte arithmetic
//! - [`color`] - false color, gradient color map, clamp, polynomial
//! - [`gradient`] - smooth linear gradients and the 1D [`GradientMap`]
//! - [`filter`] - box blur and bloom
//! - [`resize`] - separable resampling
//! - [`transform`] - sub-pixel translation
//!
//! # Example
//!
//! ```rust
//! use brow_core::{Image, Matte};
//! use brow_ops::composite::{cut_out, over};
//!
//! let photo = Image::filled(4, 4, [0.8, 0.6, 0.4, 1.0]);
//! let matte = Matte::from_fn(4, 4, |x, _| if x < 2 { 1.0 } else { 0.0 });
//! let part = cut_out(&photo, &matte).unwrap();
//! let back = over(&part, &photo).unwrap();
//! assert_eq!(back.pixel(3, 0), photo.pixel(3, 0));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod color;
pub mod composite;
pub mod filter;
pub mod gradient;
pub mod resize;
pub mod transform;

pub use error::{OpsError, OpsResult};
pub use gradient::GradientMap;
pub use resize::Filter;

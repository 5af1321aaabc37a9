//! # brow-io
//!
//! File formats for the recoloring workspace.
//!
//! - [`png`] - photos as RGBA [`Image`](brow_core::Image), segmentation mattes
//!   as [`Matte`](brow_core::Matte). 8/16-bit gray, gray+alpha, RGB, RGBA and
//!   palette files are accepted; output is always 8-bit.
//! - [`landmarks`] - YAML files holding a recorded face roll and the two
//!   6-point eyebrow landmark sets.
//!
//! # Example
//!
//! ```rust,ignore
//! use brow_io::{read_image, read_matte, write_image};
//!
//! let photo = read_image("photo.png")?;
//! let hair = read_matte("hair.png")?;
//! write_image("copy.png", &photo)?;
//! ```

#![warn(missing_docs)]

mod error;
pub mod landmarks;
pub mod png;

pub use error::{IoError, IoResult};
pub use crate::landmarks::{read_landmarks, write_landmarks, LandmarkFile};
pub use crate::png::{read_image, read_matte, write_image, write_matte};

//! Integration tests for brow-rs crates.
//!
//! [`scene`] builds a synthetic capture with known eyebrow lightness; the
//! tests run it through the whole pipeline, from PNG files to the
//! composited result.

pub mod scene;

//! Single-channel opacity buffer.
//!
//! A [`Matte`] marks region membership: `1.0` inside, `0.0` outside, soft
//! values along edges. Hair, skin and portrait segmentation inputs and the
//! derived eyebrow region are all mattes.

use crate::{CoreError, CoreResult};
use rayon::prelude::*;
use std::sync::Arc;

/// Owned single-channel `f32` buffer with shared, copy-on-write storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Matte {
    data: Arc<Vec<f32>>,
    width: u32,
    height: u32,
}

impl Matte {
    /// Creates an empty (all zero) matte.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Creates a matte with every value set to `value`.
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            data: Arc::new(vec![value; width as usize * height as usize]),
            width,
            height,
        }
    }

    /// Wraps existing data.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] if `data.len() != width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<f32>) -> CoreResult<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(CoreError::invalid_dimensions(
                width,
                height,
                format!("expected {} values, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Builds a matte by evaluating `f(x, y)` for every pixel, rows in parallel.
    ///
    /// # Example
    ///
    /// ```rust
    /// use brow_core::Matte;
    ///
    /// let left_half = Matte::from_fn(4, 2, |x, _| if x < 2 { 1.0 } else { 0.0 });
    /// assert_eq!(left_half.get(1, 1), 1.0);
    /// assert_eq!(left_half.get(2, 1), 0.0);
    /// ```
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> f32 + Sync,
    {
        let row_len = width as usize;
        let mut data = vec![0.0f32; row_len * height as usize];
        if row_len > 0 {
            data.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
                for (x, v) in row.iter_mut().enumerate() {
                    *v = f(x as u32, y as u32);
                }
            });
        }
        Self {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Matte width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Matte height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw values, row-major.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable values (copy-on-write if shared).
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Consumes the matte and returns its data.
    pub fn into_vec(self) -> Vec<f32> {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        debug_assert!(x < self.width && y < self.height, "matte access out of bounds");
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Writes one value.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        debug_assert!(x < self.width && y < self.height, "matte access out of bounds");
        let w = self.width as usize;
        self.data_mut()[y as usize * w + x as usize] = value;
    }

    /// Fails unless `other` has the same dimensions.
    pub fn ensure_same_size(&self, other: (u32, u32)) -> CoreResult<()> {
        if self.dimensions() != other {
            return Err(CoreError::dimension_mismatch(self.dimensions(), other));
        }
        Ok(())
    }

    /// Number of values strictly above `threshold`.
    pub fn coverage(&self, threshold: f32) -> usize {
        self.data.iter().filter(|&&v| v > threshold).count()
    }
}

//! RGBA image buffer.
//!
//! [`Image`] holds straight-alpha RGBA `f32` pixels, row-major,
//! top-to-bottom:
//!
//! ```text
//! Memory: [R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A ...]  <- Row 1
//! ```
//!
//! The buffer lives in an [`Arc<Vec<f32>>`] so clones share storage;
//! [`Image::data_mut`] performs copy-on-write.
//!
//! # Usage
//!
//! ```rust
//! use brow_core::Image;
//!
//! let mut img = Image::new(64, 32);
//! img.set_pixel(3, 4, [1.0, 0.5, 0.25, 1.0]);
//! assert_eq!(img.pixel(3, 4), [1.0, 0.5, 0.25, 1.0]);
//! ```

use crate::pixel::Rgba;
use crate::{CoreError, CoreResult};
use rayon::prelude::*;
use std::sync::Arc;

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 4;

/// Owned RGBA `f32` image with shared, copy-on-write storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    data: Arc<Vec<f32>>,
    width: u32,
    height: u32,
}

impl Image {
    /// Creates a fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: Arc::new(vec![0.0; width as usize * height as usize * CHANNELS]),
            width,
            height,
        }
    }

    /// Creates an image filled with one color.
    ///
    /// # Example
    ///
    /// ```rust
    /// use brow_core::Image;
    ///
    /// let gray = Image::filled(4, 4, [0.5, 0.5, 0.5, 1.0]);
    /// assert_eq!(gray.pixel(3, 3)[0], 0.5);
    /// ```
    pub fn filled(width: u32, height: u32, pixel: Rgba) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Wraps existing RGBA data.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] if `data.len()` is not
    /// `width * height * 4`.
    pub fn from_vec(width: u32, height: u32, data: Vec<f32>) -> CoreResult<Self> {
        let expected = width as usize * height as usize * CHANNELS;
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

    /// Builds an image by evaluating `f(x, y)` for every pixel, rows in parallel.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> Rgba + Sync,
    {
        let row_len = width as usize * CHANNELS;
        let mut data = vec![0.0f32; row_len * height as usize];
        if row_len > 0 {
            data.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
                for (x, out) in row.chunks_exact_mut(CHANNELS).enumerate() {
                    out.copy_from_slice(&f(x as u32, y as u32));
                }
            });
        }
        Self {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw interleaved RGBA data.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable RGBA data (copy-on-write if shared).
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Consumes the image and returns its data, cloning only if shared.
    pub fn into_vec(self) -> Vec<f32> {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| (*shared).clone())
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        [self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]]
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    /// Writes one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        self.data_mut()[o..o + CHANNELS].copy_from_slice(&px);
    }

    /// Checked variant of [`set_pixel`](Self::set_pixel).
    pub fn try_set_pixel(&mut self, x: u32, y: u32, px: Rgba) -> CoreResult<()> {
        if x >= self.width || y >= self.height {
            return Err(CoreError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        self.set_pixel(x, y, px);
        Ok(())
    }

    /// Fails unless `other` has the same dimensions.
    pub fn ensure_same_size(&self, other: (u32, u32)) -> CoreResult<()> {
        if self.dimensions() != other {
            return Err(CoreError::dimension_mismatch(self.dimensions(), other));
        }
        Ok(())
    }

    /// Iterates over pixels as `[f32; 4]` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|c| [c[0], c[1], c[2], c[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent() {
        let img = Image::new(3, 2);
        assert_eq!(img.data().len(), 3 * 2 * 4);
        assert!(img.pixels().all(|p| p == [0.0; 4]));
    }

    #[test]
    fn test_from_vec_rejects_bad_length() {
        let err = Image::from_vec(2, 2, vec![0.0; 15]).unwrap_err();
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_copy_on_write() {
        let a = Image::filled(2, 2, [1.0, 0.0, 0.0, 1.0]);
        let mut b = a.clone();
        b.set_pixel(0, 0, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(a.pixel(0, 0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(b.pixel(0, 0), [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_from_fn_layout() {
        let img = Image::from_fn(4, 3, |x, y| [x as f32, y as f32, 0.0, 1.0]);
        assert_eq!(img.pixel(3, 2), [3.0, 2.0, 0.0, 1.0]);
        assert_eq!(img.pixel(0, 1), [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_try_set_pixel_bounds() {
        let mut img = Image::new(2, 2);
        assert!(img.try_set_pixel(2, 0, [1.0; 4]).is_err());
        assert!(img.try_set_pixel(1, 1, [1.0; 4]).is_ok());
    }
}

//! Sub-pixel translation.
//!
//! Output keeps the source size. Content shifted past the border is lost and
//! uncovered area is transparent (zero).
//!
//! # Example
//!
//! ```rust
//! use brow_core::Matte;
//! use brow_ops::transform::translate_matte;
//!
//! let m = Matte::from_fn(4, 1, |x, _| if x == 0 { 1.0 } else { 0.0 });
//! let moved = translate_matte(&m, 2.0, 0.0).unwrap();
//! assert_eq!(moved.data(), &[0.0, 0.0, 1.0, 0.0]);
//! ```

use brow_core::{Image, Matte};
use rayon::prelude::*;
use tracing::trace;

use crate::composite::{map_pixels, premultiply_image, unpremultiply};
use crate::{OpsError, OpsResult};

/// Translates interleaved `f32` data by `(dx, dy)` pixels with bilinear
/// sampling. Samples outside the source read as zero.
pub fn translate_f32(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    dx: f32,
    dy: f32,
) -> OpsResult<Vec<f32>> {
    trace!(width, height, dx, dy, "transform::translate");
    if src.len() != width * height * channels {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            width * height * channels,
            src.len()
        )));
    }
    if !dx.is_finite() || !dy.is_finite() {
        return Err(OpsError::InvalidParameter(format!(
            "translation must be finite, got ({dx}, {dy})"
        )));
    }

    let fetch = |x: isize, y: isize, c: usize| -> f32 {
        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            0.0
        } else {
            src[(y as usize * width + x as usize) * channels + c]
        }
    };

    let row_len = width * channels;
    let mut dst = vec![0.0f32; src.len()];
    if row_len == 0 {
        return Ok(dst);
    }
    dst.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let sy = y as f32 - dy;
            let y0 = sy.floor();
            let fy = sy - y0;
            let y0 = y0 as isize;
            for x in 0..width {
                let sx = x as f32 - dx;
                let x0 = sx.floor();
                let fx = sx - x0;
                let x0 = x0 as isize;
                for c in 0..channels {
                    let top = fetch(x0, y0, c) * (1.0 - fx) + fetch(x0 + 1, y0, c) * fx;
                    let bottom =
                        fetch(x0, y0 + 1, c) * (1.0 - fx) + fetch(x0 + 1, y0 + 1, c) * fx;
                    row[x * channels + c] = top * (1.0 - fy) + bottom * fy;
                }
            }
        });
    Ok(dst)
}

/// Translates an RGBA image. Interpolation runs on premultiplied color.
pub fn translate(src: &Image, dx: f32, dy: f32) -> OpsResult<Image> {
    if dx == 0.0 && dy == 0.0 {
        return Ok(src.clone());
    }
    let pre = premultiply_image(src);
    let data = translate_f32(
        pre.data(),
        src.width() as usize,
        src.height() as usize,
        4,
        dx,
        dy,
    )?;
    let moved = Image::from_vec(src.width(), src.height(), data)?;
    Ok(map_pixels(&moved, unpremultiply))
}

/// Translates a matte.
pub fn translate_matte(src: &Matte, dx: f32, dy: f32) -> OpsResult<Matte> {
    if dx == 0.0 && dy == 0.0 {
        return Ok(src.clone());
    }
    let data = translate_f32(
        src.data(),
        src.width() as usize,
        src.height() as usize,
        1,
        dx,
        dy,
    )?;
    Ok(Matte::from_vec(src.width(), src.height(), data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn integer_shift_is_exact() {
        let m = Matte::from_fn(3, 3, |x, y| (y * 3 + x) as f32);
        let moved = translate_matte(&m, 1.0, 1.0).unwrap();
        assert_eq!(moved.get(0, 0), 0.0);
        assert_eq!(moved.get(1, 1), 0.0);
        assert_eq!(moved.get(2, 2), 4.0);
        assert_eq!(moved.get(2, 1), 1.0);
    }

    #[test]
    fn negative_shift() {
        let m = Matte::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let moved = translate_matte(&m, -1.0, 0.0).unwrap();
        assert_eq!(moved.data(), &[2.0, 3.0, 0.0]);
    }

    #[test]
    fn half_pixel_shift_interpolates() {
        let m = Matte::from_vec(2, 1, vec![1.0, 0.0]).unwrap();
        let moved = translate_matte(&m, 0.5, 0.0).unwrap();
        assert_abs_diff_eq!(moved.get(0, 0), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(moved.get(1, 0), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn zero_shift_is_identity() {
        let img = Image::from_fn(3, 2, |x, y| [x as f32 * 0.1, y as f32 * 0.2, 0.3, 0.9]);
        assert_eq!(translate(&img, 0.0, 0.0).unwrap(), img);
    }

    #[test]
    fn image_shift_keeps_straight_color() {
        let img = Image::from_fn(2, 1, |x, _| {
            if x == 0 {
                [0.8, 0.4, 0.2, 1.0]
            } else {
                [0.0; 4]
            }
        });
        let moved = translate(&img, 0.5, 0.0).unwrap();
        let px = moved.pixel(1, 0);
        assert_abs_diff_eq!(px[0], 0.8, epsilon = 1e-5);
        assert_abs_diff_eq!(px[3], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn rejects_non_finite() {
        let m = Matte::new(2, 2);
        assert!(translate_matte(&m, f32::NAN, 0.0).is_err());
    }
}

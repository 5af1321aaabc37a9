//! Separable image resampling.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - no interpolation
//! - [`Filter::Bilinear`] - triangle
//! - [`Filter::Bicubic`] - Mitchell-Netravali (B = C = 1/3)
//! - [`Filter::Lanczos3`] - windowed sinc, used to bring photos to matte size
//!
//! Both passes precompute a contribution table per output coordinate, then
//! run rows in parallel.
//!
//! # Example
//!
//! ```rust
//! use brow_ops::resize::{resize_f32, Filter};
//!
//! let src = vec![0.5f32; 16 * 16 * 4];
//! let dst = resize_f32(&src, 16, 16, 4, 32, 8, Filter::Lanczos3).unwrap();
//! assert_eq!(dst.len(), 32 * 8 * 4);
//! ```

use brow_core::{Image, Matte};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Nearest-neighbor.
    Nearest,
    /// Bilinear (triangle).
    Bilinear,
    /// Bicubic (Mitchell-Netravali).
    #[default]
    Bicubic,
    /// Lanczos with three lobes.
    Lanczos3,
}

impl Filter {
    /// Support radius in source pixels at scale 1.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Bilinear => 1.0,
            Filter::Bicubic => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Kernel value at distance `x`.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        match self {
            Filter::Nearest => {
                if ax < 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Filter::Bilinear => (1.0 - ax).max(0.0),
            Filter::Bicubic => mitchell(ax),
            Filter::Lanczos3 => lanczos(ax, 3.0),
        }
    }
}

fn mitchell(ax: f32) -> f32 {
    const B: f32 = 1.0 / 3.0;
    const C: f32 = 1.0 / 3.0;
    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax
            + (-18.0 + 12.0 * B + 6.0 * C) * ax * ax
            + (6.0 - 2.0 * B))
            / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax
            + (6.0 * B + 30.0 * C) * ax * ax
            + (-12.0 * B - 48.0 * C) * ax
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

fn lanczos(ax: f32, a: f32) -> f32 {
    if ax < 1e-8 {
        return 1.0;
    }
    if ax >= a {
        return 0.0;
    }
    let pi_x = std::f32::consts::PI * ax;
    let pi_x_a = pi_x / a;
    (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
}

/// Normalized source taps for one output coordinate.
#[derive(Debug, Clone)]
struct Taps {
    first: usize,
    weights: Vec<f32>,
}

/// Builds the tap table mapping `dst_len` output samples onto `src_len`.
fn contributions(src_len: usize, dst_len: usize, filter: Filter) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;
    // Widen the kernel when minifying so it integrates over the footprint.
    let stretch = scale.max(1.0);
    let support = filter.support() * stretch;
    let last = src_len as isize - 1;

    (0..dst_len)
        .map(|i| {
            let center = (i as f32 + 0.5) * scale - 0.5;
            let lo = ((center - support).floor() as isize).clamp(0, last) as usize;
            let hi = ((center + support).ceil() as isize).clamp(0, last) as usize;
            let mut weights: Vec<f32> = (lo..=hi)
                .map(|s| filter.weight((s as f32 - center) / stretch))
                .collect();
            let total: f32 = weights.iter().sum();
            if total.abs() > f32::EPSILON {
                weights.iter_mut().for_each(|w| *w /= total);
            } else {
                // Nearest can miss every tap on exact half-pixel centers.
                let nearest = (center.round() as isize).clamp(0, last) as usize;
                return Taps {
                    first: nearest,
                    weights: vec![1.0],
                };
            }
            Taps { first: lo, weights }
        })
        .collect()
}

/// Resizes interleaved `f32` pixel data with `channels` channels per pixel.
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] when the buffer does not match
/// `src_w * src_h * channels` or any size is zero.
pub fn resize_f32(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
    filter: Filter,
) -> OpsResult<Vec<f32>> {
    trace!(src_w, src_h, dst_w, dst_h, ?filter, "resize::resize_f32");
    if src_w == 0 || src_h == 0 || channels == 0 {
        return Err(OpsError::InvalidDimensions(
            "source width, height and channels must be > 0".into(),
        ));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(
            "destination size must be > 0".into(),
        ));
    }
    let expected = src_w * src_h * channels;
    if src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }
    if (src_w, src_h) == (dst_w, dst_h) {
        return Ok(src.to_vec());
    }

    let cols = contributions(src_w, dst_w, filter);
    let rows = contributions(src_h, dst_h, filter);

    // Horizontal pass: src_h rows of dst_w pixels.
    let mut horiz = vec![0.0f32; dst_w * src_h * channels];
    horiz
        .par_chunks_mut(dst_w * channels)
        .zip(src.par_chunks(src_w * channels))
        .for_each(|(out_row, in_row)| {
            for (x, taps) in cols.iter().enumerate() {
                let out = &mut out_row[x * channels..(x + 1) * channels];
                for (k, w) in taps.weights.iter().enumerate() {
                    let base = (taps.first + k) * channels;
                    for c in 0..channels {
                        out[c] += in_row[base + c] * w;
                    }
                }
            }
        });

    // Vertical pass.
    let row_len = dst_w * channels;
    let mut dst = vec![0.0f32; row_len * dst_h];
    dst.par_chunks_mut(row_len)
        .zip(rows.par_iter())
        .for_each(|(out_row, taps)| {
            for (k, w) in taps.weights.iter().enumerate() {
                let start = (taps.first + k) * row_len;
                let in_row = &horiz[start..start + row_len];
                for (o, &v) in out_row.iter_mut().zip(in_row) {
                    *o += v * w;
                }
            }
        });

    Ok(dst)
}

/// Resizes an RGBA image. Color is filtered premultiplied so transparent
/// neighbors do not bleed into edges.
pub fn resize_image(src: &Image, width: u32, height: u32, filter: Filter) -> OpsResult<Image> {
    debug!(
        from_w = src.width(),
        from_h = src.height(),
        to_w = width,
        to_h = height,
        ?filter,
        "resizing image"
    );
    if src.dimensions() == (width, height) {
        return Ok(src.clone());
    }
    let pre = crate::composite::premultiply_image(src);
    let data = resize_f32(
        pre.data(),
        src.width() as usize,
        src.height() as usize,
        4,
        width as usize,
        height as usize,
        filter,
    )?;
    let resized = Image::from_vec(width, height, data)?;
    // Ringing filters can push alpha slightly outside [0, 1].
    Ok(crate::composite::map_pixels(&resized, |px| {
        let a = px[3].clamp(0.0, 1.0);
        crate::composite::unpremultiply([px[0], px[1], px[2], a])
    }))
}

/// Resizes a matte.
pub fn resize_matte(src: &Matte, width: u32, height: u32, filter: Filter) -> OpsResult<Matte> {
    if src.dimensions() == (width, height) {
        return Ok(src.clone());
    }
    let data = resize_f32(
        src.data(),
        src.width() as usize,
        src.height() as usize,
        1,
        width as usize,
        height as usize,
        filter,
    )?;
    Ok(Matte::from_vec(width, height, data)?)
}

/// Largest size with the same aspect whose longer side is at most `max_side`.
///
/// Never upscales.
///
/// # Example
///
/// ```rust
/// use brow_ops::resize::limit_longest_side;
///
/// assert_eq!(limit_longest_side(2000, 1000, 500), (500, 250));
/// assert_eq!(limit_longest_side(300, 200, 500), (300, 200));
/// ```
pub fn limit_longest_side(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_side || longest == 0 {
        return (width, height);
    }
    let scale = max_side as f64 / longest as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn filter_weights() {
        assert_eq!(Filter::Nearest.weight(0.0), 1.0);
        assert_eq!(Filter::Nearest.weight(0.6), 0.0);
        assert_eq!(Filter::Bilinear.weight(0.5), 0.5);
        assert_abs_diff_eq!(Filter::Lanczos3.weight(0.0), 1.0);
        assert_abs_diff_eq!(Filter::Lanczos3.weight(1.0), 0.0, epsilon = 1e-6);
        assert_eq!(Filter::Lanczos3.weight(3.5), 0.0);
        assert!(Filter::Bicubic.weight(0.0) > Filter::Bicubic.weight(1.0));
    }

    #[test]
    fn constant_stays_constant() {
        let src = vec![0.25f32; 20 * 10 * 3];
        for filter in [Filter::Nearest, Filter::Bilinear, Filter::Bicubic, Filter::Lanczos3] {
            let dst = resize_f32(&src, 20, 10, 3, 7, 13, filter).unwrap();
            assert_eq!(dst.len(), 7 * 13 * 3);
            for v in dst {
                assert_abs_diff_eq!(v, 0.25, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn same_size_is_copy() {
        let src: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let dst = resize_f32(&src, 3, 4, 1, 3, 4, Filter::Lanczos3).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn rejects_bad_sizes() {
        assert!(resize_f32(&[0.0; 4], 2, 2, 1, 0, 2, Filter::Bilinear).is_err());
        assert!(resize_f32(&[0.0; 3], 2, 2, 1, 4, 4, Filter::Bilinear).is_err());
    }

    #[test]
    fn downscale_averages_halves() {
        // Left half black, right half white; a 2x1 result keeps the split.
        let src: Vec<f32> = (0..8).map(|x| if x < 4 { 0.0 } else { 1.0 }).collect();
        let dst = resize_f32(&src, 8, 1, 1, 2, 1, Filter::Bilinear).unwrap();
        assert!(dst[0] < 0.2);
        assert!(dst[1] > 0.8);
    }

    #[test]
    fn resize_image_ignores_transparent_color() {
        // Transparent red next to opaque blue must not tint the blue.
        let src = Image::from_fn(4, 1, |x, _| {
            if x < 2 {
                [1.0, 0.0, 0.0, 0.0]
            } else {
                [0.0, 0.0, 1.0, 1.0]
            }
        });
        let dst = resize_image(&src, 2, 1, Filter::Bilinear).unwrap();
        let px = dst.pixel(1, 0);
        assert!(px[0] < 1e-4);
        assert_abs_diff_eq!(px[2], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn resize_matte_dims() {
        let m = Matte::filled(10, 6, 0.5);
        let r = resize_matte(&m, 5, 3, Filter::Bicubic).unwrap();
        assert_eq!(r.dimensions(), (5, 3));
        assert_abs_diff_eq!(r.get(2, 1), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn longest_side() {
        assert_eq!(limit_longest_side(1000, 2000, 500), (250, 500));
        assert_eq!(limit_longest_side(500, 10, 500), (500, 10));
        assert_eq!(limit_longest_side(1001, 1, 500), (500, 1));
    }
}

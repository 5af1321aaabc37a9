//! Per-pixel color operators.
//!
//! - [`false_color`] / [`grayscale`] - map luminance onto a two-color ramp
//! - [`color_map`] - map luminance through a [`GradientMap`]
//! - [`clamp_image`], [`clamp_matte`] - component clamps
//! - [`polynomial_matte`] - cubic remap of matte values
//!
//! All image operators keep the source alpha as a factor of the output alpha.

use brow_core::pixel::luminance_rgba;
use brow_core::{Image, Matte, Rgba, BLACK, WHITE};
use brow_math::lerp_rgba;
use rayon::prelude::*;
use tracing::trace;

use crate::composite::map_pixels;
use crate::GradientMap;

/// Maps luminance `0` to `color0` and `1` to `color1`.
///
/// # Example
///
/// ```rust
/// use brow_core::{Image, BLACK, WHITE};
/// use brow_ops::color::false_color;
///
/// let img = Image::filled(1, 1, [1.0, 1.0, 1.0, 0.5]);
/// let out = false_color(&img, BLACK, WHITE);
/// assert_eq!(out.pixel(0, 0)[3], 0.5);
/// ```
pub fn false_color(src: &Image, color0: Rgba, color1: Rgba) -> Image {
    trace!(width = src.width(), height = src.height(), "color::false_color");
    map_pixels(src, |px| {
        let t = luminance_rgba(px).clamp(0.0, 1.0);
        let mut out = lerp_rgba(color0, color1, t);
        out[3] *= px[3];
        out
    })
}

/// Black to white false color: RGB becomes Rec.709 luminance.
pub fn grayscale(src: &Image) -> Image {
    false_color(src, BLACK, WHITE)
}

/// Replaces each pixel's color with the gradient sample at its luminance.
///
/// Output alpha is `gradient.alpha * source.alpha`.
pub fn color_map(src: &Image, gradient: &GradientMap) -> Image {
    trace!(
        width = src.width(),
        height = src.height(),
        gradient = gradient.width(),
        "color::color_map"
    );
    map_pixels(src, |px| {
        let mut out = gradient.sample(luminance_rgba(px));
        out[3] *= px[3];
        out
    })
}

/// Clamps every component between `min` and `max`.
pub fn clamp_image(src: &Image, min: Rgba, max: Rgba) -> Image {
    map_pixels(src, |px| {
        [
            px[0].clamp(min[0], max[0]),
            px[1].clamp(min[1], max[1]),
            px[2].clamp(min[2], max[2]),
            px[3].clamp(min[3], max[3]),
        ]
    })
}

fn map_matte<F>(src: &Matte, f: F) -> Matte
where
    F: Fn(f32) -> f32 + Sync,
{
    let mut out = src.clone();
    out.data_mut().par_iter_mut().for_each(|v| *v = f(*v));
    out
}

/// Clamps matte values to `[lo, hi]`.
pub fn clamp_matte(src: &Matte, lo: f32, hi: f32) -> Matte {
    map_matte(src, |v| v.clamp(lo, hi))
}

/// Evaluates `c0 + c1 v + c2 v^2 + c3 v^3` per matte value.
///
/// # Example
///
/// ```rust
/// use brow_core::Matte;
/// use brow_ops::color::polynomial_matte;
///
/// let m = Matte::filled(1, 1, 0.5);
/// let out = polynomial_matte(&m, [0.0, 2.0, 0.0, 0.0]);
/// assert_eq!(out.get(0, 0), 1.0);
/// ```
pub fn polynomial_matte(src: &Matte, coefficients: [f32; 4]) -> Matte {
    let [c0, c1, c2, c3] = coefficients;
    map_matte(src, |v| c0 + v * (c1 + v * (c2 + v * c3)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn grayscale_uses_rec709() {
        let img = Image::filled(1, 1, [1.0, 0.0, 0.0, 1.0]);
        let px = grayscale(&img).pixel(0, 0);
        assert_abs_diff_eq!(px[0], 0.2126, epsilon = 1e-6);
        assert_abs_diff_eq!(px[1], 0.2126, epsilon = 1e-6);
        assert_abs_diff_eq!(px[2], 0.2126, epsilon = 1e-6);
        assert_eq!(px[3], 1.0);
    }

    #[test]
    fn color_map_keeps_alpha() {
        let red = [1.0, 0.0, 0.0, 1.0];
        let blue = [0.0, 0.0, 1.0, 1.0];
        let g = GradientMap::smooth_linear(100, (10.0, red), (90.0, blue)).unwrap();
        let img = Image::from_vec(2, 1, vec![0.0, 0.0, 0.0, 0.25, 1.0, 1.0, 1.0, 0.0]).unwrap();
        let out = color_map(&img, &g);
        assert_eq!(out.pixel(0, 0), [1.0, 0.0, 0.0, 0.25]);
        let white = out.pixel(1, 0);
        assert_eq!(white[2], 1.0);
        assert_eq!(white[3], 0.0);
    }

    #[test]
    fn clamps() {
        let m = Matte::from_vec(3, 1, vec![-0.5, 0.5, 1.5]).unwrap();
        assert_eq!(clamp_matte(&m, 0.0, 1.0).data(), &[0.0, 0.5, 1.0]);

        let img = Image::filled(1, 1, [2.0, -1.0, 0.5, 1.2]);
        let out = clamp_image(&img, [0.0; 4], [1.0; 4]);
        assert_eq!(out.pixel(0, 0), [1.0, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn cubic_boost() {
        let m = Matte::from_vec(2, 1, vec![0.0, 1.0]).unwrap();
        let out = polynomial_matte(&m, [0.1, 1.0, 1.0, 1.0]);
        assert_abs_diff_eq!(out.get(0, 0), 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(out.get(1, 0), 3.1, epsilon = 1e-6);
    }
}

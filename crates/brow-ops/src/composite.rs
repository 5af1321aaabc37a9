//! Porter-Duff compositing and matte arithmetic.
//!
//! Images are straight alpha. Pixel kernels take and return straight RGBA;
//! premultiplication happens inside the kernel where the math needs it.
//!
//! # Image operators
//!
//! - [`over`] - A over B
//! - [`source_in`] - A kept where B is opaque (`A.alpha * B.alpha`)
//! - [`mask_to_alpha`] - matte to a white layer with the matte as alpha
//! - [`cut_out`] - `source_in(photo, mask_to_alpha(matte))`
//!
//! # Matte operators
//!
//! - [`add_mattes`] - addition compositing, clamped to 1
//! - [`multiply_mattes`] - intersection
//! - [`max_mattes`] - union
//!
//! # Example
//!
//! ```rust
//! use brow_ops::composite::over_pixel;
//!
//! let fg = [1.0, 0.0, 0.0, 0.5];
//! let bg = [0.0, 0.0, 1.0, 1.0];
//! let out = over_pixel(fg, bg);
//! assert!((out[0] - 0.5).abs() < 1e-6);
//! assert!((out[2] - 0.5).abs() < 1e-6);
//! assert_eq!(out[3], 1.0);
//! ```

use brow_core::image::CHANNELS;
use brow_core::{Image, Matte, Rgba};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::ensure_same_size;
use crate::OpsResult;

/// Alpha below which a pixel counts as fully transparent.
pub const ALPHA_EPSILON: f32 = 1e-6;

/// Composites a straight-alpha foreground over a background.
///
/// `Fg + Bg * (1 - Fg.alpha)` evaluated on premultiplied values, returned
/// straight.
#[inline]
pub fn over_pixel(fg: Rgba, bg: Rgba) -> Rgba {
    let fa = fg[3];
    let ba = bg[3];
    let inv = 1.0 - fa;
    let out_a = fa + ba * inv;
    if out_a <= ALPHA_EPSILON {
        return [0.0; 4];
    }
    let mut out = [0.0; 4];
    for c in 0..3 {
        out[c] = (fg[c] * fa + bg[c] * ba * inv) / out_a;
    }
    out[3] = out_a;
    out
}

/// Keeps the foreground where the background has coverage.
///
/// Color is untouched; alpha becomes `fg.alpha * bg.alpha`.
#[inline]
pub fn in_pixel(fg: Rgba, bg: Rgba) -> Rgba {
    [fg[0], fg[1], fg[2], fg[3] * bg[3]]
}

/// Converts straight alpha to premultiplied.
#[inline]
pub fn premultiply(px: Rgba) -> Rgba {
    [px[0] * px[3], px[1] * px[3], px[2] * px[3], px[3]]
}

/// Converts premultiplied alpha back to straight. Transparent stays black.
#[inline]
pub fn unpremultiply(px: Rgba) -> Rgba {
    let a = px[3];
    if a <= ALPHA_EPSILON {
        return [0.0; 4];
    }
    [px[0] / a, px[1] / a, px[2] / a, a]
}

/// Applies `f` to every pixel pair of two equally sized images.
fn zip_pixels<F>(a: &Image, b: &Image, f: F) -> Image
where
    F: Fn(Rgba, Rgba) -> Rgba + Sync,
{
    let (width, height) = a.dimensions();
    let mut out = Image::new(width, height);
    out.data_mut()
        .par_chunks_mut(CHANNELS)
        .zip(a.data().par_chunks(CHANNELS))
        .zip(b.data().par_chunks(CHANNELS))
        .for_each(|((dst, pa), pb)| {
            let px = f([pa[0], pa[1], pa[2], pa[3]], [pb[0], pb[1], pb[2], pb[3]]);
            dst.copy_from_slice(&px);
        });
    out
}

/// Applies `f` to every pixel of an image.
pub(crate) fn map_pixels<F>(src: &Image, f: F) -> Image
where
    F: Fn(Rgba) -> Rgba + Sync,
{
    let (width, height) = src.dimensions();
    let mut out = Image::new(width, height);
    out.data_mut()
        .par_chunks_mut(CHANNELS)
        .zip(src.data().par_chunks(CHANNELS))
        .for_each(|(dst, s)| {
            dst.copy_from_slice(&f([s[0], s[1], s[2], s[3]]));
        });
    out
}

/// Composites `fg` over `bg`. Both images must share dimensions.
///
/// # Example
///
/// ```rust
/// use brow_core::Image;
/// use brow_ops::composite::over;
///
/// let fg = Image::filled(2, 2, [1.0, 0.0, 0.0, 0.0]);
/// let bg = Image::filled(2, 2, [0.0, 0.0, 1.0, 1.0]);
/// assert_eq!(over(&fg, &bg).unwrap(), bg);
/// ```
pub fn over(fg: &Image, bg: &Image) -> OpsResult<Image> {
    trace!(width = fg.width(), height = fg.height(), "composite::over");
    ensure_same_size("over", fg.dimensions(), bg.dimensions())?;
    Ok(zip_pixels(fg, bg, over_pixel))
}

/// Keeps `src` where `mask` has alpha coverage.
pub fn source_in(src: &Image, mask: &Image) -> OpsResult<Image> {
    trace!(width = src.width(), height = src.height(), "composite::source_in");
    ensure_same_size("source_in", src.dimensions(), mask.dimensions())?;
    Ok(zip_pixels(src, mask, in_pixel))
}

/// Turns a matte into a white layer whose alpha is the matte value.
pub fn mask_to_alpha(matte: &Matte) -> Image {
    let (width, height) = matte.dimensions();
    let mut out = Image::new(width, height);
    out.data_mut()
        .par_chunks_mut(CHANNELS)
        .zip(matte.data().par_iter())
        .for_each(|(dst, &v)| {
            dst.copy_from_slice(&[1.0, 1.0, 1.0, v.clamp(0.0, 1.0)]);
        });
    out
}

/// Cuts the region covered by `matte` out of `photo`.
///
/// Pixels outside the matte become transparent; color inside is unchanged.
pub fn cut_out(photo: &Image, matte: &Matte) -> OpsResult<Image> {
    debug!(width = photo.width(), height = photo.height(), "cutting out matte region");
    source_in(photo, &mask_to_alpha(matte))
}

/// Converts a whole image to premultiplied alpha.
pub fn premultiply_image(src: &Image) -> Image {
    map_pixels(src, premultiply)
}

/// Converts a whole premultiplied image back to straight alpha.
pub fn unpremultiply_image(src: &Image) -> Image {
    map_pixels(src, unpremultiply)
}

fn zip_mattes<F>(what: &str, a: &Matte, b: &Matte, f: F) -> OpsResult<Matte>
where
    F: Fn(f32, f32) -> f32 + Sync,
{
    ensure_same_size(what, a.dimensions(), b.dimensions())?;
    let data: Vec<f32> = a
        .data()
        .par_iter()
        .zip(b.data().par_iter())
        .map(|(&x, &y)| f(x, y))
        .collect();
    Ok(Matte::from_vec(a.width(), a.height(), data)?)
}

/// Addition compositing of two mattes, clamped to `[0, 1]`.
pub fn add_mattes(a: &Matte, b: &Matte) -> OpsResult<Matte> {
    trace!("composite::add_mattes");
    zip_mattes("add_mattes", a, b, |x, y| (x + y).clamp(0.0, 1.0))
}

/// Pixelwise product of two mattes.
pub fn multiply_mattes(a: &Matte, b: &Matte) -> OpsResult<Matte> {
    trace!("composite::multiply_mattes");
    zip_mattes("multiply_mattes", a, b, |x, y| x * y)
}

/// Pixelwise maximum of two mattes.
pub fn max_mattes(a: &Matte, b: &Matte) -> OpsResult<Matte> {
    zip_mattes("max_mattes", a, b, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn over_opaque_fg_wins() {
        let out = over_pixel([0.2, 0.4, 0.6, 1.0], [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(out, [0.2, 0.4, 0.6, 1.0]);
    }

    #[test]
    fn over_transparent_fg_keeps_bg() {
        let bg = [0.3, 0.5, 0.7, 1.0];
        assert_eq!(over_pixel([1.0, 0.0, 0.0, 0.0], bg), bg);
    }

    #[test]
    fn over_both_transparent() {
        assert_eq!(over_pixel([0.0; 4], [0.0; 4]), [0.0; 4]);
    }

    #[test]
    fn over_half_on_transparent_keeps_straight_color() {
        let out = over_pixel([0.8, 0.2, 0.1, 0.5], [0.0; 4]);
        assert_abs_diff_eq!(out[0], 0.8, epsilon = 1e-6);
        assert_abs_diff_eq!(out[1], 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(out[3], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn premultiply_roundtrip() {
        let px = [0.4, 0.6, 0.8, 0.5];
        let back = unpremultiply(premultiply(px));
        for c in 0..4 {
            assert_abs_diff_eq!(back[c], px[c], epsilon = 1e-6);
        }
        assert_eq!(unpremultiply([0.3, 0.3, 0.3, 0.0]), [0.0; 4]);
    }

    #[test]
    fn over_rejects_size_mismatch() {
        let a = Image::new(2, 2);
        let b = Image::new(3, 2);
        assert!(over(&a, &b).is_err());
    }

    #[test]
    fn cut_out_keeps_color_and_takes_matte_alpha() {
        let photo = Image::filled(3, 1, [0.5, 0.25, 0.75, 1.0]);
        let matte = Matte::from_vec(3, 1, vec![0.0, 0.5, 1.0]).unwrap();
        let cut = cut_out(&photo, &matte).unwrap();
        assert_eq!(cut.pixel(0, 0)[3], 0.0);
        assert_eq!(cut.pixel(1, 0), [0.5, 0.25, 0.75, 0.5]);
        assert_eq!(cut.pixel(2, 0), [0.5, 0.25, 0.75, 1.0]);
    }

    #[test]
    fn mask_to_alpha_clamps() {
        let matte = Matte::from_vec(2, 1, vec![-0.5, 1.5]).unwrap();
        let img = mask_to_alpha(&matte);
        assert_eq!(img.pixel(0, 0), [1.0, 1.0, 1.0, 0.0]);
        assert_eq!(img.pixel(1, 0), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn matte_arithmetic() {
        let a = Matte::from_vec(3, 1, vec![0.25, 0.75, 1.0]).unwrap();
        let b = Matte::from_vec(3, 1, vec![0.5, 0.5, 0.0]).unwrap();

        assert_eq!(add_mattes(&a, &b).unwrap().data(), &[0.75, 1.0, 1.0]);
        assert_eq!(multiply_mattes(&a, &b).unwrap().data(), &[0.125, 0.375, 0.0]);
        assert_eq!(max_mattes(&a, &b).unwrap().data(), &[0.5, 0.75, 1.0]);
        assert!(add_mattes(&a, &Matte::new(1, 1)).is_err());
    }
}

//! Box blur and bloom.
//!
//! The blur is separable with clamp-to-edge sampling. Each line is blurred
//! from a prefix sum, so the cost does not depend on the radius.

use brow_core::Matte;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{OpsError, OpsResult};

/// Blurs one line of `len` samples spaced `stride` apart.
///
/// `prefix` is scratch space of at least `len + 1` entries.
fn blur_line(
    src: &[f32],
    dst: &mut [f32],
    len: usize,
    stride: usize,
    radius: usize,
    prefix: &mut Vec<f32>,
) {
    prefix.clear();
    prefix.push(0.0);
    let mut acc = 0.0f32;
    for i in 0..len {
        acc += src[i * stride];
        prefix.push(acc);
    }
    let first = src[0];
    let last = src[(len - 1) * stride];
    let inv = 1.0 / (2 * radius + 1) as f32;

    for i in 0..len {
        let lo = i as isize - radius as isize;
        let hi = i + radius;
        let mut sum = prefix[hi.min(len - 1) + 1] - prefix[lo.max(0) as usize];
        if lo < 0 {
            sum += first * (-lo) as f32;
        }
        if hi >= len {
            sum += last * (hi - len + 1) as f32;
        }
        dst[i * stride] = sum * inv;
    }
}

/// Box blur of interleaved `f32` data.
///
/// Window is `2 * radius + 1` samples per axis. Radius 0 returns a copy.
///
/// # Example
///
/// ```rust
/// use brow_ops::filter::box_blur;
///
/// let src = vec![0.5f32; 16 * 16];
/// let out = box_blur(&src, 16, 16, 1, 3).unwrap();
/// assert!((out[0] - 0.5).abs() < 1e-6);
/// ```
pub fn box_blur(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    radius: usize,
) -> OpsResult<Vec<f32>> {
    trace!(width, height, channels, radius, "filter::box_blur");
    if width == 0 || height == 0 || channels == 0 {
        return Err(OpsError::InvalidDimensions(
            "width, height, and channels must be > 0".into(),
        ));
    }
    let expected = width * height * channels;
    if src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let row_len = width * channels;

    let mut horiz = vec![0.0f32; expected];
    horiz
        .par_chunks_mut(row_len)
        .zip(src.par_chunks(row_len))
        .for_each_init(Vec::new, |prefix, (out, row)| {
            for c in 0..channels {
                blur_line(&row[c..], &mut out[c..], width, channels, radius, prefix);
            }
        });

    // Columns are strided, walk them one at a time.
    let mut dst = vec![0.0f32; expected];
    let mut prefix = Vec::with_capacity(height + 1);
    for col in 0..row_len {
        blur_line(&horiz[col..], &mut dst[col..], height, row_len, radius, &mut prefix);
    }

    Ok(dst)
}

/// Box blur of a matte.
pub fn blur_matte(src: &Matte, radius: usize) -> OpsResult<Matte> {
    let data = box_blur(
        src.data(),
        src.width() as usize,
        src.height() as usize,
        1,
        radius,
    )?;
    Ok(Matte::from_vec(src.width(), src.height(), data)?)
}

/// Softens and brightens a matte: `v + intensity * blur(v, radius)`.
///
/// The result is not clamped.
pub fn bloom_matte(src: &Matte, radius: usize, intensity: f32) -> OpsResult<Matte> {
    debug!(radius, intensity, "bloom");
    if !intensity.is_finite() || intensity < 0.0 {
        return Err(OpsError::InvalidParameter(format!(
            "bloom intensity must be finite and >= 0, got {intensity}"
        )));
    }
    let blurred = blur_matte(src, radius)?;
    let data = src
        .data()
        .iter()
        .zip(blurred.data())
        .map(|(&v, &b)| v + intensity * b)
        .collect();
    Ok(Matte::from_vec(src.width(), src.height(), data)?)
}

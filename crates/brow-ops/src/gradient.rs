//! Horizontal gradients used as color lookup tables.
//!
//! A [`GradientMap`] is a one-pixel-high strip of `width` RGBA samples.
//! [`color_map`](crate::color::color_map) indexes it with the luminance of each
//! source pixel, `0.0` at the left edge and `1.0` at the right edge.
//!
//! # Example
//!
//! ```rust
//! use brow_ops::GradientMap;
//!
//! let black = [0.0, 0.0, 0.0, 1.0];
//! let white = [1.0, 1.0, 1.0, 1.0];
//! let g = GradientMap::smooth_linear(100, (10.0, black), (90.0, white)).unwrap();
//! assert_eq!(g.sample(0.0), black);
//! assert_eq!(g.sample(1.0), white);
//! ```

use brow_core::Rgba;
use brow_math::{lerp_rgba, smoothstep};
use tracing::debug;

use crate::composite::over_pixel;
use crate::{OpsError, OpsResult};

/// Working width of gradients built for recoloring.
pub const DEFAULT_GRADIENT_WIDTH: usize = 1000;

/// Color at `x` of a smooth linear gradient running from `c0` at `p0` to `c1`
/// at `p1`. Clamped to the end colors outside the stops.
#[inline]
pub fn smooth_linear(x: f32, (p0, c0): (f32, Rgba), (p1, c1): (f32, Rgba)) -> Rgba {
    lerp_rgba(c0, c1, smoothstep(p0, p1, x))
}

/// A one-dimensional RGBA lookup strip.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientMap {
    samples: Vec<Rgba>,
}

impl GradientMap {
    /// Builds a strip by evaluating `f` at each pixel center `x + 0.5`.
    pub fn from_fn<F>(width: usize, f: F) -> OpsResult<Self>
    where
        F: Fn(f32) -> Rgba,
    {
        if width == 0 {
            return Err(OpsError::InvalidDimensions("gradient width must be > 0".into()));
        }
        let samples = (0..width).map(|i| f(i as f32 + 0.5)).collect();
        Ok(Self { samples })
    }

    /// Smooth linear gradient between two stops given in pixels.
    pub fn smooth_linear(width: usize, start: (f32, Rgba), end: (f32, Rgba)) -> OpsResult<Self> {
        Self::from_fn(width, |x| smooth_linear(x, start, end))
    }

    /// Three-stop gradient for lightness remapping.
    ///
    /// `stops` are `(min, mode, max)` as fractions of the width and `colors`
    /// the matching colors. The lower segment runs min to mode, the upper
    /// segment mode to max. The lower segment, cropped to `x < mode * width`,
    /// is composited over the upper one.
    pub fn three_stop(width: usize, stops: [f32; 3], colors: [Rgba; 3]) -> OpsResult<Self> {
        if stops.iter().any(|s| !s.is_finite()) {
            return Err(OpsError::InvalidParameter(format!(
                "gradient stops must be finite, got {stops:?}"
            )));
        }
        let w = width as f32;
        let [lo, mid, hi] = stops.map(|s| s * w);
        let [c_lo, c_mid, c_hi] = colors;
        debug!(width, lo, mid, hi, "building three-stop gradient");

        Self::from_fn(width, |x| {
            let upper = smooth_linear(x, (mid, c_mid), (hi, c_hi));
            if x < mid {
                over_pixel(smooth_linear(x, (lo, c_lo), (mid, c_mid)), upper)
            } else {
                upper
            }
        })
    }

    /// Number of samples.
    pub fn width(&self) -> usize {
        self.samples.len()
    }

    /// Raw samples, left to right.
    pub fn samples(&self) -> &[Rgba] {
        &self.samples
    }

    /// Looks up normalized position `t`, clamped to `[0, 1]`.
    ///
    /// Interpolates linearly between the two nearest pixel centers.
    pub fn sample(&self, t: f32) -> Rgba {
        let n = self.samples.len();
        let last = n - 1;
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let u = t * n as f32 - 0.5;
        if u <= 0.0 {
            return self.samples[0];
        }
        let i0 = (u.floor() as usize).min(last);
        let i1 = (i0 + 1).min(last);
        lerp_rgba(self.samples[i0], self.samples[i1], u - i0 as f32)
    }
}

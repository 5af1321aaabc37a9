//! Lightness statistics of a cutout: darkest, most common and brightest
//! luminance over the covered pixels.
//!
//! The cutout is first brought down to at most `batch_size` pixels on its
//! longer side (bicubic, premultiplied, never upscaled). Luminance is then
//! quantized to 8 bits and collected in a 256-bin histogram, so every
//! statistic is a multiple of `1/255`.

use brow_core::pixel::luminance_rgba;
use brow_core::Image;
use brow_ops::resize::{limit_longest_side, resize_image, Filter};
use brow_ops::OpsResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Default longest side of the analysed cutout.
pub const DEFAULT_BATCH_SIZE: u32 = 500;

/// Default alpha below which a pixel is ignored.
pub const DEFAULT_ALPHA_THRESHOLD: f32 = 1e-3;

const BINS: usize = 256;

/// `(min, mode, max)` lightness in `[0, 1]`.
///
/// `min <= mode <= max` holds for profiler output but is not enforced for
/// hand-built values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LightnessTriple {
    /// Darkest covered luminance.
    pub min: f32,
    /// Most frequent covered luminance.
    pub mode: f32,
    /// Brightest covered luminance.
    pub max: f32,
}

impl LightnessTriple {
    /// Builds a triple.
    pub const fn new(min: f32, mode: f32, max: f32) -> Self {
        Self { min, mode, max }
    }

    /// The three values as gradient stops.
    pub fn stops(&self) -> [f32; 3] {
        [self.min, self.mode, self.max]
    }
}

/// 256-bin luminance histogram.
#[derive(Debug, Clone)]
pub struct Histogram {
    bins: [u32; BINS],
    total: u64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            bins: [0; BINS],
            total: 0,
        }
    }
}

impl Histogram {
    /// Counts one luminance sample, clamped to `[0, 1]`.
    #[inline]
    pub fn add(&mut self, luma: f32) {
        let bin = (luma.clamp(0.0, 1.0) * 255.0).round() as usize;
        self.bins[bin] += 1;
        self.total += 1;
    }

    /// Number of counted samples.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Count of one bin.
    pub fn bin(&self, index: u8) -> u32 {
        self.bins[index as usize]
    }

    /// `(min, mode, max)` bin indices, `None` when empty.
    ///
    /// Ties for the mode go to the darkest bin.
    pub fn min_mode_max(&self) -> Option<(u8, u8, u8)> {
        let min = self.bins.iter().position(|&c| c > 0)?;
        let max = self.bins.iter().rposition(|&c| c > 0)?;
        let mut mode = min;
        for i in min..=max {
            if self.bins[i] > self.bins[mode] {
                mode = i;
            }
        }
        Some((min as u8, mode as u8, max as u8))
    }

    /// Statistics scaled to `[0, 1]`; all zero when empty.
    pub fn triple(&self) -> LightnessTriple {
        match self.min_mode_max() {
            Some((lo, mode, hi)) => LightnessTriple::new(
                lo as f32 / 255.0,
                mode as f32 / 255.0,
                hi as f32 / 255.0,
            ),
            None => LightnessTriple::default(),
        }
    }
}

/// Measures [`LightnessTriple`]s of cutouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightnessProfiler {
    batch_size: u32,
    alpha_threshold: f32,
}

impl Default for LightnessProfiler {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl LightnessProfiler {
    /// Profiler working at `batch_size` pixels on the longer side.
    pub fn new(batch_size: u32) -> Self {
        Self {
            batch_size: batch_size.max(1),
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
        }
    }

    /// Changes the coverage threshold.
    pub fn with_alpha_threshold(mut self, threshold: f32) -> Self {
        self.alpha_threshold = threshold;
        self
    }

    /// Histogram of covered pixels after downscaling.
    pub fn histogram(&self, cutout: &Image) -> OpsResult<Histogram> {
        let mut hist = Histogram::default();
        if cutout.is_empty() {
            return Ok(hist);
        }
        let (w, h) = limit_longest_side(cutout.width(), cutout.height(), self.batch_size);
        let sampled = if (w, h) == cutout.dimensions() {
            cutout.clone()
        } else {
            trace!(w, h, "downscaling cutout for lightness");
            resize_image(cutout, w, h, Filter::Bicubic)?
        };
        for px in sampled.pixels() {
            if px[3] > self.alpha_threshold {
                hist.add(luminance_rgba(px));
            }
        }
        Ok(hist)
    }

    /// `(min, mode, max)` lightness of the covered pixels of `cutout`.
    ///
    /// A cutout with no covered pixel yields `(0, 0, 0)`.
    pub fn profile(&self, cutout: &Image) -> OpsResult<LightnessTriple> {
        let hist = self.histogram(cutout)?;
        let triple = hist.triple();
        debug!(
            samples = hist.total(),
            min = triple.min,
            mode = triple.mode,
            max = triple.max,
            "lightness profiled"
        );
        Ok(triple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn uniform_region() {
        let img = Image::filled(20, 10, [0.4, 0.4, 0.4, 1.0]);
        let t = LightnessProfiler::default().profile(&img).unwrap();
        for v in t.stops() {
            assert_abs_diff_eq!(v, 0.4, epsilon = 1.0 / 255.0);
        }
    }

    #[test]
    fn empty_region_is_zero() {
        let img = Image::filled(8, 8, [0.9, 0.9, 0.9, 0.0]);
        let t = LightnessProfiler::default().profile(&img).unwrap();
        assert_eq!(t, LightnessTriple::default());
        let none = LightnessProfiler::default().profile(&Image::new(0, 0)).unwrap();
        assert_eq!(none, LightnessTriple::default());
    }

    #[test]
    fn min_mode_max_from_mixed_region() {
        // 6 dark, 3 mid, 1 bright, 2 uncovered.
        let levels = [0.2, 0.2, 0.2, 0.2, 0.2, 0.2, 0.5, 0.5, 0.5, 0.8, 1.0, 1.0];
        let img = Image::from_fn(12, 1, |x, _| {
            let v = levels[x as usize];
            let a = if x >= 10 { 0.0 } else { 1.0 };
            [v, v, v, a]
        });
        let t = LightnessProfiler::default().profile(&img).unwrap();
        assert_abs_diff_eq!(t.min, 0.2, epsilon = 1.0 / 255.0);
        assert_abs_diff_eq!(t.mode, 0.2, epsilon = 1.0 / 255.0);
        assert_abs_diff_eq!(t.max, 0.8, epsilon = 1.0 / 255.0);
    }

    #[test]
    fn mode_tie_goes_dark() {
        let mut h = Histogram::default();
        h.add(0.6);
        h.add(0.6);
        h.add(0.3);
        h.add(0.3);
        let (lo, mode, hi) = h.min_mode_max().unwrap();
        assert_eq!(mode, lo);
        assert_eq!(hi, 153);
        assert_eq!(h.bin(lo), 2);
    }

    #[test]
    fn large_cutout_is_downscaled() {
        let img = Image::filled(1200, 300, [0.5, 0.5, 0.5, 1.0]);
        let hist = LightnessProfiler::new(500).histogram(&img).unwrap();
        assert_eq!(hist.total(), 500 * 125);
    }

    #[test]
    fn values_are_multiples_of_255ths() {
        let img = Image::filled(3, 3, [0.123, 0.456, 0.789, 1.0]);
        let t = LightnessProfiler::default().profile(&img).unwrap();
        let scaled = t.mode * 255.0;
        assert_abs_diff_eq!(scaled, scaled.round(), epsilon = 1e-4);
    }
}

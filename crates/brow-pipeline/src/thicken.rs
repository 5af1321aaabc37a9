//! Radial shift-and-stack thickening.
//!
//! Copies of the source are translated around a circle and stacked, which
//! grows every stroke by roughly `radius` pixels in all directions.
//!
//! Step `i` of `N` uses the angle `start + 2πi/N`, where `start` is the face
//! roll plus [`ThickenConfig::angle_offset`]. Step 0 is the untouched source;
//! steps `1..N` are translated by `radius * (cos θ, sin θ)` and composited
//! over the accumulator in order. With `N = 1` the image is returned as is
//! and the matte is only clamped and cut to the portrait.

use std::f64::consts::TAU;

use brow_core::{Image, Matte};
use brow_ops::color::{clamp_matte, polynomial_matte};
use brow_ops::composite::{max_mattes, multiply_mattes, over};
use brow_ops::filter::bloom_matte;
use brow_ops::transform::{translate, translate_matte};
use brow_ops::{OpsError, OpsResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Thickening parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThickenConfig {
    /// Build the thickened eyebrow layer.
    pub enabled: bool,
    /// Added to the face roll to get the start angle, radians.
    pub angle_offset: f64,
    /// Translation distance in pixels.
    pub radius: f64,
    /// Number of angular steps, including the untranslated source.
    pub times: u32,
    /// `c0 + c1 v + c2 v^2 + c3 v^3` applied to the stacked matte.
    pub matte_polynomial: [f32; 4],
    /// Box blur radius of the matte bloom.
    pub bloom_radius: usize,
    /// Weight of the blurred matte added back.
    pub bloom_intensity: f32,
}

impl Default for ThickenConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            angle_offset: 0.0,
            radius: 2.0,
            times: 8,
            matte_polynomial: [0.0, 2.0, -1.0, 0.0],
            bloom_radius: 2,
            bloom_intensity: 0.5,
        }
    }
}

/// Translation offsets of steps `1..times`.
///
/// # Example
///
/// ```rust
/// use brow_pipeline::thicken::offsets;
///
/// let steps = offsets(0.0, 2.0, 4);
/// assert_eq!(steps.len(), 3);
/// assert!((steps[0].0).abs() < 1e-6 && (steps[0].1 - 2.0).abs() < 1e-6);
/// ```
pub fn offsets(start_angle: f64, radius: f64, times: u32) -> Vec<(f32, f32)> {
    (1..times)
        .map(|i| {
            let theta = start_angle + TAU * i as f64 / times as f64;
            ((radius * theta.cos()) as f32, (radius * theta.sin()) as f32)
        })
        .collect()
}

fn check(radius: f64, times: u32) -> OpsResult<()> {
    if times == 0 {
        return Err(OpsError::InvalidParameter("thickening needs at least one step".into()));
    }
    if !radius.is_finite() {
        return Err(OpsError::InvalidParameter(format!(
            "thickening radius must be finite, got {radius}"
        )));
    }
    Ok(())
}

/// Stacks translated copies of `src` over itself.
pub fn thicken_image(src: &Image, start_angle: f64, radius: f64, times: u32) -> OpsResult<Image> {
    check(radius, times)?;
    debug!(start_angle, radius, times, "thickening image");
    let mut acc = src.clone();
    for (dx, dy) in offsets(start_angle, radius, times) {
        let shifted = translate(src, dx, dy)?;
        acc = over(&shifted, &acc)?;
    }
    Ok(acc)
}

/// Thickened matte: shift-stacked union, polynomial boost, bloom, clamp,
/// then intersection with `portrait` when given.
///
/// A single step has nothing to stack, so boost and bloom are skipped.
pub fn thicken_matte(
    matte: &Matte,
    portrait: Option<&Matte>,
    start_angle: f64,
    cfg: &ThickenConfig,
) -> OpsResult<Matte> {
    check(cfg.radius, cfg.times)?;
    debug!(start_angle, radius = cfg.radius, times = cfg.times, "thickening matte");
    let steps = offsets(start_angle, cfg.radius, cfg.times);
    let clamped = if steps.is_empty() {
        clamp_matte(matte, 0.0, 1.0)
    } else {
        let mut acc = matte.clone();
        for (dx, dy) in steps {
            acc = max_mattes(&acc, &translate_matte(matte, dx, dy)?)?;
        }
        let boosted = polynomial_matte(&acc, cfg.matte_polynomial);
        let bloomed = bloom_matte(&boosted, cfg.bloom_radius, cfg.bloom_intensity)?;
        clamp_matte(&bloomed, 0.0, 1.0)
    };
    match portrait {
        Some(p) => multiply_mattes(&clamped, p),
        None => Ok(clamped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn dot() -> Image {
        Image::from_fn(9, 9, |x, y| {
            if x == 4 && y == 4 {
                [0.3, 0.3, 0.3, 1.0]
            } else {
                [0.0; 4]
            }
        })
    }

    #[test]
    fn single_step_is_identity() {
        let img = dot();
        assert_eq!(thicken_image(&img, 0.7, 3.0, 1).unwrap(), img);
    }

    #[test]
    fn single_step_leaves_matte_alone() {
        let m = Matte::from_fn(6, 4, |x, y| (x + y) as f32 / 6.0);
        let cfg = ThickenConfig {
            times: 1,
            ..ThickenConfig::default()
        };
        let out = thicken_matte(&m, None, 0.7, &cfg).unwrap();
        assert_eq!(out.get(1, 2), 0.5);
        assert_eq!(out.get(0, 0), 0.0);
        assert_eq!(out, clamp_matte(&m, 0.0, 1.0));

        let portrait = Matte::from_fn(6, 4, |x, _| if x < 3 { 1.0 } else { 0.0 });
        let cut = thicken_matte(&m, Some(&portrait), 0.0, &cfg).unwrap();
        assert_eq!(cut.get(1, 2), 0.5);
        assert_eq!(cut.get(4, 2), 0.0);
    }

    #[test]
    fn start_angle_turns_the_copies() {
        let m = Matte::from_fn(11, 11, |x, y| if x == 5 && y == 5 { 1.0 } else { 0.0 });
        let cfg = ThickenConfig {
            radius: 3.0,
            times: 2,
            matte_polynomial: [0.0, 1.0, 0.0, 0.0],
            bloom_radius: 0,
            bloom_intensity: 0.0,
            ..ThickenConfig::default()
        };
        let level = thicken_matte(&m, None, 0.0, &cfg).unwrap();
        assert_abs_diff_eq!(level.get(2, 5), 1.0, epsilon = 1e-5);
        assert!(level.get(5, 2) < 1e-5);

        let turned = thicken_matte(&m, None, std::f64::consts::FRAC_PI_2, &cfg).unwrap();
        assert_abs_diff_eq!(turned.get(5, 2), 1.0, epsilon = 1e-5);
        assert!(turned.get(2, 5) < 1e-5);
    }

    #[test]
    fn offsets_walk_the_circle() {
        let steps = offsets(0.0, 1.0, 4);
        let expected = [(0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)];
        for ((dx, dy), (ex, ey)) in steps.iter().zip(expected) {
            assert_abs_diff_eq!(*dx, ex, epsilon = 1e-6);
            assert_abs_diff_eq!(*dy, ey, epsilon = 1e-6);
        }
        assert!(offsets(0.0, 1.0, 1).is_empty());
    }

    #[test]
    fn four_steps_make_a_plus() {
        let out = thicken_image(&dot(), 0.0, 1.0, 4).unwrap();
        for (x, y) in [(4, 4), (4, 5), (3, 4), (4, 3)] {
            assert_abs_diff_eq!(out.pixel(x, y)[3], 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(out.pixel(x, y)[0], 0.3, epsilon = 1e-5);
        }
        // Step 1..3 never move right.
        assert!(out.pixel(5, 4)[3] < 1e-5);
        assert_eq!(out.pixel(0, 0)[3], 0.0);
    }

    #[test]
    fn zero_steps_rejected() {
        assert!(thicken_image(&dot(), 0.0, 1.0, 0).is_err());
        let cfg = ThickenConfig {
            times: 0,
            ..ThickenConfig::default()
        };
        assert!(thicken_matte(&Matte::new(2, 2), None, 0.0, &cfg).is_err());
    }

    #[test]
    fn matte_grows_and_respects_portrait() {
        let m = Matte::from_fn(11, 11, |x, y| if x == 5 && y == 5 { 1.0 } else { 0.0 });
        let cfg = ThickenConfig {
            enabled: true,
            radius: 2.0,
            times: 4,
            matte_polynomial: [0.0, 1.0, 0.0, 0.0],
            bloom_radius: 0,
            bloom_intensity: 0.0,
            ..ThickenConfig::default()
        };
        let grown = thicken_matte(&m, None, 0.0, &cfg).unwrap();
        assert_abs_diff_eq!(grown.get(5, 7), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(grown.get(3, 5), 1.0, epsilon = 1e-5);
        assert!(grown.get(7, 5) < 1e-5);

        let portrait = Matte::from_fn(11, 11, |x, _| if x < 5 { 1.0 } else { 0.0 });
        let cut = thicken_matte(&m, Some(&portrait), 0.0, &cfg).unwrap();
        assert_eq!(cut.get(5, 7), 0.0);
        assert_abs_diff_eq!(cut.get(3, 5), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn matte_is_clamped() {
        let m = Matte::filled(5, 5, 1.0);
        let out = thicken_matte(&m, None, 0.0, &ThickenConfig::default()).unwrap();
        assert!(out.data().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}

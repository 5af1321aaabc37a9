//! Image-space points and rotation.
//!
//! [`Point`] is [`glam::DVec2`], so `+`, `-` and scalar `*` come for free.
//! Rotation rounds `cos`/`sin` to three decimals: landmark sets are rotated
//! back and forth around the face roll, and the rounding keeps `0`, `±π/2`
//! and `π` exact instead of accumulating `1e-16` drift.

use glam::DVec2;

/// 2D point in image space.
pub type Point = DVec2;

/// `cos`/`sin` of `angle`, each rounded to three decimals.
///
/// # Example
///
/// ```rust
/// use brow_math::rounded_cos_sin;
///
/// let (c, s) = rounded_cos_sin(std::f64::consts::FRAC_PI_2);
/// assert_eq!((c, s), (0.0, 1.0));
/// ```
#[inline]
pub fn rounded_cos_sin(angle: f64) -> (f64, f64) {
    let c = (angle.cos() * 1000.0).round() / 1000.0;
    let s = (angle.sin() * 1000.0).round() / 1000.0;
    (c, s)
}

/// Rotation helpers for [`Point`].
pub trait PointExt {
    /// Rotates about the origin by `angle` radians.
    fn rotate_by(self, angle: f64) -> Self;

    /// Rotates about `center` by `angle` radians.
    fn rotate_about(self, angle: f64, center: Self) -> Self;
}

impl PointExt for Point {
    #[inline]
    fn rotate_by(self, angle: f64) -> Self {
        let (c, s) = rounded_cos_sin(angle);
        Point::new(c * self.x - s * self.y, c * self.y + s * self.x)
    }

    #[inline]
    fn rotate_about(self, angle: f64, center: Self) -> Self {
        (self - center).rotate_by(angle) + center
    }
}

/// Rotates every point about the origin.
pub fn rotate_points(points: &[Point], angle: f64) -> Vec<Point> {
    points.iter().map(|p| p.rotate_by(angle)).collect()
}

/// Rotates every point about `center`.
///
/// # Example
///
/// ```rust
/// use brow_math::{rotate_points_about, Point};
///
/// let pts = [Point::new(2.0, 1.0)];
/// let out = rotate_points_about(&pts, std::f64::consts::PI, Point::new(1.0, 1.0));
/// assert!((out[0] - Point::new(0.0, 1.0)).length() < 1e-9);
/// ```
pub fn rotate_points_about(points: &[Point], angle: f64, center: Point) -> Vec<Point> {
    points.iter().map(|p| p.rotate_about(angle, center)).collect()
}

/// Arithmetic mean of the points, `None` for an empty slice.
pub fn average(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Point::ZERO, |acc, p| acc + *p);
    Some(sum / points.len() as f64)
}

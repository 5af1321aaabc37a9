//! Eyebrow landmark geometry.
//!
//! A landmark set has exactly [`EYEBROW_POINTS`] points. Indices 0..=2 run
//! along the top edge from the outer tail to the inner head, 3..=5 along the
//! bottom edge from the inner head back to the tail.
//!
//! Pipeline for the combined two-eyebrow region:
//!
//! ```text
//! right, left --expand--> right', left' --stitch--> 12 points
//!     --correct_junctions--> 12 / 11 / 10 points --> Boundary
//! ```

use crate::polygon::{segment_intersection, Boundary, Segment};
use crate::{rotate_points_about, GeometryError, GeometryResult, Point};

/// Points per eyebrow landmark set.
pub const EYEBROW_POINTS: usize = 6;

/// Weight of landmark 1 in the eyebrow center.
pub const CENTER_WEIGHT_OUTER: f64 = 0.15;

/// Weight of landmark 4 in the eyebrow center.
pub const CENTER_WEIGHT_INNER: f64 = 0.85;

fn require_eyebrow(points: &[Point]) -> GeometryResult<()> {
    if points.len() != EYEBROW_POINTS {
        return Err(GeometryError::PointCount {
            expected: EYEBROW_POINTS,
            got: points.len(),
        });
    }
    Ok(())
}

/// Expansion applied to each eyebrow before building the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expansion {
    /// Uniform growth factor; offsets are scaled by `1 + rate`.
    pub rate: f64,
    /// Extra vertical scale of offsets in the eyebrow's own frame.
    pub aspect: f64,
    /// Face roll in radians; expansion happens in the de-rolled frame.
    pub angle: f64,
}

impl Default for Expansion {
    fn default() -> Self {
        Self {
            rate: 0.0,
            aspect: 1.0,
            angle: 0.0,
        }
    }
}

/// Eyebrow center: `p[1] * 0.15 + p[4] * 0.85`.
///
/// Weighted towards landmark 4, not the centroid.
///
/// # Example
///
/// ```rust
/// use brow_math::{eyebrow, Point};
///
/// let mut pts = vec![Point::ZERO; 6];
/// pts[1] = Point::new(100.0, 0.0);
/// pts[4] = Point::new(0.0, 100.0);
/// let c = eyebrow::center(&pts).unwrap();
/// assert!((c - Point::new(15.0, 85.0)).length() < 1e-9);
/// ```
pub fn center(points: &[Point]) -> GeometryResult<Point> {
    require_eyebrow(points)?;
    Ok(points[1] * CENTER_WEIGHT_OUTER + points[4] * CENTER_WEIGHT_INNER)
}

/// Scales offsets from `center`: x unchanged, y times `aspect`, both times
/// `1 + rate`.
pub fn expand_from(points: &[Point], center: Point, rate: f64, aspect: f64) -> Vec<Point> {
    points
        .iter()
        .map(|p| {
            let d = *p - center;
            Point::new(d.x, d.y * aspect) * (1.0 + rate) + center
        })
        .collect()
}

/// Expands an eyebrow about its [`center`] in the de-rolled frame.
///
/// Rotates by `-angle`, applies [`expand_from`], rotates back by `+angle`.
/// `expand(pts, 0.0, 1.0, 0.0)` returns the input unchanged.
pub fn expand(points: &[Point], rate: f64, aspect: f64, angle: f64) -> GeometryResult<Vec<Point>> {
    let c = center(points)?;
    let upright = rotate_points_about(points, -angle, c);
    let grown = expand_from(&upright, c, rate, aspect);
    Ok(rotate_points_about(&grown, angle, c))
}

/// [`expand`] with an [`Expansion`].
pub fn expand_with(points: &[Point], e: &Expansion) -> GeometryResult<Vec<Point>> {
    expand(points, e.rate, e.aspect, e.angle)
}

/// Joins two eyebrows into one 12-point loop.
///
/// `right[0..=2] + rev(left[0..=2]) + rev(left[3..=5]) + right[3..=5]`
pub fn stitch(right: &[Point], left: &[Point]) -> GeometryResult<Vec<Point>> {
    require_eyebrow(right)?;
    require_eyebrow(left)?;

    let mut out = Vec::with_capacity(EYEBROW_POINTS * 2);
    out.extend_from_slice(&right[0..=2]);
    out.extend(left[0..=2].iter().rev());
    out.extend(left[3..=5].iter().rev());
    out.extend_from_slice(&right[3..=5]);
    Ok(out)
}

/// Collapses one junction if its two segments cross.
///
/// Segments `(i, i+1)` and `(i+2, i+3)`; on a hit, vertex `i+1` becomes the
/// intersection and vertex `i+2` is removed.
fn collapse_junction(points: &mut Vec<Point>, i: usize) -> bool {
    let a = Segment::new(points[i], points[i + 1]);
    let b = Segment::new(points[i + 2], points[i + 3]);
    match segment_intersection(&a, &b) {
        Some(hit) => {
            points[i + 1] = hit;
            points.remove(i + 2);
            true
        }
        None => false,
    }
}

/// Removes the self-intersections a stitched boundary can have where the
/// expanded eyebrows overlap between the brows.
///
/// Checks the lower junction (segments 7-8 / 9-10) first, then the upper one
/// (1-2 / 3-4), so the upper indices are still valid after a lower collapse.
/// Returns 12, 11 or 10 points.
pub fn correct_junctions(mut points: Vec<Point>) -> GeometryResult<Vec<Point>> {
    if points.len() != EYEBROW_POINTS * 2 {
        return Err(GeometryError::PointCount {
            expected: EYEBROW_POINTS * 2,
            got: points.len(),
        });
    }
    collapse_junction(&mut points, 7);
    collapse_junction(&mut points, 1);
    Ok(points)
}

/// Expanded, stitched and corrected boundary covering both eyebrows.
pub fn combined_boundary(
    right: &[Point],
    left: &[Point],
    expansion: &Expansion,
) -> GeometryResult<Boundary> {
    let right = expand_with(right, expansion)?;
    let left = expand_with(left, expansion)?;
    let stitched = stitch(&right, &left)?;
    Boundary::new(correct_junctions(stitched)?)
}

/// Expanded single-eyebrow boundary.
pub fn single_boundary(points: &[Point], expansion: &Expansion) -> GeometryResult<Boundary> {
    Boundary::new(expand_with(points, expansion)?)
}

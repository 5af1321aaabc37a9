//! Segments and closed boundary polygons.
//!
//! - [`segment_intersection`] - parametric segment/segment intersection
//! - [`Boundary`] - closed eyebrow region, validated vertex count, with an
//!   even-odd point-in-polygon test

use crate::{GeometryError, GeometryResult, Point};

/// Denominators below this are treated as parallel segments.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
}

impl Segment {
    /// Creates a segment.
    #[inline]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Direction vector `end - start`.
    #[inline]
    pub fn direction(&self) -> Point {
        self.end - self.start
    }
}

/// Intersection point of two segments, if they meet within both extents.
///
/// Solves `a.start + s * a.dir == b.start + t * b.dir` with cross-product
/// ratios and accepts the hit only for `s, t ∈ [0, 1]` (endpoints
/// included). Parallel and degenerate segments (zero denominator) never
/// intersect, so no NaN can leak out.
///
/// # Example
///
/// ```rust
/// use brow_math::{segment_intersection, Point, Segment};
///
/// let a = Segment::new(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
/// let b = Segment::new(Point::new(0.0, 2.0), Point::new(2.0, 0.0));
/// assert_eq!(segment_intersection(&a, &b), Some(Point::new(1.0, 1.0)));
/// ```
pub fn segment_intersection(a: &Segment, b: &Segment) -> Option<Point> {
    let r = a.direction();
    let q = b.direction();
    let denom = r.perp_dot(q);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let offset = b.start - a.start;
    let s = offset.perp_dot(q) / denom;
    let t = offset.perp_dot(r) / denom;
    if !(0.0..=1.0).contains(&s) || !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(a.start + r * s)
}

/// Boundary variants the matte builder dispatches on, keyed by vertex count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// One eyebrow, 6 vertices.
    Single,
    /// Both eyebrows, both junctions collapsed.
    Combined10,
    /// Both eyebrows, one junction collapsed.
    Combined11,
    /// Both eyebrows, no crossing junction.
    Combined12,
}

impl BoundaryKind {
    /// Kind for a vertex count.
    pub fn from_len(len: usize) -> GeometryResult<Self> {
        match len {
            6 => Ok(Self::Single),
            10 => Ok(Self::Combined10),
            11 => Ok(Self::Combined11),
            12 => Ok(Self::Combined12),
            n => Err(GeometryError::UnsupportedBoundary(n)),
        }
    }

    /// Vertex count of this kind.
    pub fn len(self) -> usize {
        match self {
            Self::Single => 6,
            Self::Combined10 => 10,
            Self::Combined11 => 11,
            Self::Combined12 => 12,
        }
    }
}

/// Closed polygon delimiting an eyebrow region.
///
/// The last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    points: Vec<Point>,
    kind: BoundaryKind,
}

impl Boundary {
    /// Validates the vertex count and wraps the points.
    pub fn new(points: Vec<Point>) -> GeometryResult<Self> {
        let kind = BoundaryKind::from_len(points.len())?;
        Ok(Self { points, kind })
    }

    /// Vertices in loop order.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Variant of this boundary.
    #[inline]
    pub fn kind(&self) -> BoundaryKind {
        self.kind
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a boundary has at least six vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Point, Point) {
        self.points.iter().fold(
            (Point::splat(f64::INFINITY), Point::splat(f64::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        )
    }

    /// Even-odd containment test.
    ///
    /// # Example
    ///
    /// ```rust
    /// use brow_math::{Boundary, Point};
    ///
    /// let hexagon = Boundary::new(vec![
    ///     Point::new(0.0, 1.0), Point::new(1.0, 0.0), Point::new(3.0, 0.0),
    ///     Point::new(4.0, 1.0), Point::new(3.0, 2.0), Point::new(1.0, 2.0),
    /// ]).unwrap();
    /// assert!(hexagon.contains(Point::new(2.0, 1.0)));
    /// assert!(!hexagon.contains(Point::new(5.0, 1.0)));
    /// ```
    pub fn contains(&self, p: Point) -> bool {
        let pts = &self.points;
        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let (pi, pj) = (pts[i], pts[j]);
            if (pi.y > p.y) != (pj.y > p.y) {
                let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

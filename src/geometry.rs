//! 2D geometry primitives shared by the generators and mesh builders
//!
//! Points are `glam::DVec2`. Polygons are plain vertex slices; every routine
//! here assumes a non-self-intersecting polygon unless it says otherwise.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D point or vector
pub type Point = glam::DVec2;

/// Axis-aligned rectangle described by its minimum corner and size
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its lower corner and size
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Square of half-size `half_extent` centred on `center`
    pub fn centered(center: Point, half_extent: f64) -> Self {
        Self::new(
            center.x - half_extent,
            center.y - half_extent,
            half_extent * 2.0,
            half_extent * 2.0,
        )
    }

    /// Smallest rectangle containing every point, `None` for an empty slice
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Get the lower corner
    #[inline]
    pub fn min(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the upper corner
    #[inline]
    pub fn max(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// Get the center point
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Containment test with inclusive edges
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }

    /// Whether this rectangle overlaps `other` (touching edges count)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }
}

/// Flatten points into an interleaved `[x0, y0, x1, y1, ..]` coordinate buffer
pub fn flatten_points(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

/// Average of the vertices (not the area centroid)
///
/// Returns the origin for an empty slice.
pub fn vertex_centroid(vertices: &[Point]) -> Point {
    if vertices.is_empty() {
        return Point::ZERO;
    }
    let sum: Point = vertices.iter().copied().sum();
    sum / vertices.len() as f64
}

/// Signed shoelace area, positive for counter-clockwise winding
pub fn signed_area(vertices: &[Point]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
        .sum();
    twice * 0.5
}

/// Unsigned polygon area
#[inline]
pub fn polygon_area(vertices: &[Point]) -> f64 {
    signed_area(vertices).abs()
}

/// Mean of the three corners
#[inline]
pub fn triangle_centroid(a: Point, b: Point, c: Point) -> Point {
    (a + b + c) / 3.0
}

/// Circumcenter of a triangle
///
/// Collinear input yields non-finite coordinates; callers check
/// `is_finite()` before using the result.
pub fn circumcenter(a: Point, b: Point, c: Point) -> Point {
    let b = b - a;
    let c = c - a;
    let bl = b.length_squared();
    let cl = c.length_squared();
    let d = b.perp_dot(c);
    let x = (c.y * bl - b.y * cl) * 0.5 / d;
    let y = (b.x * cl - c.x * bl) * 0.5 / d;
    a + Point::new(x, y)
}

/// Whether `p` lies strictly inside the triangle shrunk toward its centroid
///
/// `scale = 1.0` is the triangle itself, `0.2` keeps a fifth of its size.
pub fn point_in_scaled_triangle(p: Point, a: Point, b: Point, c: Point, scale: f64) -> bool {
    let centroid = triangle_centroid(a, b, c);
    let shrink = |v: Point| v + (centroid - v) * (1.0 - scale);
    let (p0, p1, p2) = (shrink(a), shrink(b), shrink(c));

    let area = 0.5 * (-p1.y * p2.x + p0.y * (-p1.x + p2.x) + p0.x * (p1.y - p2.y) + p1.x * p2.y);
    let sign = if area < 0.0 { -1.0 } else { 1.0 };
    let s = (p0.y * p2.x - p0.x * p2.y + (p2.y - p0.y) * p.x + (p0.x - p2.x) * p.y) * sign;
    let t = (p0.x * p1.y - p0.y * p1.x + (p0.y - p1.y) * p.x + (p1.x - p0.x) * p.y) * sign;
    s > 0.0 && t > 0.0 && (s + t) < 2.0 * area * sign
}

/// Even-odd crossing test
pub fn point_in_polygon(vertices: &[Point], p: Point) -> bool {
    let n = vertices.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > p.y) != (vj.y > p.y)
            && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Crossing test against the polygon scaled by `scale` about `center`
pub fn point_in_scaled_polygon(vertices: &[Point], p: Point, center: Point, scale: f64) -> bool {
    // Scaling the polygon about `center` is the same as scaling the query inversely.
    if scale == 1.0 {
        return point_in_polygon(vertices, p);
    }
    if scale <= 0.0 {
        return false;
    }
    point_in_polygon(vertices, center + (p - center) / scale)
}

/// Whether the polygon has no self-intersections
///
/// Non-adjacent edges may not touch; adjacent edges may only share their
/// common vertex. Polygons with fewer than three vertices are not simple.
pub fn is_simple_polygon(vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let (a, b) = (vertices[i], vertices[(i + 1) % n]);
        if a == b {
            return false;
        }
        for j in (i + 1)..n {
            let (c, d) = (vertices[j], vertices[(j + 1) % n]);
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                // Shared vertex is fine, folding back along the same line is not
                let shared = if j == i + 1 { b } else { a };
                let (u, v) = if j == i + 1 { (a, d) } else { (b, c) };
                let cross = (u - shared).perp_dot(v - shared);
                if cross == 0.0 && (u - shared).dot(v - shared) > 0.0 {
                    return false;
                }
            } else if segments_intersect(a, b, c, d) {
                return false;
            }
        }
    }
    true
}

/// Closed-segment intersection test (touching and collinear overlap count)
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if o1 != o2 && o3 != o4 && o1 != 0 && o2 != 0 && o3 != 0 && o4 != 0 {
        return true;
    }

    (o1 == 0 && on_segment(a, c, b))
        || (o2 == 0 && on_segment(a, d, b))
        || (o3 == 0 && on_segment(c, a, d))
        || (o4 == 0 && on_segment(c, b, d))
}

fn orientation(a: Point, b: Point, c: Point) -> i8 {
    let cross = (b - a).perp_dot(c - a);
    if cross > 0.0 {
        1
    } else if cross < 0.0 {
        -1
    } else {
        0
    }
}

/// `q` lies within the bounding box of segment `p..r` (collinearity checked by caller)
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x >= p.x.min(r.x) && q.x <= p.x.max(r.x) && q.y >= p.y.min(r.y) && q.y <= p.y.max(r.y)
}

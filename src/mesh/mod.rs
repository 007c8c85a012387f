//! Half-edge triangulation and dual mesh construction
//!
//! A triangulation is stored as two flat arrays: `triangles[s]` is the point a
//! side starts at, `halfedges[s]` the matching side of the neighbouring
//! triangle (or `None` on the boundary). Side `s` belongs to triangle `s / 3`
//! and the three sides of a triangle are consecutive.

mod bounded;
mod delaunay;
mod dual;
mod ghost;

pub use bounded::{BoundedDualMesh, BoundedDualMeshBuilder, DEFAULT_MAX_SAMPLING_ATTEMPTS, DEFAULT_POLY_SCALE, MAX_WALK_STEPS, MIN_SAMPLED_POINTS};
pub use delaunay::DelaunatorTriangulator;
pub use dual::{DualMesh, DualMeshBuilder, DualVertexRule, CIRCUMCENTER_SCALE};
pub use ghost::{extend_with_ghosts, GhostTriangulation};

use crate::error::{MapError, Result};
use crate::geometry::Point;

/// Index of one directed side (half-edge) of a triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SideId(pub usize);

impl SideId {
    /// Triangle this side belongs to
    #[inline]
    pub fn triangle(self) -> TriangleId {
        TriangleId(self.0 / 3)
    }

    /// Next side of the same triangle
    #[inline]
    pub fn next(self) -> SideId {
        if self.0 % 3 == 2 {
            SideId(self.0 - 2)
        } else {
            SideId(self.0 + 1)
        }
    }

    /// Previous side of the same triangle
    #[inline]
    pub fn prev(self) -> SideId {
        if self.0 % 3 == 0 {
            SideId(self.0 + 2)
        } else {
            SideId(self.0 - 1)
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriangleId(pub usize);

impl TriangleId {
    /// Get the first side of the triangle
    #[inline]
    pub fn first_side(self) -> SideId {
        SideId(self.0 * 3)
    }

    /// Get the three sides of the triangle
    #[inline]
    pub fn sides(self) -> [SideId; 3] {
        let s = self.0 * 3;
        [SideId(s), SideId(s + 1), SideId(s + 2)]
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Anything that can triangulate a point set
///
/// Implementations must return consistently wound triangles and a symmetric
/// half-edge array with `None` for boundary sides.
pub trait Triangulator {
    fn triangulate(&self, points: &[Point]) -> Result<Triangulation>;
}

/// Immutable, validated half-edge triangulation
#[derive(Debug, Clone, PartialEq)]
pub struct Triangulation {
    points: Vec<Point>,
    triangles: Vec<usize>,
    halfedges: Vec<Option<SideId>>,
}

impl Triangulation {
    /// Wrap raw triangulation arrays after checking their consistency
    ///
    /// # Errors
    ///
    /// `MalformedTriangulation` if the arrays disagree in length, a side
    /// references a missing point, or opposite sides are not mutual.
    pub fn new(points: Vec<Point>, triangles: Vec<usize>, halfedges: Vec<Option<SideId>>) -> Result<Self> {
        if triangles.len() % 3 != 0 {
            return Err(MapError::MalformedTriangulation(format!(
                "triangle array length {} is not a multiple of 3",
                triangles.len()
            )));
        }
        if triangles.len() != halfedges.len() {
            return Err(MapError::MalformedTriangulation(format!(
                "{} triangle entries but {} half-edges",
                triangles.len(),
                halfedges.len()
            )));
        }
        if let Some(&bad) = triangles.iter().find(|&&p| p >= points.len()) {
            return Err(MapError::MalformedTriangulation(format!(
                "side references point {} of {}",
                bad,
                points.len()
            )));
        }
        for (s, opposite) in halfedges.iter().enumerate() {
            if let Some(o) = opposite {
                if halfedges.get(o.0).copied().flatten() != Some(SideId(s)) {
                    return Err(MapError::MalformedTriangulation(format!(
                        "side {} points at side {} which does not point back",
                        s, o.0
                    )));
                }
            }
        }

        Ok(Self {
            points,
            triangles,
            halfedges,
        })
    }

    /// Get all points
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Start point of every side
    #[inline]
    pub fn triangles(&self) -> &[usize] {
        &self.triangles
    }

    /// Get the opposite side of every side
    #[inline]
    pub fn halfedges(&self) -> &[Option<SideId>] {
        &self.halfedges
    }

    /// Get the number of points
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Get the number of sides
    #[inline]
    pub fn num_sides(&self) -> usize {
        self.triangles.len()
    }

    /// Get the number of triangles
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Point a side starts at
    #[inline]
    pub fn side_start(&self, s: SideId) -> usize {
        self.triangles[s.0]
    }

    /// Point a side ends at
    #[inline]
    pub fn side_end(&self, s: SideId) -> usize {
        self.triangles[s.next().0]
    }

    /// Matching side of the neighbouring triangle, `None` on the boundary
    #[inline]
    pub fn opposite(&self, s: SideId) -> Option<SideId> {
        self.halfedges[s.0]
    }

    /// Point indices of a triangle in winding order
    #[inline]
    pub fn triangle_points(&self, t: TriangleId) -> [usize; 3] {
        let s = t.0 * 3;
        [self.triangles[s], self.triangles[s + 1], self.triangles[s + 2]]
    }

    /// Corner positions of a triangle in winding order
    #[inline]
    pub fn triangle_corners(&self, t: TriangleId) -> [Point; 3] {
        self.triangle_points(t).map(|p| self.points[p])
    }

    /// Every side without an opposite
    pub fn unpaired_sides(&self) -> Vec<SideId> {
        (0..self.num_sides())
            .map(SideId)
            .filter(|&s| self.opposite(s).is_none())
            .collect()
    }

    /// First side starting at each point, `None` for points no triangle uses
    pub fn point_first_sides(&self) -> Vec<Option<SideId>> {
        let mut first = vec![None; self.points.len()];
        for (s, &p) in self.triangles.iter().enumerate() {
            if first[p].is_none() {
                first[p] = Some(SideId(s));
            }
        }
        first
    }
}

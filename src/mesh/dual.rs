//! Dual mesh construction over an open triangulation
//!
//! Every triangle contributes one dual vertex; walking the triangles around a
//! point collects the ring of dual vertices that outlines its region. Points
//! on the triangulation boundary have no closed ring here and are dropped.

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::geometry::{circumcenter, point_in_scaled_triangle, triangle_centroid, Point};
use crate::mesh::{SideId, TriangleId, Triangulation};
use crate::region::Region;

/// Size of the shrunken triangle a circumcenter must fall in to be used
pub const CIRCUMCENTER_SCALE: f64 = 0.2;

/// How the dual vertex of a triangle is chosen
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DualVertexRule {
    /// Circumcenter when it lies well inside the triangle, centroid otherwise
    #[default]
    PreferCircumcenter,
    /// Always the centroid
    Centroid,
}

impl DualVertexRule {
    /// Dual vertex of triangle `abc`, and whether it is the circumcenter
    pub fn dual_vertex(self, a: Point, b: Point, c: Point) -> (Point, bool) {
        if self == DualVertexRule::PreferCircumcenter {
            let center = circumcenter(a, b, c);
            if center.is_finite() && point_in_scaled_triangle(center, a, b, c, CIRCUMCENTER_SCALE) {
                return (center, true);
            }
        }
        (triangle_centroid(a, b, c), false)
    }
}

/// Regions built from a triangulation plus bookkeeping for consumers
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DualMesh {
    /// Emitted regions in point order
    pub regions: Vec<Region>,
    /// Smallest region area (0 when there are no regions)
    pub min_area: f64,
    /// Largest region area (0 when there are no regions)
    pub max_area: f64,
    /// Points whose region was dropped
    pub discarded: usize,
    /// Triangles whose dual vertex is the circumcenter
    pub circumcenter_count: usize,
    /// Triangles whose dual vertex is the centroid (or an edge midpoint for ghosts)
    pub centroid_count: usize,
}

impl DualMesh {
    pub(crate) fn from_regions(regions: Vec<Region>, discarded: usize, dual: &DualVertices) -> Self {
        let (min_area, max_area) = if regions.is_empty() {
            (0.0, 0.0)
        } else {
            regions.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r.area), hi.max(r.area))
            })
        };

        Self {
            regions,
            min_area,
            max_area,
            discarded,
            circumcenter_count: dual.circumcenters,
            centroid_count: dual.vertices.len() - dual.circumcenters,
        }
    }

    /// Get the number of kept regions
    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Sum of all region areas
    pub fn total_area(&self) -> f64 {
        self.regions.iter().map(|r| r.area).sum()
    }

    /// Area normalised to `[0, 1]` over this mesh's area range
    pub fn normalized_area(&self, area: f64) -> f64 {
        let range = self.max_area - self.min_area;
        if range > 0.0 {
            ((area - self.min_area) / range).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Dual vertex per triangle
#[derive(Debug, Clone)]
pub(crate) struct DualVertices {
    pub vertices: Vec<Point>,
    pub circumcenters: usize,
}

impl DualVertices {
    /// Compute dual vertices; triangles for which `override_vertex` answers
    /// `Some` use that position instead
    pub fn compute<F>(tri: &Triangulation, rule: DualVertexRule, override_vertex: F) -> Self
    where
        F: Fn(TriangleId) -> Option<Point>,
    {
        let mut circumcenters = 0;
        let vertices = (0..tri.num_triangles())
            .map(TriangleId)
            .map(|t| {
                if let Some(v) = override_vertex(t) {
                    return v;
                }
                let [a, b, c] = tri.triangle_corners(t);
                let (v, is_circumcenter) = rule.dual_vertex(a, b, c);
                if is_circumcenter {
                    circumcenters += 1;
                }
                v
            })
            .collect();

        Self {
            vertices,
            circumcenters,
        }
    }
}

/// Outcome of walking the triangles around a point
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Walk {
    /// The walk returned to its starting side
    Closed(Vec<TriangleId>),
    /// A side without an opposite was reached
    Open,
    /// The step limit ran out first
    Abandoned,
}

/// Circulate around the start point of `start`: take the triangle, cross to
/// the opposite side and step to its next side, until back at `start`
pub(crate) fn walk_around(tri: &Triangulation, start: SideId, max_steps: usize) -> Walk {
    let mut triangles = Vec::new();
    let mut side = start;
    for _ in 0..max_steps {
        triangles.push(side.triangle());
        let Some(opposite) = tri.opposite(side) else {
            return Walk::Open;
        };
        side = opposite.next();
        if side == start {
            return Walk::Closed(triangles);
        }
    }
    Walk::Abandoned
}

/// Builds closed regions for the interior points of a triangulation
///
/// # Example
///
/// ```
/// use rust_sector_map::mesh::{DelaunatorTriangulator, DualMeshBuilder, Triangulator};
/// use rust_sector_map::Point;
///
/// let mut points = vec![Point::ZERO];
/// for i in 0..6 {
///     let angle = i as f64 * std::f64::consts::TAU / 6.0;
///     points.push(Point::new(angle.cos(), angle.sin()) * 10.0);
/// }
/// let tri = DelaunatorTriangulator.triangulate(&points).unwrap();
/// let mesh = DualMeshBuilder::new(&tri).build().unwrap();
///
/// // Only the centre point has a closed ring
/// assert_eq!(mesh.region_count(), 1);
/// assert_eq!(mesh.discarded, 6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DualMeshBuilder<'a> {
    triangulation: &'a Triangulation,
    rule: DualVertexRule,
}

impl<'a> DualMeshBuilder<'a> {
    /// Create a builder using the default dual vertex rule
    pub fn new(triangulation: &'a Triangulation) -> Self {
        Self {
            triangulation,
            rule: DualVertexRule::default(),
        }
    }

    /// Set how the dual vertex of each triangle is chosen
    pub fn dual_vertex_rule(mut self, rule: DualVertexRule) -> Self {
        self.rule = rule;
        self
    }

    /// Build one region per interior point
    ///
    /// Boundary points and points no triangle uses are counted in
    /// [`DualMesh::discarded`].
    ///
    /// # Errors
    ///
    /// `DegenerateTriangulation` for fewer than three points or no triangles.
    pub fn build(&self) -> Result<DualMesh> {
        let tri = self.triangulation;
        if tri.num_points() < 3 || tri.num_triangles() == 0 {
            return Err(MapError::DegenerateTriangulation(format!(
                "{} points and {} triangles",
                tri.num_points(),
                tri.num_triangles()
            )));
        }

        let dual = DualVertices::compute(tri, self.rule, |_| None);

        let mut regions = Vec::new();
        let mut discarded = 0;
        for (site, first_side) in tri.point_first_sides().into_iter().enumerate() {
            let walk = first_side.map(|s| walk_around(tri, s, tri.num_sides()));
            match walk {
                Some(Walk::Closed(triangles)) => {
                    let ring = triangles.iter().map(|t| dual.vertices[t.0]).collect();
                    regions.push(Region::from_ring(site, ring, false));
                }
                _ => discarded += 1,
            }
        }

        debug!(
            "dual mesh: {} regions, {} discarded, {} circumcenters / {} triangles",
            regions.len(),
            discarded,
            dual.circumcenters,
            tri.num_triangles()
        );

        Ok(DualMesh::from_regions(regions, discarded, &dual))
    }
}

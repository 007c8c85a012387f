//! Delaunay triangulation via the `delaunator` crate
//!
//! Thin adapter turning delaunator's `EMPTY` sentinel into `Option<SideId>`.

use crate::error::Result;
use crate::geometry::Point;
use crate::mesh::{SideId, Triangulation, Triangulator};

/// Default [`Triangulator`] backed by `delaunator`
///
/// Duplicate input points are left out of every triangle; collinear or too
/// small inputs yield an empty triangulation, which the mesh builders reject.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunatorTriangulator;

impl Triangulator for DelaunatorTriangulator {
    fn triangulate(&self, points: &[Point]) -> Result<Triangulation> {
        let input: Vec<delaunator::Point> = points
            .iter()
            .map(|p| delaunator::Point { x: p.x, y: p.y })
            .collect();

        let result = delaunator::triangulate(&input);
        let halfedges = result
            .halfedges
            .iter()
            .map(|&h| (h != delaunator::EMPTY).then_some(SideId(h)))
            .collect();

        Triangulation::new(points.to_vec(), result.triangles, halfedges)
    }
}

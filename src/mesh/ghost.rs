//! Closing an open triangulation with ghost triangles
//!
//! One extra "ghost" point is appended and every boundary side gets a ghost
//! triangle joining it to that point. Afterwards every side has an opposite,
//! so walks around hull points close like walks around interior points.

use log::debug;

use crate::error::{MapError, Result};
use crate::geometry::Point;
use crate::mesh::{SideId, TriangleId, Triangulation};

/// A triangulation whose boundary has been closed with ghost triangles
///
/// Solid sides keep their original indices; ghost sides follow them.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostTriangulation {
    triangulation: Triangulation,
    num_solid_sides: usize,
    ghost_point: usize,
}

impl GhostTriangulation {
    /// Get the closed triangulation
    #[inline]
    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    /// Consume into the closed triangulation
    pub fn into_triangulation(self) -> Triangulation {
        self.triangulation
    }

    /// Index of the appended ghost point
    #[inline]
    pub fn ghost_point(&self) -> usize {
        self.ghost_point
    }

    /// Get the number of sides that existed before the extension
    #[inline]
    pub fn num_solid_sides(&self) -> usize {
        self.num_solid_sides
    }

    /// Get the number of added ghost triangles
    #[inline]
    pub fn num_ghost_triangles(&self) -> usize {
        (self.triangulation.num_sides() - self.num_solid_sides) / 3
    }

    /// Check if a side belongs to a ghost triangle
    #[inline]
    pub fn is_ghost_side(&self, s: SideId) -> bool {
        s.0 >= self.num_solid_sides
    }

    /// Check if a triangle is a ghost triangle
    #[inline]
    pub fn is_ghost_triangle(&self, t: TriangleId) -> bool {
        self.is_ghost_side(t.first_side())
    }
}

/// Extend `tri` with one ghost triangle per boundary side
///
/// The boundary is walked as a single cycle starting from the last unpaired
/// side; ghost triangle `i` is `{end(s), start(s), ghost}` for the i-th side
/// `s` of that walk, and its last side pairs with the second side of ghost
/// triangle `i + 1`.
///
/// # Errors
///
/// `DegenerateTriangulation` when there are no sides or none of them is
/// paired, `MalformedTriangulation` when the boundary is not one simple cycle.
pub fn extend_with_ghosts(tri: &Triangulation, ghost: Point) -> Result<GhostTriangulation> {
    let num_solid_sides = tri.num_sides();
    let unpaired = tri.unpaired_sides();
    if num_solid_sides == 0 || unpaired.len() == num_solid_sides {
        return Err(MapError::DegenerateTriangulation(format!(
            "{} sides, {} of them unpaired",
            num_solid_sides,
            unpaired.len()
        )));
    }

    let mut unpaired_starting_at: Vec<Option<SideId>> = vec![None; tri.num_points()];
    for &s in &unpaired {
        let p = tri.side_start(s);
        if let Some(other) = unpaired_starting_at[p].replace(s) {
            return Err(MapError::MalformedTriangulation(format!(
                "point {} starts two boundary sides ({} and {})",
                p, other.0, s.0
            )));
        }
    }

    let ghost_point = tri.num_points();
    let mut points = tri.points().to_vec();
    points.push(ghost);

    let k = unpaired.len();
    let num_sides = num_solid_sides + 3 * k;
    let mut triangles = tri.triangles().to_vec();
    triangles.resize(num_sides, 0);
    let mut halfedges = tri.halfedges().to_vec();
    halfedges.resize(num_sides, None);

    if let Some(&first) = unpaired.last() {
        let mut visited = vec![false; tri.num_points()];
        let mut s = first;
        for i in 0..k {
            let start = tri.side_start(s);
            let end = tri.side_end(s);
            if std::mem::replace(&mut visited[start], true) {
                return Err(MapError::MalformedTriangulation(format!(
                    "boundary returns to point {} after {} of {} sides",
                    start, i, k
                )));
            }

            let g = num_solid_sides + 3 * i;
            triangles[g] = end;
            triangles[g + 1] = start;
            triangles[g + 2] = ghost_point;

            halfedges[s.0] = Some(SideId(g));
            halfedges[g] = Some(s);

            let following = num_solid_sides + (3 * i + 4) % (3 * k);
            halfedges[g + 2] = Some(SideId(following));
            halfedges[following] = Some(SideId(g + 2));

            s = unpaired_starting_at[end].ok_or_else(|| {
                MapError::MalformedTriangulation(format!("boundary is open at point {}", end))
            })?;
        }

        if s != first {
            return Err(MapError::MalformedTriangulation(
                "boundary does not form a single cycle".into(),
            ));
        }
    }

    debug!("ghost extension: {} boundary sides closed", k);

    Ok(GhostTriangulation {
        triangulation: Triangulation::new(points, triangles, halfedges)?,
        num_solid_sides,
        ghost_point,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::tests::unit_square;
    use crate::mesh::{DelaunatorTriangulator, Triangulator};

    #[test]
    fn test_square_is_closed() {
        let tri = unit_square();
        let ghosted = extend_with_ghosts(&tri, Point::new(0.5, 0.5)).unwrap();
        let closed = ghosted.triangulation();

        assert_eq!(ghosted.ghost_point(), 4);
        assert_eq!(closed.points()[4], Point::new(0.5, 0.5));
        assert_eq!(ghosted.num_ghost_triangles(), 4);
        assert_eq!(closed.num_triangles(), 6);
        assert!(closed.unpaired_sides().is_empty());

        // Solid topology is untouched
        assert_eq!(&closed.triangles()[..6], tri.triangles());
        assert_eq!(closed.opposite(SideId(2)), Some(SideId(3)));

        for t in 2..6 {
            let t = TriangleId(t);
            assert!(ghosted.is_ghost_triangle(t));
            let [g, g1, g2] = t.sides();
            let solid = closed.opposite(g).unwrap();
            assert!(!ghosted.is_ghost_side(solid));
            // The ghost side runs the solid boundary side backwards
            assert_eq!(closed.side_start(g), tri.side_end(solid));
            assert_eq!(closed.side_start(g1), tri.side_start(solid));
            assert_eq!(closed.side_start(g2), 4);
        }
        assert!(!ghosted.is_ghost_triangle(TriangleId(1)));
    }

    #[test]
    fn test_delaunay_hull_is_closed() {
        let points: Vec<Point> = (0..20)
            .map(|i| {
                let angle = i as f64 * 0.7;
                Point::new(angle.cos(), angle.sin()) * (1.0 + i as f64)
            })
            .collect();
        let tri = DelaunatorTriangulator.triangulate(&points).unwrap();
        let hull = tri.unpaired_sides().len();
        let ghosted = extend_with_ghosts(&tri, Point::ZERO).unwrap();

        assert_eq!(ghosted.num_ghost_triangles(), hull);
        assert_eq!(ghosted.triangulation().num_sides(), tri.num_sides() + 3 * hull);
        assert!(ghosted.triangulation().unpaired_sides().is_empty());
    }

    #[test]
    fn test_single_triangle_is_degenerate() {
        let tri = Triangulation::new(vec![Point::ZERO, Point::X, Point::Y], vec![0, 1, 2], vec![None; 3]).unwrap();
        assert!(matches!(
            extend_with_ghosts(&tri, Point::ZERO),
            Err(MapError::DegenerateTriangulation(_))
        ));
    }

    #[test]
    fn test_pinched_boundary_is_malformed() {
        // Two squares touching at point 2
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(1.0, 2.0),
        ];
        let triangles = vec![0, 1, 2, 0, 2, 3, 2, 4, 5, 2, 5, 6];
        let mut halfedges = vec![None; 12];
        halfedges[2] = Some(SideId(3));
        halfedges[3] = Some(SideId(2));
        halfedges[8] = Some(SideId(9));
        halfedges[9] = Some(SideId(8));
        let tri = Triangulation::new(points, triangles, halfedges).unwrap();

        assert!(matches!(
            extend_with_ghosts(&tri, Point::new(1.0, 1.0)),
            Err(MapError::MalformedTriangulation(_))
        ));
    }
}

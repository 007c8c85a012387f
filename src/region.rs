//! Region Structure
//!
//! One polygon of a dual mesh: the area closer (in the dual sense) to its
//! originating point than to any other.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{point_in_polygon, polygon_area, signed_area, vertex_centroid, Point, Rect};

/// A single dual-mesh region
///
/// Vertices are stored relative to the centroid so a region can be drawn or
/// instanced at any offset; [`Region::world_vertices`] gives them back in
/// the coordinate system of the input points.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Index of the point this region was built around
    pub site: usize,

    /// Ring of vertices, translated so `centroid` sits at the origin
    ///
    /// Interior regions follow the triangle walk; hull regions are sorted
    /// counter-clockwise and end with the site itself.
    pub vertices: Vec<Point>,

    /// Vertex average of the ring in world coordinates
    pub centroid: Point,

    /// Absolute shoelace area
    pub area: f64,

    /// Whether the region touches the hull of the point set
    pub boundary: bool,
}

impl Region {
    /// Create a region from precomputed parts
    pub fn new(site: usize, vertices: Vec<Point>, centroid: Point, area: f64, boundary: bool) -> Self {
        Self {
            site,
            vertices,
            centroid,
            area,
            boundary,
        }
    }

    /// Build a region from a ring of world-space vertices
    pub fn from_ring(site: usize, ring: Vec<Point>, boundary: bool) -> Self {
        let centroid = vertex_centroid(&ring);
        let vertices: Vec<Point> = ring.into_iter().map(|p| p - centroid).collect();
        let area = polygon_area(&vertices);
        Self::new(site, vertices, centroid, area, boundary)
    }

    /// Get the number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertices translated back to world coordinates
    pub fn world_vertices(&self) -> Vec<Point> {
        self.vertices.iter().map(|v| *v + self.centroid).collect()
    }

    /// Shoelace area keeping the winding sign (positive when counter-clockwise)
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.vertices)
    }

    /// World-space bounding box, `None` for a region without vertices
    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(&self.vertices).map(|r| Rect::new(r.x + self.centroid.x, r.y + self.centroid.y, r.width, r.height))
    }

    /// Whether a world-space point lies inside the region (even-odd rule)
    pub fn contains(&self, p: Point) -> bool {
        point_in_polygon(&self.vertices, p - self.centroid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn offset_square() -> Region {
        Region::from_ring(
            3,
            vec![
                Point::new(10.0, 10.0),
                Point::new(12.0, 10.0),
                Point::new(12.0, 12.0),
                Point::new(10.0, 12.0),
            ],
            false,
        )
    }

    #[test]
    fn test_from_ring() {
        let region = offset_square();
        assert_eq!(region.site, 3);
        assert_eq!(region.centroid, Point::new(11.0, 11.0));
        assert_eq!(region.vertices[0], Point::new(-1.0, -1.0));
        assert_relative_eq!(region.area, 4.0);
        assert_relative_eq!(region.signed_area(), 4.0);
        assert_eq!(region.vertex_count(), 4);
    }

    #[test]
    fn test_world_space_queries() {
        let region = offset_square();
        assert_eq!(region.world_vertices()[2], Point::new(12.0, 12.0));
        assert!(region.contains(Point::new(11.5, 10.5)));
        assert!(!region.contains(Point::new(9.0, 11.0)));

        let bounds = region.bounds().unwrap();
        assert_eq!(bounds.min(), Point::new(10.0, 10.0));
        assert_eq!(bounds.max(), Point::new(12.0, 12.0));
    }

    #[test]
    fn test_clockwise_ring_has_positive_area() {
        let region = Region::from_ring(
            0,
            vec![Point::new(0.0, 0.0), Point::new(0.0, 3.0), Point::new(3.0, 0.0)],
            true,
        );
        assert_relative_eq!(region.area, 4.5);
        assert!(region.signed_area() < 0.0);
    }
}

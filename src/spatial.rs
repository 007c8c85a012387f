//! Point-region quadtree used for minimum-distance rejection tests
//!
//! Nodes split into four quadrants once they hold more than
//! [`MAX_OBJECTS`] points, until [`MAX_LEVELS`] is reached; deeper leaves keep
//! a flat list. Queries return supersets of the true neighbourhood and callers
//! filter by exact distance (or use [`SpatialIndex::has_point_within`]).

use crate::error::{MapError, Result};
use crate::geometry::{Point, Rect};

/// Points a node holds before it splits
pub const MAX_OBJECTS: usize = 8;

/// Maximum subdivision depth
pub const MAX_LEVELS: usize = 4;

#[derive(Debug, Clone)]
struct Node {
    bounds: Rect,
    level: usize,
    points: Vec<Point>,
    children: Option<Box<[Node; 4]>>,
}

impl Node {
    fn new(bounds: Rect, level: usize) -> Self {
        Self {
            bounds,
            level,
            points: Vec::new(),
            children: None,
        }
    }

    /// Quadrant containing `p`: 0 = top-left, 1 = top-right, 2 = bottom-left, 3 = bottom-right
    fn quadrant(&self, p: Point) -> usize {
        let mid = self.bounds.center();
        match (p.x >= mid.x, p.y >= mid.y) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    fn split(&mut self) {
        let Rect { x, y, width, height } = self.bounds;
        let (w, h) = (width * 0.5, height * 0.5);
        let level = self.level + 1;
        self.children = Some(Box::new([
            Node::new(Rect::new(x, y, w, h), level),
            Node::new(Rect::new(x + w, y, w, h), level),
            Node::new(Rect::new(x, y + h, w, h), level),
            Node::new(Rect::new(x + w, y + h, w, h), level),
        ]));

        let points = std::mem::take(&mut self.points);
        for p in points {
            self.insert(p);
        }
    }

    fn insert(&mut self, p: Point) {
        let quadrant = self.quadrant(p);
        if let Some(children) = self.children.as_mut() {
            children[quadrant].insert(p);
            return;
        }

        self.points.push(p);
        if self.points.len() > MAX_OBJECTS && self.level < MAX_LEVELS {
            self.split();
        }
    }

    /// Collect the points of every leaf overlapping `area`
    fn collect(&self, area: &Rect, out: &mut Vec<Point>) {
        if !self.bounds.intersects(area) {
            return;
        }
        match self.children.as_ref() {
            Some(children) => {
                for child in children.iter() {
                    child.collect(area, out);
                }
            }
            None => out.extend_from_slice(&self.points),
        }
    }

    /// Bounds of the leaf containing `p`
    fn leaf_bounds(&self, p: Point) -> Rect {
        match self.children.as_ref() {
            Some(children) => children[self.quadrant(p)].leaf_bounds(p),
            None => self.bounds,
        }
    }
}

/// Quadtree over 2D points with bounded insertion
///
/// # Example
///
/// ```
/// use rust_sector_map::{Point, Rect, SpatialIndex};
///
/// let mut index = SpatialIndex::new(Rect::new(0.0, 0.0, 100.0, 100.0));
/// index.insert(Point::new(10.0, 10.0)).unwrap();
///
/// let nearby = index.retrieve(Point::new(12.0, 12.0));
/// assert!(nearby.contains(&Point::new(10.0, 10.0)));
/// ```
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    root: Node,
    len: usize,
}

impl SpatialIndex {
    /// Create an empty index covering `bounds`
    pub fn new(bounds: Rect) -> Self {
        Self {
            root: Node::new(bounds, 0),
            len: 0,
        }
    }

    /// Insert a point
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if the point lies outside the index bounds.
    pub fn insert(&mut self, p: Point) -> Result<()> {
        if !self.root.bounds.contains(p) {
            return Err(MapError::OutOfBounds { x: p.x, y: p.y });
        }
        self.root.insert(p);
        self.len += 1;
        Ok(())
    }

    /// Points stored in the partition containing `query` and its neighbours
    ///
    /// The result is a superset of the close points; callers re-check distances.
    pub fn retrieve(&self, query: Point) -> Vec<Point> {
        let leaf = self.root.leaf_bounds(query);
        let area = leaf.expanded(leaf.width.max(leaf.height));
        let mut out = Vec::new();
        self.root.collect(&area, &mut out);
        out
    }

    /// Points of every partition touching the square `query ± radius`
    pub fn retrieve_within(&self, query: Point, radius: f64) -> Vec<Point> {
        let mut out = Vec::new();
        self.root.collect(&Rect::centered(query, radius), &mut out);
        out
    }

    /// Whether any stored point is strictly closer than `radius` to `query`
    pub fn has_point_within(&self, query: Point, radius: f64) -> bool {
        self.retrieve_within(query, radius)
            .iter()
            .any(|p| p.distance(query) < radius)
    }

    /// Get the area covered by the index
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Get the number of stored points
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no point has been stored
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_100() -> SpatialIndex {
        SpatialIndex::new(Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    #[test]
    fn test_insert_and_retrieve() {
        let mut index = index_100();
        index.insert(Point::new(10.0, 10.0)).unwrap();

        let items = index.retrieve(Point::new(12.0, 12.0));
        assert!(items.contains(&Point::new(10.0, 10.0)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut index = index_100();
        let result = index.insert(Point::new(150.0, 10.0));
        assert_eq!(result, Err(MapError::OutOfBounds { x: 150.0, y: 10.0 }));
        assert!(index.is_empty());

        // Edges are inclusive
        assert!(index.insert(Point::new(100.0, 100.0)).is_ok());
        assert!(index.insert(Point::new(0.0, 0.0)).is_ok());
    }

    #[test]
    fn test_subdivision_keeps_every_point() {
        let mut index = index_100();
        let mut points = Vec::new();
        for i in 0..20 {
            for j in 0..20 {
                let p = Point::new(i as f64 * 5.0 + 0.5, j as f64 * 5.0 + 0.5);
                index.insert(p).unwrap();
                points.push(p);
            }
        }
        assert_eq!(index.len(), 400);

        let everything = index.retrieve_within(Point::new(50.0, 50.0), 100.0);
        assert_eq!(everything.len(), 400);

        // A small query does not return the whole tree once it has split
        let local = index.retrieve(Point::new(1.0, 1.0));
        assert!(local.len() < 400);
        assert!(local.contains(&Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_retrieve_crosses_partition_edges() {
        let mut index = index_100();
        // Fill one quadrant so the root splits at x = 50
        for i in 0..9 {
            index.insert(Point::new(10.0 + i as f64, 10.0)).unwrap();
        }
        index.insert(Point::new(49.9, 20.0)).unwrap();

        let items = index.retrieve(Point::new(50.1, 20.0));
        assert!(items.contains(&Point::new(49.9, 20.0)));
    }

    #[test]
    fn test_depth_limit_keeps_flat_leaves() {
        let mut index = index_100();
        // Identical points can never be separated by splitting
        for _ in 0..50 {
            index.insert(Point::new(3.0, 3.0)).unwrap();
        }
        assert_eq!(index.retrieve(Point::new(3.0, 3.0)).len(), 50);
    }

    #[test]
    fn test_has_point_within() {
        let mut index = index_100();
        index.insert(Point::new(10.0, 10.0)).unwrap();

        assert!(index.has_point_within(Point::new(12.0, 10.0), 2.5));
        assert!(!index.has_point_within(Point::new(12.0, 10.0), 2.0));
        assert!(!index.has_point_within(Point::new(90.0, 90.0), 5.0));
    }
}

//! Nearest-region lookups
//!
//! This module is only available with the `region-lookup` feature.

use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::geometry::Point;
use crate::region::Region;

/// KD-tree over region centroids
///
/// Answers "which region is this point closest to" in O(log n). This is the
/// nearest centroid, which usually but not always is the region containing
/// the point; use an exact polygon test when that matters.
#[derive(Clone)]
pub struct RegionLocator {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
}

impl RegionLocator {
    /// Build the tree from region centroids, `None` when there are no regions
    ///
    /// # Example
    ///
    /// ```
    /// use rust_sector_map::locate::RegionLocator;
    /// use rust_sector_map::{Point, Region};
    ///
    /// let regions: Vec<Region> = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
    ///     .iter()
    ///     .enumerate()
    ///     .map(|(i, c)| Region::new(i, Vec::new(), *c, 0.0, false))
    ///     .collect();
    ///
    /// let locator = RegionLocator::new(&regions).unwrap();
    /// assert_eq!(locator.find_nearest(Point::new(7.0, 1.0)), 1);
    /// ```
    pub fn new(regions: &[Region]) -> Option<Self> {
        if regions.is_empty() {
            return None;
        }

        let centroids: Vec<[f64; 2]> = regions.iter().map(|r| [r.centroid.x, r.centroid.y]).collect();
        Some(Self {
            tree: ImmutableKdTree::new_from_slice(&centroids),
        })
    }

    /// Index of the region whose centroid is closest to `p`
    pub fn find_nearest(&self, p: Point) -> usize {
        let result = self.tree.nearest_one::<SquaredEuclidean>(&[p.x, p.y]);
        result.item
    }
}

//! Point generation
//!
//! Produces the point sets that get triangulated: a radially weighted disc,
//! a deterministic spiral layout, and Poisson-disc sampling inside a polygon.
//! Point order is insertion order and decides triangulation indices, so every
//! generator is deterministic for a given random state.

mod disc;
mod poisson;
mod spiral;

pub use disc::{generate_disc_points, DiscOptions, DEFAULT_MAX_RETRIES};
pub use poisson::{PolygonPoissonSampler, DEFAULT_MAX_TRIES};
pub use spiral::{concentric_ellipses, ellipse_points, generate_spiral_points, EllipseFamily, SPIRAL_FAMILIES};

use rand::Rng;

use crate::config::PointLayout;
use crate::error::Result;
use crate::geometry::Point;

/// Points produced by a constrained generator
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPoints {
    /// Accepted points in insertion order
    pub points: Vec<Point>,
    /// Slots that stalled (disc) or points dropped by thinning (spiral)
    pub discarded: usize,
}

/// Generate sector points for a configured layout
///
/// The random state is only consumed by layouts that need it.
pub fn generate_layout_points<R: Rng + ?Sized>(layout: &PointLayout, rng: &mut R) -> Result<GeneratedPoints> {
    match *layout {
        PointLayout::Spiral { min_distance } => generate_spiral_points(min_distance),
        PointLayout::Disc {
            num_points,
            radius,
            min_distance,
            boundary_points,
            weight,
        } => {
            let options = DiscOptions::new(num_points, radius, min_distance, boundary_points);
            generate_disc_points(&options, |u| weight.apply(u), rng)
        }
    }
}

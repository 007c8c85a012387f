//! Dual mesh that exactly tiles a simple polygon
//!
//! Points are Poisson-sampled inside the polygon (its own vertices included),
//! triangulated, closed with ghost triangles and walked into regions. Hull
//! points get a fan closed by the point itself, so the regions cover the
//! polygon's hull without gaps.

use log::{debug, warn};
use rand::Rng;
use std::f64::consts::TAU;
use std::ops::Deref;

use super::dual::{walk_around, DualVertices, Walk};
use super::ghost::extend_with_ghosts;
use crate::error::{MapError, Result};
use crate::generation::{PolygonPoissonSampler, DEFAULT_MAX_TRIES};
use crate::geometry::{is_simple_polygon, polygon_area, vertex_centroid, Point};
use crate::mesh::{DualMesh, DualVertexRule, Triangulator};
use crate::region::Region;

/// Default shrink factor for the sampling polygon
pub const DEFAULT_POLY_SCALE: f64 = 0.75;
/// Longest walk around a point before its region is abandoned
pub const MAX_WALK_STEPS: usize = 30;
/// Fewest points a sampling round must yield
pub const MIN_SAMPLED_POINTS: usize = 6;
/// Default number of sampling rounds
pub const DEFAULT_MAX_SAMPLING_ATTEMPTS: usize = 32;

/// Divisor applied to the minimum distance after a sparse sampling round
const MIN_DISTANCE_FALLOFF: f64 = 1.25;

/// Bounded dual mesh plus statistics about how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedDualMesh {
    mesh: DualMesh,
    /// Points triangulated, polygon vertices included
    pub points_sampled: usize,
    /// Sampling rounds used (1 when the first round was dense enough)
    pub sampling_attempts: usize,
    /// Minimum distance of the successful round
    pub final_min_distance: f64,
    /// Ghost triangles added to close the hull
    pub ghost_triangles: usize,
}

impl BoundedDualMesh {
    /// Get the underlying dual mesh
    #[inline]
    pub fn mesh(&self) -> &DualMesh {
        &self.mesh
    }

    /// Consume into the underlying dual mesh
    pub fn into_mesh(self) -> DualMesh {
        self.mesh
    }
}

impl Deref for BoundedDualMesh {
    type Target = DualMesh;

    fn deref(&self) -> &DualMesh {
        &self.mesh
    }
}

/// Builder for [`BoundedDualMesh`]
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use rust_sector_map::mesh::{BoundedDualMeshBuilder, DelaunatorTriangulator};
/// use rust_sector_map::Point;
///
/// let square = vec![
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
/// ];
/// let mesh = BoundedDualMeshBuilder::new(square, 1.0, 30)
///     .build(&mut ChaCha8Rng::seed_from_u64(316), &DelaunatorTriangulator)
///     .unwrap();
/// assert!(mesh.points_sampled >= 6);
/// assert_eq!(mesh.ghost_triangles, 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedDualMeshBuilder {
    polygon: Vec<Point>,
    min_distance: f64,
    max_points: usize,
    poly_scale: f64,
    max_tries: usize,
    rule: DualVertexRule,
    max_sampling_attempts: usize,
    min_points: usize,
}

/// Result of the sampling stage
struct Samples {
    points: Vec<Point>,
    attempts: usize,
    min_distance: f64,
}

impl BoundedDualMeshBuilder {
    /// Create a builder for `polygon` with default sampling settings
    pub fn new(polygon: Vec<Point>, min_distance: f64, max_points: usize) -> Self {
        Self {
            polygon,
            min_distance,
            max_points,
            poly_scale: DEFAULT_POLY_SCALE,
            max_tries: DEFAULT_MAX_TRIES,
            rule: DualVertexRule::default(),
            max_sampling_attempts: DEFAULT_MAX_SAMPLING_ATTEMPTS,
            min_points: MIN_SAMPLED_POINTS,
        }
    }

    /// Set the shrink factor of the polygon that sampled points must fall in
    pub fn poly_scale(mut self, scale: f64) -> Self {
        self.poly_scale = scale;
        self
    }

    /// Set the candidates drawn around each active point
    pub fn max_tries(mut self, tries: usize) -> Self {
        self.max_tries = tries;
        self
    }

    /// Set how the dual vertex of a solid triangle is chosen
    pub fn dual_vertex_rule(mut self, rule: DualVertexRule) -> Self {
        self.rule = rule;
        self
    }

    /// Set the number of sampling rounds before giving up
    pub fn max_sampling_attempts(mut self, attempts: usize) -> Self {
        self.max_sampling_attempts = attempts;
        self
    }

    /// Fewest points a sampling round must yield before it is accepted
    pub fn min_points(mut self, points: usize) -> Self {
        self.min_points = points;
        self
    }

    /// Get the polygon being tiled
    #[inline]
    pub fn polygon(&self) -> &[Point] {
        &self.polygon
    }

    fn validate(&self) -> Result<()> {
        if self.polygon.len() < 3 {
            return Err(MapError::InvalidPolygon(format!(
                "polygon needs at least 3 vertices (got {})",
                self.polygon.len()
            )));
        }
        if self.polygon.iter().any(|p| !p.is_finite()) {
            return Err(MapError::InvalidPolygon("polygon has non-finite coordinates".into()));
        }
        if !(polygon_area(&self.polygon) > 0.0) {
            return Err(MapError::InvalidPolygon("polygon has zero area".into()));
        }
        if !is_simple_polygon(&self.polygon) {
            return Err(MapError::InvalidPolygon("polygon edges intersect".into()));
        }
        if self.min_points < 3 || self.max_points < self.min_points {
            return Err(MapError::InvalidConfig(format!(
                "need 3 <= min_points <= max_points (got {} and {})",
                self.min_points, self.max_points
            )));
        }
        if self.max_sampling_attempts == 0 {
            return Err(MapError::InvalidConfig("max_sampling_attempts must be at least 1".into()));
        }
        Ok(())
    }

    /// Sample until a round yields enough points, relaxing the minimum distance each time
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Samples> {
        let mut min_distance = self.min_distance;
        let mut found = 0;

        for attempt in 1..=self.max_sampling_attempts {
            let mut sampler = PolygonPoissonSampler::new(&self.polygon, min_distance, self.max_points)?
                .poly_scale(self.poly_scale)
                .max_tries(self.max_tries);
            for &vertex in &self.polygon {
                sampler.add_point(vertex)?;
            }

            let points = sampler.sample(rng)?;
            if points.len() >= self.min_points {
                return Ok(Samples {
                    points,
                    attempts: attempt,
                    min_distance,
                });
            }

            warn!(
                "sampling round {} gave {} points at min distance {:.4}, relaxing",
                attempt,
                points.len(),
                min_distance
            );
            found = points.len();
            min_distance /= MIN_DISTANCE_FALLOFF;
        }

        Err(MapError::InsufficientSamples {
            found,
            required: self.min_points,
        })
    }

    /// Sample, triangulate and assemble the regions
    ///
    /// # Errors
    ///
    /// `InvalidPolygon` for a polygon that is too small, flat, non-finite or
    /// self-intersecting; `InsufficientSamples` when every sampling round
    /// stays below the minimum point count; triangulation and ghost extension errors are
    /// passed through.
    pub fn build<R, T>(&self, rng: &mut R, triangulator: &T) -> Result<BoundedDualMesh>
    where
        R: Rng + ?Sized,
        T: Triangulator + ?Sized,
    {
        self.validate()?;

        let samples = self.sample(rng)?;
        debug!(
            "sampled {} points in {} round(s)",
            samples.points.len(),
            samples.attempts
        );

        let solid = triangulator.triangulate(&samples.points)?;
        debug!("triangulated: {} triangles", solid.num_triangles());

        let ghosted = extend_with_ghosts(&solid, vertex_centroid(&self.polygon))?;
        let tri = ghosted.triangulation();
        debug!("ghost extended: {} ghost triangles", ghosted.num_ghost_triangles());

        let dual = DualVertices::compute(tri, self.rule, |t| {
            ghosted.is_ghost_triangle(t).then(|| {
                let [a, b, _] = tri.triangle_corners(t);
                a.lerp(b, 0.5)
            })
        });
        debug!(
            "dual vertices computed: {} circumcenters of {} solid triangles",
            dual.circumcenters,
            solid.num_triangles()
        );

        let mut regions = Vec::with_capacity(samples.points.len());
        let mut discarded = 0;
        let first_sides = tri.point_first_sides();
        for (site, &first_side) in first_sides.iter().enumerate().take(samples.points.len()) {
            let triangles = match first_side.map(|s| walk_around(tri, s, MAX_WALK_STEPS)) {
                Some(Walk::Closed(triangles)) => triangles,
                other => {
                    warn!("region {} discarded ({:?})", site, other);
                    discarded += 1;
                    continue;
                }
            };

            let ring: Vec<Point> = triangles.iter().map(|t| dual.vertices[t.0]).collect();
            let boundary = triangles.iter().any(|&t| ghosted.is_ghost_triangle(t));
            let ring = if boundary {
                close_fan(samples.points[site], ring)
            } else {
                ring
            };
            regions.push(Region::from_ring(site, ring, boundary));
        }
        debug!("regions assembled: {} kept, {} discarded", regions.len(), discarded);

        Ok(BoundedDualMesh {
            mesh: DualMesh::from_regions(regions, discarded, &dual),
            points_sampled: samples.points.len(),
            sampling_attempts: samples.attempts,
            final_min_distance: samples.min_distance,
            ghost_triangles: ghosted.num_ghost_triangles(),
        })
    }
}

/// Order a hull point's dual vertices by angle, starting after the gap that
/// faces out of the hull, and close the ring with the point itself
fn close_fan(site: Point, ring: Vec<Point>) -> Vec<Point> {
    let mut by_angle: Vec<(f64, Point)> = ring
        .into_iter()
        .map(|p| {
            let d = p - site;
            (d.y.atan2(d.x), p)
        })
        .collect();
    by_angle.sort_by(|a, b| a.0.total_cmp(&b.0));

    if let (Some(first), Some(last)) = (by_angle.first(), by_angle.last()) {
        let mut widest = (first.0 + TAU - last.0, 0);
        for i in 1..by_angle.len() {
            let gap = by_angle[i].0 - by_angle[i - 1].0;
            if gap > widest.0 {
                widest = (gap, i);
            }
        }
        by_angle.rotate_left(widest.1);
    }

    let mut fan: Vec<Point> = by_angle.into_iter().map(|(_, p)| p).collect();
    fan.push(site);
    fan
}

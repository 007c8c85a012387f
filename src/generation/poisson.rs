//! Poisson-disc sampling restricted to a polygon
//!
//! Bridson's active-list algorithm over the polygon's bounding box. A uniform
//! grid with cell size `min_distance / √2` holds at most one accepted point
//! per cell, so a 5×5 neighbourhood covers every point that could be closer
//! than `min_distance`.

use log::debug;
use rand::Rng;
use std::f64::consts::{SQRT_2, TAU};

use crate::error::{MapError, Result};
use crate::geometry::{point_in_scaled_polygon, Point, Rect};

/// Default number of candidates drawn around each active point
pub const DEFAULT_MAX_TRIES: usize = 30;

/// Attempts allowed for drawing the random seed point
const MAX_SEED_ATTEMPTS: usize = 1_000;

/// Poisson-disc sampler over the interior of a simple polygon
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use rust_sector_map::generation::PolygonPoissonSampler;
/// use rust_sector_map::Point;
///
/// let square = [
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
/// ];
/// let sampler = PolygonPoissonSampler::new(&square, 1.5, 100).unwrap();
/// let points = sampler.sample(&mut ChaCha8Rng::seed_from_u64(1)).unwrap();
/// assert!(!points.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct PolygonPoissonSampler {
    vertices: Vec<Point>,
    bounds: Rect,
    /// Exact bounding-box corners, `bounds.max()` may round below `p1`
    p0: Point,
    p1: Point,
    center: Point,
    min_distance: f64,
    max_points: usize,
    poly_scale: f64,
    max_tries: usize,
    cell_size: f64,
    grid_width: usize,
    grid_height: usize,
    /// Index into `points` per grid cell, sampled points only
    grid: Vec<Option<usize>>,
    /// Pre-seeded points lead `points` and are checked without the grid
    fixed: usize,
    /// Indices into `points` still able to spawn neighbours
    active: Vec<usize>,
    points: Vec<Point>,
}

impl PolygonPoissonSampler {
    /// Create a sampler for `vertices` with no scaling and the default try count
    ///
    /// # Errors
    ///
    /// `InvalidPolygon` for fewer than three vertices or a flat bounding box,
    /// `InvalidConfig` for a non-positive minimum distance.
    pub fn new(vertices: &[Point], min_distance: f64, max_points: usize) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(MapError::InvalidPolygon(format!(
                "polygon needs at least 3 vertices (got {})",
                vertices.len()
            )));
        }
        if !(min_distance > 0.0) || !min_distance.is_finite() {
            return Err(MapError::InvalidConfig(format!(
                "minimum distance must be positive (got {})",
                min_distance
            )));
        }
        let (p0, p1) = vertices
            .iter()
            .fold((vertices[0], vertices[0]), |(p0, p1), v| (p0.min(*v), p1.max(*v)));
        let bounds = Rect::new(p0.x, p0.y, p1.x - p0.x, p1.y - p0.y);
        if !(bounds.width > 0.0 && bounds.height > 0.0) || !bounds.width.is_finite() || !bounds.height.is_finite() {
            return Err(MapError::InvalidPolygon("polygon bounding box has no area".into()));
        }

        let cell_size = min_distance / SQRT_2;
        let grid_width = (bounds.width / cell_size) as usize + 1;
        let grid_height = (bounds.height / cell_size) as usize + 1;

        Ok(Self {
            vertices: vertices.to_vec(),
            center: bounds.center(),
            bounds,
            p0,
            p1,
            min_distance,
            max_points,
            poly_scale: 1.0,
            max_tries: DEFAULT_MAX_TRIES,
            cell_size,
            grid_width,
            grid_height,
            grid: vec![None; grid_width * grid_height],
            fixed: 0,
            active: Vec::new(),
            points: Vec::new(),
        })
    }

    /// Shrink (or grow) the admissible polygon about its bounding-box centre
    pub fn poly_scale(mut self, scale: f64) -> Self {
        self.poly_scale = scale;
        self
    }

    /// Candidates drawn around an active point before it is retired
    pub fn max_tries(mut self, tries: usize) -> Self {
        self.max_tries = tries.max(1);
        self
    }

    /// Get the minimum distance between sampled points
    #[inline]
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Get the bounding box of the polygon
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Pre-seed a fixed point without distance or containment checks
    ///
    /// Pre-seeded points may lie closer together than the minimum distance;
    /// sampled points keep their distance from every one of them.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the point lies outside the polygon's bounding box.
    pub fn add_point(&mut self, p: Point) -> Result<()> {
        let inside = p.x >= self.p0.x && p.x <= self.p1.x && p.y >= self.p0.y && p.y <= self.p1.y;
        if !inside {
            return Err(MapError::OutOfBounds { x: p.x, y: p.y });
        }
        self.points.push(p);
        self.active.push(self.points.len() - 1);
        self.fixed = self.points.len();
        Ok(())
    }

    /// Run the sampler and return every accepted point, pre-seeded ones first
    ///
    /// # Errors
    ///
    /// `InsufficientSamples` if no seed point inside the scaled polygon could
    /// be found and nothing was pre-seeded.
    pub fn sample<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<Vec<Point>> {
        if self.points.len() < self.max_points {
            self.add_seed_point(rng)?;
        }

        while !self.active.is_empty() && self.points.len() < self.max_points {
            let list_index = rng.gen_range(0..self.active.len());
            let origin = self.points[self.active[list_index]];

            let mut found = false;
            for _ in 0..self.max_tries {
                if self.points.len() >= self.max_points {
                    break;
                }
                found |= self.try_candidate(origin, rng);
            }

            if !found {
                self.active.remove(list_index);
            }
        }

        debug!(
            "poisson sampler: {} points at min distance {:.4}",
            self.points.len(),
            self.min_distance
        );
        Ok(self.points)
    }

    fn add_seed_point<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        for _ in 0..MAX_SEED_ATTEMPTS {
            let p = Point::new(
                self.p0.x + self.bounds.width * rng.gen::<f64>(),
                self.p0.y + self.bounds.height * rng.gen::<f64>(),
            );
            if self.in_scaled_polygon(p) && !self.too_close(p) {
                self.push(p);
                return Ok(());
            }
        }

        if self.points.is_empty() {
            Err(MapError::InsufficientSamples {
                found: 0,
                required: 1,
            })
        } else {
            debug!("poisson sampler: no free seed point, growing from pre-seeded points");
            Ok(())
        }
    }

    /// Draw one candidate in the annulus around `origin`; true if it was accepted
    fn try_candidate<R: Rng + ?Sized>(&mut self, origin: Point, rng: &mut R) -> bool {
        let radius = self.min_distance + self.min_distance * rng.gen::<f64>();
        let angle = TAU * rng.gen::<f64>();
        let candidate = origin + Point::new(radius * angle.sin(), radius * angle.cos());

        let (min, max) = (self.p0, self.p1);
        let in_box = candidate.x >= min.x && candidate.x < max.x && candidate.y > min.y && candidate.y < max.y;
        if !in_box || !self.in_scaled_polygon(candidate) || self.too_close(candidate) {
            return false;
        }

        self.push(candidate);
        true
    }

    fn push(&mut self, p: Point) {
        let (gx, gy) = self.grid_cell(p);
        self.points.push(p);
        let index = self.points.len() - 1;
        self.active.push(index);
        self.grid[gy * self.grid_width + gx] = Some(index);
    }

    fn grid_cell(&self, p: Point) -> (usize, usize) {
        let gx = ((p.x - self.p0.x) / self.cell_size) as usize;
        let gy = ((p.y - self.p0.y) / self.cell_size) as usize;
        (gx.min(self.grid_width - 1), gy.min(self.grid_height - 1))
    }

    fn in_scaled_polygon(&self, p: Point) -> bool {
        point_in_scaled_polygon(&self.vertices, p, self.center, self.poly_scale)
    }

    /// Whether a pre-seeded point, or an accepted point in the 5×5
    /// neighbourhood, is closer than the minimum distance
    fn too_close(&self, p: Point) -> bool {
        if self.points[..self.fixed].iter().any(|q| q.distance(p) < self.min_distance) {
            return true;
        }

        let (gx, gy) = self.grid_cell(p);
        let x_range = gx.saturating_sub(2)..(gx + 3).min(self.grid_width);
        for i in x_range {
            for j in gy.saturating_sub(2)..(gy + 3).min(self.grid_height) {
                if let Some(index) = self.grid[j * self.grid_width + i] {
                    if self.points[index].distance(p) < self.min_distance {
                        return true;
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point_in_polygon;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    fn hexagon(radius: f64) -> Vec<Point> {
        (0..6)
            .map(|i| {
                let angle = i as f64 * TAU / 6.0;
                Point::new(radius * angle.cos() + 50.0, radius * angle.sin() - 20.0)
            })
            .collect()
    }

    #[test]
    fn test_pairwise_distance_over_many_seeds() {
        let poly = hexagon(20.0);
        for seed in 0..25 {
            let sampler = PolygonPoissonSampler::new(&poly, 2.5, 500).unwrap();
            let points = sampler.sample(&mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            assert!(points.len() > 10, "seed {} produced {} points", seed, points.len());

            for i in 0..points.len() {
                for j in (i + 1)..points.len() {
                    let d = points[i].distance(points[j]);
                    assert!(d >= 2.5, "seed {}: points {} and {} are {} apart", seed, i, j, d);
                }
            }
        }
    }

    #[test]
    fn test_points_inside_scaled_polygon() {
        let poly = hexagon(20.0);
        let center = Rect::from_points(&poly).unwrap().center();
        for seed in 0..10 {
            let sampler = PolygonPoissonSampler::new(&poly, 2.0, 400)
                .unwrap()
                .poly_scale(0.75);
            let points = sampler.sample(&mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            for p in &points {
                assert!(point_in_scaled_polygon(&poly, *p, center, 0.75));
                assert!(point_in_polygon(&poly, *p));
            }
        }
    }

    #[test]
    fn test_max_points_is_a_cap() {
        let sampler = PolygonPoissonSampler::new(&square(100.0), 1.0, 50).unwrap();
        let points = sampler.sample(&mut ChaCha8Rng::seed_from_u64(11)).unwrap();
        assert_eq!(points.len(), 50);
    }

    #[test]
    fn test_preseeded_vertices_come_first() {
        let poly = square(10.0);
        let mut sampler = PolygonPoissonSampler::new(&poly, 3.0, 20).unwrap().poly_scale(0.75);
        for v in &poly {
            sampler.add_point(*v).unwrap();
        }
        let points = sampler.sample(&mut ChaCha8Rng::seed_from_u64(316)).unwrap();

        assert_eq!(&points[..4], &poly[..]);
        assert!(points.len() <= 20);
        // Sampled points keep their distance from the seeded corners too
        for p in &points[4..] {
            for v in &poly {
                assert!(p.distance(*v) >= 3.0);
            }
        }
    }

    #[test]
    fn test_add_point_outside_bounds() {
        let mut sampler = PolygonPoissonSampler::new(&square(10.0), 1.0, 20).unwrap();
        assert!(matches!(
            sampler.add_point(Point::new(11.0, 5.0)),
            Err(MapError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_add_point_accepts_every_vertex() {
        // min + (max - min) rounds below max on this x range
        let poly = [
            Point::new(-266.06917936391477, 0.0),
            Point::new(133.08026430495428, 0.0),
            Point::new(0.0, 100.0),
        ];
        let mut sampler = PolygonPoissonSampler::new(&poly, 10.0, 64).unwrap();
        for v in &poly {
            sampler.add_point(*v).unwrap();
        }
        let points = sampler.sample(&mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert_eq!(&points[..3], &poly[..]);
    }

    #[test]
    fn test_close_preseeded_points_both_keep_their_distance() {
        // Two corners share a grid cell at this minimum distance
        let poly = [
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(20.0, 10.0),
            Point::new(0.0, 20.0),
        ];
        for seed in 0..20 {
            let mut sampler = PolygonPoissonSampler::new(&poly, 4.0, 200).unwrap();
            for v in &poly {
                sampler.add_point(*v).unwrap();
            }
            let points = sampler.sample(&mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            for p in &points[4..] {
                for v in &poly {
                    assert!(p.distance(*v) >= 4.0, "seed {}: {:?} is {} from {:?}", seed, p, p.distance(*v), v);
                }
            }
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            PolygonPoissonSampler::new(&square(10.0)[..2], 1.0, 10),
            Err(MapError::InvalidPolygon(_))
        ));
        assert!(matches!(
            PolygonPoissonSampler::new(&square(10.0), 0.0, 10),
            Err(MapError::InvalidConfig(_))
        ));
        let flat = [Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(9.0, 0.0)];
        assert!(matches!(
            PolygonPoissonSampler::new(&flat, 1.0, 10),
            Err(MapError::InvalidPolygon(_))
        ));
    }

    #[test]
    fn test_sampler_determinism() {
        let poly = hexagon(15.0);
        let run = |seed| {
            PolygonPoissonSampler::new(&poly, 1.5, 300)
                .unwrap()
                .sample(&mut ChaCha8Rng::seed_from_u64(seed))
                .unwrap()
        };
        assert_eq!(run(4), run(4));
        assert_ne!(run(4), run(5));
    }
}

//! Radially weighted disc point distribution
//!
//! A seed ring on the disc edge, a forced origin, then rejection-sampled
//! interior points honouring a minimum distance. Each interior slot has a
//! bounded retry budget; a slot that runs out is skipped rather than looping
//! forever.

use log::{debug, warn};
use rand::Rng;
use std::f64::consts::TAU;

use super::GeneratedPoints;
use crate::error::{MapError, Result};
use crate::geometry::{Point, Rect};
use crate::spatial::SpatialIndex;

/// Default per-slot retry budget
pub const DEFAULT_MAX_RETRIES: usize = 42;

/// Parameters for [`generate_disc_points`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscOptions {
    /// Total number of slots, including the seed ring and the origin
    pub num_points: usize,
    /// Disc radius
    pub radius: f64,
    /// Minimum distance between any two interior points and their neighbours
    pub min_distance: f64,
    /// Points evenly spaced on the disc edge
    pub boundary_points: usize,
    /// Rejected candidates allowed per slot before it stalls
    pub max_retries: usize,
}

impl DiscOptions {
    /// Create options with the default retry budget
    pub fn new(num_points: usize, radius: f64, min_distance: f64, boundary_points: usize) -> Self {
        Self {
            num_points,
            radius,
            min_distance,
            boundary_points,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.radius > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "disc radius must be positive (got {})",
                self.radius
            )));
        }
        if self.min_distance < 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "minimum distance must be >= 0 (got {})",
                self.min_distance
            )));
        }
        if self.max_retries == 0 {
            return Err(MapError::InvalidConfig("max_retries must be at least 1".into()));
        }
        Ok(())
    }
}

/// Which of the two uniform draws are refreshed on the next attempt
#[derive(Debug, Clone, Copy)]
struct Redraw {
    angle: bool,
    radius: bool,
}

/// Generate a disc of points with a minimum spacing
///
/// `weight` maps a uniform draw in `[0, 1)` to a normalised radius, biasing
/// the radial density; it should stay within `[0, 1]`.
///
/// # Errors
///
/// `InvalidConfig` for bad options, `OutOfBounds` if `weight` pushes a
/// candidate outside the disc's bounding square. Stalled slots are not
/// errors: they are logged and counted in [`GeneratedPoints::discarded`].
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use rust_sector_map::generation::{generate_disc_points, DiscOptions};
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let options = DiscOptions::new(100, 50.0, 2.0, 16);
/// let generated = generate_disc_points(&options, |u| u.sqrt(), &mut rng).unwrap();
/// assert!(generated.points.len() <= 100);
/// ```
pub fn generate_disc_points<F, R>(options: &DiscOptions, weight: F, rng: &mut R) -> Result<GeneratedPoints>
where
    F: Fn(f64) -> f64,
    R: Rng + ?Sized,
{
    options.validate()?;

    let radius = options.radius;
    let mut index = SpatialIndex::new(Rect::centered(Point::ZERO, radius));
    let mut points = Vec::with_capacity(options.num_points.max(options.boundary_points + 1));

    let step = TAU / options.boundary_points.max(1) as f64;
    for n in 0..options.boundary_points {
        let angle = step * n as f64;
        let p = Point::new(angle.sin() * radius, angle.cos() * radius);
        index.insert(p)?;
        points.push(p);
    }

    index.insert(Point::ZERO)?;
    points.push(Point::ZERO);

    let mut discarded = 0;
    for slot in points.len()..options.num_points {
        match place_point(slot, options, &weight, &index, rng) {
            Ok(p) => {
                index.insert(p)?;
                points.push(p);
            }
            Err(err @ MapError::GenerationStalled { .. }) => {
                warn!("{}", err);
                discarded += 1;
            }
            Err(err) => return Err(err),
        }
    }

    debug!(
        "disc generator: {} points placed, {} slots stalled",
        points.len(),
        discarded
    );

    Ok(GeneratedPoints { points, discarded })
}

/// Draw candidates for one slot until one clears the minimum distance
fn place_point<F, R>(
    slot: usize,
    options: &DiscOptions,
    weight: &F,
    index: &SpatialIndex,
    rng: &mut R,
) -> Result<Point>
where
    F: Fn(f64) -> f64,
    R: Rng + ?Sized,
{
    let mut redraw = Redraw { angle: true, radius: true };
    let (mut u_angle, mut u_radius) = (0.0, 0.0);

    for attempt in 0..options.max_retries {
        if redraw.angle {
            u_angle = rng.gen::<f64>();
        }
        if redraw.radius {
            u_radius = rng.gen::<f64>();
        }

        let angle = u_angle * TAU;
        let r = weight(u_radius) * options.radius;
        let candidate = Point::new(angle.sin() * r, angle.cos() * r);

        if !index.bounds().contains(candidate) {
            return Err(MapError::OutOfBounds {
                x: candidate.x,
                y: candidate.y,
            });
        }
        if !index.has_point_within(candidate, options.min_distance) {
            return Ok(candidate);
        }

        redraw = if attempt == 0 {
            // Keep the direction, try another distance
            Redraw { angle: false, radius: true }
        } else {
            Redraw {
                angle: !redraw.angle,
                radius: !redraw.radius,
            }
        };
    }

    Err(MapError::GenerationStalled {
        slot,
        retries: options.max_retries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn min_pairwise_distance(points: &[Point]) -> f64 {
        let mut min = f64::INFINITY;
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                min = min.min(points[i].distance(points[j]));
            }
        }
        min
    }

    #[test]
    fn test_seed_ring_and_origin() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let options = DiscOptions::new(40, 100.0, 5.0, 8);
        let generated = generate_disc_points(&options, |u| u, &mut rng).unwrap();

        // First boundary point sits at angle 0: (sin 0, cos 0) * r
        assert!((generated.points[0] - Point::new(0.0, 100.0)).length() < 1e-9);
        for p in &generated.points[..8] {
            assert!((p.length() - 100.0).abs() < 1e-9);
        }
        assert_eq!(generated.points[8], Point::ZERO);
    }

    #[test]
    fn test_interior_points_respect_min_distance() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let options = DiscOptions::new(200, 100.0, 4.0, 24);
        let generated = generate_disc_points(&options, |u| u.sqrt(), &mut rng).unwrap();

        assert_eq!(generated.points.len() + generated.discarded, 200);
        // Seed ring spacing is 2 * 100 * sin(pi / 24) ~= 26, well above the minimum
        assert!(min_pairwise_distance(&generated.points) >= 4.0);
        for p in &generated.points {
            assert!(p.length() <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn test_crowded_disc_stalls_instead_of_looping() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut options = DiscOptions::new(500, 10.0, 5.0, 6);
        options.max_retries = 10;
        let generated = generate_disc_points(&options, |u| u, &mut rng).unwrap();

        assert!(generated.discarded > 0);
        assert!(generated.points.len() < 500);
        assert_eq!(generated.points.len() + generated.discarded, 500);
    }

    #[test]
    fn test_weight_outside_unit_range_is_out_of_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let options = DiscOptions::new(20, 10.0, 1.0, 4);
        let result = generate_disc_points(&options, |_| 2.0, &mut rng);
        assert!(matches!(result, Err(MapError::OutOfBounds { .. })));
    }

    #[test]
    fn test_invalid_options() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let options = DiscOptions::new(20, 0.0, 1.0, 4);
        assert!(matches!(
            generate_disc_points(&options, |u| u, &mut rng),
            Err(MapError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_disc_determinism() {
        let options = DiscOptions::new(150, 80.0, 3.0, 20);
        let a = generate_disc_points(&options, |u| u, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let b = generate_disc_points(&options, |u| u, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }
}

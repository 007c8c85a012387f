//! Deterministic ring and spiral-arm point layout
//!
//! Families of concentric ellipses, each ring slightly larger and rotated
//! relative to the previous one. Two families with swapped radii form
//! counter-rotating spiral arms over a base of near-circular rings.
//!
//! The layout uses no randomness; an optional minimum distance thins it in a
//! single pass.

use log::debug;
use std::f64::consts::TAU;

use super::GeneratedPoints;
use crate::error::{MapError, Result};
use crate::geometry::{Point, Rect};
use crate::spatial::SpatialIndex;

/// One family of concentric ellipses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseFamily {
    /// Multiplier applied to both radii from one ring to the next
    pub radius_step: f64,
    /// Number of rings
    pub num_steps: usize,
    /// Point budget shared between the rings
    pub max_points: f64,
    pub start_radius_x: f64,
    pub start_radius_y: f64,
}

impl EllipseFamily {
    /// Create a family of concentric ellipses
    pub const fn new(
        radius_step: f64,
        num_steps: usize,
        max_points: f64,
        start_radius_x: f64,
        start_radius_y: f64,
    ) -> Self {
        Self {
            radius_step,
            num_steps,
            max_points,
            start_radius_x,
            start_radius_y,
        }
    }

    /// Generate every ring of the family in order
    pub fn points(&self) -> Vec<Point> {
        concentric_ellipses(
            self.radius_step,
            self.num_steps,
            self.max_points,
            self.start_radius_x,
            self.start_radius_y,
        )
    }
}

/// The families making up the sector layout: two ring bases, then the two spiral arms
pub const SPIRAL_FAMILIES: [EllipseFamily; 4] = [
    EllipseFamily::new(1.05045, 64, 512.0, 36.0, 36.0),
    EllipseFamily::new(1.0983, 31, 512.0, 48.0, 48.0),
    EllipseFamily::new(1.095, 32, 768.0, 48.0, 27.0),
    EllipseFamily::new(1.095, 32, 768.0, 27.0, 48.0),
];

/// Points on a rotated ellipse
///
/// `num_points` may be fractional; the angle advances by `2π / num_points`
/// until it reaches `2π`, so the count is whatever the accumulation yields.
pub fn ellipse_points(radius_x: f64, radius_y: f64, rotation: f64, num_points: f64) -> Vec<Point> {
    let theta_step = TAU / num_points;
    let (sin_rot, cos_rot) = rotation.sin_cos();
    let mut points = Vec::with_capacity(num_points.ceil().max(0.0) as usize + 1);

    let mut theta = 0.0;
    while theta < TAU {
        let (sin_t, cos_t) = theta.sin_cos();
        points.push(Point::new(
            radius_x * cos_t * cos_rot - radius_y * sin_t * sin_rot,
            radius_x * cos_t * sin_rot + radius_y * sin_t * cos_rot,
        ));
        theta += theta_step;
    }
    points
}

/// Rings of growing, progressively rotated ellipses
///
/// Ring 0 is unrotated with `max_points / (num_steps + 1)` points; ring `i + 1`
/// is scaled by `radius_step` again, rotated by `(i + 1) · 2π / num_steps`,
/// and gets `max_points / (num_steps + 1 - i)` points, so outer rings are denser.
pub fn concentric_ellipses(
    radius_step: f64,
    num_steps: usize,
    max_points: f64,
    start_radius_x: f64,
    start_radius_y: f64,
) -> Vec<Point> {
    if num_steps == 0 {
        return Vec::new();
    }

    let rotation_step = TAU / num_steps as f64;
    let (mut radius_x, mut radius_y) = (start_radius_x, start_radius_y);
    let steps = num_steps as f64;

    let mut points = ellipse_points(radius_x, radius_y, 0.0, max_points / (steps + 1.0));
    for i in 0..num_steps - 1 {
        radius_x *= radius_step;
        radius_y *= radius_step;
        let i = i as f64;
        points.extend(ellipse_points(
            radius_x,
            radius_y,
            rotation_step * (i + 1.0),
            max_points / (steps + 1.0 - i),
        ));
    }
    points
}

/// Generate the spiral sector layout
///
/// The origin always comes first. With `min_distance > 0` every later point
/// closer than `min_distance` to an already accepted point is dropped; earlier
/// points win and nothing is resampled.
///
/// # Example
///
/// ```
/// use rust_sector_map::generation::generate_spiral_points;
/// use rust_sector_map::Point;
///
/// let generated = generate_spiral_points(0.0).unwrap();
/// assert_eq!(generated.points[0], Point::ZERO);
/// assert_eq!(generated.discarded, 0);
/// ```
pub fn generate_spiral_points(min_distance: f64) -> Result<GeneratedPoints> {
    if min_distance < 0.0 || min_distance.is_nan() {
        return Err(MapError::InvalidConfig(format!(
            "minimum distance must be >= 0 (got {})",
            min_distance
        )));
    }

    let mut layout = vec![Point::ZERO];
    for family in SPIRAL_FAMILIES.iter() {
        layout.extend(family.points());
    }

    if min_distance == 0.0 {
        debug!("spiral generator: {} points, no thinning", layout.len());
        return Ok(GeneratedPoints {
            points: layout,
            discarded: 0,
        });
    }

    let bounds = Rect::from_points(&layout)
        .map(|r| r.expanded(min_distance))
        .ok_or_else(|| MapError::InvalidConfig("spiral layout is empty".into()))?;
    let mut index = SpatialIndex::new(bounds);

    let mut points = Vec::with_capacity(layout.len());
    let mut discarded = 0;
    for p in layout {
        if index.has_point_within(p, min_distance) {
            discarded += 1;
            continue;
        }
        index.insert(p)?;
        points.push(p);
    }

    debug!(
        "spiral generator: {} points kept, {} dropped at min distance {}",
        points.len(),
        discarded,
        min_distance
    );

    Ok(GeneratedPoints { points, discarded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Reproduces the angle accumulation to count points without building them
    fn ring_count(num_points: f64) -> usize {
        let step = TAU / num_points;
        let mut theta = 0.0;
        let mut count = 0;
        while theta < TAU {
            count += 1;
            theta += step;
        }
        count
    }

    fn family_count(family: &EllipseFamily) -> usize {
        let steps = family.num_steps as f64;
        let mut count = ring_count(family.max_points / (steps + 1.0));
        for i in 0..family.num_steps - 1 {
            count += ring_count(family.max_points / (steps + 1.0 - i as f64));
        }
        count
    }

    #[test]
    fn test_ellipse_points_unrotated_circle() {
        let points = ellipse_points(10.0, 10.0, 0.0, 4.0);
        assert_eq!(points.len(), 4);
        assert_relative_eq!(points[0].x, 10.0);
        assert_relative_eq!(points[0].y, 0.0);
        assert_relative_eq!(points[1].y, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ellipse_points_fractional_count() {
        // 2.5 points per turn: angles 0, 0.4τ, 0.8τ
        assert_eq!(ellipse_points(1.0, 1.0, 0.0, 2.5).len(), 3);
    }

    #[test]
    fn test_ellipse_rotation() {
        let points = ellipse_points(2.0, 1.0, std::f64::consts::FRAC_PI_2, 4.0);
        // The long axis now points along +y
        assert_relative_eq!(points[0].x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(points[0].y, 2.0);
    }

    #[test]
    fn test_concentric_ellipses_grow() {
        let points = concentric_ellipses(2.0, 3, 40.0, 1.0, 1.0);
        let max_len = points.iter().map(|p| p.length()).fold(0.0, f64::max);
        assert_relative_eq!(max_len, 4.0, epsilon = 1e-9);
        assert!(concentric_ellipses(2.0, 0, 40.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_spiral_without_min_distance() {
        let generated = generate_spiral_points(0.0).unwrap();
        let expected: usize = 1 + SPIRAL_FAMILIES.iter().map(family_count).sum::<usize>();

        assert_eq!(generated.points.len(), expected);
        assert_eq!(generated.discarded, 0);

        let flat = crate::geometry::flatten_points(&generated.points);
        assert_eq!(&flat[..2], &[0.0, 0.0]);
        assert_eq!(flat.len(), expected * 2);
    }

    #[test]
    fn test_spiral_thinning_respects_min_distance() {
        let full = generate_spiral_points(0.0).unwrap();
        let thinned = generate_spiral_points(6.0).unwrap();

        assert_eq!(thinned.points[0], Point::ZERO);
        assert!(thinned.discarded > 0);
        assert_eq!(thinned.points.len() + thinned.discarded, full.points.len());

        for (i, p) in thinned.points.iter().enumerate() {
            for q in &thinned.points[i + 1..] {
                assert!(p.distance(*q) >= 6.0);
            }
        }
    }

    #[test]
    fn test_spiral_is_deterministic() {
        assert_eq!(generate_spiral_points(4.0), generate_spiral_points(4.0));
    }

    #[test]
    fn test_negative_min_distance() {
        assert!(matches!(
            generate_spiral_points(-1.0),
            Err(MapError::InvalidConfig(_))
        ));
    }
}

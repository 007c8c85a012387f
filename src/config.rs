//! Sector Map Configuration and Builder
//!
//! Configuration types for deterministic two-level sector map generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::mesh::{DualVertexRule, DEFAULT_POLY_SCALE, MIN_SAMPLED_POINTS};

/// Default spacing of the spiral layout
pub const DEFAULT_SPIRAL_MIN_DISTANCE: f64 = 6.0;

/// Radial density presets for the disc layout
///
/// Maps a uniform draw `u` in `[0, 1)` to a normalised radius. `Linear`
/// crowds points towards the centre, `Sqrt` spreads them evenly over the
/// disc area.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RadialWeight {
    Linear,
    #[default]
    Sqrt,
    /// `u^exponent`
    Power(f64),
}

impl RadialWeight {
    /// Map a uniform draw in `[0, 1)` to a radius fraction
    #[inline]
    pub fn apply(self, u: f64) -> f64 {
        match self {
            RadialWeight::Linear => u,
            RadialWeight::Sqrt => u.sqrt(),
            RadialWeight::Power(exponent) => u.powf(exponent),
        }
    }
}

/// How the top-level sector points are laid out
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointLayout {
    /// Fixed concentric-ellipse spiral, thinned to a minimum spacing
    Spiral {
        min_distance: f64,
    },
    /// Random disc with a seed ring on its edge
    Disc {
        /// Total slots, ring and origin included
        num_points: usize,
        radius: f64,
        min_distance: f64,
        /// Points evenly spaced on the disc edge
        boundary_points: usize,
        weight: RadialWeight,
    },
}

impl PointLayout {
    fn validate(&self) -> Result<()> {
        match *self {
            PointLayout::Spiral { min_distance } => {
                if !(min_distance >= 0.0) || !min_distance.is_finite() {
                    return Err(MapError::InvalidConfig(format!(
                        "spiral min_distance must be finite and >= 0 (got {})",
                        min_distance
                    )));
                }
            }
            PointLayout::Disc {
                num_points,
                radius,
                min_distance,
                boundary_points,
                weight,
            } => {
                if num_points < 3 {
                    return Err(MapError::InvalidConfig(format!(
                        "disc needs at least 3 points (got {})",
                        num_points
                    )));
                }
                if boundary_points >= num_points {
                    return Err(MapError::InvalidConfig(format!(
                        "boundary_points ({}) must be below num_points ({})",
                        boundary_points, num_points
                    )));
                }
                if !(radius > 0.0) || !radius.is_finite() {
                    return Err(MapError::InvalidConfig(format!(
                        "disc radius must be positive (got {})",
                        radius
                    )));
                }
                if !(min_distance >= 0.0) {
                    return Err(MapError::InvalidConfig(format!(
                        "disc min_distance must be >= 0 (got {})",
                        min_distance
                    )));
                }
                if let RadialWeight::Power(exponent) = weight {
                    if !(exponent > 0.0) || !exponent.is_finite() {
                        return Err(MapError::InvalidConfig(format!(
                            "radial weight exponent must be positive (got {})",
                            exponent
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for PointLayout {
    fn default() -> Self {
        PointLayout::Spiral {
            min_distance: DEFAULT_SPIRAL_MIN_DISTANCE,
        }
    }
}

/// Parameters for the bounded meshes built inside each sector
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubsectorConfig {
    /// Subsector min distance is the sector's area divided by this
    pub area_divisor: f64,
    /// Point cap per sector, sector vertices included
    pub max_points: usize,
    /// Shrink factor of the sampling polygon
    pub poly_scale: f64,
    /// Candidates per active point in the Poisson sampler
    pub max_tries: usize,
    /// Fewest points a sampling round must yield
    pub min_points: usize,
}

impl SubsectorConfig {
    /// Minimum sampling distance for a sector of the given area
    #[inline]
    pub fn min_distance_for(&self, area: f64) -> f64 {
        area / self.area_divisor
    }

    fn validate(&self) -> Result<()> {
        if !(self.area_divisor > 0.0) || !self.area_divisor.is_finite() {
            return Err(MapError::InvalidConfig(format!(
                "area_divisor must be positive (got {})",
                self.area_divisor
            )));
        }
        if self.min_points < 3 || self.max_points < self.min_points {
            return Err(MapError::InvalidConfig(format!(
                "need 3 <= min_points <= max_points (got {} and {})",
                self.min_points, self.max_points
            )));
        }
        if !(self.poly_scale > 0.0 && self.poly_scale <= 1.0) {
            return Err(MapError::InvalidConfig(format!(
                "poly_scale must be in (0, 1] (got {})",
                self.poly_scale
            )));
        }
        if self.max_tries == 0 {
            return Err(MapError::InvalidConfig("max_tries must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for SubsectorConfig {
    fn default() -> Self {
        Self {
            area_divisor: 96.0,
            max_points: 64,
            poly_scale: DEFAULT_POLY_SCALE,
            max_tries: 30,
            min_points: MIN_SAMPLED_POINTS,
        }
    }
}

/// Configuration for deterministic sector map generation
///
/// The same configuration always produces the identical map, so only the
/// configuration needs to be stored or sent over the wire.
///
/// # Example
///
/// ```rust
/// use rust_sector_map::*;
///
/// let config = SectorMapConfigBuilder::new()
///     .seed(316)
///     .layout(PointLayout::Spiral { min_distance: 6.0 })
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: SectorMapConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorMapConfig {
    /// Seed of the ChaCha generator every random draw comes from
    pub seed: u64,

    /// Sector point layout
    pub layout: PointLayout,

    /// Subsector mesh parameters
    pub subsector: SubsectorConfig,

    /// Dual vertex choice for both levels
    pub dual_vertex_rule: DualVertexRule,

    /// Build subsector meshes inside every sector
    pub generate_subsectors: bool,
}

impl Default for SectorMapConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            layout: PointLayout::default(),
            subsector: SubsectorConfig::default(),
            dual_vertex_rule: DualVertexRule::default(),
            generate_subsectors: true,
        }
    }
}

/// Builder for creating [`SectorMapConfig`] with validation
#[derive(Debug, Clone)]
pub struct SectorMapConfigBuilder {
    seed: Option<u64>,
    layout: PointLayout,
    subsector: SubsectorConfig,
    dual_vertex_rule: DualVertexRule,
    generate_subsectors: bool,
}

impl SectorMapConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: random
    /// - layout: spiral with min distance 6
    /// - subsector: area / 96 spacing, at most 64 points
    /// - dual vertex rule: circumcenter when well inside the triangle
    /// - subsectors generated
    pub fn new() -> Self {
        Self {
            seed: None,
            layout: PointLayout::default(),
            subsector: SubsectorConfig::default(),
            dual_vertex_rule: DualVertexRule::default(),
            generate_subsectors: true,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the sector point layout
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for non-positive sizes, negative spacing or
    /// a ring that fills every slot.
    pub fn layout(mut self, layout: PointLayout) -> Result<Self> {
        layout.validate()?;
        self.layout = layout;
        Ok(self)
    }

    /// Set the subsector parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the divisor is not positive, the point
    /// bounds are inverted or `poly_scale` falls outside `(0, 1]`.
    pub fn subsector(mut self, subsector: SubsectorConfig) -> Result<Self> {
        subsector.validate()?;
        self.subsector = subsector;
        Ok(self)
    }

    /// Set how dual vertices are chosen at both levels
    pub fn dual_vertex_rule(mut self, rule: DualVertexRule) -> Self {
        self.dual_vertex_rule = rule;
        self
    }

    /// Enable or disable subsector generation
    pub fn generate_subsectors(mut self, enabled: bool) -> Self {
        self.generate_subsectors = enabled;
        self
    }

    /// Build the configuration, drawing a random seed if none was set
    pub fn build(self) -> Result<SectorMapConfig> {
        Ok(SectorMapConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            layout: self.layout,
            subsector: self.subsector,
            dual_vertex_rule: self.dual_vertex_rule,
            generate_subsectors: self.generate_subsectors,
        })
    }
}

impl Default for SectorMapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radial_weight() {
        assert_eq!(RadialWeight::Linear.apply(0.25), 0.25);
        assert_eq!(RadialWeight::Sqrt.apply(0.25), 0.5);
        assert_eq!(RadialWeight::Power(2.0).apply(0.5), 0.25);
    }

    #[test]
    fn test_builder_defaults() {
        let config = SectorMapConfigBuilder::new().build().unwrap();
        assert_eq!(config.layout, PointLayout::Spiral { min_distance: 6.0 });
        assert_eq!(config.subsector, SubsectorConfig::default());
        assert_eq!(config.subsector.area_divisor, 96.0);
        assert_eq!(config.subsector.max_points, 64);
        assert_eq!(config.dual_vertex_rule, DualVertexRule::PreferCircumcenter);
        assert!(config.generate_subsectors);
    }

    #[test]
    fn test_builder_custom() {
        let layout = PointLayout::Disc {
            num_points: 300,
            radius: 200.0,
            min_distance: 5.0,
            boundary_points: 32,
            weight: RadialWeight::Linear,
        };
        let config = SectorMapConfigBuilder::new()
            .seed(316)
            .layout(layout)
            .unwrap()
            .dual_vertex_rule(DualVertexRule::Centroid)
            .generate_subsectors(false)
            .build()
            .unwrap();

        assert_eq!(config.seed, 316);
        assert_eq!(config.layout, layout);
        assert_eq!(config.dual_vertex_rule, DualVertexRule::Centroid);
        assert!(!config.generate_subsectors);
    }

    #[test]
    fn test_invalid_layouts() {
        let negative = PointLayout::Spiral { min_distance: -1.0 };
        assert!(SectorMapConfigBuilder::new().layout(negative).is_err());

        let ring_only = PointLayout::Disc {
            num_points: 10,
            radius: 50.0,
            min_distance: 1.0,
            boundary_points: 10,
            weight: RadialWeight::Sqrt,
        };
        assert!(SectorMapConfigBuilder::new().layout(ring_only).is_err());

        let bad_exponent = PointLayout::Disc {
            num_points: 10,
            radius: 50.0,
            min_distance: 1.0,
            boundary_points: 4,
            weight: RadialWeight::Power(0.0),
        };
        assert!(matches!(
            SectorMapConfigBuilder::new().layout(bad_exponent),
            Err(MapError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_subsector() {
        let inverted = SubsectorConfig {
            max_points: 4,
            ..SubsectorConfig::default()
        };
        assert!(SectorMapConfigBuilder::new().subsector(inverted).is_err());

        let scale = SubsectorConfig {
            poly_scale: 1.5,
            ..SubsectorConfig::default()
        };
        assert!(SectorMapConfigBuilder::new().subsector(scale).is_err());
    }

    #[test]
    fn test_subsector_min_distance() {
        assert_eq!(SubsectorConfig::default().min_distance_for(960.0), 10.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = SectorMapConfigBuilder::new()
            .seed(12345)
            .layout(PointLayout::Disc {
                num_points: 100,
                radius: 80.0,
                min_distance: 3.0,
                boundary_points: 16,
                weight: RadialWeight::Power(0.7),
            })
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: SectorMapConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}

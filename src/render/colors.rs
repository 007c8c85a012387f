//! Color mapping for regions

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::mesh::DualMesh;
use crate::region::Region;

/// RGBA color type
pub type RegionColor = [f32; 4];

/// Trait for mapping regions to colors
///
/// The owning mesh is passed along so mappers can normalise against its
/// statistics.
pub trait ColorMapper {
    /// Color of `region`, a member of `mesh`
    fn map_color(&self, region: &Region, mesh: &DualMesh) -> RegionColor;
}

/// Shades of green by area: the largest region is brightest, the smallest black
#[derive(Debug, Clone, Copy, Default)]
pub struct AreaShadeMapper;

impl ColorMapper for AreaShadeMapper {
    fn map_color(&self, region: &Region, mesh: &DualMesh) -> RegionColor {
        let shade = mesh.normalized_area(region.area) as f32;
        [0.0, shade, 0.0, 1.0]
    }
}

/// Random but reproducible color per region
///
/// Each region draws from its own ChaCha stream, picked from its site and
/// centroid, so a region keeps its color no matter which other regions are
/// drawn. Sites restart at zero in every subsector mesh; the centroid keeps
/// those regions apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaletteColorMapper {
    pub seed: u64,
}

impl PaletteColorMapper {
    /// Create a mapper whose palette is fixed by `seed`
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl ColorMapper for PaletteColorMapper {
    fn map_color(&self, region: &Region, _mesh: &DualMesh) -> RegionColor {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(region_stream(region));
        [rng.gen(), rng.gen(), rng.gen(), 1.0]
    }
}

fn region_stream(region: &Region) -> u64 {
    let mut h = region.site as u64;
    for bits in [region.centroid.x.to_bits(), region.centroid.y.to_bits()] {
        h = (h ^ bits).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        h ^= h >> 32;
    }
    h
}

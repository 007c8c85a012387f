//! SectorMap main structure

use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SectorMapConfig;
use crate::error::Result;
use crate::generation::generate_layout_points;
use crate::geometry::Point;
use crate::mesh::{BoundedDualMesh, BoundedDualMeshBuilder, DelaunatorTriangulator, DualMesh, DualMeshBuilder, Triangulator};
use crate::region::Region;

#[cfg(feature = "region-lookup")]
use crate::locate::RegionLocator;

/// Random stream used for the sector level; subsector `i` uses stream `i + 1`
pub const SECTOR_STREAM: u64 = 0;

/// ChaCha generator for one stream of a seed
///
/// Streams of the same seed are independent, so every subsector can be
/// rebuilt on its own without replaying the ones before it.
pub fn stream_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// A two-level map: sector regions, each optionally tiled by subsectors
///
/// # Examples
///
/// ```
/// use rust_sector_map::*;
///
/// let config = SectorMapConfigBuilder::new()
///     .seed(316)
///     .layout(PointLayout::Disc {
///         num_points: 60,
///         radius: 100.0,
///         min_distance: 6.0,
///         boundary_points: 12,
///         weight: RadialWeight::Sqrt,
///     })
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let map = SectorMap::generate(config).unwrap();
/// println!("Generated {} sectors", map.sector_count());
///
/// if let Some(subsectors) = map.subsectors(0) {
///     println!("Sector 0 has {} subsectors", subsectors.region_count());
/// }
/// ```
#[derive(Clone)]
pub struct SectorMap {
    /// Configuration used to generate this map
    config: SectorMapConfig,

    /// Sector regions and their area statistics
    sectors: DualMesh,

    /// Bounded mesh per sector, `None` when disabled or when the sector could not be tiled
    subsectors: Vec<Option<BoundedDualMesh>>,

    /// Layout slots that produced no point
    layout_discarded: usize,

    /// Nearest-centroid lookup (requires region-lookup feature)
    #[cfg(feature = "region-lookup")]
    locator: Option<RegionLocator>,
}

impl SectorMap {
    /// Generate a map with the delaunator-backed triangulator
    pub fn generate(config: SectorMapConfig) -> Result<Self> {
        Self::generate_with_triangulator(config, &DelaunatorTriangulator)
    }

    /// Generate a map with a custom triangulator
    ///
    /// Sector points come from stream 0 of the configured seed, subsector `i`
    /// from stream `i + 1`.
    ///
    /// # Errors
    ///
    /// Layout generation and sector triangulation errors are returned. A
    /// sector whose subsector mesh fails is logged and left without one.
    pub fn generate_with_triangulator<T>(config: SectorMapConfig, triangulator: &T) -> Result<Self>
    where
        T: Triangulator + ?Sized,
    {
        let mut rng = stream_rng(config.seed, SECTOR_STREAM);
        let generated = generate_layout_points(&config.layout, &mut rng)?;

        let triangulation = triangulator.triangulate(&generated.points)?;
        let sectors = DualMeshBuilder::new(&triangulation)
            .dual_vertex_rule(config.dual_vertex_rule)
            .build()?;

        info!(
            "sector map: {} points, {} sectors ({} discarded), area {:.2}..{:.2}",
            generated.points.len(),
            sectors.region_count(),
            sectors.discarded,
            sectors.min_area,
            sectors.max_area
        );

        let subsectors: Vec<Option<BoundedDualMesh>> = if config.generate_subsectors {
            sectors
                .regions
                .iter()
                .enumerate()
                .map(|(index, sector)| match build_subsectors(&config, index, sector, triangulator) {
                    Ok(mesh) => Some(mesh),
                    Err(err) => {
                        warn!("sector {} left without subsectors: {}", index, err);
                        None
                    }
                })
                .collect()
        } else {
            vec![None; sectors.region_count()]
        };

        let map = Self {
            config,
            #[cfg(feature = "region-lookup")]
            locator: RegionLocator::new(&sectors.regions),
            sectors,
            subsectors,
            layout_discarded: generated.discarded,
        };

        if config.generate_subsectors {
            info!(
                "sector map: {} subsectors across {} sectors",
                map.subsector_count(),
                map.sector_count()
            );
        }

        Ok(map)
    }

    /// Get the configuration used to generate this map
    #[inline]
    pub fn config(&self) -> &SectorMapConfig {
        &self.config
    }

    /// Get the number of sectors
    #[inline]
    pub fn sector_count(&self) -> usize {
        self.sectors.region_count()
    }

    /// Get all sectors
    #[inline]
    pub fn sectors(&self) -> &[Region] {
        &self.sectors.regions
    }

    /// The sector-level dual mesh, including its statistics
    #[inline]
    pub fn sector_mesh(&self) -> &DualMesh {
        &self.sectors
    }

    /// Get a sector by index, `None` when out of range
    #[inline]
    pub fn get_sector(&self, index: usize) -> Option<&Region> {
        self.sectors.regions.get(index)
    }

    /// Subsector mesh of a sector
    ///
    /// `None` for an invalid index, when subsectors are disabled, or when the
    /// sector could not be tiled.
    pub fn subsectors(&self, index: usize) -> Option<&BoundedDualMesh> {
        self.subsectors.get(index).and_then(Option::as_ref)
    }

    /// Total number of subsector regions over all sectors
    pub fn subsector_count(&self) -> usize {
        self.subsectors.iter().flatten().map(|m| m.region_count()).sum()
    }

    /// Get the area of the smallest sector
    #[inline]
    pub fn min_area(&self) -> f64 {
        self.sectors.min_area
    }

    /// Get the area of the largest sector
    #[inline]
    pub fn max_area(&self) -> f64 {
        self.sectors.max_area
    }

    /// Layout slots that stalled or were thinned away
    #[inline]
    pub fn layout_discarded(&self) -> usize {
        self.layout_discarded
    }

    /// Find the sector whose polygon contains a point
    ///
    /// Exact point-in-polygon test over every sector, bounding boxes first.
    pub fn find_sector_containing(&self, p: Point) -> Option<usize> {
        self.sectors.regions.iter().position(|sector| {
            sector.bounds().is_some_and(|b| b.contains(p)) && sector.contains(p)
        })
    }

    /// Find the sector with the nearest centroid (requires region-lookup feature)
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_sector_map::*;
    /// # #[cfg(feature = "region-lookup")]
    /// # {
    /// # let config = SectorMapConfigBuilder::new().seed(1).generate_subsectors(false).build().unwrap();
    /// let map = SectorMap::generate(config).unwrap();
    /// let centroid = map.get_sector(0).unwrap().centroid;
    /// assert_eq!(map.find_nearest_sector(centroid), Some(0));
    /// # }
    /// ```
    #[cfg(feature = "region-lookup")]
    pub fn find_nearest_sector(&self, p: Point) -> Option<usize> {
        self.locator.as_ref().map(|locator| locator.find_nearest(p))
    }
}

/// Tile one sector with a bounded mesh on its own random stream
fn build_subsectors<T>(config: &SectorMapConfig, index: usize, sector: &Region, triangulator: &T) -> Result<BoundedDualMesh>
where
    T: Triangulator + ?Sized,
{
    let sub = &config.subsector;
    let mut rng = stream_rng(config.seed, index as u64 + 1);
    BoundedDualMeshBuilder::new(sector.world_vertices(), sub.min_distance_for(sector.area), sub.max_points)
        .poly_scale(sub.poly_scale)
        .max_tries(sub.max_tries)
        .min_points(sub.min_points)
        .dual_vertex_rule(config.dual_vertex_rule)
        .build(&mut rng, triangulator)
}

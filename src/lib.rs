//! Two-level 2D sector map generation
//!
//! A standalone library that scatters points, triangulates them and turns
//! the dual of the triangulation into polygonal regions ("sectors"). Each
//! sector can then be tiled again with a bounded dual mesh ("subsectors")
//! that covers it without gaps. Output is plain data, suitable for any
//! engine.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_sector_map::*;
//!
//! // Generate a map
//! let config = SectorMapConfigBuilder::new()
//!     .seed(316)
//!     .layout(PointLayout::Spiral { min_distance: 6.0 }).unwrap()
//!     .build().unwrap();
//!
//! let map = SectorMap::generate(config).unwrap();
//!
//! // Generate meshes for rendering
//! let sectors = generate_mesh(map.sector_mesh(), &AreaShadeMapper);
//! let subsectors = generate_subsector_mesh(&map, &PaletteColorMapper::new(316));
//! println!("{} + {} triangles", sectors.triangle_count(), subsectors.triangle_count());
//! ```
//!
//! # Features
//!
//! - `region-lookup` (default): nearest-sector lookups using a KD-tree
//! - `serde`: serialization support for configuration and regions

// Modules
pub mod config;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod map;
pub mod mesh;
pub mod region;
pub mod render;
pub mod spatial;

#[cfg(feature = "region-lookup")]
pub mod locate;

// Re-export core types for convenience
pub use config::{PointLayout, RadialWeight, SectorMapConfig, SectorMapConfigBuilder, SubsectorConfig};
pub use error::{MapError, Result};
pub use geometry::{Point, Rect};
pub use map::SectorMap;
pub use mesh::{
    BoundedDualMesh, BoundedDualMeshBuilder, DelaunatorTriangulator, DualMesh, DualMeshBuilder, DualVertexRule,
    Triangulation, Triangulator,
};
pub use region::Region;
pub use render::{
    generate_mesh, generate_subsector_mesh, AreaShadeMapper, ColorMapper, MeshData, PaletteColorMapper, RegionColor,
};
pub use spatial::SpatialIndex;

#[cfg(feature = "region-lookup")]
pub use locate::RegionLocator;

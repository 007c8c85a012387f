//! Mesh generation for dual meshes and sector maps
//!
//! Generates engine-agnostic triangle buffers from regions.

mod colors;

pub use colors::{AreaShadeMapper, ColorMapper, PaletteColorMapper, RegionColor};

use crate::geometry::Point;
use crate::map::SectorMap;
use crate::mesh::DualMesh;
use crate::region::Region;

/// Engine-agnostic mesh data output
///
/// Contains flat 2D vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - wgpu: Use directly as vertex buffers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions in world coordinates
    pub positions: Vec<[f32; 2]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<[f32; 4]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the mesh holds no vertices
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Generate a mesh for every region of a dual mesh
///
/// Interior regions become a triangle fan around their centroid. Boundary
/// regions already end with their site vertex and are fanned from it.
/// All vertices of a region share its color.
pub fn generate_mesh<C>(mesh: &DualMesh, color_mapper: &C) -> MeshData
where
    C: ColorMapper + ?Sized,
{
    let mut data = MeshData::default();
    append_regions(mesh, color_mapper, &mut data);
    data
}

/// Generate one mesh holding the subsectors of every sector of a map
pub fn generate_subsector_mesh<C>(map: &SectorMap, color_mapper: &C) -> MeshData
where
    C: ColorMapper + ?Sized,
{
    let mut data = MeshData::default();
    for index in 0..map.sector_count() {
        if let Some(subsectors) = map.subsectors(index) {
            append_regions(subsectors, color_mapper, &mut data);
        }
    }
    data
}

fn append_regions<C>(mesh: &DualMesh, color_mapper: &C, data: &mut MeshData)
where
    C: ColorMapper + ?Sized,
{
    for region in &mesh.regions {
        // Skip degenerate regions
        if region.vertex_count() < 3 {
            continue;
        }

        let color = color_mapper.map_color(region, mesh);
        if region.boundary {
            triangulate_boundary_region(region, color, data);
        } else {
            triangulate_interior_region(region, color, data);
        }
    }
}

#[inline]
fn to_f32(p: Point) -> [f32; 2] {
    [p.x as f32, p.y as f32]
}

fn push_vertex(data: &mut MeshData, p: Point, color: RegionColor) {
    data.positions.push(to_f32(p));
    data.colors.push(color);
}

/// Triangle fan from the centroid
fn triangulate_interior_region(region: &Region, color: RegionColor, data: &mut MeshData) {
    let base_idx = data.positions.len() as u32;

    push_vertex(data, region.centroid, color);
    for vertex in &region.vertices {
        push_vertex(data, *vertex + region.centroid, color);
    }

    let num_vertices = region.vertices.len();
    for i in 0..num_vertices {
        let next_i = (i + 1) % num_vertices;
        data.indices.push(base_idx);
        data.indices.push(base_idx + 1 + i as u32);
        data.indices.push(base_idx + 1 + next_i as u32);
    }
}

/// Triangle fan from the closing site vertex, skipping the wrap-around
/// triangle that would span the outside gap
fn triangulate_boundary_region(region: &Region, color: RegionColor, data: &mut MeshData) {
    let base_idx = data.positions.len() as u32;

    for vertex in &region.vertices {
        push_vertex(data, *vertex + region.centroid, color);
    }

    let n = region.vertices.len();
    let site = (n - 1) as u32;
    for i in 0..n - 2 {
        let next_i = ((i + 1) % (n - 1)) as u32;
        data.indices.push(base_idx + site);
        data.indices.push(base_idx + next_i);
        data.indices.push(base_idx + i as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PointLayout, RadialWeight, SectorMapConfigBuilder};

    fn small_map() -> SectorMap {
        let config = SectorMapConfigBuilder::new()
            .seed(42)
            .layout(PointLayout::Disc {
                num_points: 50,
                radius: 80.0,
                min_distance: 6.0,
                boundary_points: 12,
                weight: RadialWeight::Sqrt,
            })
            .unwrap()
            .build()
            .unwrap();
        SectorMap::generate(config).unwrap()
    }

    #[test]
    fn test_interior_fan() {
        let region = Region::from_ring(
            0,
            vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(2.0, 2.0),
                Point::new(0.0, 2.0),
            ],
            false,
        );
        let mesh = DualMesh {
            regions: vec![region],
            ..Default::default()
        };
        let data = generate_mesh(&mesh, &AreaShadeMapper);

        assert_eq!(data.vertex_count(), 5);
        assert_eq!(data.triangle_count(), 4);
        assert_eq!(data.positions[0], [1.0, 1.0]);
        assert_eq!(data.positions[1], [0.0, 0.0]);
        assert_eq!(&data.indices[9..], &[0, 4, 1]);
    }

    #[test]
    fn test_boundary_fan() {
        // Three dual vertices around a corner, then the corner itself
        let region = Region::from_ring(
            0,
            vec![
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 1.0),
                Point::new(0.0, 0.0),
            ],
            true,
        );
        let mesh = DualMesh {
            regions: vec![region],
            ..Default::default()
        };
        let data = generate_mesh(&mesh, &AreaShadeMapper);

        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.indices, vec![3, 1, 0, 3, 2, 1]);
    }

    #[test]
    fn test_generate_mesh() {
        let map = small_map();
        let data = generate_mesh(map.sector_mesh(), &AreaShadeMapper);

        assert!(!data.is_empty());
        assert!(data.triangle_count() > 0);
        assert_eq!(data.positions.len(), data.colors.len());
        assert_eq!(data.indices.len() % 3, 0);
        assert!(data.indices.iter().all(|&i| (i as usize) < data.vertex_count()));
    }

    #[test]
    fn test_generate_subsector_mesh() {
        let map = small_map();
        let data = generate_subsector_mesh(&map, &PaletteColorMapper::new(1));

        assert!(data.triangle_count() > map.subsector_count());
        assert_eq!(data.positions.len(), data.colors.len());
        assert!(data.indices.iter().all(|&i| (i as usize) < data.vertex_count()));
    }

    #[test]
    fn test_mesh_consistency() {
        let map = small_map();
        let a = generate_mesh(map.sector_mesh(), &AreaShadeMapper);
        let b = generate_mesh(map.sector_mesh(), &AreaShadeMapper);
        assert_eq!(a, b);
    }
}

//! The two-pass seamed mesh builder.
//!
//! Grid positions in a `verts_per_line × verts_per_line` heightfield are
//! classified into five kinds:
//!
//! - **skirt**: the outermost ring; off-mesh, feeds boundary normals only.
//! - **mesh edge**: the second ring; always full resolution at every LOD,
//!   so neighbouring chunks of different LODs share identical boundaries.
//! - **edge connection**: the third ring; heights are interpolated between
//!   the two nearest main vertices to bridge resolution changes smoothly.
//! - **main**: interior vertices aligned to the LOD's skip increment.
//! - **skipped**: interior vertices dropped at coarser LODs.

use glam::{DVec2, DVec3};
use terra_heightfield::HeightMap;

use crate::mesh_data::{TerrainMeshData, VertexId};
use crate::settings::{MeshSettings, skip_increment};

/// Lookup table from grid position to assigned vertex index.
struct VertexIndexGrid {
    ids: Vec<Option<VertexId>>,
    verts_per_line: usize,
}

impl VertexIndexGrid {
    fn get(&self, x: usize, y: usize) -> VertexId {
        self.ids[y * self.verts_per_line + x]
            .expect("quad corners always land on included vertices")
    }
}

#[inline]
fn is_skirt(x: usize, y: usize, verts_per_line: usize) -> bool {
    y == 0 || y == verts_per_line - 1 || x == 0 || x == verts_per_line - 1
}

#[inline]
fn is_skipped(x: usize, y: usize, verts_per_line: usize, skip: usize) -> bool {
    x > 2
        && x < verts_per_line - 3
        && y > 2
        && y < verts_per_line - 3
        && ((x - 2) % skip != 0 || (y - 2) % skip != 0)
}

/// Build the mesh for `height_map` at the requested LOD.
///
/// The heightfield must be `verts_per_line × verts_per_line` for the given
/// settings, and the settings must have passed [`MeshSettings::validate`].
/// Buffers are exactly sized from closed-form counts; no reallocation
/// happens during the build.
pub fn generate_terrain_mesh(
    height_map: &HeightMap,
    settings: &MeshSettings,
    lod: usize,
) -> TerrainMeshData {
    let skip = skip_increment(lod);
    let verts_per_line = settings.verts_per_line();
    debug_assert_eq!(height_map.width(), verts_per_line);
    debug_assert_eq!(height_map.height(), verts_per_line);

    let world_size = settings.mesh_world_size();
    let top_left = DVec2::new(-1.0, 1.0) * world_size / 2.0;

    // Closed-form buffer sizes.
    let num_edge_vertices = (verts_per_line - 2) * 4 - 4;
    let num_connection_vertices = (skip - 1) * (verts_per_line - 5) / skip * 4;
    let main_per_line = (verts_per_line - 5) / skip + 1;
    let num_main_vertices = main_per_line * main_per_line;
    let num_edge_triangles = 8 * (verts_per_line - 4);
    let num_main_triangles = (main_per_line - 1) * (main_per_line - 1) * 2;

    let mut mesh = TerrainMeshData::with_capacities(
        num_edge_vertices + num_connection_vertices + num_main_vertices,
        num_edge_triangles + num_main_triangles,
        verts_per_line * 4 - 4,
        8 * (verts_per_line - 2),
        settings.use_flat_shading,
    );

    // First pass: assign dense indices to every included grid position.
    let mut index_grid = VertexIndexGrid {
        ids: vec![None; verts_per_line * verts_per_line],
        verts_per_line,
    };
    let mut next_main = 0u32;
    let mut next_skirt = 0u32;
    for y in 0..verts_per_line {
        for x in 0..verts_per_line {
            let slot = &mut index_grid.ids[y * verts_per_line + x];
            if is_skirt(x, y, verts_per_line) {
                *slot = Some(VertexId::Skirt(next_skirt));
                next_skirt += 1;
            } else if !is_skipped(x, y, verts_per_line, skip) {
                *slot = Some(VertexId::Main(next_main));
                next_main += 1;
            }
        }
    }

    // Second pass: place vertices and emit quads.
    for y in 0..verts_per_line {
        for x in 0..verts_per_line {
            if is_skipped(x, y, verts_per_line, skip) {
                continue;
            }

            let skirt = is_skirt(x, y, verts_per_line);
            let edge = !skirt
                && (y == 1 || y == verts_per_line - 2 || x == 1 || x == verts_per_line - 2);
            let main = !skirt
                && !edge
                && (x - 2) % skip == 0
                && (y - 2) % skip == 0;
            let edge_connection = !skirt
                && !edge
                && !main
                && (y == 2 || y == verts_per_line - 3 || x == 2 || x == verts_per_line - 3);

            let percent = DVec2::new(x as f64 - 1.0, y as f64 - 1.0)
                / (verts_per_line - 3) as f64;
            let position_2d = top_left + DVec2::new(percent.x, -percent.y) * world_size;

            let height = if edge_connection {
                // Interpolate between the two nearest main vertices along
                // the row or column instead of sampling the grid, so the
                // coarse side of a LOD boundary is bridged smoothly.
                let along_column = x == 2 || x == verts_per_line - 3;
                let axis_coord = if along_column { y } else { x };
                let to_a = (axis_coord - 2) % skip;
                let to_b = skip - to_a;
                let frac = to_a as f64 / skip as f64;

                let height_a = if along_column {
                    height_map.get(x, y - to_a)
                } else {
                    height_map.get(x - to_a, y)
                };
                let height_b = if along_column {
                    height_map.get(x, y + to_b)
                } else {
                    height_map.get(x + to_b, y)
                };
                height_a * (1.0 - frac) + height_b * frac
            } else {
                height_map.get(x, y)
            };

            mesh.add_vertex(
                index_grid.get(x, y),
                DVec3::new(position_2d.x, height, position_2d.y),
                percent,
            );

            // Edge-connection vertices on the near edges would emit quads
            // that overlap the ones their main neighbours already emit.
            let emit_quad = x < verts_per_line - 1
                && y < verts_per_line - 1
                && (!edge_connection || (x != 2 && y != 2));
            if emit_quad {
                let step = if main && x != verts_per_line - 3 && y != verts_per_line - 3 {
                    skip
                } else {
                    1
                };
                let a = index_grid.get(x, y);
                let b = index_grid.get(x + step, y);
                let c = index_grid.get(x, y + step);
                let d = index_grid.get(x + step, y + step);
                mesh.add_triangle(a, d, c);
                mesh.add_triangle(d, a, b);
            }
        }
    }

    mesh.process();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::NUM_SUPPORTED_LODS;

    /// Deterministic synthetic heightfield of the right size for `settings`.
    fn wavy_height_map(settings: &MeshSettings) -> HeightMap {
        let n = settings.verts_per_line();
        let mut values = Vec::with_capacity(n * n);
        for y in 0..n {
            for x in 0..n {
                values.push((x as f64 * 0.31).sin() * 4.0 + (y as f64 * 0.17).cos() * 2.5);
            }
        }
        HeightMap::from_values(n, n, values)
    }

    fn default_settings() -> MeshSettings {
        MeshSettings::default()
    }

    /// Boundary percent coordinates identify the full-resolution edge ring.
    fn boundary_vertices(mesh: &TerrainMeshData) -> Vec<DVec3> {
        let mut ring: Vec<DVec3> = mesh
            .uvs()
            .iter()
            .zip(mesh.vertices())
            .filter(|(uv, _)| uv.x == 0.0 || uv.x == 1.0 || uv.y == 0.0 || uv.y == 1.0)
            .map(|(_, &v)| v)
            .collect();
        ring.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.z.total_cmp(&b.z)));
        ring
    }

    #[test]
    fn test_boundary_ring_is_identical_across_lods() {
        let settings = default_settings();
        let map = wavy_height_map(&settings);
        let reference = boundary_vertices(&generate_terrain_mesh(&map, &settings, 0));
        assert!(!reference.is_empty());

        for lod in 1..NUM_SUPPORTED_LODS {
            let ring = boundary_vertices(&generate_terrain_mesh(&map, &settings, lod));
            assert_eq!(
                ring, reference,
                "LOD {lod} must reproduce the LOD 0 boundary ring exactly"
            );
        }
    }

    #[test]
    fn test_buffer_counts_match_closed_forms() {
        let settings = default_settings();
        let map = wavy_height_map(&settings);
        let n = settings.verts_per_line();

        for lod in 0..NUM_SUPPORTED_LODS {
            let skip = skip_increment(lod);
            let mesh = generate_terrain_mesh(&map, &settings, lod);

            let edge = (n - 2) * 4 - 4;
            let connection = (skip - 1) * (n - 5) / skip * 4;
            let per_line = (n - 5) / skip + 1;
            let expected_vertices = edge + connection + per_line * per_line;
            let expected_triangles = 8 * (n - 4) + (per_line - 1) * (per_line - 1) * 2;

            assert_eq!(mesh.vertices().len(), expected_vertices, "LOD {lod} vertices");
            assert_eq!(mesh.triangles().len(), expected_triangles, "LOD {lod} triangles");
            assert_eq!(mesh.uvs().len(), expected_vertices);
            assert_eq!(mesh.normals().len(), expected_vertices);
        }
    }

    #[test]
    fn test_triangle_indices_are_in_bounds() {
        let settings = default_settings();
        let map = wavy_height_map(&settings);
        for lod in [0, 2, 4] {
            let mesh = generate_terrain_mesh(&map, &settings, lod);
            let count = mesh.vertices().len() as u32;
            for triangle in mesh.triangles() {
                for &index in triangle {
                    assert!(index < count, "index {index} out of {count} at LOD {lod}");
                }
            }
        }
    }

    #[test]
    fn test_winding_is_consistent() {
        let settings = default_settings();
        let map = wavy_height_map(&settings);
        for lod in [0, 1, 3] {
            let mesh = generate_terrain_mesh(&map, &settings, lod);
            let mut positive = 0usize;
            let mut negative = 0usize;
            for &[a, b, c] in mesh.triangles() {
                let pa = mesh.vertices()[a as usize];
                let pb = mesh.vertices()[b as usize];
                let pc = mesh.vertices()[c as usize];
                // Signed area projected onto the ground plane.
                let area = (pb.x - pa.x) * (pc.z - pa.z) - (pb.z - pa.z) * (pc.x - pa.x);
                if area > 0.0 {
                    positive += 1;
                } else if area < 0.0 {
                    negative += 1;
                }
            }
            assert!(
                positive == 0 || negative == 0,
                "mixed winding at LOD {lod}: {positive} positive, {negative} negative"
            );
        }
    }

    #[test]
    fn test_uvs_span_unit_square() {
        let settings = default_settings();
        let map = wavy_height_map(&settings);
        let mesh = generate_terrain_mesh(&map, &settings, 0);
        for uv in mesh.uvs() {
            assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));
        }
    }

    #[test]
    fn test_normals_are_unit_and_finite() {
        let settings = default_settings();
        let map = wavy_height_map(&settings);
        let mesh = generate_terrain_mesh(&map, &settings, 1);
        for normal in mesh.normals() {
            assert!(normal.is_finite());
            assert!((normal.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_flat_shading_has_per_triangle_vertices() {
        let settings = MeshSettings {
            use_flat_shading: true,
            ..Default::default()
        };
        let map = wavy_height_map(&settings);
        let mesh = generate_terrain_mesh(&map, &settings, 0);
        assert_eq!(mesh.vertices().len(), mesh.triangles().len() * 3);
        assert!(mesh.is_flat_shaded());
    }

    #[test]
    fn test_same_inputs_reproduce_identical_meshes() {
        let settings = default_settings();
        let map = wavy_height_map(&settings);
        let a = generate_terrain_mesh(&map, &settings, 2);
        let b = generate_terrain_mesh(&map, &settings, 2);
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.triangles(), b.triangles());
        assert_eq!(a.normals(), b.normals());
    }

    #[test]
    fn test_mesh_edge_heights_sample_grid_directly() {
        let settings = default_settings();
        let map = wavy_height_map(&settings);
        let n = settings.verts_per_line();
        let mesh = generate_terrain_mesh(&map, &settings, 3);

        // The mesh-edge ring (grid x == 1) maps to percent.x == 0; its
        // heights must come straight from the grid, not interpolation.
        for (uv, vertex) in mesh.uvs().iter().zip(mesh.vertices()) {
            if uv.x == 0.0 {
                let y = (uv.y * (n - 3) as f64).round() as usize + 1;
                assert_eq!(vertex.y, map.get(1, y), "edge height mismatch at grid y {y}");
            }
        }
    }
}

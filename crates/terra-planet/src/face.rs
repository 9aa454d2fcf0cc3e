//! Meshing one cube face of a planet.

use glam::{DVec2, DVec3};

use crate::biome::BiomeClassifier;
use crate::cube_face::CubeFace;
use crate::shape::ShapeGenerator;

/// Render-ready geometry for a single cube face.
///
/// `uvs` carry classification data rather than a texture atlas mapping:
/// `x` is the normalized biome index and `y` the unscaled elevation, which
/// a gradient texture turns into surface colour.
#[derive(Clone, Debug)]
pub struct FaceMesh {
    face: CubeFace,
    resolution: usize,
    vertices: Vec<DVec3>,
    triangles: Vec<[u32; 3]>,
    uvs: Vec<DVec2>,
    normals: Vec<DVec3>,
}

impl FaceMesh {
    pub fn face(&self) -> CubeFace {
        self.face
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn uvs(&self) -> &[DVec2] {
        &self.uvs
    }

    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }
}

/// The unit-sphere point under grid position `(x, y)` of a face.
fn point_on_unit_sphere(face: CubeFace, resolution: usize, x: usize, y: usize) -> DVec3 {
    let percent = DVec2::new(x as f64, y as f64) / (resolution - 1) as f64;
    let point_on_unit_cube = face.local_up()
        + (percent.x - 0.5) * 2.0 * face.axis_a()
        + (percent.y - 0.5) * 2.0 * face.axis_b();
    point_on_unit_cube.normalize()
}

/// Builds the geometry for one cube face at `resolution` vertices per side.
///
/// Every vertex evaluation feeds the shape generator's elevation tracker,
/// so building all visible faces before reading the tracker yields the
/// planet-wide elevation range. `resolution` must be at least 2.
pub fn build_face(shape: &mut ShapeGenerator, face: CubeFace, resolution: usize) -> FaceMesh {
    debug_assert!(resolution >= 2, "a face needs at least one quad per side");

    let num_vertices = resolution * resolution;
    let mut vertices = Vec::with_capacity(num_vertices);
    let mut uvs = Vec::with_capacity(num_vertices);
    let mut triangles = Vec::with_capacity((resolution - 1) * (resolution - 1) * 2);

    for y in 0..resolution {
        for x in 0..resolution {
            let point = point_on_unit_sphere(face, resolution, x, y);
            let unscaled_elevation = shape.unscaled_elevation(point);
            vertices.push(point * shape.scaled_elevation(unscaled_elevation));
            uvs.push(DVec2::new(0.0, unscaled_elevation));

            if x != resolution - 1 && y != resolution - 1 {
                let i = (x + y * resolution) as u32;
                let step = resolution as u32;
                triangles.push([i, i + step + 1, i + step]);
                triangles.push([i, i + 1, i + step + 1]);
            }
        }
    }

    let normals = smooth_normals(&vertices, &triangles);
    FaceMesh {
        face,
        resolution,
        vertices,
        triangles,
        uvs,
        normals,
    }
}

/// Rewrites the biome component of every UV without touching geometry.
///
/// This is the fast path for recolouring a planet after biome settings
/// change; positions, triangles, and normals are untouched.
pub fn update_face_uvs(mesh: &mut FaceMesh, classifier: &BiomeClassifier) {
    let resolution = mesh.resolution;
    for y in 0..resolution {
        for x in 0..resolution {
            let point = point_on_unit_sphere(mesh.face, resolution, x, y);
            mesh.uvs[x + y * resolution].x = classifier.biome_percent(point);
        }
    }
}

/// Area-weighted smooth vertex normals.
fn smooth_normals(vertices: &[DVec3], triangles: &[[u32; 3]]) -> Vec<DVec3> {
    let mut normals = vec![DVec3::ZERO; vertices.len()];
    for &[a, b, c] in triangles {
        let pa = vertices[a as usize];
        let face_normal = (vertices[b as usize] - pa).cross(vertices[c as usize] - pa);
        normals[a as usize] += face_normal;
        normals[b as usize] += face_normal;
        normals[c as usize] += face_normal;
    }
    for normal in &mut normals {
        *normal = normal.normalize_or_zero();
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{BiomeBand, BiomeSettings};
    use crate::shape::{ShapeGenerator, ShapeSettings};

    fn flat_shape() -> ShapeGenerator {
        // All layers disabled: the face is a patch of the unit sphere.
        let mut settings = ShapeSettings::default();
        settings.noise_layers[0].enabled = false;
        ShapeGenerator::new(settings)
    }

    #[test]
    fn test_face_has_grid_counts() {
        let mut shape = flat_shape();
        let mesh = build_face(&mut shape, CubeFace::Top, 8);
        assert_eq!(mesh.vertices().len(), 64);
        assert_eq!(mesh.uvs().len(), 64);
        assert_eq!(mesh.normals().len(), 64);
        assert_eq!(mesh.triangles().len(), 7 * 7 * 2);
    }

    #[test]
    fn test_flat_face_vertices_lie_on_the_sphere() {
        let mut shape = flat_shape();
        for face in CubeFace::ALL {
            let mesh = build_face(&mut shape, face, 5);
            for vertex in mesh.vertices() {
                assert!(
                    (vertex.length() - 1.0).abs() < 1e-12,
                    "vertex {vertex:?} of {face:?} is off the unit sphere"
                );
            }
        }
    }

    #[test]
    fn test_triangle_indices_are_in_bounds() {
        let mut shape = ShapeGenerator::new(ShapeSettings {
            seed: 11,
            ..Default::default()
        });
        let mesh = build_face(&mut shape, CubeFace::Front, 6);
        for triangle in mesh.triangles() {
            for &index in triangle {
                assert!((index as usize) < mesh.vertices().len());
            }
        }
    }

    #[test]
    fn test_normals_point_outward_on_a_flat_face() {
        let mut shape = flat_shape();
        let mesh = build_face(&mut shape, CubeFace::Right, 9);
        for (vertex, normal) in mesh.vertices().iter().zip(mesh.normals()) {
            // On a sphere patch the outward radial direction is the vertex
            // itself; windings must agree with it everywhere.
            assert!(
                normal.dot(vertex.normalize()) > 0.0,
                "normal {normal:?} points inward at {vertex:?}"
            );
        }
    }

    #[test]
    fn test_elevation_is_stored_in_uv_y() {
        let mut shape = ShapeGenerator::new(ShapeSettings {
            seed: 5,
            ..Default::default()
        });
        let mesh = build_face(&mut shape, CubeFace::Back, 4);
        let range = shape.elevation_min_max();
        for uv in mesh.uvs() {
            assert!(uv.y >= range.min() && uv.y <= range.max());
            assert_eq!(uv.x, 0.0, "biome index must start unset");
        }
    }

    #[test]
    fn test_update_uvs_touches_only_biome_component() {
        let mut shape = ShapeGenerator::new(ShapeSettings {
            seed: 21,
            ..Default::default()
        });
        let mut mesh = build_face(&mut shape, CubeFace::Top, 6);
        let vertices_before = mesh.vertices().to_vec();
        let elevations_before: Vec<f64> = mesh.uvs().iter().map(|uv| uv.y).collect();

        let classifier = BiomeClassifier::new(BiomeSettings {
            biomes: vec![
                BiomeBand { start_height: 0.0 },
                BiomeBand { start_height: 0.5 },
            ],
            ..Default::default()
        });
        update_face_uvs(&mut mesh, &classifier);

        assert_eq!(mesh.vertices(), vertices_before.as_slice());
        let elevations_after: Vec<f64> = mesh.uvs().iter().map(|uv| uv.y).collect();
        assert_eq!(elevations_after, elevations_before);
        assert!(
            mesh.uvs().iter().any(|uv| uv.x > 0.0),
            "the top face spans latitudes that must hit the second band"
        );
    }
}

//! Whole-planet orchestration over the six face meshers.

use serde::{Deserialize, Serialize};

use crate::biome::{BiomeClassifier, BiomeSettings};
use crate::cube_face::{CubeFace, FaceRenderMask};
use crate::face::{FaceMesh, build_face, update_face_uvs};
use crate::minmax::MinMaxTracker;
use crate::shape::{ShapeGenerator, ShapeSettings};

/// Top-level planet configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanetSettings {
    /// Vertices per side of each face grid. At least 2.
    pub resolution: usize,
    /// Which faces to mesh.
    pub face_render_mask: FaceRenderMask,
    pub shape: ShapeSettings,
    pub biomes: BiomeSettings,
}

impl Default for PlanetSettings {
    fn default() -> Self {
        Self {
            resolution: 10,
            face_render_mask: FaceRenderMask::All,
            shape: ShapeSettings::default(),
            biomes: BiomeSettings::default(),
        }
    }
}

/// Owns the shape and biome generators and the per-face meshes.
///
/// Shape changes need [`Planet::rebuild_meshes`]; biome changes only need
/// the cheaper [`Planet::reclassify_biomes`], which leaves geometry alone.
pub struct Planet {
    settings: PlanetSettings,
    shape_generator: ShapeGenerator,
    biome_classifier: BiomeClassifier,
    faces: [Option<FaceMesh>; 6],
}

impl Planet {
    /// Builds the planet: meshes every unmasked face, then classifies
    /// biomes once all elevation sampling is done.
    pub fn generate(settings: PlanetSettings) -> Self {
        let shape_generator = ShapeGenerator::new(settings.shape.clone());
        let biome_classifier = BiomeClassifier::new(settings.biomes.clone());
        let mut planet = Self {
            settings,
            shape_generator,
            biome_classifier,
            faces: [None, None, None, None, None, None],
        };
        planet.rebuild_meshes();
        planet.reclassify_biomes();
        planet
    }

    /// Regenerates geometry for every unmasked face.
    ///
    /// The elevation tracker is reset first so the observed range reflects
    /// exactly this build, not stale samples from a previous one.
    pub fn rebuild_meshes(&mut self) {
        self.shape_generator = ShapeGenerator::new(self.settings.shape.clone());
        for face in CubeFace::ALL {
            let slot = &mut self.faces[face as usize];
            if self.settings.face_render_mask.includes(face) {
                *slot = Some(build_face(
                    &mut self.shape_generator,
                    face,
                    self.settings.resolution,
                ));
            } else {
                *slot = None;
            }
        }
    }

    /// Recomputes the biome component of every face's UVs.
    pub fn reclassify_biomes(&mut self) {
        for face_mesh in self.faces.iter_mut().flatten() {
            update_face_uvs(face_mesh, &self.biome_classifier);
        }
    }

    /// Applies new shape settings and rebuilds geometry and biomes.
    pub fn set_shape_settings(&mut self, shape: ShapeSettings) {
        self.settings.shape = shape;
        self.rebuild_meshes();
        self.reclassify_biomes();
    }

    /// Applies new biome settings; geometry is left untouched.
    pub fn set_biome_settings(&mut self, biomes: BiomeSettings) {
        self.settings.biomes = biomes;
        self.biome_classifier = BiomeClassifier::new(self.settings.biomes.clone());
        self.reclassify_biomes();
    }

    /// The mesh for `face`, if it is included by the render mask.
    pub fn face_mesh(&self, face: CubeFace) -> Option<&FaceMesh> {
        self.faces[face as usize].as_ref()
    }

    /// All currently meshed faces.
    pub fn face_meshes(&self) -> impl Iterator<Item = &FaceMesh> {
        self.faces.iter().flatten()
    }

    /// Unscaled elevation range across the last geometry build, for
    /// mapping surface height onto a colour gradient.
    pub fn elevation_min_max(&self) -> &MinMaxTracker {
        self.shape_generator.elevation_min_max()
    }

    pub fn settings(&self) -> &PlanetSettings {
        &self.settings
    }
}

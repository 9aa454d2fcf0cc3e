//! Spherical planet generation: layered elevation over a cube-projected
//! sphere, with biome classification baked into texture coordinates.

mod biome;
mod cube_face;
mod face;
mod minmax;
mod planet;
mod shape;

pub use biome::{BiomeBand, BiomeClassifier, BiomeSettings};
pub use cube_face::{CubeFace, FaceRenderMask};
pub use face::{FaceMesh, build_face, update_face_uvs};
pub use minmax::MinMaxTracker;
pub use planet::{Planet, PlanetSettings};
pub use shape::{ShapeGenerator, ShapeSettings};

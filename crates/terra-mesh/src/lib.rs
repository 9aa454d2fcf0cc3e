//! Seam-free terrain meshes at multiple levels of detail.
//!
//! Converts a heightfield grid into render-ready vertex/triangle/uv/normal
//! buffers. The outer boundary ring of every mesh is emitted at full
//! resolution regardless of LOD, and a skirt of off-mesh vertices feeds the
//! boundary normals, so chunks of differing detail meet without cracks or
//! shading seams.

mod mesh_data;
mod settings;
mod terrain_mesh;

pub use mesh_data::{TerrainMeshData, VertexId};
pub use settings::{
    MeshSettings, MeshSettingsError, NUM_SUPPORTED_CHUNK_SIZES,
    NUM_SUPPORTED_FLATSHADED_CHUNK_SIZES, NUM_SUPPORTED_LODS, SUPPORTED_CHUNK_SIZES,
    skip_increment,
};
pub use terrain_mesh::generate_terrain_mesh;

//! Terrain chunk streaming: a registry of chunks around a moving viewer,
//! LOD selection by distance, and background heightfield/mesh generation
//! through a bounded worker pool.

mod bounds;
mod chunk;
mod dispatch;
mod lod;
mod streamer;

pub use bounds::Rect;
pub use chunk::{
    COLLIDER_GENERATION_DISTANCE_THRESHOLD, ChunkCoord, ChunkUpdate, TerrainChunk,
};
pub use dispatch::{ChunkJob, ChunkJobResult, WorkDispatcher, execute_job};
pub use lod::LodLevel;
pub use streamer::{
    EvictionPolicy, StreamerSettings, TerrainStreamer, VIEWER_MOVE_THRESHOLD,
};

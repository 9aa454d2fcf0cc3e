//! Mesh resolution settings and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of LOD tiers every chunk supports (LOD 0 through 4).
pub const NUM_SUPPORTED_LODS: usize = 5;

/// Chunk sizes (quads per side at full detail) that keep every LOD's skip
/// increment an exact divisor of the interior grid. All entries are
/// multiples of 24 = lcm of the skip increments {1, 2, 4, 6, 8}.
pub const SUPPORTED_CHUNK_SIZES: [usize; 9] = [48, 72, 96, 120, 144, 168, 192, 216, 240];

/// Number of entries in [`SUPPORTED_CHUNK_SIZES`].
pub const NUM_SUPPORTED_CHUNK_SIZES: usize = SUPPORTED_CHUNK_SIZES.len();

/// Flat shading duplicates vertices per triangle, so only the smallest
/// chunk sizes stay under typical 16-bit index budgets.
pub const NUM_SUPPORTED_FLATSHADED_CHUNK_SIZES: usize = 3;

/// Interior vertex sampling stride for a LOD tier: 1 at LOD 0, `2 * lod`
/// otherwise.
#[inline]
pub fn skip_increment(lod: usize) -> usize {
    if lod == 0 { 1 } else { lod * 2 }
}

/// Errors detected at mesh-settings validation time.
///
/// Generation code assumes validated settings; these are configuration
/// faults, not runtime conditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshSettingsError {
    /// `chunk_size_index` outside [`SUPPORTED_CHUNK_SIZES`].
    #[error("chunk size index {0} out of range (supported: 0..{NUM_SUPPORTED_CHUNK_SIZES})")]
    ChunkSizeIndexOutOfRange(usize),
    /// `flatshaded_chunk_size_index` outside the flat-shaded subset.
    #[error(
        "flat-shaded chunk size index {0} out of range (supported: 0..{NUM_SUPPORTED_FLATSHADED_CHUNK_SIZES})"
    )]
    FlatshadedIndexOutOfRange(usize),
    /// The vertex grid does not divide evenly by some LOD's skip increment,
    /// which would desynchronize boundary vertices between LODs.
    #[error("verts per line {verts_per_line} is not congruent with skip increment {skip_increment}")]
    IncompatibleVertsPerLine {
        /// The offending grid size.
        verts_per_line: usize,
        /// The skip increment that fails to divide the interior.
        skip_increment: usize,
    },
}

/// Resolution and scale settings shared by every LOD of a chunk.
///
/// `verts_per_line` is fixed per settings and identical for every LOD; only
/// the skip increment changes between LODs, which is what keeps boundary
/// vertex positions identical across detail tiers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MeshSettings {
    /// Uniform world-space scale of the chunk.
    pub mesh_scale: f64,
    /// Duplicate vertices per triangle for faceted shading.
    pub use_flat_shading: bool,
    /// Index into [`SUPPORTED_CHUNK_SIZES`] used when smooth-shaded.
    pub chunk_size_index: usize,
    /// Index into [`SUPPORTED_CHUNK_SIZES`] used when flat-shaded.
    pub flatshaded_chunk_size_index: usize,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            mesh_scale: 2.5,
            use_flat_shading: false,
            chunk_size_index: 0,
            flatshaded_chunk_size_index: 0,
        }
    }
}

impl MeshSettings {
    /// Number of vertices per grid line, including the two-vertex skirt
    /// border (hence `+ 5`: chunk quads + 1, + 2 skirt rings on each side).
    pub fn verts_per_line(&self) -> usize {
        let index = if self.use_flat_shading {
            self.flatshaded_chunk_size_index
        } else {
            self.chunk_size_index
        };
        SUPPORTED_CHUNK_SIZES[index] + 5
    }

    /// World-space extent of the renderable portion of the chunk.
    pub fn mesh_world_size(&self) -> f64 {
        (self.verts_per_line() - 3) as f64 * self.mesh_scale
    }

    /// Validate index ranges and the skip-increment divisibility invariant.
    pub fn validate(&self) -> Result<(), MeshSettingsError> {
        if self.chunk_size_index >= NUM_SUPPORTED_CHUNK_SIZES {
            return Err(MeshSettingsError::ChunkSizeIndexOutOfRange(
                self.chunk_size_index,
            ));
        }
        if self.flatshaded_chunk_size_index >= NUM_SUPPORTED_FLATSHADED_CHUNK_SIZES {
            return Err(MeshSettingsError::FlatshadedIndexOutOfRange(
                self.flatshaded_chunk_size_index,
            ));
        }
        let verts_per_line = self.verts_per_line();
        for lod in 0..NUM_SUPPORTED_LODS {
            let skip = skip_increment(lod);
            if (verts_per_line - 5) % skip != 0 {
                return Err(MeshSettingsError::IncompatibleVertsPerLine {
                    verts_per_line,
                    skip_increment: skip,
                });
            }
        }
        Ok(())
    }
}

//! Per-LOD distance thresholds.

use serde::{Deserialize, Serialize};

/// One entry of a chunk's detail-level ladder.
///
/// Levels are ordered finest to coarsest; each covers viewer distances up
/// to its threshold, and the last threshold doubles as the maximum view
/// distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LodLevel {
    /// Mesh simplification level passed to the mesh builder.
    pub lod: usize,
    /// Viewer distances up to this value use this level.
    pub visible_distance_threshold: f64,
}

impl LodLevel {
    /// Squared threshold, for comparisons against squared distances.
    #[must_use]
    pub fn sqr_visible_distance_threshold(&self) -> f64 {
        self.visible_distance_threshold * self.visible_distance_threshold
    }
}

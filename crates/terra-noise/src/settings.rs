//! Per-layer noise filter configuration.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Selects which octave-compositing strategy a noise layer uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterVariant {
    /// Smooth layered noise: octaves rescaled to `[0, 1]` and summed.
    #[default]
    Simple,
    /// Ridged noise: `(1 - |n|)²` octaves with inter-layer weight damping.
    Ridged,
}

/// Configuration for a single elevation noise layer.
///
/// A layer holds everything one filter needs: octave count, frequency and
/// amplitude progression, a world-space centre offset, and the output shift
/// and scale. `weight_multiplier` only affects the [`FilterVariant::Ridged`]
/// variant and is ignored by the simple one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoiseLayerSettings {
    /// Which filter variant this layer uses.
    pub variant: FilterVariant,
    /// Disabled layers contribute nothing to elevation.
    pub enabled: bool,
    /// When set, this layer's output is multiplied by the first layer's raw
    /// value, confining its detail to where the first layer is high.
    pub use_first_layer_as_mask: bool,
    /// Number of noise octaves to composite.
    pub num_octaves: u32,
    /// Final output scale.
    pub strength: f64,
    /// Frequency of the first octave.
    pub base_roughness: f64,
    /// Frequency multiplier between successive octaves.
    pub roughness: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// World-space offset added to the sample point, shifting the pattern.
    pub centre: DVec3,
    /// Subtracted from the composited value before scaling; raises the
    /// "sea floor" so low noise clamps out of the visible range.
    pub min_value: f64,
    /// Ridged only: scales the carry-over weight between octaves. Higher
    /// values let ridge detail survive into later octaves.
    pub weight_multiplier: f64,
}

impl Default for NoiseLayerSettings {
    fn default() -> Self {
        Self {
            variant: FilterVariant::Simple,
            enabled: true,
            use_first_layer_as_mask: false,
            num_octaves: 1,
            strength: 1.0,
            base_roughness: 1.0,
            roughness: 2.0,
            persistence: 0.5,
            centre: DVec3::ZERO,
            min_value: 0.0,
            weight_multiplier: 0.8,
        }
    }
}

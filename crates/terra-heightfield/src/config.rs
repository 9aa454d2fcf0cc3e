//! Heightfield configuration with range clamping at the validation boundary.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::curve::HeightCurve;

/// How a generated noise map is normalized into `[0, 1]`-ish range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NormalizeMode {
    /// Inverse-lerp each grid between its own observed min and max. Exact
    /// `[0, 1]` coverage per grid, but adjacent grids disagree at shared
    /// edges.
    Local,
    /// Rescale by the theoretical maximum octave amplitude sum, so every
    /// grid generated with the same config agrees at shared coordinates.
    #[default]
    Global,
}

/// Configuration for 2D fractal noise map generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Normalization strategy for the raw octave sums.
    pub normalize_mode: NormalizeMode,
    /// Spatial scale: larger values zoom out, producing broader features.
    pub scale: f64,
    /// Number of noise octaves to composite.
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves, in `[0, 1]`.
    pub persistence: f64,
    /// Frequency multiplier between successive octaves, at least 1.
    pub lacunarity: f64,
    /// Seed for the gradient table and the per-octave offset jitter.
    pub seed: u64,
    /// User-configured pattern offset in sample space.
    pub offset: DVec2,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            normalize_mode: NormalizeMode::Global,
            scale: 50.0,
            octaves: 6,
            persistence: 0.6,
            lacunarity: 2.0,
            seed: 0,
            offset: DVec2::ZERO,
        }
    }
}

impl NoiseConfig {
    /// Smallest permitted noise scale; divides sample coordinates, so zero
    /// would be undefined.
    pub const MIN_SCALE: f64 = 0.01;

    /// Return a copy with every field clamped into its valid range.
    ///
    /// This is the validation boundary: generation code assumes it receives
    /// the clamped form and performs no further range checks.
    #[must_use]
    pub fn validated(&self) -> Self {
        Self {
            scale: self.scale.max(Self::MIN_SCALE),
            octaves: self.octaves.max(1),
            lacunarity: self.lacunarity.max(1.0),
            persistence: self.persistence.clamp(0.0, 1.0),
            ..self.clone()
        }
    }
}

/// Everything needed to turn a sample region into a finished [`crate::HeightMap`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeightfieldSettings {
    /// Noise map configuration.
    pub noise: NoiseConfig,
    /// Attenuate heights toward the region edges, shaping island-like maps.
    pub use_falloff: bool,
    /// Vertical scale applied after the remap curve.
    pub height_multiplier: f64,
    /// Remap curve evaluated at each normalized height.
    pub height_curve: HeightCurve,
}

impl Default for HeightfieldSettings {
    fn default() -> Self {
        Self {
            noise: NoiseConfig::default(),
            use_falloff: false,
            height_multiplier: 1.0,
            height_curve: HeightCurve::identity(),
        }
    }
}

impl HeightfieldSettings {
    /// Lowest height these settings can produce (normalized height 0).
    pub fn min_height(&self) -> f64 {
        self.height_multiplier * self.height_curve.evaluate(0.0)
    }

    /// Highest height these settings can produce (normalized height 1).
    pub fn max_height(&self) -> f64 {
        self.height_multiplier * self.height_curve.evaluate(1.0)
    }
}

//! Ridged layered noise filter.

use glam::DVec3;
use noise::{NoiseFn, Simplex};

use crate::filter::NoiseFilter;
use crate::settings::NoiseLayerSettings;

/// Octaves of `(1 - |n|)²` noise with an inter-octave weight.
///
/// Folding the noise around zero and squaring sharpens the creases into
/// ridgelines. Each octave's output feeds the next octave's weight (scaled
/// by `weight_multiplier` and clamped to `[0, 1]`), so fine ridge detail
/// only survives on top of the broad peaks of earlier octaves.
pub struct RidgedNoiseFilter {
    settings: NoiseLayerSettings,
    source: Simplex,
}

impl RidgedNoiseFilter {
    /// Create a filter from layer settings and a noise seed.
    pub fn new(settings: NoiseLayerSettings, seed: u32) -> Self {
        Self {
            settings,
            source: Simplex::new(seed),
        }
    }
}

impl NoiseFilter for RidgedNoiseFilter {
    fn evaluate(&self, point: DVec3) -> f64 {
        let mut noise_value = 0.0;
        let mut frequency = self.settings.base_roughness;
        let mut amplitude = 1.0;
        let mut weight = 1.0;

        for _ in 0..self.settings.num_octaves {
            let sample = point * frequency + self.settings.centre;
            let mut v = 1.0 - self.source.get(sample.to_array()).abs();
            v *= v;
            v *= weight;
            weight = (v * self.settings.weight_multiplier).clamp(0.0, 1.0);

            noise_value += v * amplitude;
            frequency *= self.settings.roughness;
            amplitude *= self.settings.persistence;
        }

        (noise_value - self.settings.min_value) * self.settings.strength
    }
}

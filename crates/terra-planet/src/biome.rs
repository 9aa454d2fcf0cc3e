//! Latitude and noise driven biome classification.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use terra_noise::{NoiseFilter, NoiseLayerSettings, make_noise_filter};

/// One biome band, occupying the height range from its `start_height` up to
/// the next band's start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeBand {
    /// Latitude fraction in `[0, 1]` where this band begins.
    pub start_height: f64,
}

/// Configuration for biome classification across a planet's surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BiomeSettings {
    /// Bands ordered from pole to pole by `start_height`.
    pub biomes: Vec<BiomeBand>,
    /// Noise layer that perturbs the latitude bands.
    pub noise: NoiseLayerSettings,
    /// Subtracted from the noise value before it perturbs latitude.
    pub noise_offset: f64,
    /// Scales how far noise pushes a point across band boundaries.
    pub noise_strength: f64,
    /// Width of the smooth transition between adjacent bands.
    pub blend_amount: f64,
    /// Seed for the perturbation noise.
    pub seed: u32,
}

impl Default for BiomeSettings {
    fn default() -> Self {
        Self {
            biomes: vec![BiomeBand { start_height: 0.0 }],
            noise: NoiseLayerSettings::default(),
            noise_offset: 0.0,
            noise_strength: 0.0,
            blend_amount: 0.0,
            seed: 0,
        }
    }
}

/// Maps points on the unit sphere to a normalized biome index in `[0, 1]`.
///
/// The index becomes a texture coordinate: rendering collaborators use it
/// to select a row of a biome gradient texture.
pub struct BiomeClassifier {
    settings: BiomeSettings,
    noise_filter: Box<dyn NoiseFilter>,
}

impl BiomeClassifier {
    pub fn new(settings: BiomeSettings) -> Self {
        let noise_filter = make_noise_filter(&settings.noise, settings.seed);
        Self {
            settings,
            noise_filter,
        }
    }

    /// Normalized biome index for `point_on_unit_sphere`.
    ///
    /// Latitude (the point's `y` mapped to `[0, 1]`) is perturbed by noise,
    /// then each band pulls the index toward its own position with a weight
    /// that ramps across `blend_amount`, giving smooth band transitions.
    pub fn biome_percent(&self, point_on_unit_sphere: DVec3) -> f64 {
        let settings = &self.settings;
        let mut height_percent = (point_on_unit_sphere.y + 1.0) / 2.0;
        height_percent += (self.noise_filter.evaluate(point_on_unit_sphere)
            - settings.noise_offset)
            * settings.noise_strength;

        let num_biomes = settings.biomes.len();
        let blend_range = settings.blend_amount / 2.0 + 0.001;

        let mut biome_index = 0.0;
        for (i, band) in settings.biomes.iter().enumerate() {
            let distance = height_percent - band.start_height;
            let weight = ((distance + blend_range) / (2.0 * blend_range)).clamp(0.0, 1.0);
            biome_index *= 1.0 - weight;
            biome_index += i as f64 * weight;
        }
        biome_index / 1.0f64.max(num_biomes.saturating_sub(1) as f64)
    }

    pub fn settings(&self) -> &BiomeSettings {
        &self.settings
    }
}

//! The layered elevation model for spherical bodies.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use terra_noise::{NoiseFilter, NoiseLayerSettings, make_noise_filter};

use crate::minmax::MinMaxTracker;

/// Shape configuration for a planet: radius plus an ordered noise layer
/// stack. Layer order matters because layer 0 doubles as the mask source
/// for layers that request it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShapeSettings {
    /// Base radius of the planet at zero elevation.
    pub planet_radius: f64,
    /// Seed used to construct every layer's noise source.
    pub seed: u32,
    /// The elevation layers, evaluated in order.
    pub noise_layers: Vec<NoiseLayerSettings>,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            planet_radius: 1.0,
            seed: 0,
            noise_layers: vec![NoiseLayerSettings::default()],
        }
    }
}

/// Evaluates the layered elevation model and tracks the elevation range.
///
/// Rebuilt from scratch whenever its settings change; filter instances are
/// constructed once here rather than per evaluation.
pub struct ShapeGenerator {
    settings: ShapeSettings,
    noise_filters: Vec<Box<dyn NoiseFilter>>,
    elevation_min_max: MinMaxTracker,
}

impl ShapeGenerator {
    pub fn new(settings: ShapeSettings) -> Self {
        let noise_filters = settings
            .noise_layers
            .iter()
            .map(|layer| make_noise_filter(layer, settings.seed))
            .collect();
        Self {
            settings,
            noise_filters,
            elevation_min_max: MinMaxTracker::new(),
        }
    }

    /// Elevation of `point_on_unit_sphere` before radius scaling.
    ///
    /// Layer 0 is always evaluated so its value can mask later layers,
    /// but contributes to elevation only when enabled. Each call records
    /// the result in the running range tracker; callers must finish all
    /// elevation reads for a build before consuming the tracker.
    pub fn unscaled_elevation(&mut self, point_on_unit_sphere: DVec3) -> f64 {
        let mut first_layer_value = 0.0;
        let mut elevation = 0.0;

        if let Some(first) = self.noise_filters.first() {
            first_layer_value = first.evaluate(point_on_unit_sphere);
            if self.settings.noise_layers[0].enabled {
                elevation = first_layer_value;
            }
        }

        for (layer, filter) in self
            .settings
            .noise_layers
            .iter()
            .zip(&self.noise_filters)
            .skip(1)
        {
            if layer.enabled {
                let mask = if layer.use_first_layer_as_mask {
                    first_layer_value
                } else {
                    1.0
                };
                elevation += filter.evaluate(point_on_unit_sphere) * mask;
            }
        }

        self.elevation_min_max.observe(elevation);
        elevation
    }

    /// Distance from the planet centre for an unscaled elevation value.
    ///
    /// Negative elevation is clamped to the sphere surface, which is what
    /// lets `min_value` carve flat ocean floors.
    pub fn scaled_elevation(&self, unscaled_elevation: f64) -> f64 {
        self.settings.planet_radius * (1.0 + unscaled_elevation.max(0.0))
    }

    /// Range of unscaled elevations observed since construction.
    pub fn elevation_min_max(&self) -> &MinMaxTracker {
        &self.elevation_min_max
    }

    pub fn settings(&self) -> &ShapeSettings {
        &self.settings
    }
}

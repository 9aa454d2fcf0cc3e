//! Smooth layered noise filter.

use glam::DVec3;
use noise::{NoiseFn, Simplex};

use crate::filter::NoiseFilter;
use crate::settings::NoiseLayerSettings;

/// Sums octaves of simplex noise, each rescaled from `[-1, 1]` to `[0, 1]`
/// and weighted by a decaying amplitude. Produces broad, rolling elevation.
pub struct SimpleNoiseFilter {
    settings: NoiseLayerSettings,
    source: Simplex,
}

impl SimpleNoiseFilter {
    /// Create a filter from layer settings and a noise seed.
    pub fn new(settings: NoiseLayerSettings, seed: u32) -> Self {
        Self {
            settings,
            source: Simplex::new(seed),
        }
    }
}

impl NoiseFilter for SimpleNoiseFilter {
    fn evaluate(&self, point: DVec3) -> f64 {
        let mut noise_value = 0.0;
        let mut frequency = self.settings.base_roughness;
        let mut amplitude = 1.0;

        for _ in 0..self.settings.num_octaves {
            let sample = point * frequency + self.settings.centre;
            let v = self.source.get(sample.to_array());
            noise_value += (v + 1.0) * 0.5 * amplitude;
            frequency *= self.settings.roughness;
            amplitude *= self.settings.persistence;
        }

        (noise_value - self.settings.min_value) * self.settings.strength
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_octaves_yields_shifted_zero() {
        let filter = SimpleNoiseFilter::new(
            NoiseLayerSettings {
                num_octaves: 0,
                min_value: 0.25,
                strength: 2.0,
                ..Default::default()
            },
            0,
        );
        let v = filter.evaluate(DVec3::new(0.7, 0.1, -0.3));
        assert_eq!(v, -0.5, "no octaves: output is (0 - min_value) * strength");
    }

    #[test]
    fn test_single_octave_matches_raw_source() {
        let settings = NoiseLayerSettings {
            num_octaves: 1,
            base_roughness: 1.7,
            centre: DVec3::new(0.3, 0.0, -1.1),
            ..Default::default()
        };
        let filter = SimpleNoiseFilter::new(settings.clone(), 9);
        let source = Simplex::new(9);

        let point = DVec3::new(0.2, -0.6, 0.77);
        let sample = point * settings.base_roughness + settings.centre;
        let expected = (source.get(sample.to_array()) + 1.0) * 0.5;
        assert_eq!(filter.evaluate(point), expected);
    }

    #[test]
    fn test_output_bounded_by_amplitude_sum() {
        let octaves = 5u32;
        let persistence = 0.5;
        let filter = SimpleNoiseFilter::new(
            NoiseLayerSettings {
                num_octaves: octaves,
                persistence,
                ..Default::default()
            },
            3,
        );

        let mut max_sum = 0.0;
        let mut amp = 1.0;
        for _ in 0..octaves {
            max_sum += amp;
            amp *= persistence;
        }

        for i in 0..200 {
            let t = i as f64 * 0.05;
            let point = DVec3::new(t.sin(), t.cos(), (t * 0.7).sin()).normalize();
            let v = filter.evaluate(point);
            assert!(
                (0.0..=max_sum).contains(&v),
                "octave sum {v} outside [0, {max_sum}] at {point:?}"
            );
        }
    }

    #[test]
    fn test_strength_scales_output() {
        let base = NoiseLayerSettings {
            num_octaves: 2,
            ..Default::default()
        };
        let unit = SimpleNoiseFilter::new(base.clone(), 5);
        let tripled = SimpleNoiseFilter::new(
            NoiseLayerSettings {
                strength: 3.0,
                ..base
            },
            5,
        );
        let point = DVec3::new(0.4, 0.4, -0.8);
        let expected = unit.evaluate(point) * 3.0;
        assert!((tripled.evaluate(point) - expected).abs() < 1e-12);
    }
}

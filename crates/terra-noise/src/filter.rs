//! The noise filter capability and the variant factory.

use glam::DVec3;

use crate::ridged::RidgedNoiseFilter;
use crate::settings::{FilterVariant, NoiseLayerSettings};
use crate::simple::SimpleNoiseFilter;

/// A scalar noise field over 3D space.
///
/// Implementations are deterministic for a fixed configuration and seed:
/// evaluating the same point twice always yields the same value, and no
/// state outside the filter itself is consulted.
pub trait NoiseFilter: Send + Sync {
    /// Evaluate the filter at a point (typically on the unit sphere).
    fn evaluate(&self, point: DVec3) -> f64;
}

/// Construct the filter described by `settings`, seeded with `seed`.
///
/// Callers only depend on the [`NoiseFilter`] capability, so adding a new
/// variant is local to this module.
pub fn make_noise_filter(settings: &NoiseLayerSettings, seed: u32) -> Box<dyn NoiseFilter> {
    match settings.variant {
        FilterVariant::Simple => Box::new(SimpleNoiseFilter::new(settings.clone(), seed)),
        FilterVariant::Ridged => Box::new(RidgedNoiseFilter::new(settings.clone(), seed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_dispatches_on_variant() {
        let point = DVec3::new(0.3, -0.4, 0.86);
        let simple_settings = NoiseLayerSettings {
            variant: FilterVariant::Simple,
            num_octaves: 3,
            ..Default::default()
        };
        let ridged_settings = NoiseLayerSettings {
            variant: FilterVariant::Ridged,
            ..simple_settings.clone()
        };

        let simple = make_noise_filter(&simple_settings, 7);
        let ridged = make_noise_filter(&ridged_settings, 7);

        let direct_simple = SimpleNoiseFilter::new(simple_settings, 7);
        let direct_ridged = RidgedNoiseFilter::new(ridged_settings, 7);

        assert_eq!(simple.evaluate(point), direct_simple.evaluate(point));
        assert_eq!(ridged.evaluate(point), direct_ridged.evaluate(point));
    }

    #[test]
    fn test_filters_are_deterministic() {
        let settings = NoiseLayerSettings {
            num_octaves: 4,
            ..Default::default()
        };
        let a = make_noise_filter(&settings, 42);
        let b = make_noise_filter(&settings, 42);
        let point = DVec3::new(0.1, 0.9, -0.2);
        assert_eq!(
            a.evaluate(point),
            b.evaluate(point),
            "same settings and seed must produce identical values"
        );
    }

    #[test]
    fn test_different_seeds_differ() {
        let settings = NoiseLayerSettings::default();
        let a = make_noise_filter(&settings, 1);
        let b = make_noise_filter(&settings, 2);
        let point = DVec3::new(0.5, 0.5, 0.5);
        assert_ne!(
            a.evaluate(point),
            b.evaluate(point),
            "different seeds should produce different fields"
        );
    }
}

//! Noise map and height map generation.

use glam::DVec2;
use noise::{NoiseFn, Perlin};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{HeightfieldSettings, NoiseConfig, NormalizeMode};
use crate::falloff::generate_falloff_map;

/// Octave offset jitter range, in sample-space units. Drawn as a float so
/// integer scales still sample between gradient lattice points, where the
/// noise is non-zero.
const OFFSET_JITTER: f64 = 100_000.0;

/// A finished grid of elevation values with exact bounds.
///
/// Immutable once produced: `min_value()` and `max_value()` are the exact
/// minimum and maximum over `values`.
#[derive(Clone, Debug)]
pub struct HeightMap {
    width: usize,
    height: usize,
    values: Vec<f64>,
    min_value: f64,
    max_value: f64,
}

impl HeightMap {
    /// Wrap a row-major grid, computing its exact bounds.
    pub fn from_values(width: usize, height: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        let mut min_value = f64::INFINITY;
        let mut max_value = f64::NEG_INFINITY;
        for &v in &values {
            min_value = min_value.min(v);
            max_value = max_value.max(v);
        }
        Self {
            width,
            height,
            values,
            min_value,
            max_value,
        }
    }

    /// Grid width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in samples.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample the grid at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    /// Exact minimum over the grid.
    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    /// Exact maximum over the grid.
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// The full row-major value buffer.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Fold the full 64-bit seed into the gradient table seed, so seeds that
/// differ only in the high bits get distinct gradients.
#[inline]
fn gradient_seed(seed: u64) -> u32 {
    (seed as u32) ^ ((seed >> 32) as u32)
}

/// Generate a raw normalized noise grid, row-major `width × height`.
///
/// Each octave samples gradient noise at a seeded random offset (plus the
/// configured offset and `sample_centre`, with the Y axis negated by
/// convention so increasing world Y walks "up" the map). Octave amplitudes
/// decay by `persistence`, frequencies grow by `lacunarity`.
///
/// With [`NormalizeMode::Global`] each cell is rescaled by the theoretical
/// maximum amplitude sum and clamped to `>= 0`, so neighbouring grids line
/// up. With [`NormalizeMode::Local`] the grid is inverse-lerped between its
/// own observed bounds into exactly `[0, 1]`; a constant grid maps to 0.5.
pub fn generate_noise_map(
    width: usize,
    height: usize,
    config: &NoiseConfig,
    sample_centre: DVec2,
) -> Vec<f64> {
    // Validation boundary: everything below assumes clamped ranges.
    let config = config.validated();
    let perlin = Perlin::new(gradient_seed(config.seed));
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let mut octave_offsets = Vec::with_capacity(config.octaves as usize);
    let mut max_possible_height = 0.0;
    let mut amplitude = 1.0;
    for _ in 0..config.octaves {
        let jitter_x = rng.random_range(-OFFSET_JITTER..OFFSET_JITTER);
        let jitter_y = rng.random_range(-OFFSET_JITTER..OFFSET_JITTER);
        octave_offsets.push(DVec2::new(
            jitter_x + config.offset.x + sample_centre.x,
            jitter_y - config.offset.y - sample_centre.y,
        ));
        max_possible_height += amplitude;
        amplitude *= config.persistence;
    }

    let mut map = vec![0.0; width * height];
    let mut max_observed = f64::NEG_INFINITY;
    let mut min_observed = f64::INFINITY;
    let half_width = width as f64 / 2.0;
    let half_height = height as f64 / 2.0;

    for y in 0..height {
        for x in 0..width {
            let mut amplitude = 1.0;
            let mut frequency = 1.0;
            let mut noise_height = 0.0;

            for offset in &octave_offsets {
                let sample_x = (x as f64 - half_width + offset.x) / config.scale * frequency;
                let sample_y = (y as f64 - half_height + offset.y) / config.scale * frequency;
                let value = perlin.get([sample_x, sample_y]);
                noise_height += value * amplitude;

                amplitude *= config.persistence;
                frequency *= config.lacunarity;
            }

            max_observed = max_observed.max(noise_height);
            min_observed = min_observed.min(noise_height);

            map[y * width + x] = match config.normalize_mode {
                NormalizeMode::Global => {
                    let normalized = (noise_height + 1.0) / (max_possible_height / 0.9);
                    normalized.max(0.0)
                }
                NormalizeMode::Local => noise_height,
            };
        }
    }

    if config.normalize_mode == NormalizeMode::Local {
        let span = max_observed - min_observed;
        for value in &mut map {
            // A constant grid has no span to normalize over; define the
            // result as the midpoint.
            *value = if span == 0.0 {
                0.5
            } else {
                (*value - min_observed) / span
            };
        }
    }

    map
}

/// Generate a finished [`HeightMap`] for a sample region.
///
/// Runs the noise map, multiplies in a falloff grid when requested (before
/// the curve pass), then applies the remap curve and height multiplier to
/// every cell while tracking the final bounds.
pub fn generate_height_map(
    width: usize,
    height: usize,
    settings: &HeightfieldSettings,
    sample_centre: DVec2,
) -> HeightMap {
    let mut values = generate_noise_map(width, height, &settings.noise, sample_centre);

    if settings.use_falloff {
        // Falloff grids are square; heightfield regions are too.
        debug_assert_eq!(width, height, "falloff requires a square sample region");
        let falloff = generate_falloff_map(width);
        for (value, attenuation) in values.iter_mut().zip(&falloff) {
            *value *= attenuation;
        }
    }

    let mut min_value = f64::INFINITY;
    let mut max_value = f64::NEG_INFINITY;
    for value in &mut values {
        *value *= settings.height_curve.evaluate(*value) * settings.height_multiplier;
        min_value = min_value.min(*value);
        max_value = max_value.max(*value);
    }

    HeightMap {
        width,
        height,
        values,
        min_value,
        max_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{CurveKey, HeightCurve};

    fn local_config(seed: u64) -> NoiseConfig {
        NoiseConfig {
            normalize_mode: NormalizeMode::Local,
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn test_local_mode_covers_exact_unit_interval() {
        let map = generate_noise_map(32, 32, &local_config(7), DVec2::ZERO);
        let min = map.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = map.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min, 0.0, "local normalization must hit exactly 0");
        assert_eq!(max, 1.0, "local normalization must hit exactly 1");
    }

    #[test]
    fn test_global_mode_values_are_non_negative() {
        let config = NoiseConfig {
            normalize_mode: NormalizeMode::Global,
            ..Default::default()
        };
        let map = generate_noise_map(24, 24, &config, DVec2::new(300.0, -120.0));
        for v in map {
            assert!(v >= 0.0, "global mode clamps to >= 0, got {v}");
        }
    }

    #[test]
    fn test_small_grid_scenario_is_deterministic() {
        let config = NoiseConfig {
            normalize_mode: NormalizeMode::Local,
            scale: 1.0,
            octaves: 1,
            persistence: 0.6,
            lacunarity: 2.0,
            seed: 0,
            offset: DVec2::ZERO,
        };
        let first = generate_noise_map(4, 4, &config, DVec2::ZERO);
        let second = generate_noise_map(4, 4, &config, DVec2::ZERO);
        assert_eq!(first, second, "same seed must reproduce the same grid");

        let min = first.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = first.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_integer_scale_samples_off_the_gradient_lattice() {
        // Perlin noise is zero at every lattice point, so integer scales
        // only produce a varying grid if the octave offsets are fractional.
        let config = NoiseConfig {
            normalize_mode: NormalizeMode::Local,
            scale: 1.0,
            octaves: 1,
            ..Default::default()
        };
        let map = generate_noise_map(4, 4, &config, DVec2::ZERO);
        assert!(
            map.iter().any(|&v| v != map[0]),
            "grid at scale 1 must not be constant"
        );
    }

    #[test]
    fn test_seeds_differing_only_in_high_bits_get_distinct_gradients() {
        let low = 7u64;
        let high = 7u64 | (1 << 32);
        assert_ne!(gradient_seed(low), gradient_seed(high));
        assert_ne!(
            generate_noise_map(8, 8, &local_config(low), DVec2::ZERO),
            generate_noise_map(8, 8, &local_config(high), DVec2::ZERO)
        );
    }

    #[test]
    fn test_single_cell_grid_normalizes_to_midpoint() {
        let map = generate_noise_map(1, 1, &local_config(3), DVec2::ZERO);
        assert_eq!(map, vec![0.5], "constant grid has no span; defined as 0.5");
    }

    #[test]
    fn test_different_seeds_produce_different_grids() {
        let a = generate_noise_map(8, 8, &local_config(1), DVec2::ZERO);
        let b = generate_noise_map(8, 8, &local_config(2), DVec2::ZERO);
        assert_ne!(a, b);
    }

    #[test]
    fn test_global_mode_grids_agree_where_they_overlap() {
        let config = NoiseConfig {
            normalize_mode: NormalizeMode::Global,
            scale: 25.0,
            octaves: 4,
            ..Default::default()
        };
        let base = generate_noise_map(16, 16, &config, DVec2::ZERO);
        let shifted = generate_noise_map(16, 16, &config, DVec2::new(1.0, 0.0));
        // Shifting the sample centre right by one column slides the window:
        // column x of the base grid reappears at column x - 1.
        for y in 0..16 {
            for x in 1..16 {
                let a = base[y * 16 + x];
                let b = shifted[y * 16 + (x - 1)];
                assert!(
                    (a - b).abs() < 1e-9,
                    "overlap mismatch at ({x}, {y}): {a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn test_height_map_bounds_are_exact() {
        let settings = HeightfieldSettings {
            height_multiplier: 12.0,
            ..Default::default()
        };
        let map = generate_height_map(20, 20, &settings, DVec2::ZERO);
        let mut expected_min = f64::INFINITY;
        let mut expected_max = f64::NEG_INFINITY;
        for y in 0..20 {
            for x in 0..20 {
                let v = map.get(x, y);
                expected_min = expected_min.min(v);
                expected_max = expected_max.max(v);
                assert!(map.min_value() <= v && v <= map.max_value());
            }
        }
        assert_eq!(map.min_value(), expected_min);
        assert_eq!(map.max_value(), expected_max);
    }

    #[test]
    fn test_falloff_zeroes_the_corners() {
        let settings = HeightfieldSettings {
            use_falloff: true,
            noise: local_config(5),
            ..Default::default()
        };
        let map = generate_height_map(17, 17, &settings, DVec2::ZERO);
        assert_eq!(map.get(0, 0), 0.0);
        assert_eq!(map.get(16, 0), 0.0);
        assert_eq!(map.get(0, 16), 0.0);
        assert_eq!(map.get(16, 16), 0.0);
    }

    #[test]
    fn test_curve_and_multiplier_are_applied() {
        // A constant curve makes the final value curve(v) * multiplier * v.
        let settings = HeightfieldSettings {
            noise: local_config(9),
            height_multiplier: 4.0,
            height_curve: HeightCurve::new(vec![CurveKey::new(0.0, 0.5)]).unwrap(),
            ..Default::default()
        };
        let raw = generate_noise_map(10, 10, &settings.noise, DVec2::ZERO);
        let map = generate_height_map(10, 10, &settings, DVec2::ZERO);
        for y in 0..10 {
            for x in 0..10 {
                let expected = raw[y * 10 + x] * 0.5 * 4.0;
                assert!((map.get(x, y) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_from_values_computes_bounds() {
        let map = HeightMap::from_values(2, 2, vec![3.0, -1.0, 0.5, 2.0]);
        assert_eq!(map.min_value(), -1.0);
        assert_eq!(map.max_value(), 3.0);
        assert_eq!(map.get(1, 0), -1.0);
        assert_eq!(map.get(0, 1), 0.5);
    }
}

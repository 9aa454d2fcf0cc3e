//! Edge falloff multiplier grids.

/// Steepness of the falloff transition curve.
const FALLOFF_STEEPNESS: f64 = 3.0;
/// Controls where along the radius the transition happens.
const FALLOFF_SHIFT: f64 = 2.2;

/// Generate a square multiplier grid that fades from 1 at the center to 0
/// at the corners, row-major `dimension × dimension`.
///
/// Each cell's coordinates are normalized to `[-1, 1]`, the Chebyshev
/// distance from center is pushed through the rational smoothing curve
/// `x³ / (x³ + (2.2 − 2.2·x)³)`, and the result is inverted so the center
/// is attenuation-free. Pure function of `dimension`, so results can be
/// cached per dimension by callers that regenerate chunks frequently.
pub fn generate_falloff_map(dimension: usize) -> Vec<f64> {
    if dimension == 0 {
        return Vec::new();
    }
    if dimension == 1 {
        return vec![1.0];
    }

    let mut map = vec![0.0; dimension * dimension];
    let last = (dimension - 1) as f64;
    for row in 0..dimension {
        for col in 0..dimension {
            let vertical = row as f64 / last * 2.0 - 1.0;
            let horizontal = col as f64 / last * 2.0 - 1.0;
            let edge_distance = horizontal.abs().max(vertical.abs());
            map[row * dimension + col] = 1.0 - falloff_curve(edge_distance);
        }
    }
    map
}

/// Rational smoothstep-like transition, 0 at the center of the region and
/// 1 at its edges.
fn falloff_curve(x: f64) -> f64 {
    let a = FALLOFF_STEEPNESS;
    let b = FALLOFF_SHIFT;
    let rising = x.powf(a);
    rising / (rising + (b - b * x).powf(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_of_odd_grid_is_exactly_one() {
        for dimension in [3usize, 5, 9, 47] {
            let map = generate_falloff_map(dimension);
            let mid = dimension / 2;
            assert_eq!(
                map[mid * dimension + mid],
                1.0,
                "center cell of a {dimension}x{dimension} grid must not attenuate"
            );
        }
    }

    #[test]
    fn test_corners_are_fully_attenuated() {
        let dimension = 11;
        let map = generate_falloff_map(dimension);
        for &(row, col) in &[(0, 0), (0, dimension - 1), (dimension - 1, 0)] {
            let v = map[row * dimension + col];
            assert!(v.abs() < 1e-9, "corner ({row}, {col}) should be ~0, got {v}");
        }
    }

    #[test]
    fn test_monotone_decrease_from_center_along_rays() {
        let dimension = 21;
        let map = generate_falloff_map(dimension);
        let mid = dimension / 2;

        // Walk outward along a row, a column, and a diagonal.
        for step in 1..=mid {
            let along_row = map[mid * dimension + (mid + step)];
            let prev_row = map[mid * dimension + (mid + step - 1)];
            assert!(
                along_row < prev_row,
                "row ray must strictly decrease: step {step}: {along_row} !< {prev_row}"
            );

            let along_col = map[(mid + step) * dimension + mid];
            let prev_col = map[(mid + step - 1) * dimension + mid];
            assert!(along_col < prev_col, "column ray must strictly decrease");

            let along_diag = map[(mid + step) * dimension + (mid + step)];
            let prev_diag = map[(mid + step - 1) * dimension + (mid + step - 1)];
            assert!(along_diag < prev_diag, "diagonal ray must strictly decrease");
        }
    }

    #[test]
    fn test_quarter_turn_symmetry() {
        let dimension = 16;
        let map = generate_falloff_map(dimension);
        for row in 0..dimension {
            for col in 0..dimension {
                // 90° rotation maps (row, col) to (col, dimension-1-row).
                let rotated = map[col * dimension + (dimension - 1 - row)];
                let original = map[row * dimension + col];
                assert!(
                    (original - rotated).abs() < 1e-12,
                    "falloff must be symmetric under quarter turns at ({row}, {col})"
                );
            }
        }
    }

    #[test]
    fn test_degenerate_dimensions() {
        assert!(generate_falloff_map(0).is_empty());
        assert_eq!(generate_falloff_map(1), vec![1.0]);
    }

    #[test]
    fn test_values_stay_in_unit_interval() {
        let dimension = 33;
        for v in generate_falloff_map(dimension) {
            assert!((0.0..=1.0).contains(&v), "falloff value {v} outside [0, 1]");
        }
    }
}

//! Running elevation range tracker.

/// Tracks the minimum and maximum of a stream of elevation samples.
///
/// Starts at `{+∞, −∞}` so the first observed value becomes both bounds.
/// The range only ever widens; material collaborators read it after all
/// elevation sampling for a build has completed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxTracker {
    min: f64,
    max: f64,
}

impl MinMaxTracker {
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Widens the tracked range to include `value`.
    pub fn observe(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Smallest value observed so far, or `+∞` before any observation.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest value observed so far, or `−∞` before any observation.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// True once at least one value has been observed.
    pub fn has_observations(&self) -> bool {
        self.min <= self.max
    }
}

impl Default for MinMaxTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_tracker_has_inverted_infinite_bounds() {
        let tracker = MinMaxTracker::new();
        assert_eq!(tracker.min(), f64::INFINITY);
        assert_eq!(tracker.max(), f64::NEG_INFINITY);
        assert!(!tracker.has_observations());
    }

    #[test]
    fn test_first_observation_sets_both_bounds() {
        let mut tracker = MinMaxTracker::new();
        tracker.observe(3.5);
        assert_eq!(tracker.min(), 3.5);
        assert_eq!(tracker.max(), 3.5);
        assert!(tracker.has_observations());
    }

    #[test]
    fn test_range_widens_and_never_narrows() {
        let mut tracker = MinMaxTracker::new();
        for value in [0.2, -1.0, 4.0, 0.0, 3.9] {
            tracker.observe(value);
        }
        assert_eq!(tracker.min(), -1.0);
        assert_eq!(tracker.max(), 4.0);

        tracker.observe(1.5);
        assert_eq!(tracker.min(), -1.0, "interior samples must not narrow the range");
        assert_eq!(tracker.max(), 4.0);
    }
}

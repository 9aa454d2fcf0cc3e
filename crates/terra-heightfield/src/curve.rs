//! Piecewise-linear remapping curve for normalized heights.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a [`HeightCurve`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeightCurveError {
    /// A curve needs at least one key to evaluate.
    #[error("height curve requires at least one key")]
    Empty,
}

/// A single `(position, value)` key on a curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    /// Position along the input axis.
    pub t: f64,
    /// Curve value at that position.
    pub value: f64,
}

impl CurveKey {
    /// Create a key at input position `t` with the given value.
    pub fn new(t: f64, value: f64) -> Self {
        Self { t, value }
    }
}

/// Piecewise-linear curve evaluated over `[first key, last key]`, clamped
/// at both ends. Stands in for an authored easing/remap curve.
///
/// Serialized as a bare key list; deserialization goes through
/// [`HeightCurve::new`] so an empty list is rejected before it can reach
/// generation code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct HeightCurve {
    keys: Vec<CurveKey>,
}

impl TryFrom<Vec<CurveKey>> for HeightCurve {
    type Error = HeightCurveError;

    fn try_from(keys: Vec<CurveKey>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<HeightCurve> for Vec<CurveKey> {
    fn from(curve: HeightCurve) -> Self {
        curve.keys
    }
}

impl HeightCurve {
    /// Build a curve from keys. Keys are sorted by position on construction.
    pub fn new(mut keys: Vec<CurveKey>) -> Result<Self, HeightCurveError> {
        if keys.is_empty() {
            return Err(HeightCurveError::Empty);
        }
        keys.sort_by(|a, b| a.t.total_cmp(&b.t));
        Ok(Self { keys })
    }

    /// The identity curve: evaluates to its input over `[0, 1]`.
    pub fn identity() -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, 0.0), CurveKey::new(1.0, 1.0)],
        }
    }

    /// A curve that evaluates to `value` everywhere.
    pub fn constant(value: f64) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, value)],
        }
    }

    /// Evaluate the curve at `t`, clamping outside the keyed range.
    pub fn evaluate(&self, t: f64) -> f64 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if t <= first.t {
            return first.value;
        }
        if t >= last.t {
            return last.value;
        }
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.t {
                let span = b.t - a.t;
                if span == 0.0 {
                    return b.value;
                }
                let frac = (t - a.t) / span;
                return a.value + (b.value - a.value) * frac;
            }
        }
        last.value
    }

    /// The curve's keys, sorted by position.
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }
}

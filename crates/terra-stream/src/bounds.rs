//! Axis-aligned chunk bounds on the ground plane.

use glam::DVec2;

/// An axis-aligned rectangle on the XZ ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    centre: DVec2,
    half_extents: DVec2,
}

impl Rect {
    pub fn new(centre: DVec2, size: DVec2) -> Self {
        Self {
            centre,
            half_extents: size / 2.0,
        }
    }

    pub fn centre(&self) -> DVec2 {
        self.centre
    }

    /// Squared distance from `point` to the nearest point of the rectangle.
    ///
    /// Zero when the point lies inside.
    pub fn sqr_distance(&self, point: DVec2) -> f64 {
        let delta = ((point - self.centre).abs() - self.half_extents).max(DVec2::ZERO);
        delta.length_squared()
    }
}

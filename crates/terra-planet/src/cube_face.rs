//! The six face orientations of a cube-projected sphere.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// One of the six cube faces, named by the axis its outward normal follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CubeFace {
    /// +Y face
    Top = 0,
    /// −Y face
    Bottom = 1,
    /// −X face
    Left = 2,
    /// +X face
    Right = 3,
    /// +Z face
    Front = 4,
    /// −Z face
    Back = 5,
}

impl CubeFace {
    /// All six faces in canonical order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Top,
        CubeFace::Bottom,
        CubeFace::Left,
        CubeFace::Right,
        CubeFace::Front,
        CubeFace::Back,
    ];

    /// Outward-pointing unit normal for this face.
    #[must_use]
    pub fn local_up(self) -> DVec3 {
        match self {
            CubeFace::Top => DVec3::Y,
            CubeFace::Bottom => DVec3::NEG_Y,
            CubeFace::Left => DVec3::NEG_X,
            CubeFace::Right => DVec3::X,
            CubeFace::Front => DVec3::Z,
            CubeFace::Back => DVec3::NEG_Z,
        }
    }

    /// Direction of increasing `u` across this face: the local up with its
    /// components cycled, which is always perpendicular to it.
    #[must_use]
    pub fn axis_a(self) -> DVec3 {
        let up = self.local_up();
        DVec3::new(up.y, up.z, up.x)
    }

    /// Direction of increasing `v` across this face.
    #[must_use]
    pub fn axis_b(self) -> DVec3 {
        self.local_up().cross(self.axis_a())
    }
}

/// Selects which faces of a planet get meshed.
///
/// Single-face masks exist for inspecting one face's output in isolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FaceRenderMask {
    /// Mesh all six faces.
    #[default]
    All,
    /// Mesh only the named face.
    Only(CubeFace),
}

impl FaceRenderMask {
    #[must_use]
    pub fn includes(self, face: CubeFace) -> bool {
        match self {
            FaceRenderMask::All => true,
            FaceRenderMask::Only(only) => only == face,
        }
    }
}

//! The six faces of the cube-sphere and their grid axes.

use glam::Vec3;

/// The six faces of the cube that forms the cube-sphere.
///
/// Discriminants follow generation order, so index buffers laid out face by
/// face can be addressed with `face as usize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CubeFace {
    /// +Y face
    PosY = 0,
    /// −Y face
    NegY = 1,
    /// −X face
    NegX = 2,
    /// +X face
    PosX = 3,
    /// +Z face
    PosZ = 4,
    /// −Z face
    NegZ = 5,
}

impl CubeFace {
    /// All six faces in generation order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::NegX,
        CubeFace::PosX,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// The opposite face (e.g., `PosX` → `NegX`).
    #[must_use]
    pub fn opposite(self) -> CubeFace {
        match self {
            CubeFace::PosX => CubeFace::NegX,
            CubeFace::NegX => CubeFace::PosX,
            CubeFace::PosY => CubeFace::NegY,
            CubeFace::NegY => CubeFace::PosY,
            CubeFace::PosZ => CubeFace::NegZ,
            CubeFace::NegZ => CubeFace::PosZ,
        }
    }

    /// Outward unit normal ("local up") of this face.
    #[must_use]
    pub fn normal(self) -> Vec3 {
        match self {
            CubeFace::PosX => Vec3::X,
            CubeFace::NegX => Vec3::NEG_X,
            CubeFace::PosY => Vec3::Y,
            CubeFace::NegY => Vec3::NEG_Y,
            CubeFace::PosZ => Vec3::Z,
            CubeFace::NegZ => Vec3::NEG_Z,
        }
    }

    /// Grid x axis: the normal's components rotated left, `(n.y, n.z, n.x)`.
    #[must_use]
    pub fn axis_a(self) -> Vec3 {
        let n = self.normal();
        Vec3::new(n.y, n.z, n.x)
    }

    /// Grid y axis: `normal × axis_a`.
    ///
    /// With this pairing `axis_a × axis_b == normal`, which is what makes the
    /// generator's fixed diagonal split wind counter-clockwise seen from outside.
    #[must_use]
    pub fn axis_b(self) -> Vec3 {
        self.normal().cross(self.axis_a())
    }
}

//! Core type aliases and re-exports

pub use glam::{Vec2, Vec3, Mat4};

/// Standard Result type for the crate
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// World-space extents of the terrain on the XZ plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainSize {
    pub x: f32,
    pub z: f32,
}

impl TerrainSize {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Half extents, used as the bounds of the centred terrain quad.
    pub fn half(&self) -> Vec2 {
        Vec2::new(self.x / 2.0, self.z / 2.0)
    }

    /// Extents truncated to whole world units.
    pub fn whole_units(&self) -> (usize, usize) {
        (self.x.max(0.0) as usize, self.z.max(0.0) as usize)
    }

    /// Clamp both axes into `[min, max]`.
    pub fn clamped(self, min: f32, max: f32) -> Self {
        Self {
            x: self.x.clamp(min, max),
            z: self.z.clamp(min, max),
        }
    }
}

impl Default for TerrainSize {
    fn default() -> Self {
        Self { x: 0.0, z: 0.0 }
    }
}

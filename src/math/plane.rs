//! Infinite plane

use crate::core::types::Vec3;

/// A plane defined by normal and distance from origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// The y = 0 plane the terrain quad lies on.
    pub fn ground() -> Self {
        Self::new(Vec3::Y, 0.0)
    }

    /// Signed distance from point to plane (positive = in front)
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_distance() {
        let plane = Plane::ground();
        assert_eq!(plane.distance_to_point(Vec3::new(4.0, 2.5, -1.0)), 2.5);
        assert_eq!(plane.distance_to_point(Vec3::new(0.0, -1.0, 0.0)), -1.0);
    }
}

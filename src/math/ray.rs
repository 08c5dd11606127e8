//! Ray type and operations

use crate::core::types::Vec3;
use super::plane::Plane;

/// Below this the ray is treated as parallel to a plane.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction does not need to be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray-plane intersection.
    /// Returns the ray parameter of the hit, or None when the ray is parallel
    /// to the plane or the plane lies behind the origin.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<f32> {
        let denom = plane.normal.dot(self.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = -plane.distance_to_point(self.origin) / denom;
        if t >= 0.0 { Some(t) } else { None }
    }

    /// Point where the ray meets the plane, if it does.
    pub fn plane_point(&self, plane: &Plane) -> Option<Vec3> {
        self.intersect_plane(plane).map(|t| self.at(t))
    }
}

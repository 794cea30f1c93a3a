//! Obstacle shape primitives for the narrow phase.

use crate::math::{Aabb, Vector2};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A circle used both as an obstacle shape and as a body's bounding volume
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Sphere {
    pub center: Vector2,
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere
    #[inline]
    pub fn new(center: Vector2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Checks if the sphere contains a point
    #[inline]
    pub fn contains_point(&self, point: Vector2) -> bool {
        self.center.distance_squared(&point) <= self.radius * self.radius
    }

    /// Checks if two spheres overlap
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(&other.center) <= reach * reach
    }

    /// Returns the tightest AABB around the sphere
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, Vector2::new(self.radius, self.radius))
    }
}

/// An oriented bounding box: center, half extents and rotation angle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Obb {
    pub center: Vector2,
    pub half_extents: Vector2,
    pub angle: f32,
}

impl Obb {
    /// Creates a new oriented box
    #[inline]
    pub fn new(center: Vector2, half_extents: Vector2, angle: f32) -> Self {
        Self { center, half_extents, angle }
    }

    /// Returns the box's two local axes in world space
    #[inline]
    pub fn axes(&self) -> [Vector2; 2] {
        let x_axis = Vector2::new(1.0, 0.0).rotated(self.angle);
        [x_axis, x_axis.perpendicular()]
    }

    /// Returns the four corners in world space
    pub fn corners(&self) -> [Vector2; 4] {
        let [ax, ay] = self.axes();
        let ex = ax * self.half_extents.x;
        let ey = ay * self.half_extents.y;
        [
            self.center + ex + ey,
            self.center - ex + ey,
            self.center - ex - ey,
            self.center + ex - ey,
        ]
    }

    /// Transforms a world point into the box's local frame
    #[inline]
    pub fn to_local(&self, point: Vector2) -> Vector2 {
        (point - self.center).rotated(-self.angle)
    }

    /// Transforms a local direction back into world space
    #[inline]
    pub fn to_world_vector(&self, v: Vector2) -> Vector2 {
        v.rotated(self.angle)
    }

    /// Checks if the box contains a point
    pub fn contains_point(&self, point: Vector2) -> bool {
        let local = self.to_local(point);
        local.x.abs() <= self.half_extents.x && local.y.abs() <= self.half_extents.y
    }

    /// Returns the tightest AABB around the box
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.corners()).unwrap_or(Aabb::new(self.center, self.center))
    }
}

/// Obstacle geometry, dispatched with a single match at the narrow phase
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ObstacleShape {
    Aabb(Aabb),
    Obb(Obb),
    Sphere(Sphere),
}

impl ObstacleShape {
    /// Returns the obstacle's world-space AABB
    pub fn aabb(&self) -> Aabb {
        match self {
            ObstacleShape::Aabb(aabb) => *aabb,
            ObstacleShape::Obb(obb) => obb.aabb(),
            ObstacleShape::Sphere(sphere) => sphere.aabb(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obb_corners_unrotated() {
        let obb = Obb::new(Vector2::zero(), Vector2::new(1.0, 0.5), 0.0);
        let aabb = obb.aabb();
        assert_eq!(aabb.min, Vector2::new(-1.0, -0.5));
        assert_eq!(aabb.max, Vector2::new(1.0, 0.5));
    }

    #[test]
    fn obb_contains_point_respects_rotation() {
        let obb = Obb::new(Vector2::zero(), Vector2::new(1.0, 0.1), std::f32::consts::FRAC_PI_2);
        // long axis now points along +y
        assert!(obb.contains_point(Vector2::new(0.0, 0.9)));
        assert!(!obb.contains_point(Vector2::new(0.9, 0.0)));
    }
}

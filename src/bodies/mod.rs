mod adapter;
mod rigid_body;
mod sleep;

pub use adapter::{BodyAdapter, ACTIVATION_GRACE_FRAMES};
pub use rigid_body::{RigidBody2D, RigidShape};
pub use sleep::SleepTracker;

use crate::collision::StaticObstacle;
use crate::math::{Aabb, Vector2};
use crate::shapes::Sphere;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Identifier for a body, unique within one simulation world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodyId(pub u64);

bitflags::bitflags! {
    /// Behavior flags shared by cloth and rigid bodies
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BodyFlags: u32 {
        /// The body may transition to sleeping
        const CAN_SLEEP = 1 << 0;
        /// Gravity is applied during integration
        const AFFECTED_BY_GRAVITY = 1 << 1;
    }
}

impl Default for BodyFlags {
    fn default() -> Self {
        Self::CAN_SLEEP | Self::AFFECTED_BY_GRAVITY
    }
}

/// Deep, independent copy of a body's debug state
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodySnapshot {
    pub id: BodyId,
    pub center: Vector2,
    pub radius: f32,
    pub sleeping: bool,
}

/// Capability set shared by the scheduler's body variants.
///
/// The scheduler dispatches through this trait instead of switching on the
/// concrete type; the penetration math stays body-specific while obstacle
/// bookkeeping is shared.
pub trait Body {
    /// Returns the body's identifier
    fn id(&self) -> BodyId;

    /// Advances the body by one tick; must be a no-op while sleeping
    fn update(&mut self, dt: f32);

    /// Returns whether the body is asleep
    fn is_sleeping(&self) -> bool;

    /// Forces the body awake
    fn wake(&mut self);

    /// Wakes the body if the point falls inside its bounding volume;
    /// returns whether it woke
    fn wake_if_point_inside(&mut self, point: Vector2) -> bool;

    /// Returns the body's world-space bounding sphere
    fn bounding_sphere(&self) -> Sphere;

    /// Returns the body's world-space AABB
    fn aabb(&self) -> Aabb;

    /// Returns a representative linear velocity used by the broad phase
    fn velocity(&self) -> Vector2;

    /// Applies an impulse around a world-space point
    fn apply_impulse(&mut self, point: Vector2, impulse: Vector2, radius: f32);

    /// Clamps the body into a box, bleeding velocity on contact
    fn constrain_within_aabb(&mut self, bounds: &Aabb, damping: f32);

    /// Resolves penetration against every static obstacle
    fn collide_with_obstacles(&mut self, obstacles: &[StaticObstacle], damping: f32);

    /// Produces an independent debug snapshot
    fn snapshot(&self) -> BodySnapshot {
        let sphere = self.bounding_sphere();
        BodySnapshot {
            id: self.id(),
            center: sphere.center,
            radius: sphere.radius,
            sleeping: self.is_sleeping(),
        }
    }
}

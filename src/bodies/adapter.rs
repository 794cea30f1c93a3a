use crate::bodies::SleepTracker;
use crate::math::Vector2;
use crate::shapes::Sphere;
use crate::world::SleepConfig;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Frames after activation during which a body can never be reported still;
/// gives a freshly pinned mesh time to sag before stillness is evaluated
pub const ACTIVATION_GRACE_FRAMES: u32 = 30;

const WORLD_STILL_VELOCITY_THRESHOLD: f32 = 1.0e-3;
const WORLD_STILL_FRAME_THRESHOLD: u32 = 10;

/// Bridges a body's local/model frame to the page's canonical world space.
///
/// Impulse points, pinned-vertex reporting and bounding volumes all pass
/// through this transform so collision and pointer math share one frame.
/// The adapter also tracks world-space stillness independently of the body's
/// local sleep test: a mesh that is locally static but whose containing
/// element is still being dragged or scaled must stay awake.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodyAdapter {
    position: Vector2,
    scale: f32,
    rotation: f32,
    last_position: Vector2,
    still: SleepTracker,
    grace_remaining: u32,
}

impl BodyAdapter {
    /// Creates an adapter placing the body's local origin at `position`
    pub fn new(position: Vector2, scale: f32, rotation: f32) -> Self {
        Self {
            position,
            scale: if scale.is_finite() && scale > 0.0 { scale } else { 1.0 },
            rotation,
            last_position: position,
            still: SleepTracker::new(&SleepConfig {
                velocity_threshold: WORLD_STILL_VELOCITY_THRESHOLD,
                frame_threshold: WORLD_STILL_FRAME_THRESHOLD,
            }),
            grace_remaining: ACTIVATION_GRACE_FRAMES,
        }
    }

    /// Returns the world position of the local origin
    #[inline]
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Moves the body's world placement; called while the containing element
    /// is dragged
    pub fn set_position(&mut self, position: Vector2) {
        if position.x.is_finite() && position.y.is_finite() {
            self.position = position;
        }
    }

    /// Returns the uniform local-to-world scale
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Updates the uniform scale; non-finite or non-positive values are
    /// ignored
    pub fn set_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale;
        }
    }

    /// Returns the local-to-world rotation in radians
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Updates the rotation; non-finite values are ignored
    pub fn set_rotation(&mut self, rotation: f32) {
        if rotation.is_finite() {
            self.rotation = rotation;
        }
    }

    /// Maps a local point into world space
    #[inline]
    pub fn to_world_point(&self, local: Vector2) -> Vector2 {
        self.position + (local * self.scale).rotated(self.rotation)
    }

    /// Maps a world point into the body's local frame
    #[inline]
    pub fn to_local_point(&self, world: Vector2) -> Vector2 {
        (world - self.position).rotated(-self.rotation) / self.scale
    }

    /// Maps a local direction into world space
    #[inline]
    pub fn to_world_vector(&self, local: Vector2) -> Vector2 {
        (local * self.scale).rotated(self.rotation)
    }

    /// Maps a world direction into the body's local frame
    #[inline]
    pub fn to_local_vector(&self, world: Vector2) -> Vector2 {
        world.rotated(-self.rotation) / self.scale
    }

    /// Maps a local-frame bounding sphere into world space
    pub fn to_world_sphere(&self, local: &Sphere) -> Sphere {
        Sphere::new(self.to_world_point(local.center), local.radius * self.scale)
    }

    /// Advances per-frame stillness bookkeeping; bodies call this once per
    /// tick before evaluating their local sleep test
    pub fn tick(&mut self) {
        let displacement_sq = self.position.distance_squared(&self.last_position);
        self.last_position = self.position;
        self.still.observe(displacement_sq);
        self.still.disturb(displacement_sq);
        if self.grace_remaining > 0 {
            self.grace_remaining -= 1;
        }
    }

    /// Whether the body's world placement has been still long enough for the
    /// local sleep test to count; never true during the activation grace
    /// window
    pub fn is_world_still(&self) -> bool {
        self.grace_remaining == 0 && self.still.is_sleeping()
    }

    /// Restarts the activation grace window and stillness tracking
    pub fn reset_grace(&mut self) {
        self.grace_remaining = ACTIVATION_GRACE_FRAMES;
        self.still.wake();
    }
}

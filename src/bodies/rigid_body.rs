use crate::bodies::{Body, BodyAdapter, BodyFlags, BodyId, SleepTracker};
use crate::collision::sat::{apply_restitution_friction, circle_aabb_push, obb_vs_aabb};
use crate::collision::StaticObstacle;
use crate::math::{Aabb, Vector2};
use crate::shapes::{Obb, ObstacleShape, Sphere};
use crate::world::SimulationConfig;

/// Scale of the cross-product torque proxy. Off-center impulses induce spin
/// qualitatively; there is no inertia tensor behind this value.
const TORQUE_SCALE: f32 = 0.5;

/// The rigid body's collision shape proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigidShape {
    /// A circle with diameter `min(width, height)`
    Circle,
    /// An oriented box with `width`/`height` extents
    Box,
}

/// A single-shape 2D body for non-cloth interactive elements.
///
/// Simplified dynamics: semi-implicit Euler integration, penetration
/// resolution against static obstacles, restitution on the contact normal,
/// and the same sleep hysteresis vocabulary the cloth bodies use.
pub struct RigidBody2D {
    id: BodyId,
    shape: RigidShape,
    position: Vector2,
    velocity: Vector2,
    angle: f32,
    angular_velocity: f32,
    width: f32,
    height: f32,
    restitution: f32,
    mass: f32,
    gravity: Vector2,
    flags: BodyFlags,
    sleep: SleepTracker,
    adapter: BodyAdapter,
}

impl RigidBody2D {
    /// Creates a rigid body at a world position
    pub fn new(
        id: BodyId,
        shape: RigidShape,
        position: Vector2,
        width: f32,
        height: f32,
        config: &SimulationConfig,
    ) -> Self {
        Self {
            id,
            shape,
            position,
            velocity: Vector2::zero(),
            angle: 0.0,
            angular_velocity: 0.0,
            width: width.max(crate::math::EPSILON),
            height: height.max(crate::math::EPSILON),
            restitution: 0.4,
            mass: 1.0,
            gravity: config.gravity.xy(),
            flags: BodyFlags::default(),
            sleep: SleepTracker::new(&config.sleep),
            adapter: BodyAdapter::new(position, 1.0, 0.0),
        }
    }

    /// Returns the body's position
    #[inline]
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Returns the body's linear velocity
    #[inline]
    pub fn linear_velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Sets the linear velocity and wakes the body
    pub fn set_linear_velocity(&mut self, velocity: Vector2) {
        if velocity.x.is_finite() && velocity.y.is_finite() {
            self.velocity = velocity;
            self.wake();
        }
    }

    /// Returns the body's rotation angle in radians
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Returns the body's angular velocity
    #[inline]
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Sets the restitution coefficient, clamped to [0, 1]; non-finite
    /// input is ignored
    pub fn set_restitution(&mut self, restitution: f32) {
        if restitution.is_finite() {
            self.restitution = restitution.clamp(0.0, 1.0);
        }
    }

    /// Sets the body's mass; non-finite or non-positive values are ignored
    pub fn set_mass(&mut self, mass: f32) {
        if mass.is_finite() && mass > 0.0 {
            self.mass = mass;
        }
    }

    /// The world placement adapter for this body
    pub fn adapter_mut(&mut self) -> &mut BodyAdapter {
        &mut self.adapter
    }

    /// Radius of the bounding circle around the shape
    pub fn bounding_radius(&self) -> f32 {
        match self.shape {
            RigidShape::Circle => self.width.min(self.height) * 0.5,
            RigidShape::Box => {
                0.5 * (self.width * self.width + self.height * self.height).sqrt()
            }
        }
    }

    fn half_extents(&self) -> Vector2 {
        Vector2::new(self.width * 0.5, self.height * 0.5)
    }

    fn as_obb(&self) -> Obb {
        Obb::new(self.position, self.half_extents(), self.angle)
    }

    /// Applies a push-out correction and reflects the contact-normal
    /// velocity component with restitution
    fn apply_correction(&mut self, push: Vector2) -> f32 {
        let depth_sq = push.length_squared();
        if depth_sq <= crate::math::EPSILON * crate::math::EPSILON {
            return 0.0;
        }
        self.position += push;
        let normal = push.normalize();
        if self.velocity.dot(&normal) < 0.0 {
            self.velocity = apply_restitution_friction(self.velocity, normal, self.restitution, 0.0);
        }
        depth_sq
    }

    fn resolve_against(&mut self, shape: &ObstacleShape) -> f32 {
        match shape {
            ObstacleShape::Aabb(aabb) => match self.shape {
                RigidShape::Circle => {
                    match circle_aabb_push(self.position, self.bounding_radius(), aabb) {
                        Some(push) => self.apply_correction(push),
                        None => 0.0,
                    }
                }
                RigidShape::Box => match resolve_box_aabb(&self.axis_aligned_box(), aabb) {
                    Some(push) => self.apply_correction(push),
                    None => 0.0,
                },
            },
            ObstacleShape::Obb(obb) => match self.shape {
                RigidShape::Circle => {
                    let local_box =
                        Aabb::from_center_half_extents(Vector2::zero(), obb.half_extents);
                    let local = obb.to_local(self.position);
                    match circle_aabb_push(local, self.bounding_radius(), &local_box) {
                        Some(push) => self.apply_correction(obb.to_world_vector(push)),
                        None => 0.0,
                    }
                }
                RigidShape::Box => {
                    let contact = obb_vs_aabb(obb, &self.axis_aligned_box());
                    if contact.collided {
                        // the SAT normal points from the body's AABB toward
                        // the obstacle OBB, so the body moves the other way
                        self.apply_correction(-contact.mtv)
                    } else {
                        0.0
                    }
                }
            },
            ObstacleShape::Sphere(sphere) => {
                let reach = self.bounding_radius() + sphere.radius;
                let delta = self.position - sphere.center;
                let dist_sq = delta.length_squared();
                if dist_sq >= reach * reach {
                    return 0.0;
                }
                let dist = dist_sq.sqrt();
                let normal = if dist > crate::math::EPSILON {
                    delta / dist
                } else {
                    Vector2::new(0.0, 1.0)
                };
                self.apply_correction(normal * (reach - dist))
            }
        }
    }

    fn axis_aligned_box(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents())
    }
}

impl Body for RigidBody2D {
    fn id(&self) -> BodyId {
        self.id
    }

    fn update(&mut self, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() || self.sleep.is_sleeping() {
            return;
        }

        if self.flags.contains(BodyFlags::AFFECTED_BY_GRAVITY) {
            self.velocity += self.gravity * dt;
        }
        self.position += self.velocity * dt;
        self.angle += self.angular_velocity * dt;

        self.adapter.tick();
        if self.flags.contains(BodyFlags::CAN_SLEEP) && self.adapter.is_world_still() {
            self.sleep.observe(self.velocity.length_squared());
        } else {
            self.sleep.hold_awake();
        }
    }

    fn is_sleeping(&self) -> bool {
        self.sleep.is_sleeping()
    }

    fn wake(&mut self) {
        self.sleep.wake();
    }

    fn wake_if_point_inside(&mut self, point: Vector2) -> bool {
        let inside = match self.shape {
            RigidShape::Circle => {
                Sphere::new(self.position, self.bounding_radius()).contains_point(point)
            }
            RigidShape::Box => self.as_obb().contains_point(point),
        };
        if inside {
            self.wake();
        }
        inside
    }

    fn bounding_sphere(&self) -> Sphere {
        Sphere::new(self.position, self.bounding_radius())
    }

    fn aabb(&self) -> Aabb {
        match self.shape {
            RigidShape::Circle => self.bounding_sphere().aabb(),
            RigidShape::Box => self.as_obb().aabb(),
        }
    }

    fn velocity(&self) -> Vector2 {
        self.velocity
    }

    fn apply_impulse(&mut self, point: Vector2, impulse: Vector2, _radius: f32) {
        if !impulse.x.is_finite() || !impulse.y.is_finite() {
            return;
        }
        self.wake();
        let inv_mass = 1.0 / self.mass;
        self.velocity += impulse * inv_mass;
        // crude torque proxy, see TORQUE_SCALE
        let offset = point - self.position;
        self.angular_velocity += offset.cross(&impulse) * TORQUE_SCALE * inv_mass;
    }

    fn constrain_within_aabb(&mut self, bounds: &Aabb, _damping: f32) {
        let half = match self.shape {
            RigidShape::Circle => {
                let r = self.bounding_radius();
                Vector2::new(r, r)
            }
            RigidShape::Box => self.half_extents(),
        };
        let lo = bounds.min + half;
        let hi = bounds.max - half;
        let mut correction_sq = 0.0f32;

        if self.position.x < lo.x {
            correction_sq += (lo.x - self.position.x).powi(2);
            self.position.x = lo.x;
            self.velocity.x = -self.velocity.x * self.restitution;
        } else if self.position.x > hi.x {
            correction_sq += (self.position.x - hi.x).powi(2);
            self.position.x = hi.x;
            self.velocity.x = -self.velocity.x * self.restitution;
        }
        if self.position.y < lo.y {
            correction_sq += (lo.y - self.position.y).powi(2);
            self.position.y = lo.y;
            self.velocity.y = -self.velocity.y * self.restitution;
        } else if self.position.y > hi.y {
            correction_sq += (self.position.y - hi.y).powi(2);
            self.position.y = hi.y;
            self.velocity.y = -self.velocity.y * self.restitution;
        }

        self.sleep.disturb(correction_sq);
    }

    fn collide_with_obstacles(&mut self, obstacles: &[StaticObstacle], _damping: f32) {
        if self.sleep.is_sleeping() {
            return;
        }
        let mut largest_sq = 0.0f32;
        for obstacle in obstacles {
            let shape = obstacle.shape;
            largest_sq = largest_sq.max(self.resolve_against(&shape));
        }
        self.sleep.disturb(largest_sq);
    }
}

/// Minimum-penetration-axis box-vs-AABB resolution for the axis-aligned
/// box proxy; candidate order matches the SAT tie-break convention
fn resolve_box_aabb(body: &Aabb, obstacle: &Aabb) -> Option<Vector2> {
    if !body.intersects(obstacle) {
        return None;
    }
    let left = body.max.x - obstacle.min.x;
    let right = obstacle.max.x - body.min.x;
    let bottom = body.max.y - obstacle.min.y;
    let top = obstacle.max.y - body.min.y;

    let mut depth = left;
    let mut push = Vector2::new(-left, 0.0);
    if right < depth {
        depth = right;
        push = Vector2::new(right, 0.0);
    }
    if bottom < depth {
        depth = bottom;
        push = Vector2::new(0.0, -bottom);
    }
    if top < depth {
        depth = top;
        push = Vector2::new(0.0, top);
    }
    if depth <= 0.0 {
        return None;
    }
    Some(push)
}

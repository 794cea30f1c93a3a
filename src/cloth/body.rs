use crate::bodies::{Body, BodyAdapter, BodyFlags, BodyId, SleepTracker};
use crate::cloth::{satisfy_constraints, DistanceConstraint, GravityController, Particle};
use crate::collision::sat::circle_aabb_push;
use crate::collision::StaticObstacle;
use crate::math::{Aabb, Vector2, Vector3, EPSILON};
use crate::shapes::{ObstacleShape, Sphere};
use crate::world::{PinMode, SimulationConfig, WarmStartConfig};

/// Particle collision radius as a fraction of the smallest structural rest
/// length; finer meshes get proportionally smaller radii
const PARTICLE_RADIUS_FRACTION: f32 = 0.3;

/// Nominal tick used for warm-start settling passes
const WARM_START_DT: f32 = 1.0 / 60.0;

/// A deformable body: a row-major particle grid with structural, shear and
/// bend distance constraints, advanced by sub-stepped Verlet integration.
///
/// Row 0 is the bottom of the grid and row `rows - 1` the top. The body is
/// the single writer of its particle buffer; renderers and debug overlays
/// read through the snapshot accessors.
pub struct ClothBody {
    id: BodyId,
    cols: usize,
    rows: usize,
    particles: Vec<Particle>,
    constraints: Vec<DistanceConstraint>,
    damping: f32,
    constraint_iterations: u32,
    substeps: u32,
    collision_radius: f32,
    gravity: GravityController,
    sleep: SleepTracker,
    flags: BodyFlags,
    adapter: BodyAdapter,
    bounding: Sphere,
}

impl ClothBody {
    /// Builds a cloth grid of `cols` x `rows` vertices covering `size`
    /// meters in the adapter's local frame, placed into world space through
    /// the adapter. The configured pin mode is applied immediately.
    pub fn new(
        id: BodyId,
        adapter: BodyAdapter,
        size: Vector2,
        cols: usize,
        rows: usize,
        config: &SimulationConfig,
    ) -> Self {
        let cols = cols.max(2);
        let rows = rows.max(2);

        let mut particles = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let local = Vector2::new(
                    (col as f32 / (cols - 1) as f32 - 0.5) * size.x,
                    (row as f32 / (rows - 1) as f32 - 0.5) * size.y,
                );
                let world = adapter.to_world_point(local);
                particles.push(Particle::new(world.extend(0.0), 1.0));
            }
        }

        let index = |col: usize, row: usize| row * cols + col;
        let rest = |particles: &[Particle], a: usize, b: usize| {
            particles[a].position.distance(&particles[b].position)
        };

        let mut constraints = Vec::new();
        let mut min_structural = f32::MAX;
        for row in 0..rows {
            for col in 0..cols {
                let here = index(col, row);
                // structural
                if col + 1 < cols {
                    let right = index(col + 1, row);
                    let length = rest(&particles, here, right);
                    min_structural = min_structural.min(length);
                    constraints.push(DistanceConstraint::new(here, right, length));
                }
                if row + 1 < rows {
                    let up = index(col, row + 1);
                    let length = rest(&particles, here, up);
                    min_structural = min_structural.min(length);
                    constraints.push(DistanceConstraint::new(here, up, length));
                }
                // shear
                if col + 1 < cols && row + 1 < rows {
                    let up_right = index(col + 1, row + 1);
                    constraints.push(DistanceConstraint::new(here, up_right, rest(&particles, here, up_right)));
                    let right = index(col + 1, row);
                    let up = index(col, row + 1);
                    constraints.push(DistanceConstraint::new(right, up, rest(&particles, right, up)));
                }
                // bend
                if col + 2 < cols {
                    let far = index(col + 2, row);
                    constraints.push(DistanceConstraint::new(here, far, rest(&particles, here, far)));
                }
                if row + 2 < rows {
                    let far = index(col, row + 2);
                    constraints.push(DistanceConstraint::new(here, far, rest(&particles, here, far)));
                }
            }
        }

        let mut body = Self {
            id,
            cols,
            rows,
            particles,
            constraints,
            damping: config.damping.clamp(0.0, 0.999),
            constraint_iterations: config.constraint_iterations.max(1),
            substeps: config.substeps.max(1),
            collision_radius: PARTICLE_RADIUS_FRACTION * min_structural,
            gravity: GravityController::new(config.gravity),
            sleep: SleepTracker::new(&config.sleep),
            flags: BodyFlags::default(),
            adapter,
            bounding: Sphere::new(Vector2::zero(), 0.0),
        };
        body.apply_pin_mode(config.pin_mode);
        body.refresh_bounding();
        body
    }

    /// Grid width in vertices
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Grid height in vertices
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Read-only view of the particle buffer
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Per-vertex positions in grid order, for the render write-back
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Vector3> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    /// World positions of the pinned vertices, for debug overlays
    pub fn pinned_positions(&self) -> Vec<Vector3> {
        self.particles
            .iter()
            .filter(|p| p.pinned)
            .map(|p| p.position)
            .collect()
    }

    /// Number of constraints in the mesh
    #[inline]
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// The particle collision radius derived from the mesh density
    #[inline]
    pub fn collision_radius(&self) -> f32 {
        self.collision_radius
    }

    /// The world placement adapter for this body
    #[inline]
    pub fn adapter(&self) -> &BodyAdapter {
        &self.adapter
    }

    /// Mutable access to the world placement adapter
    pub fn adapter_mut(&mut self) -> &mut BodyAdapter {
        &mut self.adapter
    }

    /// The gravity controller, for base-gravity changes and scoped overrides
    pub fn gravity_mut(&mut self) -> &mut GravityController {
        &mut self.gravity
    }

    /// Sets the Verlet damping coefficient, clamped to [0, 0.999];
    /// non-finite input is ignored
    pub fn set_damping(&mut self, damping: f32) {
        if damping.is_finite() {
            self.damping = damping.clamp(0.0, 0.999);
        }
    }

    /// Sets the relaxation iteration count. The raw value comes from live
    /// UI sliders, so non-finite input is silently ignored and the count is
    /// floored at one.
    pub fn set_constraint_iterations(&mut self, iterations: f32) {
        if iterations.is_finite() {
            self.constraint_iterations = (iterations.max(1.0)) as u32;
        }
    }

    /// Sets the sub-step count with the same defensive rules as the
    /// iteration setter
    pub fn set_substeps(&mut self, substeps: f32) {
        if substeps.is_finite() {
            self.substeps = (substeps.max(1.0)) as u32;
        }
    }

    /// Updates the sleep thresholds; invalid values are ignored
    pub fn set_sleep_thresholds(&mut self, velocity_threshold: f32, frame_threshold: u32) {
        self.sleep.set_thresholds(velocity_threshold, frame_threshold);
    }

    /// Pins every vertex of the top row
    pub fn pin_top_edge(&mut self) {
        let start = (self.rows - 1) * self.cols;
        for particle in &mut self.particles[start..] {
            particle.pin();
        }
    }

    /// Pins every vertex of the bottom row
    pub fn pin_bottom_edge(&mut self) {
        for particle in &mut self.particles[..self.cols] {
            particle.pin();
        }
    }

    /// Pins the four corner vertices
    pub fn pin_corners(&mut self) {
        let cols = self.cols;
        let last = self.particles.len() - 1;
        self.particles[0].pin();
        self.particles[cols - 1].pin();
        self.particles[last + 1 - cols].pin();
        self.particles[last].pin();
    }

    /// Releases every pin
    pub fn release_all_pins(&mut self) {
        for particle in &mut self.particles {
            particle.unpin();
        }
    }

    /// Applies one of the recognized pin modes
    pub fn apply_pin_mode(&mut self, mode: PinMode) {
        self.release_all_pins();
        match mode {
            PinMode::Top => self.pin_top_edge(),
            PinMode::Bottom => self.pin_bottom_edge(),
            PinMode::Corners => self.pin_corners(),
            PinMode::None => {}
        }
    }

    /// Applies a continuous push around `center`: every unpinned particle
    /// within `radius` is displaced along `velocity` with linear falloff
    /// `1 - d^2/r^2` scaled by `strength`. Wakes the body.
    pub fn apply_point_force(
        &mut self,
        center: Vector2,
        velocity: Vector2,
        radius: f32,
        strength: f32,
    ) {
        if !radius.is_finite() || radius <= 0.0 || !strength.is_finite() {
            return;
        }
        self.wake();
        let radius_sq = radius * radius;
        let push = (velocity * strength).extend(0.0);
        for particle in self.particles.iter_mut().filter(|p| !p.pinned) {
            let dist_sq = particle.position.xy().distance_squared(&center);
            if dist_sq < radius_sq {
                let falloff = 1.0 - dist_sq / radius_sq;
                particle.position += push * falloff;
            }
        }
        self.refresh_bounding();
    }

    /// True iff every particle has fallen below `boundary_y`; used to
    /// recycle bodies that left the visible area
    pub fn is_offscreen(&self, boundary_y: f32) -> bool {
        self.particles.iter().all(|p| p.position.y < boundary_y)
    }

    /// Pre-relaxes the freshly pinned mesh under a scoped zero-gravity
    /// override so it reaches a tension-consistent pose before gravity and
    /// rendering resume; avoids a visible snap on activation.
    pub fn warm_start(&mut self, config: &WarmStartConfig) {
        self.sleep.wake();
        let passes = config.passes.max(1);
        let iterations = self.constraint_iterations;
        let damping = self.damping;

        let scope = self.gravity.override_scope(Vector3::ZERO);
        let gravity = scope.current();
        for _ in 0..passes {
            integrate_verlet(&mut self.particles, gravity, damping, WARM_START_DT);
            for _ in 0..iterations {
                satisfy_constraints(&mut self.particles, &self.constraints);
            }
        }
        drop(scope);

        // settled pose becomes the new rest state
        for particle in &mut self.particles {
            particle.previous = particle.position;
        }
        self.refresh_bounding();
    }

    fn refresh_bounding(&mut self) {
        let count = self.particles.len() as f32;
        let mut center = Vector2::zero();
        for particle in &self.particles {
            center += particle.position.xy();
        }
        center /= count;
        let mut radius_sq = 0.0f32;
        for particle in &self.particles {
            radius_sq = radius_sq.max(particle.position.xy().distance_squared(&center));
        }
        self.bounding = Sphere::new(center, radius_sq.sqrt() + self.collision_radius);
    }

    /// Pushes one particle out of an obstacle; returns the squared
    /// correction magnitude
    fn resolve_particle(particle: &mut Particle, radius: f32, shape: &ObstacleShape, damping: f32) -> f32 {
        let center = particle.position.xy();
        let push = match shape {
            ObstacleShape::Sphere(sphere) => {
                let reach = radius + sphere.radius;
                let delta = center - sphere.center;
                let dist_sq = delta.length_squared();
                if dist_sq >= reach * reach {
                    return 0.0;
                }
                let dist = dist_sq.sqrt();
                let normal = if dist > EPSILON {
                    delta / dist
                } else {
                    Vector2::new(0.0, 1.0)
                };
                normal * (reach - dist)
            }
            ObstacleShape::Aabb(aabb) => match circle_aabb_push(center, radius, aabb) {
                Some(push) => push,
                None => return 0.0,
            },
            ObstacleShape::Obb(obb) => {
                let local_box = Aabb::from_center_half_extents(Vector2::zero(), obb.half_extents);
                match circle_aabb_push(obb.to_local(center), radius, &local_box) {
                    Some(push) => obb.to_world_vector(push),
                    None => return 0.0,
                }
            }
        };

        particle.position.x += push.x;
        particle.position.y += push.y;
        // bleed implicit velocity on contact
        particle.previous = particle.previous + (particle.position - particle.previous) * damping;
        push.length_squared()
    }
}

impl Body for ClothBody {
    fn id(&self) -> BodyId {
        self.id
    }

    fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 || self.sleep.is_sleeping() {
            return;
        }

        let substeps = self.substeps;
        let h = dt / substeps as f32;
        let gravity = if self.flags.contains(BodyFlags::AFFECTED_BY_GRAVITY) {
            self.gravity.current()
        } else {
            Vector3::ZERO
        };

        for _ in 0..substeps {
            integrate_verlet(&mut self.particles, gravity, self.damping, h);
            for _ in 0..self.constraint_iterations {
                satisfy_constraints(&mut self.particles, &self.constraints);
            }
        }

        let mut metric = 0.0f32;
        for particle in self.particles.iter().filter(|p| !p.pinned) {
            metric = metric.max(particle.displacement().length_squared());
        }

        self.adapter.tick();
        if self.flags.contains(BodyFlags::CAN_SLEEP) && self.adapter.is_world_still() {
            self.sleep.observe(metric);
        } else {
            self.sleep.hold_awake();
        }

        self.refresh_bounding();
    }

    fn is_sleeping(&self) -> bool {
        self.sleep.is_sleeping()
    }

    fn wake(&mut self) {
        self.sleep.wake();
    }

    fn wake_if_point_inside(&mut self, point: Vector2) -> bool {
        if self.bounding.contains_point(point) {
            self.wake();
            true
        } else {
            false
        }
    }

    fn bounding_sphere(&self) -> Sphere {
        self.bounding
    }

    fn aabb(&self) -> Aabb {
        self.bounding.aabb()
    }

    fn velocity(&self) -> Vector2 {
        let mut sum = Vector2::zero();
        for particle in &self.particles {
            sum += particle.displacement().xy();
        }
        sum / self.particles.len() as f32
    }

    /// Injects an instantaneous velocity around `point`: the current
    /// position moves along `impulse` and the previous position moves
    /// oppositely, so the Verlet step reads the change as velocity rather
    /// than a positional nudge.
    fn apply_impulse(&mut self, point: Vector2, impulse: Vector2, radius: f32) {
        if !radius.is_finite() || radius <= 0.0 || !impulse.x.is_finite() || !impulse.y.is_finite() {
            return;
        }
        self.wake();
        let radius_sq = radius * radius;
        let kick = impulse.extend(0.0);
        for particle in self.particles.iter_mut().filter(|p| !p.pinned) {
            let dist_sq = particle.position.xy().distance_squared(&point);
            if dist_sq < radius_sq {
                let falloff = 1.0 - dist_sq / radius_sq;
                particle.position += kick * falloff;
                particle.previous -= kick * falloff;
            }
        }
        self.refresh_bounding();
    }

    fn constrain_within_aabb(&mut self, bounds: &Aabb, damping: f32) {
        let mut clamped_any = false;
        for particle in self.particles.iter_mut().filter(|p| !p.pinned) {
            let inside = bounds.closest_point(particle.position.xy());
            if inside != particle.position.xy() {
                particle.position.x = inside.x;
                particle.position.y = inside.y;
                particle.previous =
                    particle.previous + (particle.position - particle.previous) * damping;
                clamped_any = true;
            }
        }
        if clamped_any {
            self.sleep.wake();
            self.refresh_bounding();
        }
    }

    fn collide_with_obstacles(&mut self, obstacles: &[StaticObstacle], damping: f32) {
        if self.sleep.is_sleeping() {
            return;
        }
        let radius = self.collision_radius;
        let mut largest_sq = 0.0f32;
        for obstacle in obstacles {
            for particle in self.particles.iter_mut().filter(|p| !p.pinned) {
                largest_sq = largest_sq.max(Self::resolve_particle(
                    particle,
                    radius,
                    &obstacle.shape,
                    damping,
                ));
            }
        }
        if largest_sq > 0.0 {
            self.sleep.disturb(largest_sq);
            self.refresh_bounding();
        }
    }
}

/// One damped Verlet pass over every unpinned particle.
///
/// Velocity is the damped difference between current and previous
/// positions; the next position adds gravity scaled by the squared step.
fn integrate_verlet(particles: &mut [Particle], gravity: Vector3, damping: f32, dt: f32) {
    let gravity_step = gravity * (dt * dt);
    for particle in particles.iter_mut().filter(|p| !p.pinned) {
        let velocity = (particle.position - particle.previous) * damping;
        let next = particle.position + velocity + gravity_step;
        particle.previous = particle.position;
        particle.position = next;
    }
}

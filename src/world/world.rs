use crate::bodies::{Body, BodyId, BodySnapshot};
use crate::collision::CollisionSystem;
use crate::math::Vector2;
use crate::world::{BodyStorage, SimulationConfig};
use crate::Result;

/// Owns the set of active bodies and decides who gets stepped each tick.
///
/// Single-threaded and frame-driven: an external fixed-timestep loop calls
/// `step`, pointer events arrive through `notify_pointer` and
/// `apply_pointer_impulse`, and a render layer reads vertex data from the
/// bodies afterwards. Bodies are updated in registration order, but the
/// simulation does not depend on that order for correctness.
pub struct SimulationWorld {
    bodies: BodyStorage,
    collision: CollisionSystem,
    config: SimulationConfig,
    time: f32,
}

impl SimulationWorld {
    /// Creates a world with the given configuration and a default-viewport
    /// collision system
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            bodies: BodyStorage::new(),
            collision: CollisionSystem::default(),
            config,
            time: 0.0,
        }
    }

    /// Total simulated time
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Returns a reference to the configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns a mutable reference to the configuration
    pub fn config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    /// The collision system tracking static obstacles
    pub fn collision(&self) -> &CollisionSystem {
        &self.collision
    }

    /// Mutable collision system access; obstacle mutation must happen
    /// outside an in-progress `step`
    pub fn collision_mut(&mut self) -> &mut CollisionSystem {
        &mut self.collision
    }

    /// Registers a body under its own id; duplicate ids are an error
    pub fn add_body(&mut self, body: Box<dyn Body>) -> Result<()> {
        self.bodies.insert(body)
    }

    /// Unregisters a body; safe to call from outside the step loop, and the
    /// body is fully removed before the next tick references it
    pub fn remove_body(&mut self, id: BodyId) -> Result<Box<dyn Body>> {
        self.bodies.remove(id)
    }

    /// Gets a body by id
    pub fn body(&self, id: BodyId) -> Result<&dyn Body> {
        self.bodies.get(id)
    }

    /// Gets a mutable body by id
    pub fn body_mut(&mut self, id: BodyId) -> Result<&mut (dyn Body + 'static)> {
        self.bodies.get_mut(id)
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advances every awake body by one tick and resolves collisions; the
    /// single per-tick entry point for the outer render loop
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        for body in self.bodies.iter_mut() {
            if body.is_sleeping() {
                continue;
            }
            body.update(dt);
            self.collision.apply(body.as_mut(), self.config.collision_damping);
        }

        // a mover sweeping into a sleeping body's bound wakes it before the
        // step ends, so nothing appears to pass through a frozen body
        self.sweep_wake();

        self.time += dt;
    }

    fn sweep_wake(&mut self) {
        let broad_phase = &self.config.broad_phase;
        let mover_bounds: Vec<_> = self
            .bodies
            .iter()
            .filter(|b| !b.is_sleeping())
            .map(|b| broad_phase.fit(b.as_ref()))
            .collect();
        if mover_bounds.is_empty() {
            return;
        }
        for body in self.bodies.iter_mut() {
            if !body.is_sleeping() {
                continue;
            }
            let bound = broad_phase.fit(body.as_ref());
            if mover_bounds.iter().any(|m| m.overlaps(&bound)) {
                body.wake();
            }
        }
    }

    /// Wake check for a pointer position. Only sleeping bodies are tested;
    /// awake bodies are already being simulated.
    pub fn notify_pointer(&mut self, point: Vector2) {
        for body in self.bodies.iter_mut() {
            if body.is_sleeping() {
                body.wake_if_point_inside(point);
            }
        }
    }

    /// Applies a pointer impulse to every body whose broad-phase bound
    /// contains the point
    pub fn apply_pointer_impulse(&mut self, point: Vector2, impulse: Vector2, radius: f32) {
        let broad_phase = &self.config.broad_phase;
        for body in self.bodies.iter_mut() {
            let bound = broad_phase.fit(body.as_ref());
            if bound.contains_point(point) {
                body.apply_impulse(point, impulse, radius);
            }
        }
    }

    /// Returns a deep, independent copy of every body's debug state, in
    /// registration order; callers may mutate the result freely
    pub fn get_snapshot(&self) -> Vec<BodySnapshot> {
        self.bodies.iter().map(|b| b.snapshot()).collect()
    }
}

use crate::math::Vector3;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A cloth mesh particle.
///
/// Velocity is not stored: it is inferred from the difference between the
/// current and previous positions, which is why damping is applied every
/// integration step rather than once.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Particle {
    /// Current position (z carries render depth only)
    pub position: Vector3,

    /// Position at the previous step, for Verlet velocity inference
    pub previous: Vector3,

    /// Particle mass
    pub mass: f32,

    /// Pinned particles never move under integration or constraint
    /// correction
    pub pinned: bool,
}

impl Particle {
    /// Creates a particle at rest
    pub fn new(position: Vector3, mass: f32) -> Self {
        Self {
            position,
            previous: position,
            mass,
            pinned: false,
        }
    }

    /// Pins the particle in place, zeroing its implicit velocity
    pub fn pin(&mut self) {
        self.pinned = true;
        self.previous = self.position;
    }

    /// Releases the pin
    pub fn unpin(&mut self) {
        self.pinned = false;
    }

    /// The implicit per-step displacement
    #[inline]
    pub fn displacement(&self) -> Vector3 {
        self.position - self.previous
    }
}

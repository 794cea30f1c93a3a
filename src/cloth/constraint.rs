use crate::cloth::Particle;
use crate::math::EPSILON;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A distance constraint between two particles of the same cloth body.
///
/// The rest length is captured once at mesh-build time and never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct DistanceConstraint {
    /// Index of the first particle
    pub a: usize,

    /// Index of the second particle
    pub b: usize,

    rest_length: f32,
}

impl DistanceConstraint {
    /// Creates a constraint with the given rest length
    pub fn new(a: usize, b: usize, rest_length: f32) -> Self {
        Self { a, b, rest_length }
    }

    /// The immutable rest length
    #[inline]
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }
}

/// One Gauss-Seidel relaxation pass over every constraint.
///
/// Each constraint moves its unpinned endpoints toward the rest length:
/// half the error each when both are free, the full error when the partner
/// is pinned. Zero-length directions are degenerate and skipped so a single
/// bad constraint cannot abort the pass. Multiple passes approximate
/// stiffness; convergence is approximate by design.
pub fn satisfy_constraints(particles: &mut [Particle], constraints: &[DistanceConstraint]) {
    for constraint in constraints {
        let delta = particles[constraint.b].position - particles[constraint.a].position;
        let length = delta.length();
        if length <= EPSILON {
            continue;
        }
        let correction = delta * ((length - constraint.rest_length) / length);

        let a_pinned = particles[constraint.a].pinned;
        let b_pinned = particles[constraint.b].pinned;
        match (a_pinned, b_pinned) {
            (true, true) => {}
            (true, false) => particles[constraint.b].position -= correction,
            (false, true) => particles[constraint.a].position += correction,
            (false, false) => {
                let half = correction * 0.5;
                particles[constraint.a].position += half;
                particles[constraint.b].position -= half;
            }
        }
    }
}

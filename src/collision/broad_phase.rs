//! Broad-phase bound fitting for the scheduler's wake checks.

use crate::bodies::Body;
use crate::math::{Aabb, Vector2};
use crate::shapes::Sphere;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Which bounding volume the scheduler uses to pair bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum BroadPhaseMode {
    /// Tight bounding spheres, re-fit every tick
    Sphere,

    /// AABBs inflated by a base margin plus a velocity-dependent pad; looser
    /// bounds miss fewer contacts between re-fits at the cost of more false
    /// positives reaching the narrow phase
    FatAabb,
}

/// Broad-phase tuning knobs
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BroadPhaseConfig {
    pub mode: BroadPhaseMode,

    /// Constant inflation applied to fat AABBs, in meters
    pub base_margin: f32,

    /// Extra inflation per unit of body speed
    pub velocity_fudge: f32,
}

impl Default for BroadPhaseConfig {
    fn default() -> Self {
        Self {
            mode: BroadPhaseMode::Sphere,
            base_margin: 0.05,
            velocity_fudge: 0.1,
        }
    }
}

impl BroadPhaseConfig {
    /// Fits the configured bound around a body
    pub fn fit(&self, body: &dyn Body) -> BroadPhaseBound {
        match self.mode {
            BroadPhaseMode::Sphere => BroadPhaseBound::Sphere(body.bounding_sphere()),
            BroadPhaseMode::FatAabb => {
                let margin = self.base_margin + body.velocity().length() * self.velocity_fudge;
                BroadPhaseBound::Aabb(body.aabb().expand(margin))
            }
        }
    }
}

/// A fitted broad-phase bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BroadPhaseBound {
    Sphere(Sphere),
    Aabb(Aabb),
}

impl BroadPhaseBound {
    /// Checks whether two bounds overlap
    pub fn overlaps(&self, other: &Self) -> bool {
        match (self, other) {
            (BroadPhaseBound::Sphere(a), BroadPhaseBound::Sphere(b)) => a.intersects(b),
            (BroadPhaseBound::Aabb(a), BroadPhaseBound::Aabb(b)) => a.intersects(b),
            (BroadPhaseBound::Sphere(s), BroadPhaseBound::Aabb(a))
            | (BroadPhaseBound::Aabb(a), BroadPhaseBound::Sphere(s)) => {
                a.squared_distance_to_point(s.center) <= s.radius * s.radius
            }
        }
    }

    /// Checks whether the bound contains a point
    pub fn contains_point(&self, point: Vector2) -> bool {
        match self {
            BroadPhaseBound::Sphere(s) => s.contains_point(point),
            BroadPhaseBound::Aabb(a) => a.contains_point(point),
        }
    }
}

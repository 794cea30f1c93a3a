mod body;
mod constraint;
mod gravity;
mod particle;

pub use body::ClothBody;
pub use constraint::{satisfy_constraints, DistanceConstraint};
pub use gravity::{GravityController, GravityScope};
pub use particle::Particle;

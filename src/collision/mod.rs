mod broad_phase;
pub mod sat;
mod system;

pub use broad_phase::{BroadPhaseBound, BroadPhaseConfig, BroadPhaseMode};
pub use sat::{apply_restitution_friction, obb_vs_aabb, Contact};
pub use system::{CollisionSystem, StaticObstacle};

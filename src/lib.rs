pub mod math;
pub mod shapes;
pub mod collision;
pub mod bodies;
pub mod cloth;
pub mod world;

/// Re-export common types for easier usage
pub use crate::bodies::{Body, BodyId, BodySnapshot, RigidBody2D, RigidShape};
pub use crate::cloth::ClothBody;
pub use crate::collision::CollisionSystem;
pub use crate::math::{Vector2, Vector3};
pub use crate::world::{PinMode, SimulationConfig, SimulationWorld};

/// Error types for the simulation core
pub mod error {
    use crate::bodies::BodyId;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum EngineError {
        #[error("duplicate body id: {0:?}")]
        DuplicateBody(BodyId),

        #[error("body not found: {0:?}")]
        BodyNotFound(BodyId),

        #[error("invalid parameter: {0}")]
        InvalidParameter(String),
    }
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, error::EngineError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

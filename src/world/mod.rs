mod config;
mod storage;
#[allow(clippy::module_inception)]
mod world;

pub use config::{PinMode, SimulationConfig, SleepConfig, WarmStartConfig};
pub use storage::BodyStorage;
pub use world::SimulationWorld;

use crate::collision::BroadPhaseConfig;
use crate::math::Vector3;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Which particle subset a freshly built cloth body pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum PinMode {
    /// The top row of the grid
    Top,
    /// The bottom row of the grid
    Bottom,
    /// The four corners
    Corners,
    /// No pins; the body falls freely
    None,
}

/// Sleep hysteresis thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SleepConfig {
    /// Motion below this (per-tick velocity magnitude) counts toward sleep
    pub velocity_threshold: f32,

    /// Consecutive sub-threshold ticks before the body sleeps
    pub frame_threshold: u32,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            velocity_threshold: 1.0e-3,
            frame_threshold: 30,
        }
    }
}

/// Warm-start settling passes run at activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct WarmStartConfig {
    /// Full relaxation passes; each runs the body's configured constraint
    /// iteration count
    pub passes: u32,
}

impl Default for WarmStartConfig {
    fn default() -> Self {
        Self { passes: 6 }
    }
}

/// Configuration parameters for the simulation
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Verlet velocity damping, applied every integration step; [0, 0.999]
    pub damping: f32,

    /// Gauss-Seidel relaxation passes per substep
    pub constraint_iterations: u32,

    /// Verlet substeps per tick
    pub substeps: u32,

    /// Gravity vector in canonical space
    pub gravity: Vector3,

    /// Sleep hysteresis thresholds shared by new bodies
    pub sleep: SleepConfig,

    /// Pin mode applied to freshly built cloth bodies
    pub pin_mode: PinMode,

    /// Broad-phase mode and tunables for the scheduler's wake checks
    pub broad_phase: BroadPhaseConfig,

    /// Velocity bleed applied when a particle or body contacts an obstacle
    pub collision_damping: f32,

    /// Settling passes for cloth activation
    pub warm_start: WarmStartConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            damping: 0.98,
            constraint_iterations: 8,
            substeps: 2,
            gravity: Vector3::new(0.0, -9.81, 0.0),
            sleep: SleepConfig::default(),
            pin_mode: PinMode::Top,
            broad_phase: BroadPhaseConfig::default(),
            collision_damping: 0.5,
            warm_start: WarmStartConfig::default(),
        }
    }
}

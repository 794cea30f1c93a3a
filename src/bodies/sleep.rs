use crate::world::SleepConfig;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Velocity-threshold sleep hysteresis shared by cloth and rigid bodies.
///
/// A body sleeps after `frame_threshold` consecutive ticks whose motion
/// metric stays below the squared velocity threshold; any tick at or above
/// the threshold resets the counter.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SleepTracker {
    velocity_threshold_sq: f32,
    frame_threshold: u32,
    frames_below: u32,
    sleeping: bool,
}

impl SleepTracker {
    /// Creates a tracker from a sleep configuration
    pub fn new(config: &SleepConfig) -> Self {
        let mut tracker = Self {
            velocity_threshold_sq: 1.0e-6,
            frame_threshold: 30,
            frames_below: 0,
            sleeping: false,
        };
        tracker.set_thresholds(config.velocity_threshold, config.frame_threshold);
        tracker
    }

    /// Updates the thresholds; non-finite or non-positive values are ignored
    /// because these come from live UI controls
    pub fn set_thresholds(&mut self, velocity_threshold: f32, frame_threshold: u32) {
        if velocity_threshold.is_finite() && velocity_threshold > 0.0 {
            self.velocity_threshold_sq = velocity_threshold * velocity_threshold;
        }
        if frame_threshold > 0 {
            self.frame_threshold = frame_threshold;
        }
    }

    /// Feeds one tick's motion metric (a squared velocity or displacement)
    /// into the hysteresis
    pub fn observe(&mut self, metric_sq: f32) {
        if self.sleeping {
            return;
        }
        if metric_sq < self.velocity_threshold_sq {
            self.frames_below += 1;
            if self.frames_below >= self.frame_threshold {
                self.sleeping = true;
            }
        } else {
            self.frames_below = 0;
        }
    }

    /// Registers motion produced outside the integration step, such as a
    /// collision correction; above-threshold motion resets the counter
    pub fn disturb(&mut self, metric_sq: f32) {
        if metric_sq >= self.velocity_threshold_sq {
            self.frames_below = 0;
            self.sleeping = false;
        }
    }

    /// Resets the counter without waking; used while a body is externally
    /// held awake
    pub fn hold_awake(&mut self) {
        self.frames_below = 0;
    }

    /// Clears the sleep state and counter
    pub fn wake(&mut self) {
        self.sleeping = false;
        self.frames_below = 0;
    }

    /// Returns whether the tracked body is asleep
    #[inline]
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Returns the current consecutive sub-threshold frame count
    #[inline]
    pub fn frames_below(&self) -> u32 {
        self.frames_below
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleeps_after_exact_frame_count() {
        let mut tracker = SleepTracker::new(&SleepConfig {
            velocity_threshold: 0.01,
            frame_threshold: 3,
        });
        tracker.observe(0.0);
        tracker.observe(0.0);
        assert!(!tracker.is_sleeping());
        tracker.observe(0.0);
        assert!(tracker.is_sleeping());
    }

    #[test]
    fn above_threshold_resets_counter() {
        let mut tracker = SleepTracker::new(&SleepConfig {
            velocity_threshold: 0.01,
            frame_threshold: 3,
        });
        tracker.observe(0.0);
        tracker.observe(0.0);
        tracker.observe(1.0);
        assert_eq!(tracker.frames_below(), 0);
        tracker.observe(0.0);
        tracker.observe(0.0);
        assert!(!tracker.is_sleeping());
    }
}

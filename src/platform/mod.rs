//! Platform layer
//!
//! Handles native/browser differences for:
//! - Frame time to fixed ticks (shared)
//! - Leaderboard HTTP server (native)
//! - Page-facing match handle (wasm)

#[cfg(not(target_arch = "wasm32"))]
pub mod server;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::MAX_SUBSTEPS;
use crate::tuning::Tuning;

/// Longest frame delta accepted (s); longer gaps (tab switch, debugger) are dropped
pub const MAX_FRAME_DT: f32 = 0.1;

/// Converts variable frame deltas into a whole number of fixed ticks
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(1.0 / tuning.tick_rate_hz as f32, MAX_SUBSTEPS)
    }

    /// Add a frame delta (s) and return how many ticks to run now
    ///
    /// Capped at `max_substeps` per frame; leftover time carries over.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        // Spiral of death: drop whatever could not be simulated
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        substeps
    }

    /// Wall-clock stamps (ms) for `ticks` substeps ending at `now_ms`, oldest first
    ///
    /// Each substep is one step earlier than the next, so timers keep advancing
    /// per tick when a frame runs several of them.
    pub fn tick_times(&self, now_ms: f64, ticks: u32) -> Vec<u64> {
        let step_ms = self.step as f64 * 1000.0;
        (0..ticks)
            .map(|i| {
                let behind = (ticks - 1 - i) as f64 * step_ms;
                (now_ms - behind).max(0.0) as u64
            })
            .collect()
    }

    /// Fraction of a tick left in the accumulator (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(crate::consts::SIM_DT, MAX_SUBSTEPS)
    }
}

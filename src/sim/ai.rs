//! Computer opponent
//!
//! Re-decides every few ticks and replays its last decision in between, so
//! reaction time is bounded the same way a human's is.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::input::Intent;
use super::state::{Actor, Boundaries};

/// Ticks between decisions (~0.17 s at 60 Hz)
pub const DECISION_INTERVAL_TICKS: u32 = 10;
/// Horizontal gap before the AI walks toward its opponent
pub const APPROACH_DISTANCE: f32 = 40.0;
/// Distance from a wall at which the AI turns back
pub const WALL_MARGIN: f32 = 50.0;

/// What the AI can see of its opponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opponent {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Opponent {
    pub fn of(actor: &Actor) -> Self {
        Self {
            pos: actor.pos,
            vel: actor.vel,
        }
    }
}

/// Decision memory for one AI-controlled actor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiState {
    pub timer: u32,
    pub move_left: bool,
    pub move_right: bool,
    /// Pending jump, held until the actor is grounded
    pub jump: bool,
}

impl AiState {
    /// Produce this tick's intent for an actor at `pos`
    pub fn think<R: Rng + ?Sized>(
        &mut self,
        pos: Vec2,
        airborne: bool,
        opponent: &Opponent,
        bounds: &Boundaries,
        rng: &mut R,
    ) -> Intent {
        self.timer += 1;
        if self.timer >= DECISION_INTERVAL_TICKS {
            self.timer = 0;
            self.decide(pos, airborne, opponent, bounds, rng);
        }

        let jump = self.jump && !airborne;
        if jump {
            self.jump = false;
        }
        Intent {
            left: self.move_left,
            right: self.move_right && !self.move_left,
            jump,
        }
    }

    fn decide<R: Rng + ?Sized>(
        &mut self,
        pos: Vec2,
        airborne: bool,
        opponent: &Opponent,
        bounds: &Boundaries,
        rng: &mut R,
    ) {
        let dx = opponent.pos.x - pos.x;
        let dy = opponent.pos.y - pos.y;
        let abs_dx = dx.abs();

        self.move_left = false;
        self.move_right = false;
        self.jump = false;

        // Close the gap
        if dx > APPROACH_DISTANCE {
            self.move_right = true;
        } else if dx < -APPROACH_DISTANCE {
            self.move_left = true;
        }

        // Jump at an opponent above, when close (stomp attempt), or at random
        let should_jump = (dy < -50.0 && abs_dx < 100.0)
            || (abs_dx < 70.0 && rng.random::<f32>() > 0.3)
            || rng.random::<f32>() < 0.1;
        if should_jump && !airborne {
            self.jump = true;
        }

        // Opponent dropping from above: get out from under
        if dy < -100.0 && abs_dx < 80.0 && opponent.vel.y > 0.0 {
            self.move_left = dx > 0.0;
            self.move_right = !self.move_left;
        }

        // Stay off the walls
        if pos.x < bounds.left + WALL_MARGIN {
            self.move_right = true;
            self.move_left = false;
        } else if pos.x > bounds.right - WALL_MARGIN {
            self.move_right = false;
            self.move_left = true;
        }

        log::debug!(
            "AI decision: left={} right={} jump={}",
            self.move_left,
            self.move_right,
            self.jump
        );
    }
}

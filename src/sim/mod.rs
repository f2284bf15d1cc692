//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Time comes from the tick input, never from a system clock
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod collision;
pub mod input;
pub mod state;
pub mod tick;

pub use ai::AiState;
pub use collision::{HitBox, actors_touch, can_stomp};
pub use input::{Controls, Intent, KeySet};
pub use state::{
    Actor, Boundaries, Character, Controller, GameMode, HealthBar, HealthTier, MatchPhase,
    MatchState, Side,
};
pub use tick::{GameEvent, TickInput, tick};

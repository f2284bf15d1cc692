//! Wheeliepoppers - a two-character stomp brawler
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, stomp combat, match state)
//! - `leaderboard`: Public high-score list over a blob store
//! - `persistence`: Blob stores (in-memory, on-disk)
//! - `platform`: Fixed-step driver, HTTP server (native), wasm adapter (web)
//! - `audio`: Event to sound/voice cue tables
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, LeaderboardError, StoreError};
pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardService};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (the browser build ran a 60 fps interval timer)
    pub const TICK_RATE_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Horizontal speed while a direction is held (px/tick)
    pub const MOVEMENT_SPEED: f32 = 4.0;
    /// Upward impulse applied on jump (px/tick)
    pub const JUMP_POWER: f32 = 20.0;
    /// Downward acceleration (px/tick²)
    pub const GRAVITY: f32 = 1.0;
    /// Upward bounce given to the stomper, as a fraction of jump power
    pub const STOMP_BOUNCE_FACTOR: f32 = 0.7;

    /// Health removed by one stomp
    pub const STOMP_DAMAGE: u8 = 5;
    /// Starting and maximum health
    pub const MAX_HEALTH: u8 = 100;
    /// Horizontal separation impulse on contact (px/tick)
    pub const REPULSION_FORCE: f32 = 33.0;
    /// Minimum time between two stomps by the same actor
    pub const STOMP_COOLDOWN_MS: u64 = 800;
    /// Time a stomped actor cannot be stomped again
    pub const INVINCIBILITY_MS: u64 = 1000;
    /// Upper bound accepted for either timer in tuning files
    pub const MAX_TIMER_MS: u64 = 60_000;

    /// Hit-box inset from each side, as a fraction of sprite width (75% remains)
    pub const HITBOX_SIDE_INSET: f32 = 0.125;
    /// Hit-box height as a fraction of sprite height, measured from the top
    pub const HITBOX_HEIGHT_FRACTION: f32 = 0.7;

    /// Ground line as a fraction of viewport height
    pub const GROUND_FRACTION: f32 = 0.8;
    /// Fraction of the sprite that must stay visible at the top of a jump
    pub const CEILING_VISIBLE_FRACTION: f32 = 0.6;
    /// Spawn distance from the side walls
    pub const SPAWN_OFFSET: f32 = 150.0;

    /// Default sprite size
    pub const SPRITE_WIDTH: f32 = 100.0;
    pub const SPRITE_HEIGHT: f32 = 100.0;
}

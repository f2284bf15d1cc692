//! Match state and core simulation types
//!
//! `MatchState` is the explicit simulation context: the caller (UI shell,
//! headless runner, wasm adapter) owns it and passes it into every tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::AiState;
use super::input::Controls;
use crate::tuning::Tuning;

/// Which of the two combatants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    P1,
    P2,
}

impl Side {
    /// Evaluation order used everywhere in the tick
    pub const BOTH: [Side; 2] = [Side::P1, Side::P2];

    pub fn index(self) -> usize {
        match self {
            Side::P1 => 0,
            Side::P2 => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }

    pub fn character(self) -> Character {
        match self {
            Side::P1 => Character::RottenRonnie,
            Side::P2 => Character::Luigi,
        }
    }
}

/// The two playable characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Character {
    RottenRonnie,
    Luigi,
}

impl Character {
    pub fn display_name(self) -> &'static str {
        match self {
            Character::RottenRonnie => "ROTTEN RONNIE",
            Character::Luigi => "LUIGI",
        }
    }
}

/// Who drives an actor's intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Controller {
    Human,
    Ai(AiState),
}

/// Health bar colour band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthTier {
    Healthy,
    Wounded,
    Critical,
}

impl HealthTier {
    pub fn from_health(health: u8) -> Self {
        if health < 30 {
            HealthTier::Critical
        } else if health < 60 {
            HealthTier::Wounded
        } else {
            HealthTier::Healthy
        }
    }
}

/// What the HUD draws for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthBar {
    pub side: Side,
    pub health: u8,
    pub max: u8,
    pub tier: HealthTier,
}

/// One combatant
///
/// Positions are screen coordinates: smaller y is higher, `pos.y` is the top
/// of the hit-box and is snapped to the ground line on landing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub side: Side,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Sprite dimensions
    pub size: Vec2,
    pub facing_right: bool,
    pub airborne: bool,
    /// Time of this actor's last successful stomp
    pub last_stomp_ms: Option<u64>,
    /// While set, this actor cannot be stomped
    pub invincible_until_ms: Option<u64>,
    pub health: u8,
    pub controls: Controls,
    pub controller: Controller,
}

impl Actor {
    pub fn new(side: Side, size: Vec2, health: u8) -> Self {
        let controls = match side {
            Side::P1 => Controls::arrows(),
            Side::P2 => Controls::wasd(),
        };
        Self {
            side,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size,
            facing_right: true,
            airborne: false,
            last_stomp_ms: None,
            invincible_until_ms: None,
            health,
            controls,
            controller: Controller::Human,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_until_ms.is_some()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_ai(&self) -> bool {
        matches!(self.controller, Controller::Ai(_))
    }

    pub fn health_tier(&self) -> HealthTier {
        HealthTier::from_health(self.health)
    }

    /// Put the actor back at a spawn point with full health and no timers
    pub fn respawn(&mut self, pos: Vec2, health: u8) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.facing_right = true;
        self.airborne = false;
        self.last_stomp_ms = None;
        self.invincible_until_ms = None;
        self.health = health;
        if let Controller::Ai(brain) = &mut self.controller {
            *brain = AiState::default();
        }
    }
}

/// Play-field edges, recomputed from the viewport on resize
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundaries {
    pub left: f32,
    pub right: f32,
    /// Ground line
    pub bottom: f32,
    /// Viewport height (bounds the upward excursion)
    pub height: f32,
}

impl Boundaries {
    pub fn from_viewport(width: f32, height: f32, ground_fraction: f32) -> Self {
        Self {
            left: 0.0,
            right: width,
            bottom: height * ground_fraction,
            height,
        }
    }

    /// Highest allowed y for a sprite of the given height
    ///
    /// Never below the ground line, even when the viewport is shorter than
    /// the visible part of the sprite.
    pub fn ceiling_for(&self, sprite_height: f32, visible_fraction: f32) -> f32 {
        let max_rise = self.height - sprite_height * visible_fraction;
        (self.bottom - max_rise).min(self.bottom)
    }
}

/// How the two sides are controlled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Both sides on one keyboard
    TwoPlayer,
    /// One human, the other side is AI
    OnePlayer { human: Side },
    /// Both sides AI (attract / headless)
    Demo,
}

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for a mode choice
    Selecting,
    /// Ticks advance
    Running,
    /// Someone ran out of health
    Ended { winner: Side },
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    /// Seed for the AI / taunt RNG
    pub seed: u64,
    pub phase: MatchPhase,
    pub mode: GameMode,
    /// Indexed by `Side::index()`
    pub players: [Actor; 2],
    pub bounds: Boundaries,
    pub tuning: Tuning,
    /// Ticks advanced while running
    pub time_ticks: u64,
    #[serde(skip, default = "default_rng")]
    pub(crate) rng: Pcg32,
}

impl MatchState {
    /// New match waiting for mode selection
    pub fn new(bounds: Boundaries, tuning: Tuning, seed: u64) -> Self {
        let size = Vec2::new(tuning.sprite_width, tuning.sprite_height);
        let mut state = Self {
            seed,
            phase: MatchPhase::Selecting,
            mode: GameMode::TwoPlayer,
            players: [
                Actor::new(Side::P1, size, tuning.max_health),
                Actor::new(Side::P2, size, tuning.max_health),
            ],
            bounds,
            tuning,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.place_actors();
        state
    }

    /// Convenience constructor from viewport size with default tuning
    pub fn with_viewport(width: f32, height: f32, seed: u64) -> Self {
        let tuning = Tuning::default();
        let bounds = Boundaries::from_viewport(width, height, tuning.ground_fraction);
        Self::new(bounds, tuning, seed)
    }

    pub fn player(&self, side: Side) -> &Actor {
        &self.players[side.index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Actor {
        &mut self.players[side.index()]
    }

    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    pub fn health_bars(&self) -> [HealthBar; 2] {
        Side::BOTH.map(|side| {
            let actor = self.player(side);
            HealthBar {
                side,
                health: actor.health,
                max: self.tuning.max_health,
                tier: actor.health_tier(),
            }
        })
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            MatchPhase::Ended { winner } => Some(winner),
            _ => None,
        }
    }

    /// Selecting -> Running with the chosen mode
    pub fn start(&mut self, mode: GameMode) {
        self.mode = mode;
        self.assign_controllers();
        self.place_actors();
        self.time_ticks = 0;
        self.phase = MatchPhase::Running;
        log::info!("Match started: {:?}", mode);
    }

    /// Ended -> Running with the same mode. Returns false in any other phase.
    pub fn reset(&mut self) -> bool {
        if !matches!(self.phase, MatchPhase::Ended { .. }) {
            return false;
        }
        self.start(self.mode);
        true
    }

    /// Back to the mode selection screen
    pub fn return_to_selection(&mut self) {
        self.phase = MatchPhase::Selecting;
    }

    /// Viewport changed; actors are re-clamped on the next tick
    pub fn resize(&mut self, bounds: Boundaries) {
        self.bounds = bounds;
    }

    fn assign_controllers(&mut self) {
        let (p1_human, p2_human) = match self.mode {
            GameMode::TwoPlayer => (true, true),
            GameMode::OnePlayer { human: Side::P1 } => (true, false),
            GameMode::OnePlayer { human: Side::P2 } => (false, true),
            GameMode::Demo => (false, false),
        };

        // A lone human always plays on the arrow keys
        let swap = self.mode == GameMode::OnePlayer { human: Side::P2 };
        let [p1, p2] = &mut self.players;
        if swap {
            p1.controls = Controls::wasd();
            p2.controls = Controls::arrows();
        } else {
            p1.controls = Controls::arrows();
            p2.controls = Controls::wasd();
        }

        for (actor, human) in [(p1, p1_human), (p2, p2_human)] {
            actor.controller = if human {
                Controller::Human
            } else {
                Controller::Ai(AiState::default())
            };
        }
    }

    fn place_actors(&mut self) {
        let bounds = self.bounds;
        let offset = self.tuning.spawn_offset;
        let health = self.tuning.max_health;
        for actor in &mut self.players {
            let x = match actor.side {
                Side::P1 => bounds.right - offset,
                Side::P2 => bounds.left + offset,
            };
            let pos = Vec2::new(x, bounds.bottom - actor.size.y);
            actor.respawn(pos, health);
        }
    }
}

//! Browser adapter
//!
//! The page owns rendering, keyboard listeners, Web Audio and speech. It
//! forwards key events and animation-frame timestamps here and gets back the
//! tick events plus the sound/voice cues to play, as JSON.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::FixedTimestep;
use crate::audio::{Cue, Mixer};
use crate::settings::Settings;
use crate::sim::{
    Boundaries, GameEvent, GameMode, HealthBar, KeySet, MatchState, Side, TickInput, tick,
};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        log::warn!("Logger init skipped: {}", e);
    }
    log::info!("Wheeliepoppers wasm loaded");
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    ticks: u32,
    events: &'a [GameEvent],
    cues: &'a [Cue],
    winner: Option<&'static str>,
    health: [HealthBar; 2],
    /// Leftover fraction of a tick, for interpolating sprites
    alpha: f32,
}

/// A match driven by the page's animation loop
#[wasm_bindgen]
pub struct WebMatch {
    state: MatchState,
    keys: KeySet,
    timestep: FixedTimestep,
    mixer: Mixer,
    cue_rng: Pcg32,
    last_frame_ms: Option<f64>,
}

#[wasm_bindgen]
impl WebMatch {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, seed: f64) -> WebMatch {
        let seed = seed as u64;
        let state = MatchState::with_viewport(width, height, seed);
        let timestep = FixedTimestep::from_tuning(&state.tuning);
        log::info!("Match created with seed: {}", seed);
        WebMatch {
            state,
            keys: KeySet::new(),
            timestep,
            mixer: Mixer::default(),
            cue_rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
            last_frame_ms: None,
        }
    }

    pub fn start_two_player(&mut self) {
        self.begin(GameMode::TwoPlayer);
    }

    /// `as_luigi` picks the second character for the human
    pub fn start_one_player(&mut self, as_luigi: bool) {
        let human = if as_luigi { Side::P2 } else { Side::P1 };
        self.begin(GameMode::OnePlayer { human });
    }

    pub fn start_demo(&mut self) {
        self.begin(GameMode::Demo);
    }

    /// Play again after a match ended
    pub fn reset(&mut self) -> bool {
        let restarted = self.state.reset();
        if restarted {
            self.keys.clear();
            self.timestep.reset();
            self.last_frame_ms = None;
        }
        restarted
    }

    pub fn return_to_selection(&mut self) {
        self.state.return_to_selection();
        self.keys.clear();
    }

    pub fn key_down(&mut self, key: &str) {
        self.keys.press(key);
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.release(key);
    }

    /// Window lost focus: nothing stays held
    pub fn release_all(&mut self) {
        self.keys.clear();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let ground = self.state.tuning.ground_fraction;
        self.state
            .resize(Boundaries::from_viewport(width, height, ground));
    }

    /// Replace volume and speech preferences
    pub fn set_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.mixer = Mixer::from_settings(&settings);
        Ok(())
    }

    /// Background music gain for the page's music loop
    pub fn music_volume(&self) -> f32 {
        self.mixer.music_volume()
    }

    /// Advance to the animation-frame timestamp `now_ms`
    ///
    /// Returns `{ticks, events, cues, winner, health, alpha}` as JSON.
    pub fn frame(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let dt = match self.last_frame_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);

        let ticks = self.timestep.advance(dt);
        let mut events = Vec::new();
        let mut input = TickInput {
            keys: self.keys.clone(),
            now_ms: 0,
        };
        for at in self.timestep.tick_times(now_ms, ticks) {
            input.now_ms = at;
            events.extend(tick(&mut self.state, &input));
        }

        let cues = self.mixer.plan_cues(&events, &mut self.cue_rng);
        let output = FrameOutput {
            ticks,
            events: &events,
            cues: &cues,
            winner: self
                .state
                .winner()
                .map(|side| side.character().display_name()),
            health: self.state.health_bars(),
            alpha: self.timestep.alpha(),
        };
        serde_json::to_string(&output).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Full match state as JSON (positions, health, phase)
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl WebMatch {
    fn begin(&mut self, mode: GameMode) {
        self.keys.clear();
        self.timestep.reset();
        self.last_frame_ms = None;
        self.state.start(mode);
    }
}

//! Player preferences
//!
//! Persisted as a small JSON file next to the leaderboard data (native) or
//! passed in by the page (web).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence everything
    pub muted: bool,
    pub music_enabled: bool,

    // === Speech ===
    /// Characters shout taunts when they land a stomp
    pub speech_enabled: bool,
    pub speech_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 0.2,
            muted: false,
            music_enabled: true,

            speech_enabled: true,
            speech_volume: 0.9,
        }
    }
}

impl Settings {
    /// Clamp all volumes into 0.0 - 1.0
    pub fn clamped(mut self) -> Self {
        for v in [
            &mut self.master_volume,
            &mut self.sfx_volume,
            &mut self.music_volume,
            &mut self.speech_volume,
        ] {
            *v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        }
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str::<Self>(json)?.clamped())
    }

    /// Load settings, falling back to defaults if the file is missing or bad
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring bad settings file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}

//! Data-driven game balance
//!
//! Every constant the tick reads lives here so a match can be replayed or
//! rebalanced from a JSON file without recompiling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Simulation constants for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub movement_speed: f32,
    pub jump_power: f32,
    pub gravity: f32,
    pub stomp_bounce_factor: f32,
    pub stomp_damage: u8,
    pub max_health: u8,
    pub repulsion_force: f32,
    pub stomp_cooldown_ms: u64,
    pub invincibility_ms: u64,
    pub hitbox_side_inset: f32,
    pub hitbox_height_fraction: f32,
    pub ground_fraction: f32,
    pub ceiling_visible_fraction: f32,
    pub spawn_offset: f32,
    pub sprite_width: f32,
    pub sprite_height: f32,
    pub tick_rate_hz: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            movement_speed: MOVEMENT_SPEED,
            jump_power: JUMP_POWER,
            gravity: GRAVITY,
            stomp_bounce_factor: STOMP_BOUNCE_FACTOR,
            stomp_damage: STOMP_DAMAGE,
            max_health: MAX_HEALTH,
            repulsion_force: REPULSION_FORCE,
            stomp_cooldown_ms: STOMP_COOLDOWN_MS,
            invincibility_ms: INVINCIBILITY_MS,
            hitbox_side_inset: HITBOX_SIDE_INSET,
            hitbox_height_fraction: HITBOX_HEIGHT_FRACTION,
            ground_fraction: GROUND_FRACTION,
            ceiling_visible_fraction: CEILING_VISIBLE_FRACTION,
            spawn_offset: SPAWN_OFFSET,
            sprite_width: SPRITE_WIDTH,
            sprite_height: SPRITE_HEIGHT,
            tick_rate_hz: TICK_RATE_HZ,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("movement_speed", self.movement_speed),
            ("jump_power", self.jump_power),
            ("gravity", self.gravity),
            ("sprite_width", self.sprite_width),
            ("sprite_height", self.sprite_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        let fractions = [
            ("hitbox_height_fraction", self.hitbox_height_fraction),
            ("ground_fraction", self.ground_fraction),
            ("ceiling_visible_fraction", self.ceiling_visible_fraction),
        ];
        for (name, value) in fractions {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::Invalid(format!("{name} must be in (0, 1], got {value}")));
            }
        }

        if !(0.0..0.5).contains(&self.hitbox_side_inset) {
            return Err(ConfigError::Invalid(format!(
                "hitbox_side_inset must be in [0, 0.5), got {}",
                self.hitbox_side_inset
            )));
        }
        if self.max_health == 0 || self.max_health > MAX_HEALTH {
            return Err(ConfigError::Invalid(format!(
                "max_health must be in 1..={MAX_HEALTH}, got {}",
                self.max_health
            )));
        }
        let timers = [
            ("stomp_cooldown_ms", self.stomp_cooldown_ms),
            ("invincibility_ms", self.invincibility_ms),
        ];
        for (name, value) in timers {
            if value > MAX_TIMER_MS {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be at most {MAX_TIMER_MS}, got {value}"
                )));
            }
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid("tick_rate_hz must be non-zero".into()));
        }
        Ok(())
    }

    /// Milliseconds covered by one tick
    pub fn tick_ms(&self) -> f64 {
        1000.0 / self.tick_rate_hz as f64
    }

    /// Vertical speed given to the stomper after a hit (negative = upward)
    pub fn stomp_bounce(&self) -> f32 {
        -self.jump_power * self.stomp_bounce_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{"gravity": 2.0, "stomp_damage": 10}"#).unwrap();
        assert_eq!(tuning.gravity, 2.0);
        assert_eq!(tuning.stomp_damage, 10);
        assert_eq!(tuning.jump_power, JUMP_POWER);
        assert_eq!(tuning.stomp_cooldown_ms, STOMP_COOLDOWN_MS);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{"gravity": -1.0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{"hitbox_side_inset": 0.6}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{"max_health": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(Tuning::from_json("not json"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_health_and_timers_bounded() {
        assert!(matches!(
            Tuning::from_json(r#"{"max_health": 250}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{"invincibility_ms": 18446744073709551615}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{"stomp_cooldown_ms": 60001}"#),
            Err(ConfigError::Invalid(_))
        ));
        let tuning = Tuning::from_json(r#"{"max_health": 100, "invincibility_ms": 60000}"#).unwrap();
        assert_eq!(tuning.max_health, MAX_HEALTH);
    }

    #[test]
    fn test_stomp_bounce() {
        let tuning = Tuning::default();
        assert!((tuning.stomp_bounce() - (-14.0)).abs() < 1e-4);
    }
}

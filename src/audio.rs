//! Sound and voice cues
//!
//! The crate does no audio I/O. Sounds are procedural, so each effect is a
//! small synthesis patch (oscillator + envelope) that the page plays with
//! Web Audio; taunts are phrases handed to speech synthesis with a
//! per-character voice.

use rand::Rng;
use serde::Serialize;

use crate::settings::Settings;
use crate::sim::{Character, GameEvent};

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

/// How a parameter moves between two values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ramp {
    Linear,
    Exponential,
}

/// Parameter ramp `from` -> `to` over `secs`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sweep {
    pub from: f32,
    pub to: f32,
    pub secs: f32,
    pub ramp: Ramp,
}

/// A single timed note
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Note {
    pub freq: f32,
    /// Offset from the cue start
    pub at: f32,
    pub duration: f32,
}

/// Synthesis parameters for one effect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundPatch {
    pub waveform: Waveform,
    /// Frequency sweep (Hz); `None` for note sequences
    pub freq: Option<Sweep>,
    /// Gain envelope, before mixer volume
    pub gain: Sweep,
    pub duration: f32,
    /// White-noise burst mixed in at the start (seconds)
    pub noise_secs: f32,
    pub notes: Vec<Note>,
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundEffect {
    /// Rising tone
    Jump,
    /// Harsh impact with noise
    Stomp,
    /// Victory fanfare (C major arpeggio)
    Win,
}

impl SoundEffect {
    pub fn patch(self) -> SoundPatch {
        match self {
            SoundEffect::Jump => SoundPatch {
                waveform: Waveform::Sine,
                freq: Some(Sweep {
                    from: 200.0,
                    to: 600.0,
                    secs: 0.2,
                    ramp: Ramp::Linear,
                }),
                gain: Sweep {
                    from: 0.1,
                    to: 0.0,
                    secs: 0.3,
                    ramp: Ramp::Linear,
                },
                duration: 0.3,
                noise_secs: 0.0,
                notes: Vec::new(),
            },
            SoundEffect::Stomp => SoundPatch {
                waveform: Waveform::Square,
                freq: Some(Sweep {
                    from: 150.0,
                    to: 40.0,
                    secs: 0.1,
                    ramp: Ramp::Linear,
                }),
                gain: Sweep {
                    from: 0.2,
                    to: 0.001,
                    secs: 0.3,
                    ramp: Ramp::Exponential,
                },
                duration: 0.3,
                noise_secs: 0.2,
                notes: Vec::new(),
            },
            SoundEffect::Win => {
                const FREQS: [f32; 4] = [261.63, 329.63, 392.0, 523.25];
                const TIMES: [f32; 4] = [0.0, 0.1, 0.2, 0.3];
                const DURATIONS: [f32; 4] = [0.1, 0.1, 0.1, 0.5];
                let notes = (0..4)
                    .map(|i| Note {
                        freq: FREQS[i],
                        at: TIMES[i],
                        duration: DURATIONS[i],
                    })
                    .collect::<Vec<_>>();
                SoundPatch {
                    waveform: Waveform::Triangle,
                    freq: None,
                    gain: Sweep {
                        from: 0.15,
                        to: 0.001,
                        secs: 0.5,
                        ramp: Ramp::Exponential,
                    },
                    duration: 0.8,
                    noise_secs: 0.0,
                    notes,
                }
            }
        }
    }
}

/// Speech voice for a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    /// Low and slow
    Nerd,
    /// High and fast
    Punk,
}

/// Speech synthesis parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceProfile {
    pub pitch: f32,
    pub rate: f32,
    pub volume: f32,
}

const NERD_PHRASES: [&str; 5] = [
    "Where is the beef!",
    "I am not loving it",
    "bah-dah. bah-dah-bah",
    "would you like fries with that?",
    "super size me baby",
];

const PUNK_PHRASES: [&str; 5] = [
    "we will rise up against you",
    "You are destroying us all",
    "deny defend dispose",
    "Die corporate scum!",
    "capitalist pig!",
];

impl Voice {
    pub fn of(character: Character) -> Self {
        match character {
            Character::RottenRonnie => Voice::Nerd,
            Character::Luigi => Voice::Punk,
        }
    }

    pub fn profile(self) -> VoiceProfile {
        match self {
            Voice::Nerd => VoiceProfile {
                pitch: 0.7,
                rate: 0.9,
                volume: 0.9,
            },
            Voice::Punk => VoiceProfile {
                pitch: 1.5,
                rate: 1.2,
                volume: 0.9,
            },
        }
    }

    pub fn phrases(self) -> &'static [&'static str] {
        match self {
            Voice::Nerd => &NERD_PHRASES,
            Voice::Punk => &PUNK_PHRASES,
        }
    }

    pub fn taunt<R: Rng + ?Sized>(self, rng: &mut R) -> &'static str {
        let phrases = self.phrases();
        phrases[rng.random_range(0..phrases.len())]
    }
}

/// Something for the page to play
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Cue {
    Sound {
        effect: SoundEffect,
        volume: f32,
    },
    Speak {
        text: &'static str,
        voice: Voice,
        profile: VoiceProfile,
    },
}

/// Volume state derived from player settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    master_volume: f32,
    sfx_volume: f32,
    speech_volume: f32,
    music_volume: f32,
    speech_enabled: bool,
    music_enabled: bool,
    muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Mixer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            speech_volume: settings.speech_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            speech_enabled: settings.speech_enabled,
            music_enabled: settings.music_enabled,
            muted: settings.muted,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Effective sound-effect volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Background music gain (0 when muted or music is off)
    pub fn music_volume(&self) -> f32 {
        if self.muted || !self.music_enabled {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    fn speech_volume(&self) -> f32 {
        if self.muted || !self.speech_enabled {
            0.0
        } else {
            self.master_volume * self.speech_volume
        }
    }

    /// Turn one tick's events into cues
    ///
    /// Jumps and stomps make a sound; a stomp also has the attacker shout a
    /// random taunt; the end of a match plays the fanfare. Silent cues are
    /// dropped.
    pub fn plan_cues<R: Rng + ?Sized>(&self, events: &[GameEvent], rng: &mut R) -> Vec<Cue> {
        let sfx = self.effective_volume();
        let speech = self.speech_volume();
        let mut cues = Vec::new();

        let sound = |cues: &mut Vec<Cue>, effect: SoundEffect| {
            if sfx > 0.0 {
                cues.push(Cue::Sound {
                    effect,
                    volume: sfx,
                });
            }
        };

        for event in events {
            match event {
                GameEvent::Jump { .. } => sound(&mut cues, SoundEffect::Jump),
                GameEvent::Stomp { attacker, .. } => {
                    sound(&mut cues, SoundEffect::Stomp);
                    if speech > 0.0 {
                        let voice = Voice::of(attacker.character());
                        let mut profile = voice.profile();
                        profile.volume *= speech;
                        cues.push(Cue::Speak {
                            text: voice.taunt(&mut *rng),
                            voice,
                            profile,
                        });
                    }
                }
                GameEvent::MatchEnded { .. } => sound(&mut cues, SoundEffect::Win),
                GameEvent::Landed { .. }
                | GameEvent::Knockback { .. }
                | GameEvent::Recovered { .. } => {}
            }
        }
        cues
    }
}

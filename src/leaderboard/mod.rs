//! Public high-score list
//!
//! Stored as one serialized blob and updated by whole-document replace.
//! Each submission is a read-modify-write cycle:
//! load (seed on missing/corrupt), ratchet the entry, sort, truncate, save.

pub mod handler;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LeaderboardError;
use crate::persistence::BlobStore;

/// Entries kept after each submission
pub const MAX_ENTRIES: usize = 100;
/// Jackpot events kept per entry
pub const MAX_JACKPOT_HISTORY: usize = 50;
/// Glyph used when neither the submission nor the stored entry has one
pub const DEFAULT_EMOJI: &str = "🎲";
/// Blob key holding the serialized list
pub const STORAGE_KEY: &str = "leaderboard";

/// A prize won by a player, stamped with server time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JackpotEvent {
    /// Unix time in milliseconds
    pub timestamp: i64,
    pub emoji: String,
    pub amount: i64,
}

/// One player's row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    pub high_score: i64,
    #[serde(default)]
    pub jackpot_history: Vec<JackpotEvent>,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, emoji: impl Into<String>, high_score: i64) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
            high_score,
            jackpot_history: Vec::new(),
        }
    }

    fn record_jackpot(&mut self, event: JackpotEvent) {
        self.jackpot_history.push(event);
        if self.jackpot_history.len() > MAX_JACKPOT_HISTORY {
            self.jackpot_history
                .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            self.jackpot_history.truncate(MAX_JACKPOT_HISTORY);
        }
    }
}

/// Optional prize attached to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JackpotWin {
    pub emoji: Option<String>,
    pub prize: i64,
}

/// A validated score submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub emoji: Option<String>,
    pub score: i64,
    pub jackpot: Option<JackpotWin>,
}

impl Submission {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            emoji: None,
            score,
            jackpot: None,
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn with_jackpot(mut self, emoji: Option<String>, prize: i64) -> Self {
        self.jackpot = Some(JackpotWin { emoji, prize });
        self
    }

    /// Validate a decoded request body
    ///
    /// `name` must be a non-empty string and `score` a number or numeric
    /// string. A `jackpotWin` without a numeric `prize` is ignored.
    pub fn from_json(body: &Value) -> Result<Self, LeaderboardError> {
        let invalid = || LeaderboardError::Validation("Missing name or valid score".into());

        let name = match body.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => return Err(invalid()),
        };
        let score = body.get("score").and_then(parse_integer).ok_or_else(invalid)?;
        let emoji = non_empty_str(body.get("emoji"));

        let jackpot = match body.get("jackpotWin") {
            None | Some(Value::Null) => None,
            Some(win) => match win.get("prize").and_then(parse_integer) {
                Some(prize) => Some(JackpotWin {
                    emoji: non_empty_str(win.get("emoji")),
                    prize,
                }),
                None => {
                    log::warn!("Ignoring jackpotWin without a numeric prize for {name}");
                    None
                }
            },
        };

        Ok(Self {
            name,
            emoji,
            score,
            jackpot,
        })
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Integer from a JSON number or numeric string; fractions truncate toward zero
fn parse_integer(value: &Value) -> Option<i64> {
    let float = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            n.as_f64()?
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if let Ok(i) = s.parse::<i64>() {
                return Some(i);
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    float.is_finite().then(|| float.trunc() as i64)
}

/// Ordered entry list, highest score first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new(entries: Vec<LeaderboardEntry>) -> Self {
        Self { entries }
    }

    /// List served when nothing has been stored yet
    pub fn seed() -> Self {
        Self::new(vec![
            LeaderboardEntry::new("Scroggy", "🧙‍♂️", 1_000_000_000),
            LeaderboardEntry::new("WizardKing", "🧝‍♂️", 500_000),
            LeaderboardEntry::new("LuckyCharm", "🧚‍♀️", 250_000),
        ])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// 1-indexed position of `name`, if listed
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }

    /// Apply a submission stamped at `now_ms`
    ///
    /// Returns the submitter's rank afterwards, or `None` if they fell off
    /// the bottom of the list.
    pub fn submit(&mut self, submission: &Submission, now_ms: i64) -> Option<usize> {
        let index = match self.entries.iter().position(|e| e.name == submission.name) {
            Some(index) => {
                let entry = &mut self.entries[index];
                if submission.score > entry.high_score {
                    entry.high_score = submission.score;
                }
                if let Some(emoji) = &submission.emoji {
                    entry.emoji = emoji.clone();
                } else if entry.emoji.is_empty() {
                    entry.emoji = DEFAULT_EMOJI.to_string();
                }
                index
            }
            None => {
                let emoji = submission.emoji.as_deref().unwrap_or(DEFAULT_EMOJI);
                self.entries.push(LeaderboardEntry::new(
                    submission.name.clone(),
                    emoji,
                    submission.score,
                ));
                self.entries.len() - 1
            }
        };

        if let Some(win) = &submission.jackpot {
            let entry = &mut self.entries[index];
            let emoji = win
                .emoji
                .clone()
                .unwrap_or_else(|| entry.emoji.clone());
            entry.record_jackpot(JackpotEvent {
                timestamp: now_ms,
                emoji,
                amount: win.prize,
            });
        }

        // Stable sort: equal scores keep their previous relative order
        self.entries
            .sort_by(|a, b| b.high_score.cmp(&a.high_score));
        self.entries.truncate(MAX_ENTRIES);

        self.rank_of(&submission.name)
    }
}

/// Source of server timestamps for jackpot events
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// Result of a submission
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The updated list (returned even when saving failed)
    pub scores: Leaderboard,
    /// Whether the new list reached the store
    pub persisted: bool,
    pub rank: Option<usize>,
}

/// Leaderboard operations over a blob store
pub struct LeaderboardService<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: BlobStore> LeaderboardService<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: BlobStore, C: Clock> LeaderboardService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current list; the seed if nothing usable is stored
    pub fn load(&self) -> Leaderboard {
        match self.store.get(STORAGE_KEY) {
            Ok(Some(data)) => match serde_json::from_str::<Leaderboard>(&data) {
                Ok(board) => board,
                Err(e) => {
                    log::warn!("Stored leaderboard is corrupt, serving defaults: {e}");
                    Leaderboard::seed()
                }
            },
            Ok(None) => {
                log::debug!("No stored leaderboard, serving defaults");
                Leaderboard::seed()
            }
            Err(e) => {
                log::warn!("Failed to read leaderboard, serving defaults: {e}");
                Leaderboard::seed()
            }
        }
    }

    /// Replace the stored list
    pub fn save(&self, board: &Leaderboard) -> Result<(), LeaderboardError> {
        let data = serde_json::to_string(board)
            .map_err(|e| LeaderboardError::Unexpected(format!("serialize leaderboard: {e}")))?;
        self.store.set(STORAGE_KEY, &data)?;
        log::info!("Saved leaderboard ({} entries)", board.len());
        Ok(())
    }

    /// Read-modify-write one submission
    ///
    /// A failed write is reported through `persisted`, not as an error.
    pub fn submit(&self, submission: &Submission) -> Result<SubmitOutcome, LeaderboardError> {
        let mut board = self.load();
        let rank = board.submit(submission, self.clock.now_ms());
        log::info!(
            "Score {} for {} -> rank {:?}",
            submission.score,
            submission.name,
            rank
        );

        let persisted = match self.save(&board) {
            Ok(()) => true,
            Err(LeaderboardError::Storage(e)) => {
                log::warn!("Failed to save leaderboard: {e}");
                false
            }
            Err(e) => return Err(e),
        };

        Ok(SubmitOutcome {
            scores: board,
            persisted,
            rank,
        })
    }
}

/// A store whose writes always fail; reads delegate
#[cfg(test)]
pub(crate) struct ReadOnlyStore<S>(pub S);

#[cfg(test)]
impl<S: BlobStore> BlobStore for ReadOnlyStore<S> {
    fn get(&self, key: &str) -> Result<Option<String>, crate::error::StoreError> {
        self.0.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), crate::error::StoreError> {
        Err(crate::error::StoreError::Unavailable("read-only".into()))
    }
}

/// A store that cannot be read at all
#[cfg(test)]
pub(crate) struct UnreadableStore;

#[cfg(test)]
impl BlobStore for UnreadableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, crate::error::StoreError> {
        Err(crate::error::StoreError::Unavailable("offline".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), crate::error::StoreError> {
        Err(crate::error::StoreError::Unavailable("offline".into()))
    }
}

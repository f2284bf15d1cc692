//! Input snapshot and key bindings
//!
//! Key events arrive asynchronously between ticks; the tick reads a snapshot
//! taken at tick start, so a key toggled mid-tick takes effect next tick.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Set of currently held keys (names compared case-insensitively)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    held: HashSet<String>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a list of held key names
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for key in keys {
            set.press(key.as_ref());
        }
        set
    }

    pub fn press(&mut self, key: &str) {
        self.held.insert(key.to_lowercase());
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(&key.to_lowercase())
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

/// Key bindings for one actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub left: String,
    pub right: String,
    pub up: String,
    pub down: String,
}

impl Controls {
    /// Arrow-key layout (player one by default)
    pub fn arrows() -> Self {
        Self {
            left: "arrowleft".into(),
            right: "arrowright".into(),
            up: "arrowup".into(),
            down: "arrowdown".into(),
        }
    }

    /// WASD layout (player two by default)
    pub fn wasd() -> Self {
        Self {
            left: "a".into(),
            right: "d".into(),
            up: "w".into(),
            down: "s".into(),
        }
    }

    /// Read this actor's intent from a key snapshot
    pub fn intent(&self, keys: &KeySet) -> Intent {
        Intent {
            left: keys.is_held(&self.left),
            right: keys.is_held(&self.right),
            jump: keys.is_held(&self.up),
        }
    }
}

/// What an actor wants to do this tick, from keys or from the AI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut keys = KeySet::new();
        keys.press("ArrowLeft");
        assert!(keys.is_held("arrowleft"));
        assert!(keys.is_held("ARROWLEFT"));
        keys.release("ARROWLEFT");
        assert!(!keys.is_held("ArrowLeft"));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_intent_from_bindings() {
        let keys = KeySet::from_keys(["a", "W", "ArrowRight"]);

        let wasd = Controls::wasd().intent(&keys);
        assert_eq!(
            wasd,
            Intent {
                left: true,
                right: false,
                jump: true
            }
        );

        let arrows = Controls::arrows().intent(&keys);
        assert_eq!(
            arrows,
            Intent {
                left: false,
                right: true,
                jump: false
            }
        );
    }
}

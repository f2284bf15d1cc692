//! Error types
//!
//! The simulation has no error channel; these cover the leaderboard, its
//! blob store, and configuration files.

use thiserror::Error;

/// Failure talking to a blob store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on blob {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Leaderboard failure taxonomy
///
/// - `Validation` surfaces as 400
/// - `Storage` is absorbed on reads and reported via `success: false` on writes
/// - `Unexpected` surfaces as 500 with details
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("{0}")]
    Unexpected(String),
}

impl LeaderboardError {
    /// HTTP status this error maps to
    pub fn status(&self) -> u16 {
        match self {
            LeaderboardError::Validation(_) => 400,
            LeaderboardError::Storage(_) | LeaderboardError::Unexpected(_) => 500,
        }
    }
}

/// Failure loading tuning or settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

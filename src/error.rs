//! Error types
//!
//! Gameplay never fails mid-tick: exhausted rosters and invalid transitions
//! are handled in place. These errors cover level selection and loading
//! configuration from disk.

use thiserror::Error;

/// Failure to select or load a level from the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level registry is empty")]
    EmptyRegistry,
    #[error("level index {index} out of range (registry has {len} levels)")]
    OutOfRange { index: usize, len: usize },
    #[error("level {index} is locked (highest unlocked is {highest})")]
    Locked { index: usize, highest: usize },
    #[error("no level loaded")]
    NotLoaded,
}

/// Failure to read settings, level data or progress from JSON
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid level data: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//! Persisted unlock progress
//!
//! Stored as JSON next to the game: the highest level index the player may
//! select and the best score seen so far.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    /// Highest selectable level index (level 0 is always unlocked)
    pub highest_unlocked: usize,
    pub best_score: u64,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        index <= self.highest_unlocked
    }

    /// Record completion of `index`. Unlocks the following level, bounded by
    /// `level_count`. Returns the newly unlocked index, if any.
    pub fn record_completion(&mut self, index: usize, level_count: usize) -> Option<usize> {
        let next = index + 1;
        if next < level_count && next > self.highest_unlocked {
            self.highest_unlocked = next;
            Some(next)
        } else {
            None
        }
    }

    /// Pull `highest_unlocked` back inside a registry of `level_count` levels
    pub fn clamp_to(&mut self, level_count: usize) {
        let last = level_count.saturating_sub(1);
        if self.highest_unlocked > last {
            log::warn!(
                "saved progress unlocks level {} but only {level_count} exist",
                self.highest_unlocked
            );
            self.highest_unlocked = last;
        }
    }

    /// Returns true if `score` is a new best
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    /// Load progress from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        let progress: Progress = serde_json::from_str(&json)?;
        log::info!(
            "Loaded progress: level {} unlocked, best score {}",
            progress.highest_unlocked,
            progress.best_score
        );
        Ok(progress)
    }

    /// Load progress, starting fresh if the file is missing or corrupt
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(progress) => progress,
            Err(e) => {
                log::info!("No saved progress ({e}), starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        log::info!("Progress saved to {}", path.display());
        Ok(())
    }
}

//! Session state and counters
//!
//! Plain data plus the arithmetic of scoring, lives and the level timer.
//! Transitions that also drive the spawner live on
//! [`SessionContext`](super::SessionContext).

use serde::{Deserialize, Serialize};

use super::spawner::SpawnGate;
use crate::levels::LevelDefinition;

/// Overall game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// Level loaded (or not), waiting for start
    #[default]
    Menu,
    Playing,
    Paused,
    /// Level won; next level may be started
    LevelComplete,
    /// Level lost (lives or time ran out)
    GameOver,
    /// Final level completed
    GameComplete,
}

impl SessionState {
    /// Playing or paused
    pub fn in_level(self) -> bool {
        matches!(self, SessionState::Playing | SessionState::Paused)
    }

    /// Multiplier applied to the frame delta; zero freezes simulation time
    pub fn time_scale(self) -> f32 {
        if self == SessionState::Playing { 1.0 } else { 0.0 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub state: SessionState,
    pub score: u64,
    pub lives: i32,
    pub level_index: usize,
    /// Currently loaded level
    pub level: Option<LevelDefinition>,
    pub decoys_resolved: u32,
    /// Seconds left on the level timer
    pub time_left: f32,
    pub targets_spawned: u32,
    pub decoys_spawned: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required_decoys(&self) -> u32 {
        self.level.as_ref().map_or(0, |l| l.required_decoys)
    }

    pub fn spawn_gate(&self) -> SpawnGate {
        SpawnGate {
            lives: self.lives,
            decoys_resolved: self.decoys_resolved,
            required_decoys: self.required_decoys(),
        }
    }

    /// Reset per-level counters for a fresh attempt
    pub fn reset_level_counters(&mut self, starting_lives: i32) {
        self.lives = starting_lives;
        self.decoys_resolved = 0;
        self.targets_spawned = 0;
        self.decoys_spawned = 0;
        self.time_left = self.level.as_ref().map_or(0.0, |l| l.time_limit);
    }

    /// Remove one life. Returns true when none remain.
    pub fn lose_life(&mut self) -> bool {
        self.lives -= 1;
        self.lives <= 0
    }

    /// Count a resolved decoy. Returns true when the level's requirement is met.
    pub fn record_decoy(&mut self) -> bool {
        self.decoys_resolved += 1;
        self.decoys_resolved >= self.required_decoys()
    }

    /// Remaining seconds times `multiplier`, rounded to the nearest point
    pub fn time_bonus(&self, multiplier: f32) -> u64 {
        (self.time_left.max(0.0) * multiplier).round() as u64
    }

    /// Run the level timer down. Returns true on the tick it expires.
    pub fn tick_timer(&mut self, dt: f32) -> bool {
        if dt <= 0.0 || self.time_left <= 0.0 {
            return false;
        }
        self.time_left = (self.time_left - dt).max(0.0);
        self.time_left == 0.0
    }
}

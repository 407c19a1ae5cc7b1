//! Events emitted by the simulation
//!
//! The core never calls into UI or audio. It pushes [`GameEvent`]s onto an
//! [`EventQueue`] which the host drains once per frame, in emission order.

use serde::{Deserialize, Serialize};

use super::entity::Category;
use super::session::SessionState;

/// How an entity left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Player clicked a good target
    GoodClicked,
    /// Good target wandered too far from its anchor
    GoodEscaped,
    /// Player clicked a decoy
    DecoyClicked,
}

/// Category-specific feedback for the audio/FX layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackCue {
    GoodHit,
    DecoyHit,
    Escaped,
}

/// One roster entry as shown on the level's "wanted" display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WantedPoster {
    pub name: String,
    pub category: Category,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    LivesChanged(i32),
    StateChanged(SessionState),
    LevelLoaded {
        index: usize,
        name: String,
        track: String,
    },
    WantedPosters(Vec<WantedPoster>),
    ClearWantedPosters,
    Spawned {
        id: u32,
        category: Category,
    },
    Resolved {
        id: u32,
        outcome: Outcome,
    },
    Feedback(FeedbackCue),
    /// A level completion raised the highest unlocked index
    LevelUnlocked {
        index: usize,
    },
}

/// FIFO of events produced during ticks
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        log::trace!("event: {event:?}");
        self.events.push(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

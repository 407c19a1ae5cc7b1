//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, by entity ID)
//! - No rendering, audio or platform dependencies

pub mod arena;
pub mod context;
pub mod entity;
pub mod events;
pub mod roster;
pub mod session;
pub mod spawner;
pub mod strategy;
pub mod tick;

pub use arena::Arena;
pub use context::SessionContext;
pub use entity::{BehaviorState, Category, EntityInstance, EntitySpec};
pub use events::{EventQueue, FeedbackCue, GameEvent, Outcome, WantedPoster};
pub use roster::{DrawPolicy, Roster};
pub use session::{Session, SessionState};
pub use spawner::{SpawnGate, SpawnTick, Spawner};
pub use strategy::{CategoryStrategy, DecoyStrategy, GoodTargetStrategy};
pub use tick::{TickInput, tick};

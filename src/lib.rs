//! Decoy Dash - a timed click-the-decoy arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, roster, spawner, session)
//! - `levels`: Level definitions and the ordered level registry
//! - `progress`: Persisted unlock progress
//! - `settings`: Data-driven gameplay tuning
//! - `error`: Error types for level loading and configuration

pub mod error;
pub mod levels;
pub mod progress;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, LevelError};
pub use levels::{LevelDefinition, LevelRegistry};
pub use progress::Progress;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default seconds between spawn attempts
    pub const DEFAULT_SPAWN_INTERVAL: f32 = 3.0;
    /// Default level time limit (seconds)
    pub const DEFAULT_TIME_LIMIT: f32 = 60.0;
    /// Lives at the start of every level
    pub const STARTING_LIVES: i32 = 3;
    /// Score per remaining second on a level win
    pub const TIME_BONUS_MULTIPLIER: f32 = 10.0;

    /// Default arena (world units, y up)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Inset keeping spawns away from the arena edges
    pub const SPAWN_PADDING: f32 = 40.0;
    /// How far above the arena top an entity starts its descent
    pub const DESCENT_HEIGHT: f32 = 120.0;

    /// Entity defaults
    pub const HIT_RADIUS: f32 = 24.0;
    pub const MOVE_SPEED: f32 = 60.0;
    pub const FLEE_SPEED: f32 = 180.0;
    /// Fraction of remaining descent covered per second
    pub const DESCENT_RATE: f32 = 4.0;
    /// Distance at which a descending entity snaps onto its landing point
    pub const LANDING_EPSILON: f32 = 0.5;
    /// Distance at which a wandering entity picks its next roam target
    pub const ARRIVAL_TOLERANCE: f32 = 4.0;
    /// Roam targets are sampled within this radius of the anchor
    pub const WANDER_RADIUS: f32 = 80.0;
    /// Good targets beyond this distance from their anchor escape
    pub const MAX_WANDER_RADIUS: f32 = 160.0;
    /// Good targets are repelled by decoys closer than this
    pub const FLEE_RADIUS: f32 = 90.0;
    /// Seconds a resolved entity keeps flying before removal
    pub const FLIGHT_DURATION: f32 = 1.5;
}

/// Move `from` toward `to` by at most `max_step`, landing exactly on `to`
/// when it is within reach.
#[inline]
pub fn move_toward(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= max_step || dist <= f32::EPSILON {
        to
    } else {
        from + delta / dist * max_step
    }
}

/// Point at `radius` and `theta` around `center`
#[inline]
pub fn point_on_circle(center: Vec2, radius: f32, theta: f32) -> Vec2 {
    center + Vec2::new(radius * theta.cos(), radius * theta.sin())
}

//! Gameplay tuning
//!
//! Data-driven balance knobs, loadable from JSON. Missing fields fall back
//! to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Gameplay settings shared by every level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the simulation RNG
    pub seed: u64,

    // === Session ===
    /// Lives at level start
    pub starting_lives: i32,
    /// Score awarded per remaining second on a win
    pub time_bonus_multiplier: f32,

    // === Spawning ===
    /// Probability (0-1) that a spawn tick prefers a decoy
    pub decoy_weight: f64,
    /// Inset from the arena edges for spawn positions
    pub spawn_padding: f32,
    /// Height above the arena top where entities begin descending
    pub descent_height: f32,

    // === Entity behavior ===
    /// Fraction of remaining descent covered per second
    pub descent_rate: f32,
    pub landing_epsilon: f32,
    pub arrival_tolerance: f32,
    pub wander_radius: f32,
    pub max_wander_radius: f32,
    pub flee_radius: f32,
    pub flight_duration: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed_d0c5,

            starting_lives: STARTING_LIVES,
            time_bonus_multiplier: TIME_BONUS_MULTIPLIER,

            decoy_weight: 0.5,
            spawn_padding: SPAWN_PADDING,
            descent_height: DESCENT_HEIGHT,

            descent_rate: DESCENT_RATE,
            landing_epsilon: LANDING_EPSILON,
            arrival_tolerance: ARRIVAL_TOLERANCE,
            wander_radius: WANDER_RADIUS,
            max_wander_radius: MAX_WANDER_RADIUS,
            flee_radius: FLEE_RADIUS,
            flight_duration: FLIGHT_DURATION,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {e}");
                Self::default()
            }
        }
    }

    /// Clamp values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.decoy_weight) {
            log::warn!("decoy_weight {} out of range, clamping", self.decoy_weight);
            self.decoy_weight = if self.decoy_weight.is_nan() {
                0.5
            } else {
                self.decoy_weight.clamp(0.0, 1.0)
            };
        }
        if self.starting_lives < 1 {
            log::warn!("starting_lives {} leaves nothing to lose, using 1", self.starting_lives);
            self.starting_lives = 1;
        }
        self.time_bonus_multiplier =
            non_negative_or("time_bonus_multiplier", self.time_bonus_multiplier, TIME_BONUS_MULTIPLIER);
        self.descent_height = non_negative_or("descent_height", self.descent_height, DESCENT_HEIGHT);
        self.descent_rate = positive_or("descent_rate", self.descent_rate, DESCENT_RATE);
        self.flight_duration = positive_or("flight_duration", self.flight_duration, FLIGHT_DURATION);
        self.flee_radius = non_negative_or("flee_radius", self.flee_radius, FLEE_RADIUS);
        self.spawn_padding = self.spawn_padding.max(0.0);
        self.landing_epsilon = self.landing_epsilon.max(f32::EPSILON);
        self.arrival_tolerance = self.arrival_tolerance.max(f32::EPSILON);
        self.wander_radius = self.wander_radius.max(0.0);
        self.max_wander_radius = self.max_wander_radius.max(self.wander_radius);
        self
    }
}

fn positive_or(name: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("{name} {value} must be positive, using {fallback}");
        fallback
    }
}

fn non_negative_or(name: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("{name} {value} must not be negative, using {fallback}");
        fallback
    }
}

//! Level definitions
//!
//! The registry is an ordered list; a level's index is its identity for
//! unlock progress. Levels load from JSON or come from the built-in set.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SPAWN_INTERVAL, DEFAULT_TIME_LIMIT};
use crate::error::{ConfigError, LevelError};
use crate::sim::{Arena, Category, DrawPolicy, EntitySpec, WantedPoster};

/// Static description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDefinition {
    pub name: String,
    /// Background music reference, passed through to the audio layer
    pub track: String,
    pub roster: Vec<EntitySpec>,
    /// Seconds between spawn attempts
    pub spawn_interval: f32,
    pub draw_policy: DrawPolicy,
    /// Decoy clicks needed to complete the level
    pub required_decoys: u32,
    /// Seconds available; the remainder becomes the win bonus
    pub time_limit: f32,
    pub arena: Arena,
}

impl Default for LevelDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            track: String::new(),
            roster: Vec::new(),
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            draw_policy: DrawPolicy::Fixed,
            required_decoys: 1,
            time_limit: DEFAULT_TIME_LIMIT,
            arena: Arena::default(),
        }
    }
}

impl LevelDefinition {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn count(&self, category: Category) -> usize {
        self.roster.iter().filter(|s| s.category == category).count()
    }

    /// Roster entries for the wanted display
    pub fn wanted_posters(&self) -> Vec<WantedPoster> {
        self.roster
            .iter()
            .map(|s| WantedPoster {
                name: s.name.clone(),
                category: s.category,
                points: s.points,
            })
            .collect()
    }

    /// Hard errors for data that cannot describe a playable level.
    /// Softer problems (an empty roster, too few decoys) are only logged.
    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.required_decoys == 0 {
            return Err(ConfigError::Invalid(format!(
                "level {index} '{}' requires zero decoys",
                self.name
            )));
        }
        if !(self.time_limit.is_finite() && self.time_limit > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "level {index} '{}' has time limit {}",
                self.name, self.time_limit
            )));
        }
        for spec in &self.roster {
            let speeds_ok = [spec.move_speed, spec.flee_speed]
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0);
            let radius_ok = spec.hit_radius.is_finite() && spec.hit_radius > 0.0;
            if !(speeds_ok && radius_ok) {
                return Err(ConfigError::Invalid(format!(
                    "level {index} '{}': entity '{}' has speeds {}/{} and hit radius {}",
                    self.name, spec.name, spec.move_speed, spec.flee_speed, spec.hit_radius
                )));
            }
        }
        if self.roster.is_empty() {
            log::warn!("level {index} '{}' has an empty roster", self.name);
        } else if (self.count(Category::Decoy) as u32) < self.required_decoys {
            log::warn!(
                "level {index} '{}' needs {} decoys but its roster has {}",
                self.name,
                self.required_decoys,
                self.count(Category::Decoy)
            );
        }
        Ok(())
    }
}

/// Ordered, read-only collection of levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelRegistry {
    levels: Vec<LevelDefinition>,
}

impl LevelRegistry {
    pub fn new(levels: Vec<LevelDefinition>) -> Self {
        Self { levels }
    }

    /// Parse and validate a JSON array of levels
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let registry: LevelRegistry = serde_json::from_str(json)?;
        if registry.is_empty() {
            return Err(ConfigError::Invalid("no levels defined".into()));
        }
        for (index, level) in registry.levels.iter().enumerate() {
            level.validate(index)?;
        }
        Ok(registry)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        let registry = Self::from_json(&json)?;
        log::info!("Loaded {} levels from {}", registry.len(), path.display());
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&LevelDefinition, LevelError> {
        if self.levels.is_empty() {
            return Err(LevelError::EmptyRegistry);
        }
        self.levels.get(index).ok_or(LevelError::OutOfRange {
            index,
            len: self.levels.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.levels.len().checked_sub(1)
    }

    /// Number of levels the player may pick given `highest_unlocked`
    pub fn selectable_count(&self, highest_unlocked: usize) -> usize {
        highest_unlocked.saturating_add(1).min(self.levels.len())
    }

    /// The levels shipped with the game
    pub fn builtin() -> Self {
        let duck = |name: &str, speed: f32| EntitySpec {
            move_speed: speed,
            points: 100,
            ..EntitySpec::target(name)
        };
        let goose = |name: &str, speed: f32| EntitySpec {
            move_speed: speed,
            points: 250,
            ..EntitySpec::decoy(name)
        };

        Self::new(vec![
            LevelDefinition {
                name: "Pond".into(),
                track: "music/pond".into(),
                roster: vec![duck("Mallard", 50.0), goose("Greylag", 40.0), duck("Teal", 55.0)],
                spawn_interval: 3.0,
                draw_policy: DrawPolicy::Fixed,
                required_decoys: 1,
                time_limit: 45.0,
                ..Default::default()
            },
            LevelDefinition {
                name: "Marsh".into(),
                track: "music/marsh".into(),
                roster: vec![
                    duck("Mallard", 60.0),
                    goose("Greylag", 50.0),
                    duck("Pintail", 70.0),
                    goose("Brant", 55.0),
                    duck("Wigeon", 65.0),
                ],
                spawn_interval: 2.5,
                draw_policy: DrawPolicy::Random,
                required_decoys: 2,
                time_limit: 60.0,
                ..Default::default()
            },
            LevelDefinition {
                name: "Estuary".into(),
                track: "music/estuary".into(),
                roster: vec![
                    duck("Mallard", 75.0),
                    duck("Eider", 80.0),
                    goose("Greylag", 65.0),
                    duck("Scaup", 85.0),
                    goose("Barnacle", 70.0),
                    duck("Smew", 90.0),
                    goose("Canada", 75.0),
                ],
                spawn_interval: 2.0,
                draw_policy: DrawPolicy::Random,
                required_decoys: 3,
                time_limit: 75.0,
                ..Default::default()
            },
        ])
    }
}

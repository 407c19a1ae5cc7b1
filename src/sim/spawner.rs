//! Timed spawn scheduler
//!
//! A countdown decremented by the (pause-aware) tick delta. When it runs
//! out the scheduler draws one spec from the roster and places a new
//! entity in the arena. Termination is checked before the countdown on
//! every tick, so a met win/loss condition stops spawning immediately.

use rand::Rng;

use super::arena::Arena;
use super::entity::{Category, EntityInstance};
use super::roster::Roster;
use crate::consts::DEFAULT_SPAWN_INTERVAL;
use crate::levels::LevelDefinition;
use crate::settings::Settings;

/// Session counters the scheduler checks before each spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnGate {
    pub lives: i32,
    pub decoys_resolved: u32,
    pub required_decoys: u32,
}

impl SpawnGate {
    pub fn should_stop(&self) -> bool {
        self.lives <= 0 || self.decoys_resolved >= self.required_decoys
    }
}

/// What a single scheduler tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnTick {
    /// Scheduler not running
    Idle,
    /// Termination condition met; scheduler stopped itself
    Stopped,
    /// Countdown still running
    Waiting,
    /// Interval elapsed but nothing could be drawn
    Skipped,
    Spawned { id: u32, category: Category },
}

#[derive(Debug, Clone)]
pub struct Spawner {
    running: bool,
    interval: f32,
    countdown: f32,
    decoy_weight: f64,
    padding: f32,
    arena: Arena,
    roster: Roster,
    active: Vec<EntityInstance>,
    next_id: u32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            running: false,
            interval: DEFAULT_SPAWN_INTERVAL,
            countdown: DEFAULT_SPAWN_INTERVAL,
            decoy_weight: 0.5,
            padding: 0.0,
            arena: Arena::default(),
            roster: Roster::new(Vec::new(), Default::default()),
            active: Vec::new(),
            next_id: 1,
        }
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for `level` and begin spawning. Replaces any running loop and
    /// destroys every entity left over from a previous run.
    pub fn start(&mut self, level: &LevelDefinition, settings: &Settings) {
        self.roster = Roster::new(level.roster.clone(), level.draw_policy);
        self.roster.prepare();
        self.clear_active();

        self.interval = if level.spawn_interval.is_finite() && level.spawn_interval > 0.0 {
            level.spawn_interval
        } else {
            log::warn!(
                "level '{}' has invalid spawn interval {}, using {DEFAULT_SPAWN_INTERVAL}s",
                level.name,
                level.spawn_interval
            );
            DEFAULT_SPAWN_INTERVAL
        };
        if self.roster.specs().is_empty() {
            log::warn!("level '{}' has an empty roster, nothing will spawn", level.name);
        }

        self.countdown = self.interval;
        self.decoy_weight = if settings.decoy_weight.is_nan() {
            0.5
        } else {
            settings.decoy_weight.clamp(0.0, 1.0)
        };
        self.padding = settings.spawn_padding;
        self.arena = level.arena;
        self.next_id = 1;
        self.running = true;
        log::info!(
            "spawner started for '{}' (every {:.2}s, {} targets, {} decoys, {:?} draw)",
            level.name,
            self.interval,
            self.roster.total_count(Category::Target),
            self.roster.total_count(Category::Decoy),
            self.roster.policy()
        );
    }

    /// Stop spawning. Live entities are left in place.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("spawner stopped");
        }
        self.running = false;
    }

    /// Destroy every tracked entity
    pub fn clear_active(&mut self) {
        if !self.active.is_empty() {
            log::debug!("clearing {} active entities", self.active.len());
        }
        self.active.clear();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds until the next spawn attempt
    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn active(&self) -> &[EntityInstance] {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut [EntityInstance] {
        &mut self.active
    }

    /// Drop entities whose flight has finished
    pub fn remove_finished(&mut self) {
        self.active.retain(|e| !e.is_removed());
    }

    /// Advance the scheduler by `dt` seconds
    pub fn tick<R: Rng>(&mut self, dt: f32, gate: SpawnGate, settings: &Settings, rng: &mut R) -> SpawnTick {
        if !self.running {
            return SpawnTick::Idle;
        }
        if gate.should_stop() {
            self.stop();
            return SpawnTick::Stopped;
        }

        self.countdown -= dt.max(0.0);
        if self.countdown > 0.0 {
            return SpawnTick::Waiting;
        }
        self.countdown = self.interval;

        let Some(category) = self.choose_category(rng) else {
            return SpawnTick::Skipped;
        };
        let Some(spec) = self.roster.draw_next(category, rng) else {
            return SpawnTick::Skipped;
        };

        let id = self.next_id;
        self.next_id += 1;
        let landing = self.arena.sample_point(rng, self.padding);
        log::debug!("spawning {} '{}' #{id} at {landing}", category_name(category), spec.name);
        self.active
            .push(EntityInstance::spawn(id, spec, landing, &self.arena, settings));

        SpawnTick::Spawned { id, category }
    }

    /// Weighted coin toward decoys, falling back to good targets
    fn choose_category<R: Rng>(&self, rng: &mut R) -> Option<Category> {
        let prefer_decoy = rng.random_bool(self.decoy_weight);
        if prefer_decoy && self.roster.remaining_count(Category::Decoy) > 0 {
            Some(Category::Decoy)
        } else if self.roster.remaining_count(Category::Target) > 0 {
            Some(Category::Target)
        } else {
            None
        }
    }
}

fn category_name(category: Category) -> &'static str {
    match category {
        Category::Target => "target",
        Category::Decoy => "decoy",
    }
}

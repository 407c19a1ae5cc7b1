//! Session context
//!
//! Owns every piece of gameplay state (session, spawner, registry, progress,
//! RNG, event queue) and implements the session transitions. Nothing here
//! is global: hosts construct a context and pass it to [`tick`](super::tick).
//!
//! Invalid requests (pausing from the menu, restarting with nothing loaded)
//! are ignored rather than reported, since UI races produce them routinely.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::Category;
use super::events::{EventQueue, FeedbackCue, GameEvent, Outcome};
use super::session::{Session, SessionState};
use super::spawner::Spawner;
use crate::error::LevelError;
use crate::levels::{LevelDefinition, LevelRegistry};
use crate::progress::Progress;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub settings: Settings,
    pub registry: LevelRegistry,
    pub progress: Progress,
    pub session: Session,
    pub spawner: Spawner,
    pub events: EventQueue,
    pub(crate) rng: Pcg32,
}

impl SessionContext {
    pub fn new(registry: LevelRegistry, settings: Settings, mut progress: Progress) -> Self {
        progress.clamp_to(registry.len());
        let rng = Pcg32::seed_from_u64(settings.seed);
        Self {
            settings,
            registry,
            progress,
            session: Session::new(),
            spawner: Spawner::new(),
            events: EventQueue::new(),
            rng,
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn level(&self) -> Option<&LevelDefinition> {
        self.session.level.as_ref()
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    fn set_state(&mut self, state: SessionState) {
        if self.session.state != state {
            log::info!("session: {:?} -> {state:?}", self.session.state);
            self.session.state = state;
            self.events.push(GameEvent::StateChanged(state));
        }
    }

    /// Load level `index` from the registry and return to the menu
    pub fn load_level(&mut self, index: usize) -> Result<(), LevelError> {
        let level = match self.registry.get(index) {
            Ok(level) => level.clone(),
            Err(e) => {
                log::error!("cannot load level {index}: {e}");
                return Err(e);
            }
        };

        self.spawner.stop();
        self.spawner.clear_active();

        self.events.push(GameEvent::ClearWantedPosters);
        self.events.push(GameEvent::LevelLoaded {
            index,
            name: level.name.clone(),
            track: level.track.clone(),
        });
        self.events.push(GameEvent::WantedPosters(level.wanted_posters()));
        log::info!("loaded level {index} '{}'", level.name);

        self.session.level_index = index;
        self.session.level = Some(level);
        self.session.reset_level_counters(self.settings.starting_lives);
        self.set_state(SessionState::Menu);
        Ok(())
    }

    /// Load a level the player picked, honoring unlock progress
    pub fn select_level(&mut self, index: usize) -> Result<(), LevelError> {
        if !self.progress.is_unlocked(index) {
            return Err(LevelError::Locked {
                index,
                highest: self.progress.highest_unlocked,
            });
        }
        self.load_level(index)
    }

    /// Begin play on the loaded level
    pub fn start_game(&mut self) {
        if self.session.state.in_level() {
            log::debug!("start_game ignored while {:?}", self.session.state);
            return;
        }
        let Some(level) = self.session.level.clone() else {
            log::debug!("start_game ignored: no level loaded");
            return;
        };

        self.session.reset_level_counters(self.settings.starting_lives);
        self.spawner.start(&level, &self.settings);
        self.set_state(SessionState::Playing);
        self.events.push(GameEvent::LivesChanged(self.session.lives));
        self.events.push(GameEvent::ScoreChanged(self.session.score));

        if self.session.lives <= 0 {
            log::warn!("level {} started with no lives", self.session.level_index);
            self.end_game(false);
        }
    }

    /// Finish the current level. A win adds the time bonus and unlocks the
    /// next level.
    pub fn end_game(&mut self, won: bool) {
        if !self.session.state.in_level() {
            log::debug!("end_game ignored while {:?}", self.session.state);
            return;
        }
        self.spawner.stop();

        if won {
            let bonus = self.session.time_bonus(self.settings.time_bonus_multiplier);
            self.session.score += bonus;
            log::info!(
                "level {} complete, time bonus {bonus} (score {})",
                self.session.level_index,
                self.session.score
            );
            self.events.push(GameEvent::ScoreChanged(self.session.score));

            if let Some(index) = self
                .progress
                .record_completion(self.session.level_index, self.registry.len())
            {
                self.events.push(GameEvent::LevelUnlocked { index });
            }
        }
        self.progress.record_score(self.session.score);

        self.set_state(if won {
            SessionState::LevelComplete
        } else {
            SessionState::GameOver
        });
    }

    /// Flip between playing and paused; no-op in any other state
    pub fn toggle_pause(&mut self) {
        match self.session.state {
            SessionState::Playing => self.set_state(SessionState::Paused),
            SessionState::Paused => self.set_state(SessionState::Playing),
            other => log::debug!("toggle_pause ignored while {other:?}"),
        }
    }

    /// Player clicked a good target. Costs a life, same as losing one.
    pub fn on_good_resolved(&mut self) {
        self.lose_life();
    }

    /// A good target escaped
    pub fn on_good_lost(&mut self) {
        self.lose_life();
    }

    fn lose_life(&mut self) {
        if self.session.state != SessionState::Playing {
            return;
        }
        let depleted = self.session.lose_life();
        self.events.push(GameEvent::LivesChanged(self.session.lives));
        if depleted {
            self.end_game(false);
        }
    }

    /// Player clicked a decoy; enough of them wins the level
    pub fn on_decoy_clicked(&mut self) {
        if self.session.state != SessionState::Playing {
            return;
        }
        if self.session.record_decoy() {
            self.end_game(true);
        }
    }

    /// Spawn bookkeeping for the progress display
    pub fn on_entity_spawned(&mut self, id: u32, category: Category) {
        match category {
            Category::Target => self.session.targets_spawned += 1,
            Category::Decoy => self.session.decoys_spawned += 1,
        }
        self.events.push(GameEvent::Spawned { id, category });
    }

    /// Report an entity outcome and route it to the matching handler.
    /// Outcomes arriving after play has stopped are dropped unreported.
    pub fn dispatch_outcome(&mut self, id: u32, category: Category, outcome: Outcome) {
        if self.session.state != SessionState::Playing {
            log::debug!("entity {id} {outcome:?} ignored while {:?}", self.session.state);
            return;
        }
        let cue = match outcome {
            Outcome::GoodEscaped => FeedbackCue::Escaped,
            Outcome::GoodClicked | Outcome::DecoyClicked => category.strategy().click_feedback(),
        };
        self.events.push(GameEvent::Feedback(cue));
        self.events.push(GameEvent::Resolved { id, outcome });

        match outcome {
            Outcome::GoodClicked => self.on_good_resolved(),
            Outcome::GoodEscaped => self.on_good_lost(),
            Outcome::DecoyClicked => self.on_decoy_clicked(),
        }
    }

    /// Load and start the following level. Past the final level the session
    /// ends in `GameComplete`.
    pub fn advance_to_next_level(&mut self) -> Result<(), LevelError> {
        let last = self.registry.last_index().ok_or(LevelError::EmptyRegistry)?;
        let next = self.session.level_index + 1;
        if self.session.level.is_none() {
            return Err(LevelError::NotLoaded);
        }
        if next > last {
            self.spawner.stop();
            log::info!("all {} levels complete, final score {}", last + 1, self.session.score);
            self.set_state(SessionState::GameComplete);
            return Ok(());
        }
        self.load_level(next)?;
        self.start_game();
        Ok(())
    }

    /// Jump straight into level `index`, ignoring unlocks. Indices outside
    /// the registry are rejected without touching the session.
    pub fn jump_to_level(&mut self, index: usize) -> Result<(), LevelError> {
        self.load_level(index)?;
        self.start_game();
        Ok(())
    }

    /// Reset score, lives and counters and return to the menu
    pub fn restart_level(&mut self) {
        if self.session.level.is_none() {
            log::debug!("restart_level ignored: no level loaded");
            return;
        }
        self.spawner.stop();
        self.spawner.clear_active();
        self.session.score = 0;
        self.session.reset_level_counters(self.settings.starting_lives);
        self.events.push(GameEvent::ScoreChanged(0));
        self.events.push(GameEvent::LivesChanged(self.session.lives));
        self.set_state(SessionState::Menu);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntitySpec;

    fn ctx() -> SessionContext {
        SessionContext::new(LevelRegistry::builtin(), Settings::default(), Progress::new())
    }

    #[test]
    fn test_start_requires_loaded_level() {
        let mut ctx = ctx();
        ctx.start_game();
        assert_eq!(ctx.state(), SessionState::Menu);
        assert!(!ctx.spawner.is_running());

        ctx.load_level(0).unwrap();
        ctx.start_game();
        assert_eq!(ctx.state(), SessionState::Playing);
        assert!(ctx.spawner.is_running());
        assert_eq!(ctx.session.lives, ctx.settings.starting_lives);
    }

    #[test]
    fn test_load_level_emits_in_order() {
        let mut ctx = ctx();
        ctx.load_level(1).unwrap();
        let events = ctx.drain_events();
        assert_eq!(events[0], GameEvent::ClearWantedPosters);
        assert!(matches!(&events[1], GameEvent::LevelLoaded { index: 1, name, .. } if name == "Marsh"));
        assert!(matches!(&events[2], GameEvent::WantedPosters(p) if p.len() == 5));
    }

    #[test]
    fn test_toggle_pause_only_in_level() {
        let mut ctx = ctx();
        ctx.toggle_pause();
        assert_eq!(ctx.state(), SessionState::Menu);

        ctx.load_level(0).unwrap();
        ctx.start_game();
        ctx.toggle_pause();
        assert_eq!(ctx.state(), SessionState::Paused);
        ctx.toggle_pause();
        assert_eq!(ctx.state(), SessionState::Playing);

        ctx.end_game(false);
        ctx.toggle_pause();
        assert_eq!(ctx.state(), SessionState::GameOver);
    }

    #[test]
    fn test_win_adds_time_bonus_and_unlocks() {
        let mut ctx = ctx();
        ctx.load_level(0).unwrap();
        ctx.start_game();
        ctx.session.time_left = 12.0;
        ctx.drain_events();

        ctx.on_decoy_clicked();
        assert_eq!(ctx.state(), SessionState::LevelComplete);
        assert_eq!(ctx.session.score, 120);
        assert!(!ctx.spawner.is_running());
        assert_eq!(ctx.progress.highest_unlocked, 1);
        assert_eq!(ctx.progress.best_score, 120);

        let events = ctx.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::ScoreChanged(120),
                GameEvent::LevelUnlocked { index: 1 },
                GameEvent::StateChanged(SessionState::LevelComplete),
            ]
        );
    }

    #[test]
    fn test_good_click_and_escape_both_cost_lives() {
        let mut ctx = ctx();
        ctx.load_level(0).unwrap();
        ctx.start_game();

        ctx.on_good_resolved();
        ctx.on_good_lost();
        assert_eq!(ctx.session.lives, 1);
        assert_eq!(ctx.session.score, 0);
        assert_eq!(ctx.state(), SessionState::Playing);

        ctx.on_good_resolved();
        assert_eq!(ctx.state(), SessionState::GameOver);
        assert!(!ctx.spawner.is_running());
        assert_eq!(ctx.session.score, 0, "no bonus on a loss");
        assert_eq!(ctx.progress.highest_unlocked, 0);
    }

    #[test]
    fn test_outcomes_ignored_outside_play() {
        let mut ctx = ctx();
        ctx.load_level(0).unwrap();
        ctx.start_game();
        ctx.toggle_pause();
        ctx.on_good_lost();
        ctx.on_decoy_clicked();
        assert_eq!(ctx.session.lives, ctx.settings.starting_lives);
        assert_eq!(ctx.session.decoys_resolved, 0);
    }

    #[test]
    fn test_jump_out_of_range_rejected() {
        let mut ctx = ctx();
        ctx.load_level(0).unwrap();
        ctx.start_game();
        assert_eq!(
            ctx.jump_to_level(7),
            Err(LevelError::OutOfRange { index: 7, len: 3 })
        );
        assert_eq!(ctx.state(), SessionState::Playing);
        assert_eq!(ctx.session.level_index, 0);
    }

    #[test]
    fn test_jump_ignores_unlocks_select_does_not() {
        let mut ctx = ctx();
        assert_eq!(
            ctx.select_level(2),
            Err(LevelError::Locked { index: 2, highest: 0 })
        );
        ctx.jump_to_level(2).unwrap();
        assert_eq!(ctx.session.level_index, 2);
        assert_eq!(ctx.state(), SessionState::Playing);
    }

    #[test]
    fn test_advance_walks_levels_then_completes() {
        let mut ctx = ctx();
        assert_eq!(ctx.advance_to_next_level(), Err(LevelError::NotLoaded));

        ctx.load_level(0).unwrap();
        ctx.advance_to_next_level().unwrap();
        assert_eq!(ctx.session.level_index, 1);
        assert_eq!(ctx.state(), SessionState::Playing);

        ctx.advance_to_next_level().unwrap();
        assert_eq!(ctx.session.level_index, 2);

        ctx.advance_to_next_level().unwrap();
        assert_eq!(ctx.session.level_index, 2);
        assert_eq!(ctx.state(), SessionState::GameComplete);
        assert!(!ctx.spawner.is_running());
    }

    #[test]
    fn test_restart_resets_and_returns_to_menu() {
        let mut ctx = ctx();
        ctx.restart_level();
        assert_eq!(ctx.state(), SessionState::Menu);

        ctx.load_level(0).unwrap();
        ctx.start_game();
        ctx.session.score = 500;
        ctx.on_good_lost();
        ctx.restart_level();

        assert_eq!(ctx.state(), SessionState::Menu);
        assert_eq!(ctx.session.score, 0);
        assert_eq!(ctx.session.lives, ctx.settings.starting_lives);
        assert!(!ctx.spawner.is_running());
        assert!(ctx.spawner.active().is_empty());
        assert!(ctx.level().is_some());
    }

    #[test]
    fn test_empty_registry_aborts_level_start() {
        let mut ctx = SessionContext::new(LevelRegistry::default(), Settings::default(), Progress::new());
        assert_eq!(ctx.load_level(0), Err(LevelError::EmptyRegistry));
        assert_eq!(ctx.advance_to_next_level(), Err(LevelError::EmptyRegistry));
        ctx.start_game();
        assert_eq!(ctx.state(), SessionState::Menu);
    }

    #[test]
    fn test_dispatch_routes_and_reports() {
        let mut ctx = SessionContext::new(
            LevelRegistry::new(vec![LevelDefinition {
                roster: vec![EntitySpec::decoy("d"), EntitySpec::decoy("e")],
                required_decoys: 2,
                ..LevelDefinition::named("two")
            }]),
            Settings::default(),
            Progress::new(),
        );
        ctx.load_level(0).unwrap();
        ctx.start_game();
        ctx.drain_events();

        ctx.dispatch_outcome(4, Category::Decoy, Outcome::DecoyClicked);
        assert_eq!(
            ctx.drain_events(),
            vec![
                GameEvent::Feedback(FeedbackCue::DecoyHit),
                GameEvent::Resolved {
                    id: 4,
                    outcome: Outcome::DecoyClicked
                },
            ]
        );
        assert_eq!(ctx.session.decoys_resolved, 1);
        assert_eq!(ctx.state(), SessionState::Playing);
    }

    #[test]
    fn test_start_without_lives_is_a_loss() {
        let mut ctx = ctx();
        ctx.settings.starting_lives = 0;
        ctx.load_level(0).unwrap();
        ctx.start_game();
        assert_eq!(ctx.state(), SessionState::GameOver);
        assert!(!ctx.spawner.is_running());
    }

    #[test]
    fn test_outcomes_after_level_end_are_dropped() {
        let mut ctx = ctx();
        ctx.load_level(0).unwrap();
        ctx.start_game();
        ctx.end_game(true);
        ctx.drain_events();

        ctx.dispatch_outcome(9, Category::Target, Outcome::GoodEscaped);
        assert!(ctx.drain_events().is_empty());
        assert_eq!(ctx.session.lives, ctx.settings.starting_lives);
        assert_eq!(ctx.state(), SessionState::LevelComplete);
    }

    #[test]
    fn test_progress_clamped_to_registry() {
        let progress = Progress {
            highest_unlocked: usize::MAX,
            ..Progress::new()
        };
        let ctx = SessionContext::new(LevelRegistry::builtin(), Settings::default(), progress);
        assert_eq!(ctx.progress.highest_unlocked, 2);
        assert_eq!(ctx.registry.selectable_count(ctx.progress.highest_unlocked), 3);
    }

    #[test]
    fn test_spawn_counters_reset_per_attempt() {
        let mut ctx = ctx();
        ctx.load_level(0).unwrap();
        ctx.start_game();
        ctx.on_entity_spawned(1, Category::Target);
        ctx.on_entity_spawned(2, Category::Decoy);
        ctx.on_entity_spawned(3, Category::Decoy);
        assert_eq!((ctx.session.targets_spawned, ctx.session.decoys_spawned), (1, 2));

        ctx.restart_level();
        assert_eq!((ctx.session.targets_spawned, ctx.session.decoys_spawned), (0, 0));
    }
}

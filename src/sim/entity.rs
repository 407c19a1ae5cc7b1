//! Clickable entities and their behavior state machine
//!
//! Lifecycle: `Descending -> Wandering -> Fleeing -> Removed`.
//! An instance only becomes interactive once it has landed, and it reports
//! at most one [`Outcome`] over its whole life.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::events::Outcome;
use crate::consts::*;
use crate::settings::Settings;
use crate::{move_toward, point_on_circle};

/// Which side of the rules an entity is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// "Good" target
    Target,
    Decoy,
}

/// Static definition of a spawnable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitySpec {
    pub name: String,
    pub category: Category,
    /// Wander speed (units/sec)
    pub move_speed: f32,
    /// Speed when fleeing or repelled (units/sec)
    pub flee_speed: f32,
    /// Expected time on screen (seconds), for display only
    pub lifetime_hint: f32,
    /// Point value shown on the wanted display
    pub points: u32,
    pub hit_radius: f32,
}

impl Default for EntitySpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: Category::Target,
            move_speed: MOVE_SPEED,
            flee_speed: FLEE_SPEED,
            lifetime_hint: 10.0,
            points: 100,
            hit_radius: HIT_RADIUS,
        }
    }
}

impl EntitySpec {
    pub fn target(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Category::Target,
            ..Default::default()
        }
    }

    pub fn decoy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Category::Decoy,
            ..Default::default()
        }
    }
}

/// Behavior state of a live entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Dropping into the arena toward the anchor; not interactive
    Descending,
    /// Landed and roaming around the anchor
    Wandering,
    /// Resolved and flying off
    Fleeing { remaining: f32, dir: Vec2 },
    /// Ready to be dropped from the active list
    Removed,
}

/// A live entity in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityInstance {
    pub id: u32,
    pub spec: EntitySpec,
    pub pos: Vec2,
    /// Landing point; wandering is measured from here
    pub anchor: Vec2,
    pub roam_target: Vec2,
    pub state: BehaviorState,
    resolved: bool,
    descent_rate: f32,
    flight_time: f32,
}

impl EntityInstance {
    /// Create an instance above the arena, descending onto `landing`
    pub fn spawn(id: u32, spec: EntitySpec, landing: Vec2, arena: &Arena, settings: &Settings) -> Self {
        let start = Vec2::new(landing.x, arena.max.y + settings.descent_height);
        Self {
            id,
            spec,
            pos: start,
            anchor: landing,
            roam_target: landing,
            state: BehaviorState::Descending,
            resolved: false,
            descent_rate: settings.descent_rate,
            flight_time: settings.flight_duration,
        }
    }

    pub fn category(&self) -> Category {
        self.spec.category
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn is_landed(&self) -> bool {
        !matches!(self.state, BehaviorState::Descending)
    }

    pub fn is_removed(&self) -> bool {
        self.state == BehaviorState::Removed
    }

    /// Landed, unresolved and still in play
    pub fn is_clickable(&self) -> bool {
        self.state == BehaviorState::Wandering && !self.resolved
    }

    pub fn hit_test(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) <= self.spec.hit_radius * self.spec.hit_radius
    }

    /// Handle a click at `point`. Returns the outcome on the first accepted
    /// click; every later click is a no-op.
    pub fn click(&mut self, point: Vec2) -> Option<Outcome> {
        if !self.is_clickable() || !self.hit_test(point) {
            return None;
        }
        let outcome = self.category().strategy().click_outcome();
        self.resolve(outcome, Vec2::Y)
    }

    /// Mark resolved and start the flight. `None` if already resolved.
    fn resolve(&mut self, outcome: Outcome, dir: Vec2) -> Option<Outcome> {
        if self.resolved {
            return None;
        }
        self.resolved = true;
        self.state = BehaviorState::Fleeing {
            remaining: self.flight_time,
            dir,
        };
        log::debug!("entity {} resolved: {outcome:?}", self.id);
        Some(outcome)
    }

    /// Advance one tick. `decoys` holds positions of landed, unresolved
    /// decoys. Returns an outcome when the entity escapes on its own.
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        arena: &Arena,
        decoys: &[Vec2],
        settings: &Settings,
        rng: &mut R,
    ) -> Option<Outcome> {
        if dt <= 0.0 {
            return None;
        }

        match self.state {
            BehaviorState::Descending => {
                let t = (self.descent_rate * dt).min(1.0);
                self.pos = self.pos.lerp(self.anchor, t);
                if self.pos.distance(self.anchor) < settings.landing_epsilon {
                    self.pos = self.anchor;
                    self.roam_target = self.anchor;
                    self.state = BehaviorState::Wandering;
                }
                None
            }
            BehaviorState::Wandering => self.wander(dt, arena, decoys, settings, rng),
            BehaviorState::Fleeing { remaining, dir } => {
                self.pos += dir * self.spec.flee_speed * dt;
                let remaining = remaining - dt;
                self.state = if remaining <= 0.0 {
                    BehaviorState::Removed
                } else {
                    BehaviorState::Fleeing { remaining, dir }
                };
                None
            }
            BehaviorState::Removed => None,
        }
    }

    fn wander<R: Rng>(
        &mut self,
        dt: f32,
        arena: &Arena,
        decoys: &[Vec2],
        settings: &Settings,
        rng: &mut R,
    ) -> Option<Outcome> {
        let strategy = self.category().strategy();

        if let Some(dir) = strategy.repulsion(self.pos, decoys, settings.flee_radius) {
            self.pos = arena.clamp(self.pos + dir * self.spec.flee_speed * dt);
        } else {
            if self.pos.distance(self.roam_target) <= settings.arrival_tolerance {
                self.roam_target = self.pick_roam_target(arena, settings, rng);
            }
            self.pos = move_toward(self.pos, self.roam_target, self.spec.move_speed * dt);
        }

        if strategy.escapes() && self.pos.distance(self.anchor) > settings.max_wander_radius {
            let away = (self.pos - self.anchor).normalize_or_zero();
            return self.resolve(Outcome::GoodEscaped, away);
        }
        None
    }

    /// Uniform point in the wander disk around the anchor, kept inside
    /// the padded arena
    fn pick_roam_target<R: Rng>(&self, arena: &Arena, settings: &Settings, rng: &mut R) -> Vec2 {
        let theta = rng.random_range(0.0..std::f32::consts::TAU);
        let r = settings.wander_radius * rng.random::<f32>().sqrt();
        arena
            .inset(settings.spawn_padding)
            .clamp(point_on_circle(self.anchor, r, theta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn landed(spec: EntitySpec, at: Vec2) -> EntityInstance {
        let settings = Settings::default();
        let arena = Arena::default();
        let mut e = EntityInstance::spawn(1, spec, at, &arena, &settings);
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..10_000 {
            if e.is_landed() {
                break;
            }
            e.update(SIM_DT, &arena, &[], &settings, &mut rng);
        }
        assert!(e.is_landed());
        e
    }

    #[test]
    fn test_spawn_starts_above_arena() {
        let arena = Arena::default();
        let e = EntityInstance::spawn(
            1,
            EntitySpec::target("a"),
            Vec2::new(100.0, 100.0),
            &arena,
            &Settings::default(),
        );
        assert_eq!(e.state, BehaviorState::Descending);
        assert!(e.pos.y > arena.max.y);
        assert_eq!(e.pos.x, 100.0);
    }

    #[test]
    fn test_descent_lands_on_anchor() {
        let at = Vec2::new(300.0, 200.0);
        let e = landed(EntitySpec::decoy("d"), at);
        assert_eq!(e.pos, at);
        assert_eq!(e.state, BehaviorState::Wandering);
    }

    #[test]
    fn test_click_ignored_while_descending() {
        let arena = Arena::default();
        let mut e = EntityInstance::spawn(
            1,
            EntitySpec::decoy("d"),
            Vec2::new(100.0, 100.0),
            &arena,
            &Settings::default(),
        );
        let pos = e.pos;
        assert_eq!(e.click(pos), None);
        assert!(!e.is_resolved());
    }

    #[test]
    fn test_click_miss_does_not_resolve() {
        let mut e = landed(EntitySpec::decoy("d"), Vec2::new(100.0, 100.0));
        assert_eq!(e.click(Vec2::new(400.0, 400.0)), None);
        assert!(e.is_clickable());
    }

    #[test]
    fn test_click_resolves_once() {
        let mut e = landed(EntitySpec::decoy("d"), Vec2::new(100.0, 100.0));
        let pos = e.pos;
        assert_eq!(e.click(pos), Some(Outcome::DecoyClicked));
        assert!(e.is_resolved());
        assert!(matches!(e.state, BehaviorState::Fleeing { .. }));
        let state = e.state;
        assert_eq!(e.click(pos), None);
        assert_eq!(e.state, state);
    }

    #[test]
    fn test_fleeing_ends_removed() {
        let settings = Settings::default();
        let arena = Arena::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = landed(EntitySpec::target("t"), Vec2::new(400.0, 300.0));
        let pos = e.pos;
        assert_eq!(e.click(pos), Some(Outcome::GoodClicked));

        let ticks = (settings.flight_duration / SIM_DT).ceil() as usize + 1;
        for _ in 0..ticks {
            e.update(SIM_DT, &arena, &[], &settings, &mut rng);
        }
        assert!(e.is_removed());
        assert!(e.pos.y > pos.y);
    }

    #[test]
    fn test_good_target_escapes_when_repelled_past_radius() {
        let settings = Settings::default();
        let arena = Arena::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let anchor = Vec2::new(400.0, 300.0);
        let mut e = landed(EntitySpec::target("t"), anchor);
        let decoy = anchor + Vec2::new(-10.0, 0.0);

        let mut escaped = None;
        for _ in 0..10_000 {
            // Keep the decoy right behind the target so repulsion never lets up
            let decoys = [e.pos + Vec2::new(-10.0, 0.0)];
            if let Some(outcome) = e.update(SIM_DT, &arena, &decoys, &settings, &mut rng) {
                escaped = Some(outcome);
                break;
            }
        }
        assert_eq!(escaped, Some(Outcome::GoodEscaped));
        assert!(e.is_resolved());
        assert!(e.pos.x > decoy.x);
        assert!(e.pos.distance(anchor) > settings.max_wander_radius);
    }

    #[test]
    fn test_repulsion_stays_inside_arena() {
        let settings = Settings::default();
        let arena = Arena::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut e = landed(EntitySpec::target("t"), Vec2::new(10.0, 300.0));
        for _ in 0..600 {
            let decoys = [e.pos + Vec2::new(10.0, 0.0)];
            e.update(SIM_DT, &arena, &decoys, &settings, &mut rng);
            assert!(arena.contains(e.pos), "left the arena at {}", e.pos);
        }
        assert_eq!(e.pos.x, arena.min.x);
        assert!(!e.is_resolved());
    }

    #[test]
    fn test_decoy_never_escapes() {
        let settings = Settings::default();
        let arena = Arena::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut e = landed(EntitySpec::decoy("d"), Vec2::new(400.0, 300.0));
        for _ in 0..5_000 {
            assert_eq!(e.update(SIM_DT, &arena, &[], &settings, &mut rng), None);
        }
        assert!(!e.is_resolved());
        assert!(e.pos.distance(e.anchor) <= settings.wander_radius + 1.0);
    }

    #[test]
    fn test_zero_dt_freezes() {
        let settings = Settings::default();
        let arena = Arena::default();
        let mut rng = Pcg32::seed_from_u64(6);
        let mut e = EntityInstance::spawn(
            1,
            EntitySpec::target("t"),
            Vec2::new(200.0, 200.0),
            &arena,
            &settings,
        );
        let before = e.pos;
        for _ in 0..100 {
            e.update(0.0, &arena, &[], &settings, &mut rng);
        }
        assert_eq!(e.pos, before);
        assert_eq!(e.state, BehaviorState::Descending);
    }

    proptest! {
        #[test]
        fn prop_click_is_idempotent(x in 60.0f32..740.0, y in 60.0f32..540.0, decoy in any::<bool>()) {
            let spec = if decoy { EntitySpec::decoy("d") } else { EntitySpec::target("t") };
            let mut e = landed(spec, Vec2::new(x, y));
            let pos = e.pos;
            let first = e.click(pos);
            prop_assert!(first.is_some());
            let after_first = (e.state, e.is_resolved(), e.pos);
            prop_assert_eq!(e.click(pos), None);
            prop_assert_eq!((e.state, e.is_resolved(), e.pos), after_first);
        }
    }
}

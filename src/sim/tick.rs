//! Fixed timestep simulation tick
//!
//! Order within a tick: pause toggle, click, entity movement, outcome
//! dispatch, level timer, spawner. Pausing scales the delta to zero instead
//! of skipping the pipeline, so every countdown simply holds its value.

use glam::Vec2;

use super::context::SessionContext;
use super::entity::Category;
use super::session::SessionState;
use super::spawner::SpawnTick;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Click/tap position in arena coordinates
    pub click: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Skip to next level (debug/testing)
    pub skip_level: bool,
    /// Demo mode - clicks decoys automatically
    pub autopilot: bool,
}

/// Advance the game by one timestep
pub fn tick(ctx: &mut SessionContext, input: &TickInput, dt: f32) {
    if input.pause {
        ctx.toggle_pause();
    }

    if input.skip_level {
        if let Err(e) = ctx.advance_to_next_level() {
            log::warn!("skip level failed: {e}");
        }
        return;
    }

    if !ctx.state().in_level() {
        return;
    }
    let dt = dt.max(0.0) * ctx.state().time_scale();

    if ctx.state() == SessionState::Playing {
        let click = if input.autopilot {
            autopilot_click(ctx).or(input.click)
        } else {
            input.click
        };
        if let Some(point) = click {
            handle_click(ctx, point);
        }
    }

    // A click that ended the level freezes the arena for the rest of the tick
    if ctx.state() == SessionState::Playing {
        update_entities(ctx, dt);
    }

    if ctx.state() == SessionState::Playing && ctx.session.tick_timer(dt) {
        log::info!("time up on level {}", ctx.session.level_index);
        ctx.end_game(false);
    }

    let gate = ctx.session.spawn_gate();
    let SessionContext {
        spawner,
        settings,
        rng,
        ..
    } = &mut *ctx;
    if let SpawnTick::Spawned { id, category } = spawner.tick(dt, gate, settings, rng) {
        ctx.on_entity_spawned(id, category);
    }
}

/// Resolve a click against the nearest clickable entity under the pointer
fn handle_click(ctx: &mut SessionContext, point: Vec2) {
    let hit = ctx
        .spawner
        .active_mut()
        .iter_mut()
        .filter(|e| e.is_clickable() && e.hit_test(point))
        .min_by(|a, b| {
            a.pos
                .distance_squared(point)
                .total_cmp(&b.pos.distance_squared(point))
        });
    let Some(entity) = hit else {
        return;
    };

    let (id, category) = (entity.id, entity.category());
    if let Some(outcome) = entity.click(point) {
        ctx.dispatch_outcome(id, category, outcome);
    }
}

fn update_entities(ctx: &mut SessionContext, dt: f32) {
    let decoys: Vec<Vec2> = ctx
        .spawner
        .active()
        .iter()
        .filter(|e| e.category() == Category::Decoy && e.is_clickable())
        .map(|e| e.pos)
        .collect();

    let SessionContext {
        spawner,
        settings,
        rng,
        ..
    } = &mut *ctx;
    let arena = *spawner.arena();
    let mut outcomes = Vec::new();
    for entity in spawner.active_mut() {
        if let Some(outcome) = entity.update(dt, &arena, &decoys, settings, rng) {
            outcomes.push((entity.id, entity.category(), outcome));
        }
    }

    for (id, category, outcome) in outcomes {
        ctx.dispatch_outcome(id, category, outcome);
    }
    ctx.spawner.remove_finished();
}

/// Demo player: click the oldest landed decoy
fn autopilot_click(ctx: &SessionContext) -> Option<Vec2> {
    ctx.spawner
        .active()
        .iter()
        .filter(|e| e.category() == Category::Decoy && e.is_clickable())
        .min_by_key(|e| e.id)
        .map(|e| e.pos)
}

//! Decoy Dash entry point
//!
//! Headless demo: loads levels and progress, then lets the autopilot play
//! through the simulation at a fixed timestep, logging session events.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use decoy_dash::consts::*;
use decoy_dash::sim::{GameEvent, SessionContext, SessionState, TickInput, tick};
use decoy_dash::{LevelRegistry, Progress, Settings};

/// Click the decoys, spare the rest
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,
    /// Level definitions (JSON array); built-in levels when omitted
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Gameplay settings (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Progress save file
    #[arg(long, default_value = "decoy_dash_progress.json")]
    progress: PathBuf,
    /// Level to start on
    #[arg(long, default_value_t = 0)]
    level: usize,
    /// Start on the level even if it is still locked
    #[arg(long)]
    any_level: bool,
    /// Simulated seconds before the demo gives up
    #[arg(long, default_value_t = 600.0)]
    seconds: f32,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Frame time of the simulated host loop
const FRAME_DT: f32 = 1.0 / 30.0;

/// Host loop state
struct Game {
    ctx: SessionContext,
    accumulator: f32,
    input: TickInput,
    elapsed: f32,
    progress_path: PathBuf,
}

impl Game {
    fn new(ctx: SessionContext, progress_path: PathBuf) -> Self {
        Self {
            ctx,
            accumulator: 0.0,
            input: TickInput {
                autopilot: true,
                ..Default::default()
            },
            elapsed: 0.0,
            progress_path,
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;
        self.elapsed += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.ctx, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.click = None;
            self.input.pause = false;
            self.input.skip_level = false;
        }

        for event in self.ctx.drain_events() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::ScoreChanged(score) => log::info!("score: {score}"),
            GameEvent::LivesChanged(lives) => log::info!("lives: {lives}"),
            GameEvent::StateChanged(state) => log::info!("state: {state:?}"),
            GameEvent::LevelLoaded { index, name, track } => {
                log::info!("level {index}: {name} (track '{track}')")
            }
            GameEvent::WantedPosters(posters) => {
                for poster in posters {
                    log::debug!("wanted: {} ({:?}, {} pts)", poster.name, poster.category, poster.points);
                }
            }
            GameEvent::LevelUnlocked { index } => {
                log::info!("unlocked level {index}");
                if let Err(e) = self.ctx.progress.save(&self.progress_path) {
                    log::warn!("could not save progress: {e}");
                }
            }
            other => log::debug!("{other:?}"),
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = Builder::from_env(Env::default().default_filter_or(level.to_string())).try_init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    log::info!("Decoy Dash (headless demo) starting...");

    let mut settings = match &args.settings {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    let registry = match &args.levels {
        Some(path) => match LevelRegistry::load(path) {
            Ok(registry) => registry,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => LevelRegistry::builtin(),
    };
    let progress = Progress::load_or_default(&args.progress);

    let mut ctx = SessionContext::new(registry, settings, progress);
    log::info!(
        "{} of {} levels selectable",
        ctx.registry.selectable_count(ctx.progress.highest_unlocked),
        ctx.registry.len()
    );
    let loaded = if args.any_level {
        ctx.load_level(args.level)
    } else {
        ctx.select_level(args.level)
    };
    if let Err(e) = loaded {
        log::error!("{e}");
        return ExitCode::FAILURE;
    }
    ctx.start_game();

    let mut game = Game::new(ctx, args.progress);
    while game.elapsed < args.seconds {
        game.update(FRAME_DT);

        match game.ctx.state() {
            SessionState::LevelComplete => {
                if let Err(e) = game.ctx.advance_to_next_level() {
                    log::error!("{e}");
                    return ExitCode::FAILURE;
                }
            }
            SessionState::GameOver | SessionState::GameComplete => break,
            _ => {}
        }
    }
    // Flush events raised by the final transition
    game.update(0.0);

    let ctx = &game.ctx;
    println!(
        "{:?} after {:.1}s: level {}, score {}, best {} ({} targets, {} decoys spawned this level)",
        ctx.state(),
        game.elapsed,
        ctx.session.level_index,
        ctx.session.score,
        ctx.progress.best_score,
        ctx.session.targets_spawned,
        ctx.session.decoys_spawned
    );
    if let Err(e) = ctx.progress.save(&game.progress_path) {
        log::warn!("could not save progress: {e}");
    }
    ExitCode::SUCCESS
}

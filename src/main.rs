mod actions;
mod ai;
mod combat;
mod config;
mod consumables;
mod data;
mod ecs;
mod engine;
mod error;
mod input;
mod log;
mod map;
mod render;
mod scripted_input;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use bracket_terminal::prelude::*;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::GameConfig;
use engine::Engine;
use input::{InputMode, KeyEvent};
use scripted_input::ScriptedInput;

const LOG_DIR: &str = "logs";

/// Turn-based dungeon crawler.
#[derive(Debug, Default, PartialEq, Parser)]
#[command(name = "dungeon-turns", version)]
struct Args {
    /// JSON file overriding the default game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for dungeon generation and every later random draw
    #[arg(long)]
    seed: Option<u64>,

    /// Replay keys from this file without opening a terminal
    #[arg(long)]
    script: Option<PathBuf>,
}

struct DungeonTurnsState {
    engine: Engine,
}

impl GameState for DungeonTurnsState {
    fn tick(&mut self, ctx: &mut BTerm) {
        if let Some(key) = ctx.key {
            let quits = key == VirtualKeyCode::Escape
                && matches!(self.engine.mode, InputMode::Game | InputMode::GameOver);
            if quits {
                info!(turn = self.engine.turn, "quit requested");
                ctx.quit();
                return;
            }
            self.engine.handle_key(KeyEvent {
                key,
                shift: ctx.shift,
                control: ctx.control,
                alt: ctx.alt,
            });
        }
        render::render_all(ctx, &self.engine);
    }
}

/// The terminal belongs to the renderer, so interactive sessions log to a
/// timestamped file instead of stderr.
fn init_file_logging() -> Result<()> {
    std::fs::create_dir_all(LOG_DIR).with_context(|| format!("creating {LOG_DIR}/"))?;
    let file_name = format!("session-{}.log", chrono::Local::now().format("%Y%m%d-%H%M%S"));
    let appender = tracing_appender::rolling::never(LOG_DIR, &file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    // The writer must outlive the main loop, which never returns control.
    std::mem::forget(guard);
    info!(log = %file_name, "logging initialized");
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn run_headless(engine: &mut Engine, script: ScriptedInput) {
    if script.is_empty() {
        warn!("key script holds no keys");
    }
    let keys = script.len();
    for event in script {
        engine.handle_key(event);
    }
    for message in engine.log.messages() {
        println!("{}", message.full_text());
    }
    let hp = engine.player_stats().map_or(0, |stats| stats.hp());
    info!(
        seed = engine.seed,
        keys,
        turns = engine.turn,
        hp,
        messages = engine.log.len(),
        mode = ?engine.mode,
        "script finished"
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.script {
        init_stderr_logging();
        let script = ScriptedInput::from_file(path)
            .with_context(|| format!("loading key script {}", path.display()))?;
        let mut engine = Engine::new(load_config(&args)?)?;
        run_headless(&mut engine, script);
        return Ok(());
    }

    init_file_logging()?;
    let engine = Engine::new(load_config(&args)?)?;
    let context = BTermBuilder::simple80x50()
        .with_title("Dungeon Turns")
        .build()
        .map_err(|err| anyhow!("terminal setup failed: {err}"))?;
    main_loop(context, DungeonTurnsState { engine })
        .map_err(|err| anyhow!("main loop failed: {err}"))
}

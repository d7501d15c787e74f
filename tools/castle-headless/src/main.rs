//! castle-headless: run a siege without a frontend and dump the final state.
//!
//! Usage:
//!   castle-headless --config siege.toml --ticks 1800 --output final.json
//!   castle-headless --seed 7

mod config;

use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use castle_core::commands::PlayerCommand;
use castle_core::constants::TICK_RATE;
use castle_core::enums::{GamePhase, WallOwner};
use castle_core::state::GameStateSnapshot;
use castle_sim::SimulationEngine;

use crate::config::HeadlessConfig;

const FLAGS: [&str; 4] = ["--config", "--ticks", "--seed", "--output"];

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    if let Err(err) = run(&args) {
        eprintln!("Error: {err:#}");
        print_usage();
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "castle-headless: run the castle siege simulation without a frontend\n\
         \n\
         Options:\n\
         \n\
           --config <path>  TOML run configuration (optional, default: built-in layout)\n\
           --ticks <N>      Ticks to simulate, 30 per second (overrides config)\n\
           --seed <S>       RNG seed (overrides config)\n\
           --output <path>  Write the final snapshot JSON here (default: stdout)\n\
         \n\
         Environment:\n\
         \n\
           RUST_LOG         Log filter (default: info)\n\
           LOG_FORMAT=json  Emit JSON log lines\n\
         \n\
         Examples:\n\
         \n\
           castle-headless --ticks 900 --seed 7\n\
           castle-headless --config siege.toml --output final.json\n"
    );
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Logs go to stderr so the snapshot on stdout stays parseable.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn run(args: &[String]) -> Result<()> {
    check_flags(args)?;

    let config_path: Option<PathBuf> = parse_flag(args, "--config")?;
    let mut config = HeadlessConfig::load(config_path.as_deref())?;
    if let Some(ticks) = parse_flag(args, "--ticks")? {
        config.ticks = ticks;
    }
    if let Some(seed) = parse_flag(args, "--seed")? {
        config.seed = seed;
    }
    let output: Option<PathBuf> = parse_flag(args, "--output")?;

    let snapshot = simulate(&config)?;

    let json = serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?;
    match output {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "snapshot written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Start a mission, feed it the scripted commands and return the last snapshot.
fn simulate(config: &HeadlessConfig) -> Result<GameStateSnapshot> {
    let mut engine = SimulationEngine::new(config.sim_config()).context("build simulation")?;
    info!(
        seed = config.seed,
        ticks = config.ticks,
        scripted = config.script.len(),
        "running headless siege"
    );

    engine.queue_command(PlayerCommand::StartMission);
    let mut snapshot = GameStateSnapshot::default();
    let defended = WallOwner::Castle(config.layout.defended_castle);
    let mut fallen_logged = false;

    for tick in 0..config.ticks {
        engine.queue_commands(config.commands_at(tick));
        snapshot = engine.tick();

        if snapshot.phase == GamePhase::Fallen && !fallen_logged {
            warn!(tick, secs = snapshot.time.elapsed_secs, "defended castle fell");
            fallen_logged = true;
        }
        if (tick + 1) % TICK_RATE as u64 == 0 {
            log_progress(&snapshot, defended);
        }
    }

    info!(
        spawned = snapshot.score.enemies_spawned,
        killed = snapshot.score.enemies_killed,
        damage = snapshot.score.structure_damage_taken,
        castle_standing = snapshot.score.castle_standing,
        "siege finished"
    );
    Ok(snapshot)
}

fn log_progress(snapshot: &GameStateSnapshot, defended: WallOwner) {
    let hp = |owner: WallOwner| {
        snapshot
            .structures
            .iter()
            .find(|s| s.owner == owner)
            .map_or(0.0, |s| s.hp)
    };
    info!(
        tick = snapshot.time.tick,
        secs = snapshot.time.elapsed_secs,
        phase = ?snapshot.phase,
        enemies = snapshot.enemies.len(),
        projectiles = snapshot.projectiles.len(),
        perimeter_hp = hp(WallOwner::Perimeter),
        castle_hp = hp(defended),
        "progress"
    );
}

fn check_flags(args: &[String]) -> Result<()> {
    let mut i = 0;
    while i < args.len() {
        if !FLAGS.contains(&args[i].as_str()) {
            bail!("unknown argument: {}", args[i]);
        }
        if i + 1 >= args.len() {
            bail!("{} needs a value", args[i]);
        }
        i += 2;
    }
    Ok(())
}

fn parse_flag<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            let value = args[i + 1]
                .parse()
                .with_context(|| format!("invalid value for {flag}: {}", args[i + 1]))?;
            return Ok(Some(value));
        }
    }
    Ok(None)
}

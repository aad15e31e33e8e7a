//! Arena CLI
//!
//! Run, validate and scaffold VR engagement sessions. `run` drives the full
//! frame loop against the scripted tracker and a headless surface, which is
//! how protocols are dry-run before going to the rig.

use anyhow::Result;
use arena_core::{ArenaFrame, Vec3};
use arena_session::{
    ExperimentLog, FixedStep, FrameClock, HeadlessSurface, JsonLinesLog, MemoryLog, RunSummary,
    ScriptedPoseSource, Session, SessionConfig, WallClock,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

#[derive(Parser)]
#[command(name = "arena")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "VR engagement experiment runner", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dry-run a session against the scripted tracker
    Run {
        /// Session config (defaults to ./arena.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stop after this many frames
        #[arg(short, long)]
        frames: Option<u64>,

        /// Fixed frame delta in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,

        /// Use wall-clock frame deltas instead of --dt
        #[arg(long)]
        realtime: bool,

        /// Override the config seed
        #[arg(long)]
        seed: Option<u64>,

        /// True yaw of the simulated arena (degrees)
        #[arg(long, default_value = "12.0")]
        arena_yaw: f32,

        /// Keep the experiment log in memory instead of writing a file
        #[arg(long)]
        no_log: bool,
    },

    /// Validate a session config
    Check {
        /// Session config (defaults to ./arena.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the session metadata a config produces
    Info {
        /// Session config (defaults to ./arena.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default arena.toml into the current directory
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Run {
            config,
            frames,
            dt,
            realtime,
            seed,
            arena_yaw,
            no_log,
        } => {
            let options = RunOptions {
                frames,
                dt,
                realtime,
                seed,
                arena_yaw,
                no_log,
            };
            cmd_run(config.as_deref(), &cwd, &options)
        }

        Commands::Check { config } => cmd_check(config.as_deref(), &cwd),

        Commands::Info { config } => cmd_info(config.as_deref(), &cwd),

        Commands::Init => cmd_init(&cwd),
    }
}

struct RunOptions {
    frames: Option<u64>,
    dt: f32,
    realtime: bool,
    seed: Option<u64>,
    arena_yaw: f32,
    no_log: bool,
}

fn cmd_run(config_path: Option<&Path>, cwd: &Path, options: &RunOptions) -> Result<()> {
    if !options.dt.is_finite() || options.dt <= 0.0 {
        anyhow::bail!("--dt must be positive, got {}", options.dt);
    }

    let mut config = config::resolve(config_path, cwd)?;
    if let Some(seed) = options.seed {
        config = config.with_seed(seed);
    }

    info!(
        "Running {} ({} phases x {}s, level {:?})",
        config.experiment.name,
        config.experiment.phases,
        config.experiment.phase_secs,
        config.experiment.interaction_level
    );

    let arena = ArenaFrame::new(Vec3::ZERO, options.arena_yaw);
    let source = ScriptedPoseSource::for_config(&config, arena, options.dt);
    let log_dir = cwd.join(&config.log.directory);
    let experiment = config.experiment.name.clone();

    let mut session = Session::init_tracking(config, source)?;
    session.init_scene()?;

    let mut surface = HeadlessSurface::new();
    if let Some(frames) = options.frames {
        surface = surface.with_frame_limit(frames);
    }

    let summary = if options.no_log {
        drive(&mut session, &mut surface, &mut MemoryLog::new(), options)?
    } else {
        let mut log = JsonLinesLog::create(&log_dir, &experiment)?;
        drive(&mut session, &mut surface, &mut log, options)?
    };

    session.teardown(&mut surface)?;

    info!(
        "Completed {} phases in {} frames ({:.1}s), {} triggers{}",
        summary.phases_completed,
        summary.frames,
        summary.elapsed,
        summary.triggers,
        if summary.quit { ", stopped early" } else { "" }
    );
    Ok(())
}

fn drive<L: ExperimentLog>(
    session: &mut Session<ScriptedPoseSource>,
    surface: &mut HeadlessSurface,
    log: &mut L,
    options: &RunOptions,
) -> Result<RunSummary> {
    let summary = if options.realtime {
        run_with(session, surface, log, &mut WallClock::new())?
    } else {
        run_with(session, surface, log, &mut FixedStep(options.dt))?
    };
    Ok(summary)
}

fn run_with<L: ExperimentLog, C: FrameClock>(
    session: &mut Session<ScriptedPoseSource>,
    surface: &mut HeadlessSurface,
    log: &mut L,
    clock: &mut C,
) -> Result<RunSummary> {
    Ok(session.run(surface, log, clock)?)
}

fn cmd_check(config_path: Option<&Path>, cwd: &Path) -> Result<()> {
    let config = config::resolve(config_path, cwd)?;
    info!(
        "Config OK: {} phases, corner {}, level {:?}, {} anchors",
        config.experiment.phases,
        config.experiment.corner,
        config.experiment.interaction_level,
        config.scene.anchors.len()
    );
    Ok(())
}

fn cmd_info(config_path: Option<&Path>, cwd: &Path) -> Result<()> {
    let config = config::resolve(config_path, cwd)?;
    println!("{}", serde_json::to_string_pretty(&config.metadata())?);
    print_behaviors(&config);
    Ok(())
}

fn print_behaviors(config: &SessionConfig) {
    let kinds: Vec<&str> = config.scene.behaviors.iter().map(|k| k.name()).collect();
    println!("behaviors: {}", kinds.join(", "));
    println!("primitives: {}", config.scene.primitives.join(", "));
}

fn cmd_init(cwd: &Path) -> Result<()> {
    let path = cwd.join(config::DEFAULT_CONFIG_FILE);
    config::write_default(&path)?;
    info!("Wrote {}", path.display());
    info!("Run `arena check` to validate it");
    Ok(())
}

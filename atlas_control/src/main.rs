//! # Atlas Control
//!
//! Fixed-rate control loop for the Atlas competition robot, run against the
//! simulation rig. Loads the robot TOML config (falling back to defaults
//! when the file is absent), sets up tracing, and enters the 50 Hz cycle
//! loop in the requested mode until Ctrl-C.

use atlas_common::config::RobotConfig;
use atlas_control::cycle::{CycleRunner, RobotMode, rt_setup};
use atlas_hal::sim::SimRig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Start mode selectable from the CLI.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Disabled,
    Autonomous,
    Teleop,
}

impl From<ModeArg> for RobotMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Disabled => RobotMode::Disabled,
            ModeArg::Autonomous => RobotMode::Autonomous,
            ModeArg::Teleop => RobotMode::Teleop,
        }
    }
}

/// Atlas robot control loop
#[derive(Parser, Debug)]
#[command(name = "atlas_control")]
#[command(version)]
#[command(about = "Fixed-rate control loop for the Atlas competition robot")]
struct Args {
    /// Path to the robot configuration TOML.
    #[arg(default_value = "config/atlas.toml")]
    config: PathBuf,

    /// Mode to start in.
    #[arg(long, value_enum, default_value_t = ModeArg::Teleop)]
    mode: ModeArg,

    /// Stop after this many ticks (0 = run until Ctrl-C).
    #[arg(long, default_value_t = 0)]
    ticks: u64,

    /// SCHED_FIFO priority (only meaningful with the rt feature).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("Atlas control v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Atlas control shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = if args.config.exists() {
        RobotConfig::load(&args.config)?
    } else {
        warn!(
            "Config file '{}' not found, using built-in defaults",
            args.config.display()
        );
        RobotConfig::default()
    };

    info!(
        "Config OK: tick_rate={}Hz, max_delta_speed={:.4}, auton={:?}",
        config.tick_rate_hz,
        config.max_delta_speed(),
        config.auton.routine,
    );

    rt_setup(args.rt_priority)?;

    let mut runner = CycleRunner::new(config, SimRig::new());
    runner.set_mode(args.mode.into());

    // Ctrl-C flips the running flag; the loop drains out at the next tick.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    runner.run(&running, args.ticks)?;

    let stats = &runner.stats;
    info!(
        "Loop exited: ticks={}, avg={}ns, max={}ns, overruns={}",
        stats.tick_count,
        stats.avg_tick_ns(),
        stats.max_tick_ns,
        stats.overruns,
    );

    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}

//! Headless entry point for the particle-life swarm simulation.
//!
//! This binary loads a scenario, starts a [`Simulation`] and hands it to a
//! [`Runner`] that advances it for a fixed number of frames. Nothing is
//! drawn; progress is reported through `env_logger` (set `RUST_LOG` to
//! change the level).

mod runner;

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use swarm_core::{SimConfig, Simulation};

use runner::Runner;

#[derive(Parser, Debug)]
#[command(version, about = "Run a particle-life swarm simulation without a window")]
struct Args {
    /// YAML scenario file. Fields it leaves out take their default values.
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(short = 'n', long, default_value_t = 600)]
    steps: u64,

    /// Time step of every frame.
    #[arg(long, default_value_t = 0.016)]
    dt: f32,

    /// Overrides the scenario's seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Log frame statistics every this many frames (0 = only the summary).
    #[arg(long, default_value_t = 60)]
    log_every: u64,
}

fn load_scenario(path: &Path) -> Result<SimConfig> {
    let file = File::open(path)
        .with_context(|| format!("failed to open scenario {}", path.display()))?;
    let config: SimConfig = serde_yaml::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse scenario {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    ensure!(
        args.dt.is_finite() && args.dt > 0.0,
        "time step must be positive, got {}",
        args.dt
    );

    let mut config = match &args.scenario {
        Some(path) => load_scenario(path)?,
        None => SimConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    log::debug!("{config:?}");

    let sim = Simulation::start(config).context("invalid simulation configuration")?;
    let mut runner = Runner::new(sim, args.log_every);
    let summary = runner.run(args.steps, args.dt);

    log::info!(
        "ran {} frames ({:.2} simulated seconds) in {:.2?}, {:.1} frames/s; final mean speed {:.4}",
        summary.frames,
        summary.sim_time,
        summary.elapsed,
        summary.frames_per_second(),
        summary.last.mean_speed
    );
    let sim = runner.simulation();
    log::info!(
        "{} particles at frame {}, t = {:.3}",
        sim.particles().len(),
        sim.frame(),
        sim.time()
    );
    Ok(())
}

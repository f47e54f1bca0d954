//! Fixed-step frame driver for a headless run.
//!
//! [`Runner`] plays the part a render loop would normally play: it owns the
//! [`Simulation`], calls [`Simulation::step`] once per frame and reports
//! progress through the `log` facade.

use std::time::{Duration, Instant};

use swarm_core::{FrameStats, Simulation};

/// Outcome of [`Runner::run`].
#[derive(Clone, Copy, Debug)]
pub struct RunSummary {
    pub frames: u64,
    pub sim_time: f64,
    /// Wall-clock time spent inside [`Simulation::step`].
    pub elapsed: Duration,
    /// Stats of the last frame, or the default if no frame ran.
    pub last: FrameStats,
}

impl RunSummary {
    pub fn frames_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }
}

/// Drives a simulation for a fixed number of frames.
///
/// ### Fields
/// - `sim` - The simulation being advanced.
/// - `log_every` - Emit a progress line every this many frames; `0`
///   disables progress lines.
pub struct Runner {
    sim: Simulation,
    log_every: u64,
}

impl Runner {
    pub fn new(sim: Simulation, log_every: u64) -> Self {
        Self { sim, log_every }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Advances the simulation `steps` times with a constant `dt`.
    ///
    /// ### Parameters
    /// - `steps` - Number of frames to run.
    /// - `dt` - Time step passed to every frame.
    ///
    /// ### Returns
    /// A [`RunSummary`] covering only the frames run by this call.
    pub fn run(&mut self, steps: u64, dt: f32) -> RunSummary {
        let mut elapsed = Duration::ZERO;
        let mut last = FrameStats::default();

        for _ in 0..steps {
            let started = Instant::now();
            last = self.sim.step(dt);
            elapsed += started.elapsed();

            if self.log_every > 0 && last.frame % self.log_every == 0 {
                log::info!(
                    "frame {:>6}  t = {:>8.3}  mean speed {:.4}  max speed {:.4}  interactions {}",
                    last.frame,
                    last.time,
                    last.mean_speed,
                    last.max_speed,
                    last.interactions
                );
            }
        }

        RunSummary {
            frames: steps,
            sim_time: f64::from(dt) * steps as f64,
            elapsed,
            last,
        }
    }
}

//! The running simulation and its per-frame entry point.
//!
//! A [`SimConfig`] is the uninitialized state. [`Simulation::start`] (or
//! [`Simulation::from_parts`]) validates it and produces a running
//! [`Simulation`]; from then on the owner of the run loop calls
//! [`Simulation::step`] once per frame. There is no paused or stopped state.

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    bounds::Bounds,
    colors::TypePalette,
    config::{NeighborSearch, SimConfig},
    error::ConfigError,
    force_buffer::ForceBuffer,
    grid::SpatialGrid,
    matrix::InteractionMatrix,
    particles::ParticleStore,
    phases::{self, ForceParams},
};

/// Summary of one call to [`Simulation::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Number of frames completed so far, including this one.
    pub frame: u64,
    /// Simulated time after this frame.
    pub time: f64,
    /// Time step that was applied; `0.0` for a skipped frame.
    pub dt: f32,
    /// Ordered particle pairs that were inside each other's cutoff.
    pub interactions: u64,
    pub mean_speed: f32,
    pub max_speed: f32,
}

/// Owns every piece of state of one particle-life run.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    bounds: Bounds,
    params: ForceParams,
    rng: StdRng,

    matrix: InteractionMatrix,
    palette: TypePalette,
    particles: ParticleStore,

    grid: SpatialGrid,
    acc: ForceBuffer,

    frame: u64,
    time: f64,
}

impl Simulation {
    /// Validates `config` and draws a fresh world from it.
    ///
    /// Random draws happen in a fixed order (matrix, palette, particles) from
    /// a generator seeded with `config.seed`, so equal seeds give equal runs.
    pub fn start(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let bounds = config.bounds();
        let matrix =
            InteractionMatrix::random(config.type_count, config.force_multiplier, &mut rng)?;
        let palette = TypePalette::random(config.type_count, &mut rng);
        let particles =
            ParticleStore::random(config.particle_count, config.type_count, &bounds, &mut rng);

        log::info!(
            "starting simulation: {} particles, {} types, r_max {}, beta {}, seed {:?}",
            config.particle_count,
            config.type_count,
            config.r_max,
            config.beta,
            config.seed
        );
        Ok(Self::assemble(config, bounds, rng, matrix, palette, particles))
    }

    /// Starts from an explicit matrix and particle set instead of random ones.
    ///
    /// `config.particle_count` is replaced by the number of particles given.
    /// The palette is still drawn from the configured seed.
    ///
    /// ### Returns
    /// - `Err(ConfigError::MatrixSizeMismatch)` if the matrix does not cover
    ///   exactly `config.type_count` types.
    /// - `Err(ConfigError::ParticleTypeOutOfRange)` for the first particle
    ///   whose type has no matrix row.
    /// - Any error from [`SimConfig::validate`].
    pub fn from_parts(
        mut config: SimConfig,
        matrix: InteractionMatrix,
        particles: ParticleStore,
    ) -> Result<Self, ConfigError> {
        config.particle_count = particles.len();
        config.validate()?;

        if matrix.type_count() != config.type_count {
            return Err(ConfigError::MatrixSizeMismatch {
                matrix: matrix.type_count(),
                config: config.type_count,
            });
        }
        if let Some((index, &kind)) = particles
            .kinds()
            .iter()
            .enumerate()
            .find(|&(_, &k)| k >= config.type_count)
        {
            return Err(ConfigError::ParticleTypeOutOfRange {
                index,
                kind,
                type_count: config.type_count,
            });
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let bounds = config.bounds();
        let palette = TypePalette::random(config.type_count, &mut rng);

        log::info!(
            "starting simulation from explicit state: {} particles, {} types",
            particles.len(),
            config.type_count
        );
        Ok(Self::assemble(config, bounds, rng, matrix, palette, particles))
    }

    fn assemble(
        config: SimConfig,
        bounds: Bounds,
        rng: StdRng,
        matrix: InteractionMatrix,
        palette: TypePalette,
        particles: ParticleStore,
    ) -> Self {
        let params = ForceParams {
            r_max: config.r_max,
            beta: config.beta,
            force_multiplier: config.force_multiplier,
            search: config.neighbor_search,
        };
        let grid = SpatialGrid::new(&bounds, config.r_max);
        let acc = ForceBuffer::with_len(particles.len());

        Self {
            config,
            bounds,
            params,
            rng,
            matrix,
            palette,
            particles,
            grid,
            acc,
            frame: 0,
            time: 0.0,
        }
    }

    /// Throws the current world away and draws a new one.
    ///
    /// Matrix, palette and particles are redrawn from the simulation's own
    /// generator, which keeps advancing, so a restart of a seeded run is
    /// reproducible but differs from the first world. Frame count and time
    /// go back to zero.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        let cfg = &self.config;
        self.matrix =
            InteractionMatrix::random(cfg.type_count, cfg.force_multiplier, &mut self.rng)?;
        self.palette = TypePalette::random(cfg.type_count, &mut self.rng);
        self.particles =
            ParticleStore::random(cfg.particle_count, cfg.type_count, &self.bounds, &mut self.rng);
        self.acc.ensure_len(self.particles.len());
        self.frame = 0;
        self.time = 0.0;

        log::info!("simulation restarted with {} particles", self.particles.len());
        Ok(())
    }

    /// Advances the simulation by one frame of length `dt`.
    ///
    /// The frame rebuilds the grid, updates all velocities in parallel and
    /// then moves every particle; see [`crate::phases`].
    ///
    /// A `dt` that is negative or not finite would corrupt every particle,
    /// so such a frame is skipped with a warning and nothing changes.
    pub fn step(&mut self, dt: f32) -> FrameStats {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("skipping frame {} with invalid time step {dt}", self.frame + 1);
            return self.summarize(0.0, 0);
        }

        if self.params.search == NeighborSearch::Grid {
            phases::grid_phase(&mut self.grid, &self.particles);
        }
        phases::velocity_phase(
            &mut self.particles,
            &self.matrix,
            &self.grid,
            &self.params,
            dt,
            &mut self.acc,
        );
        phases::position_phase(&mut self.particles, &self.bounds, dt);

        self.frame += 1;
        self.time += f64::from(dt);

        let stats = self.summarize(dt, self.acc.total_contributions());
        log::trace!("{stats:?}");
        stats
    }

    fn summarize(&self, dt: f32, interactions: u64) -> FrameStats {
        let (sum, max) = self
            .particles
            .velocities()
            .iter()
            .map(|v| v.length())
            .fold((0.0f64, 0.0f32), |(sum, max), s| (sum + f64::from(s), max.max(s)));
        let mean_speed = if self.particles.is_empty() {
            0.0
        } else {
            (sum / self.particles.len() as f64) as f32
        };

        FrameStats {
            frame: self.frame,
            time: self.time,
            dt,
            interactions,
            mean_speed,
            max_speed: max,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn palette(&self) -> &TypePalette {
        &self.palette
    }

    /// Particle state after the most recent frame.
    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    /// Scaled force on each particle from the most recent frame.
    pub fn forces(&self) -> &ForceBuffer {
        &self.acc
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}

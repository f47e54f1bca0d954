use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{bounds::Bounds, error::ConfigError};

/// How candidate neighbors are enumerated during the velocity phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    /// Only the 3×3 block of grid cells around a particle.
    #[default]
    Grid,
    /// Every other particle. O(N²), same forces as [`NeighborSearch::Grid`].
    BruteForce,
}

/// Start-up configuration of a [`crate::simulation::Simulation`].
///
/// Missing fields in a deserialized document fall back to
/// [`SimConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub particle_count: usize,
    pub type_count: usize,
    pub force_multiplier: f32,
    /// Half-extents of the wrap-around domain.
    pub env_size: Vec2,
    /// Cutoff radius of the force field; also the grid cell size.
    pub r_max: f32,
    pub beta: f32,
    pub neighbor_search: NeighborSearch,
    /// Seed for every random draw of the run. `None` pulls from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            type_count: 1,
            force_multiplier: 1.0,
            env_size: Vec2::new(10.0, 5.0),
            r_max: 0.5,
            beta: 0.5,
            neighbor_search: NeighborSearch::Grid,
            seed: None,
        }
    }
}

impl SimConfig {
    /// The wrap-around domain `[-env_size, env_size]`.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_half_extents(self.env_size)
    }

    /// Checks every field that would otherwise produce wrong physics.
    ///
    /// A particle count of zero is valid: the simulation simply has nothing
    /// to move.
    ///
    /// ### Returns
    /// - `Ok(())` if the simulation may start with this configuration.
    /// - `Err` with the first violated constraint otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.type_count == 0 {
            return Err(ConfigError::NoParticleTypes);
        }
        if !self.r_max.is_finite() || self.r_max <= 0.0 {
            return Err(ConfigError::InvalidInteractionRadius(self.r_max));
        }
        // NaN fails both comparisons, so it is rejected too.
        if !(self.beta > 0.0 && self.beta < 1.0) {
            return Err(ConfigError::InvalidBeta(self.beta));
        }
        if !self.force_multiplier.is_finite() {
            return Err(ConfigError::InvalidForceMultiplier(self.force_multiplier));
        }
        let e = self.env_size;
        if !e.is_finite() || e.x <= 0.0 || e.y <= 0.0 {
            return Err(ConfigError::InvalidEnvSize(e.x, e.y));
        }
        Ok(())
    }
}

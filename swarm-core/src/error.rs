use thiserror::Error;

/// Reasons a simulation refuses to leave the uninitialized state.
///
/// Every variant is raised while validating a [`crate::config::SimConfig`]
/// or the explicit state handed to [`crate::simulation::Simulation::from_parts`].
/// Nothing in the per-frame loop produces one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("particle type count must be at least 1")]
    NoParticleTypes,

    #[error("interaction radius must be finite and positive, got {0}")]
    InvalidInteractionRadius(f32),

    #[error("beta must lie strictly between 0 and 1, got {0}")]
    InvalidBeta(f32),

    #[error("force multiplier must be finite, got {0}")]
    InvalidForceMultiplier(f32),

    #[error("environment half-extents must be finite and positive, got ({0}, {1})")]
    InvalidEnvSize(f32, f32),

    #[error("interaction matrix row {row} has {len} entries, expected {expected}")]
    MalformedMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("interaction matrix covers {matrix} types but configuration declares {config}")]
    MatrixSizeMismatch { matrix: usize, config: usize },

    #[error("particle {index} has type {kind}, but only {type_count} types exist")]
    ParticleTypeOutOfRange {
        index: usize,
        kind: usize,
        type_count: usize,
    },
}

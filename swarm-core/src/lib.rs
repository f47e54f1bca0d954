//! Core 2-D particle-life swarm simulation library.
//!
//! Main components:
//! - [`simulation`] — the running simulation and its `step(dt)` entry point.
//! - [`phases`] — grid, velocity and position phases of one frame.
//! - [`grid`] — uniform spatial grid bounding the neighbor search.
//! - [`force`] — the piecewise force law and friction decay.
//! - [`matrix`] — type-to-type interaction coefficients.
//! - [`particles`] — particle types, positions and velocities.
//! - [`colors`] — per-type display palette for renderers.
//! - [`force_buffer`] — per-particle scratch space for accumulated forces.
//! - [`bounds`] — the wrap-around domain.
//! - [`config`] — start-up configuration and its validation.
//! - [`error`] — configuration errors.
//! - [`types`] — shared type aliases and IDs.

pub mod bounds;
pub mod colors;
pub mod config;
pub mod error;
pub mod force;
pub mod force_buffer;
pub mod grid;
pub mod matrix;
pub mod particles;
pub mod phases;
pub mod simulation;
pub mod types;

pub use config::{NeighborSearch, SimConfig};
pub use error::ConfigError;
pub use simulation::{FrameStats, Simulation};

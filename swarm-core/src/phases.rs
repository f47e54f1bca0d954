//! Per-frame phases of the particle-life update.
//!
//! One frame of [`crate::simulation::Simulation::step`] runs, in order:
//! 1. [`grid_phase`] — sort every particle into the [`SpatialGrid`].
//! 2. [`velocity_phase`] — in parallel, sum the forces each particle feels
//!    from its neighbors, apply friction and update its velocity.
//! 3. [`position_phase`] — move every particle by its new velocity and
//!    wrap it back into the domain.
//!
//! Phase 2 only reads positions, types, the grid and the matrix, and each
//! worker writes only its own particle's velocity and force slot. Phase 3
//! starts after the parallel iterator of phase 2 has returned, so it always
//! sees a complete set of this frame's velocities.

use glam::Vec2;
use rayon::prelude::*;

use crate::{
    bounds::Bounds,
    config::NeighborSearch,
    force::{FRICTION_HALF_LIFE, force, friction_factor},
    force_buffer::ForceBuffer,
    grid::SpatialGrid,
    matrix::InteractionMatrix,
    particles::ParticleStore,
    types::{ParticleId, ParticleKind},
};

/// Force-law parameters shared by every worker of the velocity phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
    /// Cutoff radius of the force field.
    pub r_max: f32,
    /// Split point between the repulsion band and the tent.
    pub beta: f32,
    /// Global scale applied to every summed force.
    pub force_multiplier: f32,
    pub search: NeighborSearch,
}

/// Rebuilds the spatial grid from the particles' current positions.
///
/// Must run before [`velocity_phase`] in every frame; the grid keeps no
/// information from the previous frame.
pub fn grid_phase(grid: &mut SpatialGrid, particles: &ParticleStore) {
    grid.rebuild(&particles.positions);
}

/// Updates every particle's velocity from the forces of its neighbors.
///
/// For each particle `i`, in parallel:
///
/// 1. Enumerate candidate neighbors: the 3×3 grid block around `i` for
///    [`NeighborSearch::Grid`], every particle for
///    [`NeighborSearch::BruteForce`].
/// 2. Skip `i` itself, coincident particles and anything at or beyond
///    `r_max`.
/// 3. Add the unit separation vector scaled by [`force`] of the normalized
///    distance and the coefficient `matrix[type_i][type_j]`.
/// 4. Scale the sum by `r_max * force_multiplier` and store it in `acc`.
/// 5. Set `v = v * 0.5^(dt / FRICTION_HALF_LIFE) + F * dt`.
///
/// `acc` is resized (and cleared) to the particle count first via
/// [`ForceBuffer::ensure_len`].
///
/// ### Parameters
/// - `particles` - Particle store; only velocities are written.
/// - `matrix` - Interaction coefficients, indexed `[type_i][type_j]`.
/// - `grid` - Grid built by [`grid_phase`] for this frame's positions.
///   Ignored in brute-force mode.
/// - `params` - Force-law parameters.
/// - `dt` - Frame time step.
/// - `acc` - Scratch buffer receiving each particle's scaled force and
///   neighbor count.
pub fn velocity_phase(
    particles: &mut ParticleStore,
    matrix: &InteractionMatrix,
    grid: &SpatialGrid,
    params: &ForceParams,
    dt: f32,
    acc: &mut ForceBuffer,
) {
    acc.ensure_len(particles.len());

    let decay = friction_factor(dt, FRICTION_HALF_LIFE);
    let scale = params.r_max * params.force_multiplier;

    let ParticleStore {
        kinds,
        positions,
        velocities,
    } = particles;
    let field = NeighborField {
        kinds,
        positions,
        matrix,
        r_max: params.r_max,
        beta: params.beta,
    };

    velocities
        .par_iter_mut()
        .zip(acc.force.par_iter_mut())
        .zip(acc.count.par_iter_mut())
        .enumerate()
        .for_each(|(i, ((vel, total), count))| {
            let (sum, n) = match params.search {
                NeighborSearch::Grid => field.accumulate(i, grid.neighbors(field.positions[i])),
                NeighborSearch::BruteForce => field.accumulate(i, 0..field.positions.len()),
            };
            *total = sum * scale;
            *count = n;
            *vel = *vel * decay + *total * dt;
        });
}

/// Moves every particle by `velocity * dt` and wraps it into `bounds`.
///
/// Runs sequentially. See [`Bounds::wrap`] for the wrap rule.
pub fn position_phase(particles: &mut ParticleStore, bounds: &Bounds, dt: f32) {
    for (pos, &vel) in particles.positions.iter_mut().zip(&particles.velocities) {
        *pos = bounds.wrap(*pos + vel * dt);
    }
}

/// Read-only view of everything a worker needs to compute one particle's
/// force.
struct NeighborField<'a> {
    kinds: &'a [ParticleKind],
    positions: &'a [Vec2],
    matrix: &'a InteractionMatrix,
    r_max: f32,
    beta: f32,
}

impl NeighborField<'_> {
    /// Sums the unscaled force on `i` from `candidates`.
    ///
    /// Returns the force and the number of neighbors inside the cutoff.
    #[inline]
    fn accumulate(
        &self,
        i: ParticleId,
        candidates: impl Iterator<Item = ParticleId>,
    ) -> (Vec2, u32) {
        let pos = self.positions[i];
        let kind = self.kinds[i];

        let mut total = Vec2::ZERO;
        let mut n = 0;
        for j in candidates {
            if i == j {
                continue;
            }
            let sep = self.positions[j] - pos;
            let r = sep.length();
            if r > 0.0 && r < self.r_max {
                let f = force(r / self.r_max, self.matrix.get(kind, self.kinds[j]), self.beta);
                total += sep / r * f;
                n += 1;
            }
        }
        (total, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::Particle;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn bounds() -> Bounds {
        Bounds::from_half_extents(Vec2::new(10.0, 5.0))
    }

    fn params(r_max: f32, beta: f32) -> ForceParams {
        ForceParams {
            r_max,
            beta,
            force_multiplier: 1.0,
            search: NeighborSearch::Grid,
        }
    }

    /// Runs grid + velocity phases once and returns the force buffer.
    fn run_velocity(
        particles: &mut ParticleStore,
        matrix: &InteractionMatrix,
        params: &ForceParams,
        dt: f32,
    ) -> ForceBuffer {
        let mut grid = SpatialGrid::new(&bounds(), params.r_max);
        let mut acc = ForceBuffer::with_len(0);
        grid_phase(&mut grid, particles);
        velocity_phase(particles, matrix, &grid, params, dt, &mut acc);
        acc
    }

    #[test]
    fn two_particles_in_the_tent_band_pull_together() {
        let matrix = InteractionMatrix::from_rows(&[[1.0]]).unwrap();
        let mut particles = ParticleStore::from_particles([
            Particle::at_rest(0, Vec2::new(0.0, 0.0)),
            Particle::at_rest(0, Vec2::new(0.2, 0.0)),
        ]);
        let p = params(0.5, 0.3);
        let dt = 0.016;

        let acc = run_velocity(&mut particles, &matrix, &p, dt);

        // r / r_max = 0.4 lies in the tent: 1 - |0.8 - 1.3| / 0.7.
        let f = 1.0 - 0.5 / 0.7;
        let expected = f * p.r_max * p.force_multiplier * dt;
        let v = particles.velocities();

        assert!(v[0].x > 0.0, "first particle must move toward the second");
        assert!(v[1].x < 0.0, "second particle must move toward the first");
        assert!((v[0].x - expected).abs() < 1e-6, "got {}, want {expected}", v[0].x);
        assert!((v[1].x + expected).abs() < 1e-6, "got {}, want {}", v[1].x, -expected);
        assert_eq!(v[0].y, 0.0);
        assert_eq!(v[1].y, 0.0);
        assert_eq!(acc.contributions(0), 1);
        assert_eq!(acc.contributions(1), 1);
    }

    #[test]
    fn close_particles_repel_even_with_positive_coefficient() {
        let matrix = InteractionMatrix::from_rows(&[[1.0]]).unwrap();
        let mut particles = ParticleStore::from_particles([
            Particle::at_rest(0, Vec2::new(0.0, 0.0)),
            Particle::at_rest(0, Vec2::new(0.0, 0.05)),
        ]);

        run_velocity(&mut particles, &matrix, &params(0.5, 0.3), 0.016);

        let v = particles.velocities();
        assert!(v[0].y < 0.0);
        assert!(v[1].y > 0.0);
    }

    #[test]
    fn asymmetric_coefficients_use_the_ordered_pair() {
        // Type 0 is attracted to type 1, type 1 is repelled by type 0.
        let matrix = InteractionMatrix::from_rows(&[[0.0, 1.0], [-1.0, 0.0]]).unwrap();
        let mut particles = ParticleStore::from_particles([
            Particle::at_rest(0, Vec2::new(0.0, 0.0)),
            Particle::at_rest(1, Vec2::new(0.35, 0.0)),
        ]);

        run_velocity(&mut particles, &matrix, &params(0.5, 0.3), 0.016);

        let v = particles.velocities();
        assert!(v[0].x > 0.0, "type 0 chases type 1");
        assert!(v[1].x > 0.0, "type 1 flees type 0");
    }

    #[test]
    fn friction_halves_speed_after_one_half_life() {
        let matrix = InteractionMatrix::from_rows(&[[1.0]]).unwrap();
        let mut particles = ParticleStore::from_particles([Particle {
            kind: 0,
            pos: Vec2::ZERO,
            vel: Vec2::new(3.0, -4.0),
        }]);

        run_velocity(&mut particles, &matrix, &params(0.5, 0.3), FRICTION_HALF_LIFE);

        let speed = particles.velocities()[0].length();
        assert!((speed - 2.5).abs() < 1e-5, "speed {speed}");
    }

    #[test]
    fn coincident_particles_are_skipped() {
        let matrix = InteractionMatrix::from_rows(&[[1.0]]).unwrap();
        let mut particles = ParticleStore::from_particles([
            Particle::at_rest(0, Vec2::new(1.0, 1.0)),
            Particle::at_rest(0, Vec2::new(1.0, 1.0)),
        ]);

        let acc = run_velocity(&mut particles, &matrix, &params(0.5, 0.3), 0.016);

        for v in particles.velocities() {
            assert!(v.is_finite());
            assert_eq!(*v, Vec2::ZERO);
        }
        assert_eq!(acc.total_contributions(), 0);
    }

    #[test]
    fn particles_beyond_cutoff_do_not_interact() {
        let matrix = InteractionMatrix::from_rows(&[[1.0]]).unwrap();
        let mut particles = ParticleStore::from_particles([
            Particle::at_rest(0, Vec2::new(0.0, 0.0)),
            Particle::at_rest(0, Vec2::new(0.5, 0.0)),
            Particle::at_rest(0, Vec2::new(0.0, 0.9)),
        ]);

        let acc = run_velocity(&mut particles, &matrix, &params(0.5, 0.3), 0.016);

        assert_eq!(acc.total_contributions(), 0);
        assert!(particles.velocities().iter().all(|v| *v == Vec2::ZERO));
    }

    #[test]
    fn empty_store_is_a_no_op() {
        let matrix = InteractionMatrix::from_rows(&[[1.0]]).unwrap();
        let mut particles = ParticleStore::default();

        let acc = run_velocity(&mut particles, &matrix, &params(0.5, 0.3), 0.016);
        position_phase(&mut particles, &bounds(), 0.016);

        assert!(acc.is_empty());
        assert!(particles.is_empty());
    }

    #[test]
    fn brute_force_agrees_with_grid() {
        let b = bounds();
        let mut rng = StdRng::seed_from_u64(17);
        let matrix = InteractionMatrix::random(4, 1.0, &mut rng).unwrap();
        let particles: Vec<Particle> = (0..600)
            .map(|_| {
                let pos = Vec2::new(rng.random_range(-3.0..3.0), rng.random_range(-2.0..2.0));
                Particle::at_rest(rng.random_range(0..4), pos)
            })
            .collect();

        let mut by_grid = ParticleStore::from_particles(particles.clone());
        let mut by_scan = ParticleStore::from_particles(particles);
        let grid_params = params(0.5, 0.3);
        let scan_params = ForceParams {
            search: NeighborSearch::BruteForce,
            ..grid_params
        };

        let grid_acc = run_velocity(&mut by_grid, &matrix, &grid_params, 0.016);
        let scan_acc = run_velocity(&mut by_scan, &matrix, &scan_params, 0.016);

        for i in 0..by_grid.len() {
            assert_eq!(grid_acc.contributions(i), scan_acc.contributions(i));
            let d = by_grid.velocities()[i] - by_scan.velocities()[i];
            assert!(d.length() < 1e-5, "particle {i} differs by {d:?}");
        }
    }

    #[test]
    fn position_phase_advances_by_velocity() {
        let mut particles = ParticleStore::from_particles([Particle {
            kind: 0,
            pos: Vec2::new(1.0, 1.0),
            vel: Vec2::new(2.0, -1.0),
        }]);

        position_phase(&mut particles, &bounds(), 0.5);

        assert_eq!(particles.positions()[0], Vec2::new(2.0, 0.5));
        assert_eq!(particles.velocities()[0], Vec2::new(2.0, -1.0));
    }

    #[test]
    fn position_phase_wraps_every_side() {
        let b = bounds();
        let mut particles = ParticleStore::from_particles([
            Particle {
                kind: 0,
                pos: Vec2::new(b.max.x, 0.0),
                vel: Vec2::new(5.0, 0.0),
            },
            Particle {
                kind: 0,
                pos: Vec2::new(b.min.x, 0.0),
                vel: Vec2::new(-5.0, 0.0),
            },
            Particle {
                kind: 0,
                pos: Vec2::new(0.0, b.max.y),
                vel: Vec2::new(0.0, 5.0),
            },
            Particle {
                kind: 0,
                pos: Vec2::new(0.0, b.min.y),
                vel: Vec2::new(0.0, -5.0),
            },
        ]);

        // Each particle overshoots its edge by 0.05.
        position_phase(&mut particles, &b, 0.01);

        let p = particles.positions();
        assert_eq!(p[0], Vec2::new(b.min.x + 0.1, 0.0));
        assert_eq!(p[1], Vec2::new(b.max.x - 0.1, 0.0));
        assert_eq!(p[2], Vec2::new(0.0, b.min.y + 0.1));
        assert_eq!(p[3], Vec2::new(0.0, b.max.y - 0.1));
    }
}

use glam::Vec2;
use rand::Rng;

use crate::{
    bounds::Bounds,
    types::{ParticleId, ParticleKind},
};

/// Snapshot of one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Particle {
    pub fn at_rest(kind: ParticleKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            vel: Vec2::ZERO,
        }
    }
}

/// All particles of a run, stored as parallel arrays.
///
/// `kinds[i]`, `positions[i]` and `velocities[i]` describe particle `i`.
/// The arrays always have the same length, and it never changes after
/// construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleStore {
    pub(crate) kinds: Vec<ParticleKind>,
    pub(crate) positions: Vec<Vec2>,
    pub(crate) velocities: Vec<Vec2>,
}

impl ParticleStore {
    pub fn from_particles(particles: impl IntoIterator<Item = Particle>) -> Self {
        let mut store = Self::default();
        for p in particles {
            store.kinds.push(p.kind);
            store.positions.push(p.pos);
            store.velocities.push(p.vel);
        }
        store
    }

    /// Scatters `count` resting particles uniformly over `bounds`.
    ///
    /// For each particle the position is drawn first, then the type.
    ///
    /// ### Panics
    /// Panics if `count > 0` and `type_count == 0`.
    pub fn random(count: usize, type_count: usize, bounds: &Bounds, rng: &mut impl Rng) -> Self {
        let particles: Vec<Particle> = (0..count)
            .map(|_| {
                let pos = bounds.random_point(rng);
                let kind = rng.random_range(0..type_count);
                Particle::at_rest(kind, pos)
            })
            .collect();

        Self::from_particles(particles)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn get(&self, id: ParticleId) -> Option<Particle> {
        Some(Particle {
            kind: *self.kinds.get(id)?,
            pos: self.positions[id],
            vel: self.velocities[id],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle> + '_ {
        self.kinds
            .iter()
            .zip(&self.positions)
            .zip(&self.velocities)
            .map(|((&kind, &pos), &vel)| Particle { kind, pos, vel })
    }

    pub fn kinds(&self) -> &[ParticleKind] {
        &self.kinds
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn random_store_is_at_rest_inside_bounds() {
        let bounds = Bounds::from_half_extents(Vec2::new(10.0, 5.0));
        let mut rng = StdRng::seed_from_u64(11);
        let store = ParticleStore::random(500, 4, &bounds, &mut rng);

        assert_eq!(store.len(), 500);
        for p in store.iter() {
            assert!(bounds.contains(p.pos));
            assert!(p.kind < 4);
            assert_eq!(p.vel, Vec2::ZERO);
        }
    }

    #[test]
    fn random_store_uses_every_type() {
        let bounds = Bounds::from_half_extents(Vec2::ONE);
        let mut rng = StdRng::seed_from_u64(2);
        let store = ParticleStore::random(200, 3, &bounds, &mut rng);

        for kind in 0..3 {
            assert!(store.kinds().contains(&kind), "type {kind} never drawn");
        }
    }

    #[test]
    fn empty_store() {
        let bounds = Bounds::from_half_extents(Vec2::ONE);
        let mut rng = StdRng::seed_from_u64(2);
        let store = ParticleStore::random(0, 3, &bounds, &mut rng);

        assert!(store.is_empty());
        assert_eq!(store.iter().count(), 0);
        assert_eq!(store.get(0), None);
    }

    #[test]
    fn from_particles_keeps_order() {
        let store = ParticleStore::from_particles([
            Particle::at_rest(1, Vec2::new(1.0, 2.0)),
            Particle {
                kind: 0,
                pos: Vec2::new(-1.0, 0.5),
                vel: Vec2::new(0.1, 0.0),
            },
        ]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().kind, 1);
        assert_eq!(store.get(1).unwrap().vel, Vec2::new(0.1, 0.0));
        assert_eq!(store.positions(), &[Vec2::new(1.0, 2.0), Vec2::new(-1.0, 0.5)]);
    }
}

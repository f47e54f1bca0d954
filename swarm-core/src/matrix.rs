use rand::Rng;

use crate::{error::ConfigError, types::ParticleKind};

/// Attraction coefficient for every ordered pair of particle types.
///
/// Entry `[a][b]` is how strongly a particle of type `a` is pulled toward
/// (positive) or pushed from (negative) a particle of type `b` in the
/// mid-range band of the force field. The table is not symmetric.
///
/// Stored row-major in a flat vector of `type_count * type_count` entries.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionMatrix {
    type_count: usize,
    values: Vec<f32>,
}

impl InteractionMatrix {
    /// Draws every entry independently and uniformly from
    /// `[-|force_multiplier|, |force_multiplier|]`.
    ///
    /// Entries are drawn row by row, so a seeded `rng` always yields the
    /// same matrix.
    ///
    /// ### Parameters
    /// - `type_count` - Number of particle types `K`; must be at least 1.
    /// - `force_multiplier` - Half-width of the sampling interval, sign
    ///   ignored; must be finite.
    /// - `rng` - Random source.
    ///
    /// ### Returns
    /// A `K × K` matrix, or [`ConfigError`] if either parameter is invalid.
    pub fn random(
        type_count: usize,
        force_multiplier: f32,
        rng: &mut impl Rng,
    ) -> Result<Self, ConfigError> {
        if type_count == 0 {
            return Err(ConfigError::NoParticleTypes);
        }
        if !force_multiplier.is_finite() {
            return Err(ConfigError::InvalidForceMultiplier(force_multiplier));
        }

        let half_width = force_multiplier.abs();
        let values = (0..type_count * type_count)
            .map(|_| rng.random_range(-half_width..=half_width))
            .collect();
        let matrix = Self { type_count, values };

        for (a, row) in matrix.rows().enumerate() {
            log::debug!("interaction row {a}: {row:?}");
        }
        Ok(matrix)
    }

    /// Builds a matrix from explicit rows, one per type.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self, ConfigError> {
        let type_count = rows.len();
        if type_count == 0 {
            return Err(ConfigError::NoParticleTypes);
        }

        let mut values = Vec::with_capacity(type_count * type_count);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != type_count {
                return Err(ConfigError::MalformedMatrix {
                    row,
                    len: r.len(),
                    expected: type_count,
                });
            }
            values.extend_from_slice(r);
        }
        Ok(Self { type_count, values })
    }

    pub fn type_count(&self) -> usize {
        self.type_count
    }

    /// Coefficient of `a` toward `b`.
    ///
    /// ### Panics
    /// Panics if either type is out of range.
    #[inline]
    pub fn get(&self, a: ParticleKind, b: ParticleKind) -> f32 {
        assert!(a < self.type_count && b < self.type_count);
        self.values[a * self.type_count + b]
    }

    /// Overrides one coefficient. Only meant for building explicit setups
    /// before a simulation starts; a running simulation never mutates its
    /// matrix.
    pub fn set(&mut self, a: ParticleKind, b: ParticleKind, value: f32) {
        assert!(a < self.type_count && b < self.type_count);
        self.values[a * self.type_count + b] = value;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(self.type_count)
    }
}

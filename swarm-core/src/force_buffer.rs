use crate::types::ParticleId;
use glam::Vec2;

/// Scratch buffer holding the force accumulated on each particle during
/// one velocity phase.
///
/// For each `ParticleId`, this buffer stores:
///
/// - The sum of all neighbor forces, already scaled to acceleration units.
/// - The number of neighbors that contributed a force.
///
/// The buffer is owned by the simulation and reused every frame. During the
/// velocity phase each worker writes only the slot of the particle it is
/// processing, which is what allows the slots to be handed out as disjoint
/// mutable chunks.
#[derive(Debug, Default)]
pub struct ForceBuffer {
    /// Accumulated force for each particle.
    pub(crate) force: Vec<Vec2>,
    /// Number of contributing neighbors for each particle.
    pub(crate) count: Vec<u32>,
}

impl ForceBuffer {
    /// Creates a new [`ForceBuffer`] with the given length.
    ///
    /// All forces start at `Vec2::ZERO` and all counts at `0`.
    ///
    /// ### Parameters
    /// - `len` - Number of particles this buffer can hold forces for.
    pub fn with_len(len: usize) -> Self {
        Self {
            force: vec![Vec2::ZERO; len],
            count: vec![0; len],
        }
    }

    /// Ensures that the internal storage has exactly the given length.
    ///
    /// If the current length differs from `len`, both arrays are resized.
    /// After this call every entry is cleared, even if the length was
    /// already correct. Resizing keeps the existing allocation whenever it
    /// is large enough.
    ///
    /// ### Parameters
    /// - `len` - Desired length of the internal buffers.
    pub fn ensure_len(&mut self, len: usize) {
        if self.force.len() != len {
            self.force.resize(len, Vec2::ZERO);
            self.count.resize(len, 0);
        }
        self.clear();
    }

    /// Resets every force to zero and every count to `0` without changing
    /// the length.
    pub fn clear(&mut self) {
        self.force.fill(Vec2::ZERO);
        self.count.fill(0);
    }

    pub fn len(&self) -> usize {
        self.force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }

    /// Force accumulated on `id` in the last velocity phase.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn force(&self, id: ParticleId) -> Vec2 {
        self.force[id]
    }

    /// Number of neighbors that pushed or pulled on `id`.
    #[inline]
    pub fn contributions(&self, id: ParticleId) -> u32 {
        self.count[id]
    }

    /// Total number of ordered particle pairs that produced a force.
    pub fn total_contributions(&self) -> u64 {
        self.count.iter().map(|&c| u64::from(c)).sum()
    }
}

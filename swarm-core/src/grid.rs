//! Uniform spatial grid used to find interaction partners.
//!
//! The domain is cut into square cells whose side equals the cutoff
//! radius. Two particles closer than the cutoff are then always in the same
//! cell or in one of the 8 surrounding cells, so a particle only has to look
//! at a 3×3 block of cells instead of at every other particle.
//!
//! Only occupied cells are stored, keyed by their integer coordinate, so the
//! domain size and cutoff radius put no limit on the grid. Buckets that were
//! occupied in the previous frame are cleared, not dropped, so their
//! allocations carry over between frames.

use std::collections::HashMap;

use glam::{IVec2, Vec2};

use crate::{bounds::Bounds, types::ParticleId};

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    origin: Vec2,
    cell_size: f32,
    cells: HashMap<IVec2, Vec<ParticleId>>,
}

impl SpatialGrid {
    /// Creates an empty grid anchored at the min corner of `bounds`.
    ///
    /// `cell_size` must be positive; [`crate::config::SimConfig::validate`]
    /// checks it.
    pub fn new(bounds: &Bounds, cell_size: f32) -> Self {
        Self {
            origin: bounds.min,
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Integer cell coordinate of `pos`.
    ///
    /// Uses floor division, so positions left of or below the origin land in
    /// negative cells rather than being rounded toward cell 0.
    #[inline]
    pub fn cell_of(&self, pos: Vec2) -> IVec2 {
        ((pos - self.origin) / self.cell_size).floor().as_ivec2()
    }

    /// Re-sorts every particle into its cell.
    ///
    /// Any previous content is discarded first, so nothing from an earlier
    /// frame survives. Within a bucket, indices are in ascending order. The
    /// work is proportional to the particle count, never to the area of
    /// the domain.
    ///
    /// ### Parameters
    /// - `positions` - Current position of every particle, indexed by id.
    pub fn rebuild(&mut self, positions: &[Vec2]) {
        // Buckets left empty by the previous rebuild go; the rest are reused.
        self.cells.retain(|_, bucket| {
            let keep = !bucket.is_empty();
            bucket.clear();
            keep
        });
        for (id, &pos) in positions.iter().enumerate() {
            let cell = self.cell_of(pos);
            self.cells.entry(cell).or_default().push(id);
        }
    }

    /// Ids of all particles in the 3×3 block of cells around `pos`.
    ///
    /// The result is a superset of the particles within one cell size of
    /// `pos`, and includes the particle at `pos` itself if it is indexed.
    /// Order is deterministic: rows bottom to top, columns left to right,
    /// ids ascending within a cell.
    pub fn neighbors(&self, pos: Vec2) -> impl Iterator<Item = ParticleId> + '_ {
        let center = self.cell_of(pos);

        (-1..=1).flat_map(move |dy| {
            (-1..=1).flat_map(move |dx| {
                self.cells
                    .get(&(center + IVec2::new(dx, dy)))
                    .into_iter()
                    .flatten()
                    .copied()
            })
        })
    }

    /// Number of cells holding at least one particle.
    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|b| !b.is_empty()).count()
    }

    /// Total number of indexed particles.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }
}

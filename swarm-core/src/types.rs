/// Identifier for a particle in a [`crate::particles::ParticleStore`].
///
/// This is an index into the store's arrays. Indices never change while a
/// store is alive; a full restart replaces the whole store.
pub type ParticleId = usize;

/// Particle type, an index into the rows and columns of an
/// [`crate::matrix::InteractionMatrix`].
pub type ParticleKind = usize;

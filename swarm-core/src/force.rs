//! The particle-life force law and the friction decay.
//!
//! Both are plain functions of their arguments so the velocity phase can
//! call them from any number of worker threads.

/// Time for a particle's speed to halve when no force acts on it.
pub const FRICTION_HALF_LIFE: f32 = 0.04;

/// Signed force magnitude along the separation vector.
///
/// Positive values pull a particle toward its neighbor, negative values
/// push it away.
///
/// - Below `beta` every pair repels, linearly from `-1` at contact to `0`
///   at `beta`, regardless of `a`.
/// - Between `beta` and `1` the force is a triangle that rises from `0`,
///   peaks at `a` when `r = (1 + beta) / 2` and falls back to `0` at `1`.
/// - At or beyond `1` there is no interaction.
///
/// ### Parameters
/// - `r` - Distance divided by the cutoff radius, expected in `[0, 1]`.
/// - `a` - Interaction coefficient for the ordered pair of types.
/// - `beta` - Split point between the two bands, in `(0, 1)`.
///
/// ### Returns
/// The force magnitude before scaling by radius and force multiplier.
#[inline]
pub fn force(r: f32, a: f32, beta: f32) -> f32 {
    if r < beta {
        r / beta - 1.0
    } else if r < 1.0 {
        a * (1.0 - (2.0 * r - 1.0 - beta).abs() / (1.0 - beta))
    } else {
        0.0
    }
}

/// Multiplier applied to last frame's velocity for a step of `dt`.
///
/// Equals `0.5^(dt / half_life)`, so after `half_life` time units of
/// free motion the speed has halved.
#[inline]
pub fn friction_factor(dt: f32, half_life: f32) -> f32 {
    0.5f32.powf(dt / half_life)
}

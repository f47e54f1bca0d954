use glam::Vec2;
use rand::Rng;

/// Distance from the opposite edge at which a particle re-enters the domain.
pub const WRAP_INSET: f32 = 0.1;

/// Axis-aligned rectangle the particles live in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn from_half_extents(half: Vec2) -> Self {
        Self {
            min: -half,
            max: half,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Uniform point in `[min.x, max.x) × [min.y, max.y)`.
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        let x = rng.random_range(self.min.x..self.max.x);
        let y = rng.random_range(self.min.y..self.max.y);
        Vec2::new(x, y)
    }

    /// Brings a freshly advanced position back into the domain.
    ///
    /// Each axis is handled on its own. A coordinate below its minimum
    /// re-enters at `max - WRAP_INSET`, one above its maximum at
    /// `min + WRAP_INSET`. Coordinates exactly on an edge are left alone.
    /// This is deliberately not a modulo wrap: the overshoot is discarded.
    pub fn wrap(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(p.x, self.min.x, self.max.x),
            wrap_axis(p.y, self.min.y, self.max.y),
        )
    }
}

#[inline]
fn wrap_axis(v: f32, min: f32, max: f32) -> f32 {
    if v < min {
        max - WRAP_INSET
    } else if v > max {
        min + WRAP_INSET
    } else {
        v
    }
}

//! Per-type display colors handed to whatever draws the particles.
//!
//! The simulation never reads these back; they only exist so that every
//! renderer colors the same type the same way for a whole run.

use palette::{Hsv, IntoColor, Srgb};
use rand::Rng;

use crate::types::ParticleKind;

/// One color per particle type.
#[derive(Clone, Debug, PartialEq)]
pub struct TypePalette {
    colors: Vec<Srgb>,
}

impl TypePalette {
    /// Spreads `type_count` hues evenly around the color wheel.
    ///
    /// Type `i` gets a hue somewhere in `[i / K, (i + 1) / K)` of the wheel,
    /// a saturation in `[0.6, 1)` and a value in `[0.8, 1)`, all drawn from
    /// `rng` in that order.
    ///
    /// ### Parameters
    /// - `type_count` - Number of particle types `K`.
    /// - `rng` - Random source for the per-type jitter.
    ///
    /// ### Returns
    /// A palette with exactly `type_count` entries.
    pub fn random(type_count: usize, rng: &mut impl Rng) -> Self {
        let hue_step = 1.0 / type_count.max(1) as f32;
        let colors = (0..type_count)
            .map(|i| -> Srgb {
                let hue = (i as f32 * hue_step + rng.random_range(0.0..hue_step)) % 1.0;
                let saturation: f32 = rng.random_range(0.6..1.0);
                let value: f32 = rng.random_range(0.8..1.0);
                Hsv::new(hue * 360.0, saturation, value).into_color()
            })
            .collect::<Vec<_>>();

        log::debug!("type palette: {colors:?}");
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, kind: ParticleKind) -> Option<Srgb> {
        self.colors.get(kind).copied()
    }

    /// Opaque RGBA components for `kind`, ready for a vertex or instance buffer.
    pub fn rgba(&self, kind: ParticleKind) -> Option<[f32; 4]> {
        self.color(kind).map(|c| [c.red, c.green, c.blue, 1.0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Srgb> {
        self.colors.iter()
    }
}

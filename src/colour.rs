//! Colour table.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

/// Number of entries in the colour table. `Control::color_scroll` indexes it modulo this.
pub const PALETTE_SIZE: usize = 256;

/// [`bytemuck`]-compatible table entry, laid out like `vec3<f32>` in a storage array (16-byte stride).
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, Default, PartialEq)]
pub struct Colour {
    pub rgb: [f32; 3],
    _pad: f32,
}

impl Colour {
    pub const BLACK: Self = Colour::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            rgb: [r, g, b],
            _pad: 0.0,
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let [r, g, b] = self.rgb.map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8);
        [r, g, b, 255]
    }
}

/// Cosine palette ([Quilez](https://iquilezles.org/articles/palettes/)) sampled
/// over one period, so scrolling through it wraps without a seam.
pub fn palette() -> Vec<Colour> {
    const PHASE: [f32; 3] = [0.0, 0.10, 0.20];

    (0..PALETTE_SIZE)
        .map(|index| {
            let t = index as f32 / PALETTE_SIZE as f32;
            let [r, g, b] = PHASE.map(|phase| 0.5 + 0.5 * (TAU * (t + phase)).cos());
            Colour::new(r, g, b)
        })
        .collect()
}

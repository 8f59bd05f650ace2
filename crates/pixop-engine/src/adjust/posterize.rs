//! Posterization to a fixed number of levels per channel.

use super::Lut;
use crate::buffer::ImageBuffer;
use crate::engine::{PixelOp, Scan};

/// Quantize one sample to `levels` evenly spaced values.
///
/// Rounds half to even on the `levels - 1` scale. `levels` below 2 is
/// treated as 2.
pub fn posterize_value(sample: u8, levels: u32) -> u8 {
    let steps = levels.max(2) as f64 - 1.0;
    let value = sample as f64 / 255.0;
    let value = (value * steps).round_ties_even() / steps;
    (value * 255.0) as u8
}

/// Posterize the color channels.
#[derive(Debug, Clone)]
pub struct Posterize {
    levels: u32,
    lut: Lut,
}

impl Posterize {
    /// Create a posterize operation; `levels` is clamped to at least 2.
    pub fn new(levels: u32) -> Self {
        Self {
            levels: levels.max(2),
            lut: Lut::identity(),
        }
    }

    #[inline]
    pub fn levels(&self) -> u32 {
        self.levels
    }
}

impl PixelOp for Posterize {
    fn init(&mut self, _src: &ImageBuffer, _scan: &mut Scan) {
        let levels = self.levels;
        self.lut = Lut::from_fn(|v| posterize_value(v, levels));
    }

    fn step(&mut self, _scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        self.lut.apply_rgb(src, dest);
    }
}

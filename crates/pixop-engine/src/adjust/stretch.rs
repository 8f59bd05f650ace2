//! Contrast stretching.
//!
//! Both operations scan the source once in `init` for the darkest and
//! brightest samples, then remap `[min, max]` linearly onto `[0, 255]`.
//! Only fully opaque pixels (alpha 255, or any pixel when there is no alpha)
//! take part in the search. A constant channel, or a source with no opaque
//! pixel, is left unchanged.

use super::Lut;
use crate::buffer::ImageBuffer;
use crate::engine::{PixelOp, Scan};

/// Inclusive sample range seen in one or more channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Extent {
    min: u8,
    max: u8,
}

impl Extent {
    const EMPTY: Extent = Extent { min: 255, max: 0 };

    #[inline]
    fn include(&mut self, v: u8) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    fn lut(self) -> Lut {
        if self.min >= self.max {
            return Lut::identity();
        }
        let (min, max) = (self.min as u32, self.max as u32);
        let range = max - min;
        Lut::from_fn(|x| {
            let x = x as u32;
            if x <= min {
                0
            } else if x >= max {
                255
            } else {
                (255 * (x - min) / range) as u8
            }
        })
    }
}

/// Per-channel extents over the opaque pixels of `src`.
fn opaque_extents(src: &ImageBuffer) -> [Extent; 3] {
    let has_alpha = src.has_alpha();
    let mut extents = [Extent::EMPTY; 3];
    for px in src.iter_pixels() {
        if has_alpha && px[3] != 255 {
            continue;
        }
        for (extent, &v) in extents.iter_mut().zip(&px[..3]) {
            extent.include(v);
        }
    }
    extents
}

/// Stretch each color channel independently to the full range.
#[derive(Debug, Clone, Default)]
pub struct StretchContrast {
    luts: [Lut; 3],
}

impl StretchContrast {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PixelOp for StretchContrast {
    fn init(&mut self, src: &ImageBuffer, _scan: &mut Scan) {
        let extents = opaque_extents(src);
        tracing::debug!(?extents, "stretch contrast extents");
        self.luts = extents.map(Extent::lut);
    }

    fn step(&mut self, _scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        for c in 0..3 {
            dest[c] = self.luts[c].get(src[c]);
        }
        crate::color::copy_alpha(src, dest);
    }
}

/// Stretch all color channels with one shared scale, preserving hue
/// relationships.
#[derive(Debug, Clone, Default)]
pub struct NormalizeContrast {
    lut: Lut,
}

impl NormalizeContrast {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PixelOp for NormalizeContrast {
    fn init(&mut self, src: &ImageBuffer, _scan: &mut Scan) {
        let mut shared = Extent::EMPTY;
        for extent in opaque_extents(src) {
            if extent != Extent::EMPTY {
                shared.include(extent.min);
                shared.include(extent.max);
            }
        }
        tracing::debug!(min = shared.min, max = shared.max, "normalize contrast extent");
        self.lut = shared.lut();
    }

    fn step(&mut self, _scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        self.lut.apply_rgb(src, dest);
    }
}

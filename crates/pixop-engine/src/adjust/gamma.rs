//! Gamma correction.

use super::Lut;
use crate::buffer::ImageBuffer;
use crate::color::clamp_f64_u8;
use crate::engine::{PixelOp, Scan};

/// Apply `v^(1/gamma)` to one normalized sample. A gamma of 0 leaves the
/// sample unchanged.
pub fn gamma_value(sample: u8, gamma: f64) -> u8 {
    let mut inten = sample as f64 / 255.0;
    if gamma != 0.0 {
        inten = if inten >= 0.0 {
            inten.powf(1.0 / gamma)
        } else {
            -(-inten).powf(1.0 / gamma)
        };
    }
    clamp_f64_u8(inten * 255.0)
}

/// Gamma correction of the color channels. Gamma above 1 brightens
/// midtones, below 1 darkens them.
#[derive(Debug, Clone)]
pub struct GammaCorrection {
    gamma: f64,
    lut: Lut,
}

impl GammaCorrection {
    pub fn new(gamma: f64) -> Self {
        Self {
            gamma,
            lut: Lut::identity(),
        }
    }

    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl PixelOp for GammaCorrection {
    fn init(&mut self, _src: &ImageBuffer, _scan: &mut Scan) {
        let gamma = self.gamma;
        self.lut = Lut::from_fn(|v| gamma_value(v, gamma));
    }

    fn step(&mut self, _scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        self.lut.apply_rgb(src, dest);
    }
}

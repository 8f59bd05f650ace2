//! Per-pixel color adjustments.
//!
//! Every adjustment here is a pure function of one pixel's color samples
//! (plus tables built once in `init`). Outputs are clamped to 0..=255 and
//! the alpha sample is copied through unchanged.

mod brightness_contrast;
mod color_balance;
mod desaturate;
mod gamma;
mod hue_saturation;
mod invert;
mod posterize;
mod stretch;

pub use brightness_contrast::{brightness_contrast_value, BrightnessContrast};
pub use color_balance::{ColorBalance, ToneRange};
pub use desaturate::Desaturate;
pub use gamma::{gamma_value, GammaCorrection};
pub use hue_saturation::{HueRange, HueSaturation};
pub use invert::Invert;
pub use posterize::{posterize_value, Posterize};
pub use stretch::{NormalizeContrast, StretchContrast};

use crate::color::copy_alpha;

/// A 256-entry sample remapping table.
#[derive(Clone, PartialEq, Eq)]
pub struct Lut(pub [u8; 256]);

impl Lut {
    /// The table mapping every sample to itself.
    pub fn identity() -> Self {
        Self::from_fn(|v| v)
    }

    /// Build a table by evaluating `f` for every sample value.
    pub fn from_fn(mut f: impl FnMut(u8) -> u8) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = f(i as u8);
        }
        Self(table)
    }

    #[inline]
    pub fn get(&self, value: u8) -> u8 {
        self.0[value as usize]
    }

    /// Remap the three color samples of `src` into `dest` and copy alpha.
    #[inline]
    pub fn apply_rgb(&self, src: &[u8], dest: &mut [u8]) {
        for c in 0..3 {
            dest[c] = self.get(src[c]);
        }
        copy_alpha(src, dest);
    }
}

impl Default for Lut {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for Lut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Lut").field(&&self.0[..]).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_lut() {
        let lut = Lut::identity();
        assert!((0..=255u8).all(|v| lut.get(v) == v));
    }

    #[test]
    fn test_apply_rgb_copies_alpha() {
        let lut = Lut::from_fn(|v| 255 - v);
        let mut dest = [0u8; 4];
        lut.apply_rgb(&[0, 10, 255, 77], &mut dest);
        assert_eq!(dest, [255, 245, 0, 77]);
    }
}

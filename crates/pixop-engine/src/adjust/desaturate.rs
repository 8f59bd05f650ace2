//! Desaturation to per-pixel lightness.

use crate::color::{copy_alpha, lightness};
use crate::engine::{PixelOp, Scan};

/// Replace every color sample with the pixel's lightness,
/// `(max(R, G, B) + min(R, G, B)) / 2`.
///
/// Gray pixels are left unchanged, so the operation is idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Desaturate;

impl PixelOp for Desaturate {
    fn step(&mut self, _scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        let l = lightness(src[0], src[1], src[2]);
        dest[..3].fill(l);
        copy_alpha(src, dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ImageBuffer;
    use crate::engine::run_in_place;

    #[test]
    fn test_gray_pixels_unchanged() {
        let mut image = ImageBuffer::new(2, 2, false).unwrap();
        image.pixel_mut(0, 0).copy_from_slice(&[0, 0, 0]);
        image.pixel_mut(1, 0).copy_from_slice(&[255, 255, 255]);
        image.pixel_mut(0, 1).copy_from_slice(&[128, 128, 128]);
        image.pixel_mut(1, 1).copy_from_slice(&[64, 64, 64]);
        let before = image.clone();

        run_in_place(&mut Desaturate, &mut image).unwrap();
        assert_eq!(image, before);
    }

    #[test]
    fn test_colored_pixel_and_alpha() {
        let mut image = ImageBuffer::filled(1, 1, true, &[200, 50, 100, 9]).unwrap();
        run_in_place(&mut Desaturate, &mut image).unwrap();
        assert_eq!(image.pixel(0, 0), &[125, 125, 125, 9]);
    }
}

//! Brightness and contrast.

use super::Lut;
use crate::buffer::ImageBuffer;
use crate::color::clamp_f64_u8;
use crate::engine::{PixelOp, Scan};

/// Apply brightness then contrast to one sample.
///
/// The sample is normalized to 0..=1. Brightness blends linearly toward 0
/// (negative) or 1 (positive). Contrast bends the result with a power curve
/// mirrored around 0.5: exponent `1 + contrast` for negative contrast,
/// `1 / (1 - contrast)` for positive contrast, and a near step function at
/// exactly 1.0. Both parameters are meant to lie in -1.0..=1.0.
pub fn brightness_contrast_value(sample: u8, brightness: f64, contrast: f64) -> u8 {
    let mut value = sample as f32 / 255.0;

    value = if brightness < 0.0 {
        (value as f64 * (1.0 + brightness)) as f32
    } else {
        (value as f64 + (1.0 - value as f64) * brightness) as f32
    };

    let power = if contrast < 0.0 {
        1.0 + contrast
    } else if contrast == 1.0 {
        127.0
    } else {
        1.0 / (1.0 - contrast)
    };

    let mut nvalue = if value > 0.5 { 1.0 - value } else { value };
    if nvalue < 0.0 {
        nvalue = 0.0;
    }
    nvalue = (0.5 * (2.0 * nvalue as f64).powf(power)) as f32;

    value = if value > 0.5 { 1.0 - nvalue } else { nvalue };

    clamp_f64_u8(value as f64 * 255.0)
}

/// Brightness/contrast adjustment of the color channels.
///
/// # Example
///
/// ```
/// use pixop_engine::{engine, BrightnessContrast, ImageBuffer};
///
/// let mut image = ImageBuffer::filled(1, 1, false, &[100, 100, 100]).unwrap();
/// engine::run_in_place(&mut BrightnessContrast::new(1.0, 0.0), &mut image).unwrap();
///
/// assert_eq!(image.pixel(0, 0), &[255, 255, 255]);
/// ```
#[derive(Debug, Clone)]
pub struct BrightnessContrast {
    brightness: f64,
    contrast: f64,
    lut: Lut,
}

impl BrightnessContrast {
    pub fn new(brightness: f64, contrast: f64) -> Self {
        Self {
            brightness,
            contrast,
            lut: Lut::identity(),
        }
    }

    #[inline]
    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    #[inline]
    pub fn contrast(&self) -> f64 {
        self.contrast
    }
}

impl PixelOp for BrightnessContrast {
    fn init(&mut self, _src: &ImageBuffer, _scan: &mut Scan) {
        let (brightness, contrast) = (self.brightness, self.contrast);
        self.lut = Lut::from_fn(|v| brightness_contrast_value(v, brightness, contrast));
    }

    fn step(&mut self, _scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        self.lut.apply_rgb(src, dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_is_near_identity() {
        for v in 0..=255u8 {
            let out = brightness_contrast_value(v, 0.0, 0.0);
            assert!(
                (v as i32 - out as i32).abs() <= 1,
                "neutral settings moved {} to {}",
                v,
                out
            );
        }
    }

    #[test]
    fn test_full_brightness_extremes() {
        for v in [0u8, 1, 77, 128, 254, 255] {
            assert_eq!(brightness_contrast_value(v, 1.0, 0.0), 255);
            assert_eq!(brightness_contrast_value(v, -1.0, 0.0), 0);
        }
    }

    #[test]
    fn test_brightness_is_monotonic() {
        let dim = brightness_contrast_value(100, -0.3, 0.0);
        let bright = brightness_contrast_value(100, 0.3, 0.0);
        assert!(dim < 100 && bright > 100);
    }

    #[test]
    fn test_full_contrast_pushes_away_from_middle() {
        assert_eq!(brightness_contrast_value(0, 0.0, 1.0), 0);
        assert_eq!(brightness_contrast_value(20, 0.0, 1.0), 0);
        assert_eq!(brightness_contrast_value(235, 0.0, 1.0), 255);
        assert_eq!(brightness_contrast_value(255, 0.0, 1.0), 255);
    }

    #[test]
    fn test_negative_contrast_flattens() {
        // contrast -1 collapses everything onto the midpoint
        for v in [0u8, 60, 200, 255] {
            assert_eq!(brightness_contrast_value(v, 0.0, -1.0), 127);
        }
    }

    #[test]
    fn test_out_of_domain_parameters_still_clamp() {
        for v in [0u8, 64, 128, 192, 255] {
            let _ = brightness_contrast_value(v, 3.0, 2.5);
            let _ = brightness_contrast_value(v, -4.0, -7.0);
        }
    }
}

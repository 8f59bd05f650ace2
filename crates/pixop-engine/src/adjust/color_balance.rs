//! Color balance per tonal range.
//!
//! Each tonal range carries three shifts in -100..=100: cyan↔red,
//! magenta↔green and yellow↔blue. A shift is weighted by a per-sample
//! transfer curve (strong in its range, fading elsewhere) and the three
//! ranges are applied in order shadows, midtones, highlights, clamping after
//! each. With luminosity preservation on, the result keeps the lightness of
//! the source pixel.

use super::Lut;
use crate::buffer::ImageBuffer;
use crate::color::{copy_alpha, lightness, Hls};
use crate::engine::{PixelOp, Scan};

/// Tonal range of a color balance shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToneRange {
    Shadows = 0,
    Midtones = 1,
    Highlights = 2,
}

const RANGES: [ToneRange; 3] = [ToneRange::Shadows, ToneRange::Midtones, ToneRange::Highlights];

/// Weighting curves for lightening (`add`) and darkening (`sub`), indexed
/// by [`ToneRange`].
struct TransferCurves {
    add: [[f64; 256]; 3],
    sub: [[f64; 256]; 3],
}

impl TransferCurves {
    fn new() -> Self {
        let mut add = [[0.0; 256]; 3];
        let mut sub = [[0.0; 256]; 3];

        for i in 0..256 {
            let x = i as f64;
            let edge = 1.075 - 1.0 / (x / 16.0 + 1.0);
            let bell = 0.667 * (1.0 - ((x - 127.0) / 127.0).powi(2));

            add[ToneRange::Highlights as usize][i] = edge;
            sub[ToneRange::Shadows as usize][255 - i] = edge;

            add[ToneRange::Midtones as usize][i] = bell;
            sub[ToneRange::Midtones as usize][i] = bell;

            add[ToneRange::Shadows as usize][i] = bell;
            sub[ToneRange::Highlights as usize][i] = bell;
        }

        Self { add, sub }
    }

    /// Lookup table for one channel given its shift per range.
    fn lut(&self, shifts: &[f64; 3]) -> Lut {
        Lut::from_fn(|v| {
            let mut n = v as i32;
            for range in RANGES {
                let r = range as usize;
                let curve = if shifts[r] > 0.0 { &self.add[r] } else { &self.sub[r] };
                n = ((n as f64 + shifts[r] * curve[n as usize]) as i32).clamp(0, 255);
            }
            n as u8
        })
    }
}

/// Cyan/red, magenta/green and yellow/blue balance.
///
/// # Example
///
/// ```
/// use pixop_engine::{engine, ColorBalance, ImageBuffer};
///
/// let mut image = ImageBuffer::filled(1, 1, false, &[128, 128, 128]).unwrap();
/// let mut op = ColorBalance::midtones(100.0, 0.0, 0.0, false);
/// engine::run_in_place(&mut op, &mut image).unwrap();
///
/// assert_eq!(image.pixel(0, 0), &[194, 128, 128]);
/// ```
#[derive(Debug, Clone)]
pub struct ColorBalance {
    cyan_red: [f64; 3],
    magenta_green: [f64; 3],
    yellow_blue: [f64; 3],
    preserve_luminosity: bool,
    lookup: Option<[Lut; 3]>,
}

impl ColorBalance {
    /// A balance with no shifts.
    pub fn new(preserve_luminosity: bool) -> Self {
        Self {
            cyan_red: [0.0; 3],
            magenta_green: [0.0; 3],
            yellow_blue: [0.0; 3],
            preserve_luminosity,
            lookup: None,
        }
    }

    /// A balance that only shifts the midtones.
    pub fn midtones(
        cyan_red: f64,
        magenta_green: f64,
        yellow_blue: f64,
        preserve_luminosity: bool,
    ) -> Self {
        Self::new(preserve_luminosity).range(
            ToneRange::Midtones,
            cyan_red,
            magenta_green,
            yellow_blue,
        )
    }

    /// Set the shifts of one tonal range.
    #[inline]
    pub fn range(
        mut self,
        range: ToneRange,
        cyan_red: f64,
        magenta_green: f64,
        yellow_blue: f64,
    ) -> Self {
        let r = range as usize;
        self.cyan_red[r] = cyan_red;
        self.magenta_green[r] = magenta_green;
        self.yellow_blue[r] = yellow_blue;
        self
    }

    #[inline]
    pub fn shadows(self, cyan_red: f64, magenta_green: f64, yellow_blue: f64) -> Self {
        self.range(ToneRange::Shadows, cyan_red, magenta_green, yellow_blue)
    }

    #[inline]
    pub fn highlights(self, cyan_red: f64, magenta_green: f64, yellow_blue: f64) -> Self {
        self.range(ToneRange::Highlights, cyan_red, magenta_green, yellow_blue)
    }

    #[inline]
    pub fn preserve_luminosity(&self) -> bool {
        self.preserve_luminosity
    }
}

impl PixelOp for ColorBalance {
    fn init(&mut self, _src: &ImageBuffer, _scan: &mut Scan) {
        let curves = TransferCurves::new();
        self.lookup = Some([
            curves.lut(&self.cyan_red),
            curves.lut(&self.magenta_green),
            curves.lut(&self.yellow_blue),
        ]);
    }

    fn step(&mut self, _scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        let Some([r_lut, g_lut, b_lut]) = self.lookup.as_ref() else {
            dest.copy_from_slice(src);
            return;
        };

        let (r, g, b) = (src[0], src[1], src[2]);
        let mut out = [r_lut.get(r), g_lut.get(g), b_lut.get(b)];

        if self.preserve_luminosity {
            let mut hls = Hls::from_rgb(out[0] as i32, out[1] as i32, out[2] as i32);
            hls.l = lightness(r, g, b) as i32;
            out = hls.to_rgb();
        }

        dest[..3].copy_from_slice(&out);
        copy_alpha(src, dest);
    }

    fn finalize(&mut self, _scan: &Scan) {
        self.lookup = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run_to_new;

    fn apply(op: &mut ColorBalance, pixel: &[u8]) -> Vec<u8> {
        let image = ImageBuffer::filled(1, 1, pixel.len() == 4, pixel).unwrap();
        run_to_new(op, &image).unwrap().pixel(0, 0).to_vec()
    }

    #[test]
    fn test_zero_shift_is_identity() {
        let mut op = ColorBalance::new(false);
        for px in [[0u8, 0, 0, 1], [12, 99, 240, 2], [255, 255, 255, 3]] {
            assert_eq!(apply(&mut op, &px), px.to_vec());
        }
    }

    #[test]
    fn test_midtone_red_shift() {
        let mut op = ColorBalance::midtones(100.0, 0.0, 0.0, false);
        assert_eq!(apply(&mut op, &[128, 128, 128]), vec![194, 128, 128]);
        // Midtone curve is zero at the extremes
        assert_eq!(apply(&mut op, &[0, 0, 0]), vec![0, 0, 0]);
    }

    #[test]
    fn test_negative_shift_darkens() {
        let mut op = ColorBalance::midtones(0.0, 0.0, -50.0, false);
        let out = apply(&mut op, &[128, 128, 128]);
        assert_eq!(&out[..2], &[128, 128]);
        assert!(out[2] < 128);
    }

    #[test]
    fn test_preserve_luminosity_keeps_lightness() {
        let mut op = ColorBalance::midtones(100.0, 0.0, 0.0, true);
        let out = apply(&mut op, &[128, 128, 128, 7]);
        let l = lightness(out[0], out[1], out[2]) as i32;
        assert!((l - 128).abs() <= 2, "lightness drifted to {}", l);
        assert!(out[0] > out[1], "red shift kept: {:?}", out);
        assert_eq!(out[3], 7);
    }

    #[test]
    fn test_highlights_builder() {
        let op = ColorBalance::new(false).shadows(1.0, 2.0, 3.0).highlights(-4.0, -5.0, -6.0);
        assert_eq!(op.cyan_red, [1.0, 0.0, -4.0]);
        assert_eq!(op.yellow_blue, [3.0, 0.0, -6.0]);
    }
}

//! Hue, lightness and saturation remapping in integer HLS space.
//!
//! Adjustments are set for [`HueRange::All`] and optionally refined per hue
//! sextant. A pixel's sextant is chosen from its integer hue (0..=255) with
//! the thresholds 43, 85, 128, 171 and 213; the effective adjustment is the
//! sum of the `All` entry and the sextant's own entry.

use crate::buffer::ImageBuffer;
use crate::color::{copy_alpha, Hls};
use crate::engine::{PixelOp, Scan};

/// Hue partition an adjustment applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HueRange {
    All = 0,
    Red = 1,
    Yellow = 2,
    Green = 3,
    Cyan = 4,
    Blue = 5,
    Magenta = 6,
}

impl HueRange {
    /// Sextant of an integer hue.
    pub fn for_hue(hue: i32) -> Self {
        match hue {
            h if h < 43 => HueRange::Red,
            h if h < 85 => HueRange::Yellow,
            h if h < 128 => HueRange::Green,
            h if h < 171 => HueRange::Cyan,
            h if h < 213 => HueRange::Blue,
            _ => HueRange::Magenta,
        }
    }
}

const PARTITIONS: usize = 7;
const SEXTANTS: usize = 6;

struct Transfers {
    hue: [[i32; 256]; SEXTANTS],
    lightness: [[i32; 256]; SEXTANTS],
    saturation: [[i32; 256]; SEXTANTS],
}

impl Transfers {
    fn build(
        hue: &[f64; PARTITIONS],
        lightness: &[f64; PARTITIONS],
        saturation: &[f64; PARTITIONS],
    ) -> Box<Self> {
        let mut t = Box::new(Transfers {
            hue: [[0; 256]; SEXTANTS],
            lightness: [[0; 256]; SEXTANTS],
            saturation: [[0; 256]; SEXTANTS],
        });

        for k in 0..SEXTANTS {
            let shift = ((hue[0] + hue[k + 1]) * 255.0 / 360.0) as i32;
            let light =
                (((lightness[0] + lightness[k + 1]) * 127.0 / 100.0) as i32).clamp(-255, 255);
            let sat =
                (((saturation[0] + saturation[k + 1]) * 255.0 / 100.0) as i32).clamp(-255, 255);

            for i in 0..256i32 {
                let shifted = i + shift;
                let wrapped = if shifted < 0 {
                    255 + shifted
                } else if shifted > 255 {
                    shifted - 255
                } else {
                    shifted
                };
                t.hue[k][i as usize] = wrapped.clamp(0, 255);

                t.lightness[k][i as usize] = if light < 0 {
                    i * (255 + light) / 255
                } else {
                    i + (255 - i) * light / 255
                };

                t.saturation[k][i as usize] = (i * (255 + sat) / 255).clamp(0, 255);
            }
        }
        t
    }
}

/// Hue rotation (degrees, -180..=180), lightness and saturation shifts
/// (percent, -100..=100).
///
/// # Example
///
/// ```
/// use pixop_engine::{engine, HueSaturation, ImageBuffer};
///
/// let mut image = ImageBuffer::filled(1, 1, false, &[200, 100, 50]).unwrap();
/// engine::run_in_place(&mut HueSaturation::new(0.0, 0.0, -100.0), &mut image).unwrap();
///
/// assert_eq!(image.pixel(0, 0), &[125, 125, 125]);
/// ```
pub struct HueSaturation {
    hue: [f64; PARTITIONS],
    lightness: [f64; PARTITIONS],
    saturation: [f64; PARTITIONS],
    transfers: Option<Box<Transfers>>,
}

impl HueSaturation {
    /// Adjustment applied to every hue.
    pub fn new(hue: f64, lightness: f64, saturation: f64) -> Self {
        Self::default().range(HueRange::All, hue, lightness, saturation)
    }

    /// Set the adjustment for one partition.
    #[inline]
    pub fn range(mut self, range: HueRange, hue: f64, lightness: f64, saturation: f64) -> Self {
        let i = range as usize;
        self.hue[i] = hue;
        self.lightness[i] = lightness;
        self.saturation[i] = saturation;
        self
    }

    /// `(hue, lightness, saturation)` configured for `range`.
    pub fn get(&self, range: HueRange) -> (f64, f64, f64) {
        let i = range as usize;
        (self.hue[i], self.lightness[i], self.saturation[i])
    }
}

impl Default for HueSaturation {
    fn default() -> Self {
        Self {
            hue: [0.0; PARTITIONS],
            lightness: [0.0; PARTITIONS],
            saturation: [0.0; PARTITIONS],
            transfers: None,
        }
    }
}

impl std::fmt::Debug for HueSaturation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HueSaturation")
            .field("hue", &self.hue)
            .field("lightness", &self.lightness)
            .field("saturation", &self.saturation)
            .finish()
    }
}

impl PixelOp for HueSaturation {
    fn init(&mut self, _src: &ImageBuffer, _scan: &mut Scan) {
        self.transfers = Some(Transfers::build(&self.hue, &self.lightness, &self.saturation));
    }

    fn step(&mut self, _scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        let Some(t) = self.transfers.as_deref() else {
            dest.copy_from_slice(src);
            return;
        };

        let hls = Hls::from_rgb(src[0] as i32, src[1] as i32, src[2] as i32);
        let k = HueRange::for_hue(hls.h) as usize - 1;
        let mapped = Hls {
            h: t.hue[k][hls.h as usize],
            l: t.lightness[k][hls.l as usize],
            s: t.saturation[k][hls.s as usize],
        };

        dest[..3].copy_from_slice(&mapped.to_rgb());
        copy_alpha(src, dest);
    }

    fn finalize(&mut self, _scan: &Scan) {
        self.transfers = None;
    }
}

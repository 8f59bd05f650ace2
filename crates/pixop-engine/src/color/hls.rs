//! Integer HLS color space.
//!
//! Hue, lightness and saturation all live on a 0..=255 scale; a hue sextant
//! spans 42.5 units. Conversions truncate toward zero at the same points the
//! classic GIMP integer routines do, so round-trips of gray and primary
//! colors are exact.

/// Lightness of an RGB triple: `(max + min) / 2`, truncated.
#[inline]
pub fn lightness(r: u8, g: u8, b: u8) -> u8 {
    let max = r.max(g).max(b) as u16;
    let min = r.min(g).min(b) as u16;
    ((max + min) / 2) as u8
}

/// A color in integer HLS space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hls {
    /// Hue, 0..=255 (255 wraps to 0)
    pub h: i32,
    /// Lightness, 0..=255
    pub l: i32,
    /// Saturation, 0..=255
    pub s: i32,
}

impl Hls {
    /// Convert an RGB triple.
    pub fn from_rgb(r: i32, g: i32, b: i32) -> Self {
        let (max, min) = if r > g {
            (r.max(b), g.min(b))
        } else {
            (g.max(b), r.min(b))
        };

        let l = (max + min) as f64 / 2.0;

        if max == min {
            return Self {
                h: 0,
                l: l as i32,
                s: 0,
            };
        }

        let delta = (max - min) as f64;
        let s = if l < 128.0 {
            255.0 * delta / (max + min) as f64
        } else {
            255.0 * delta / (511 - max - min) as f64
        };

        let mut h = if r == max {
            (g - b) as f64 / delta
        } else if g == max {
            2.0 + (b - r) as f64 / delta
        } else {
            4.0 + (r - g) as f64 / delta
        };
        h *= 42.5;
        if h < 0.0 {
            h += 255.0;
        } else if h > 255.0 {
            h -= 255.0;
        }

        Self {
            h: h as i32,
            l: l as i32,
            s: s as i32,
        }
    }

    /// Convert back to an RGB triple. Components are clamped to 0..=255.
    pub fn to_rgb(self) -> [u8; 3] {
        let h = self.h as f64;
        let l = self.l as f64;
        let s = self.s as f64;

        if self.s == 0 {
            let v = super::clamp_u8(self.l);
            return [v, v, v];
        }

        let m2 = if l < 128.0 {
            (l * (255.0 + s)) / 65025.0
        } else {
            (l + s - (l * s) / 255.0) / 255.0
        };
        let m1 = (l / 127.5) - m2;

        [
            hue_component(m1, m2, h + 85.0),
            hue_component(m1, m2, h),
            hue_component(m1, m2, h - 85.0),
        ]
    }
}

/// One RGB component from the HLS intermediates for a shifted hue.
fn hue_component(n1: f64, n2: f64, mut hue: f64) -> u8 {
    if hue > 255.0 {
        hue -= 255.0;
    } else if hue < 0.0 {
        hue += 255.0;
    }

    let value = if hue < 42.5 {
        n1 + (n2 - n1) * (hue / 42.5)
    } else if hue < 127.5 {
        n2
    } else if hue < 170.0 {
        n1 + (n2 - n1) * ((170.0 - hue) / 42.5)
    } else {
        n1
    };

    super::clamp_f64_u8((value * 255.0).trunc())
}

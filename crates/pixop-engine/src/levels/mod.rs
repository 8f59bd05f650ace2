//! Levels: per-channel input range, gamma and output range.
//!
//! [`Levels`] holds one [`ChannelLevels`] per histogram channel (Value, R,
//! G, B, A). A color sample is first mapped through its own channel and then
//! through the Value channel, which acts as a master curve.
//!
//! [`Levels::auto`] derives the input bounds of R, G and B from a
//! [`Histogram`]: the low bound is the first intensity whose cumulative
//! share of pixels is closest to the clip fraction, the high bound is the
//! same from the bright end. Gamma stays 1 and the output range stays
//! `0..=255`.
//!
//! # Example
//!
//! ```
//! use pixop_engine::{engine, AdjustLevels, ImageBuffer};
//!
//! let mut image = ImageBuffer::new(2, 1, false).unwrap();
//! image.pixel_mut(0, 0).copy_from_slice(&[40, 40, 40]);
//! image.pixel_mut(1, 0).copy_from_slice(&[200, 200, 200]);
//!
//! engine::run_in_place(&mut AdjustLevels::new(), &mut image).unwrap();
//! assert_eq!(image.pixel(0, 0), &[0, 0, 0]);
//! ```

use crate::adjust::Lut;
use crate::buffer::ImageBuffer;
use crate::color::clamp_f64_u8;
use crate::engine::{PixelOp, Scan};
use crate::histogram::{Histogram, HistogramChannel, BINS, MAX_CHANNELS};

/// Fraction of pixels clipped at each end by automatic levels.
pub const AUTO_LEVELS_CLIP: f64 = 0.006;

/// Levels of one channel. Inputs and outputs are on the 0..=255 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelLevels {
    pub gamma: f64,
    pub low_input: f64,
    pub high_input: f64,
    pub low_output: f64,
    pub high_output: f64,
}

impl Default for ChannelLevels {
    fn default() -> Self {
        Self {
            gamma: 1.0,
            low_input: 0.0,
            high_input: 255.0,
            low_output: 0.0,
            high_output: 255.0,
        }
    }
}

impl ChannelLevels {
    /// Map an intensity on the 0..=255 scale. The result is not clamped.
    pub fn map(&self, value: f64) -> f64 {
        let mut inten = value / 255.0;

        inten = if self.high_input != self.low_input {
            (255.0 * inten - self.low_input) / (self.high_input - self.low_input)
        } else {
            255.0 * inten - self.low_input
        };

        if self.gamma != 0.0 {
            inten = if inten >= 0.0 {
                inten.powf(1.0 / self.gamma)
            } else {
                -(-inten).powf(1.0 / self.gamma)
            };
        }

        if self.high_output >= self.low_output {
            inten * (self.high_output - self.low_output) + self.low_output
        } else {
            self.low_output - inten * (self.low_output - self.high_output)
        }
    }
}

/// Levels for the Value, R, G, B and A channels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Levels {
    channels: [ChannelLevels; MAX_CHANNELS],
}

impl Levels {
    /// Levels that leave every channel as is.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Automatic input bounds with the default clip fraction.
    pub fn auto(hist: &Histogram) -> Self {
        Self::auto_with_clip(hist, AUTO_LEVELS_CLIP)
    }

    /// Automatic input bounds for R, G and B clipping `clip` of the pixels
    /// at each end.
    pub fn auto_with_clip(hist: &Histogram, clip: f64) -> Self {
        let mut levels = Self::identity();
        for channel in [HistogramChannel::Red, HistogramChannel::Green, HistogramChannel::Blue] {
            let (low, high) = auto_bounds(hist, channel, clip);
            let c = levels.channel_mut(channel);
            c.low_input = low as f64;
            c.high_input = high as f64;
            tracing::debug!(?channel, low, high, "auto levels bounds");
        }
        levels
    }

    #[inline]
    pub fn channel(&self, channel: HistogramChannel) -> &ChannelLevels {
        &self.channels[channel.index()]
    }

    #[inline]
    pub fn channel_mut(&mut self, channel: HistogramChannel) -> &mut ChannelLevels {
        &mut self.channels[channel.index()]
    }

    /// Replace the levels of one channel.
    #[inline]
    pub fn with_channel(mut self, channel: HistogramChannel, levels: ChannelLevels) -> Self {
        self.channels[channel.index()] = levels;
        self
    }

    /// Map a sample of color channel `color` (0 = red, 2 = blue) through its
    /// own levels, then the Value levels, and clamp.
    pub fn apply(&self, value: u8, color: usize) -> u8 {
        let own = &self.channels[HistogramChannel::for_sample(color).index()];
        let master = &self.channels[HistogramChannel::Value.index()];
        let inten = master.map(own.map(value as f64));
        clamp_f64_u8(inten)
    }
}

/// Low and high input bounds of one channel.
///
/// Returns `(0, 0)` for an empty histogram. When no crossing of the clip
/// fraction is found the bound keeps its default (0 or 255).
pub fn auto_bounds(hist: &Histogram, channel: HistogramChannel, clip: f64) -> (u8, u8) {
    let count = hist.total();
    if count == 0.0 {
        return (0, 0);
    }

    let value = |bin: usize| hist.channel(channel, bin);
    let closer_here = |cum: f64, next: f64| {
        let here = cum / count;
        let ahead = (cum + next) / count;
        (here - clip).abs() < (ahead - clip).abs()
    };

    let mut low = 0;
    let mut cum = 0.0;
    for i in 0..BINS - 1 {
        cum += value(i);
        if closer_here(cum, value(i + 1)) {
            low = i + 1;
            break;
        }
    }

    let mut high = BINS - 1;
    cum = 0.0;
    for i in (1..BINS).rev() {
        cum += value(i);
        if closer_here(cum, value(i - 1)) {
            high = i - 1;
            break;
        }
    }

    (low as u8, high as u8)
}

/// Where [`AdjustLevels`] gets its levels from.
#[derive(Debug, Clone)]
enum LevelsSource {
    /// Compute a histogram of the source in `init`.
    Auto { clip: f64 },
    /// Derive automatic levels from a histogram supplied up front.
    Histogram { hist: Box<Histogram>, clip: f64 },
    Explicit(Levels),
}

/// Levels adjustment of the color channels; alpha is copied.
#[derive(Debug, Clone)]
pub struct AdjustLevels {
    source: LevelsSource,
    levels: Option<Levels>,
    luts: [Lut; 3],
}

impl Default for AdjustLevels {
    fn default() -> Self {
        Self::new()
    }
}

impl AdjustLevels {
    /// Automatic levels from the source's own histogram.
    pub fn new() -> Self {
        Self::with_clip(AUTO_LEVELS_CLIP)
    }

    /// Automatic levels with a custom clip fraction.
    pub fn with_clip(clip: f64) -> Self {
        Self::from_source(LevelsSource::Auto { clip })
    }

    /// Automatic levels from a histogram that was already computed.
    pub fn with_histogram(hist: Histogram) -> Self {
        Self::from_source(LevelsSource::Histogram {
            hist: Box::new(hist),
            clip: AUTO_LEVELS_CLIP,
        })
    }

    /// Fixed levels.
    pub fn with_levels(levels: Levels) -> Self {
        Self::from_source(LevelsSource::Explicit(levels))
    }

    fn from_source(source: LevelsSource) -> Self {
        Self {
            source,
            levels: None,
            luts: Default::default(),
        }
    }

    /// Levels used by the last run, available after `init`.
    pub fn levels(&self) -> Option<&Levels> {
        self.levels.as_ref()
    }
}

impl PixelOp for AdjustLevels {
    fn init(&mut self, src: &ImageBuffer, _scan: &mut Scan) {
        let levels = match &self.source {
            LevelsSource::Auto { clip } => {
                Levels::auto_with_clip(&Histogram::from_buffer(src), *clip)
            }
            LevelsSource::Histogram { hist, clip } => Levels::auto_with_clip(hist, *clip),
            LevelsSource::Explicit(levels) => *levels,
        };
        self.luts = [0, 1, 2].map(|c| Lut::from_fn(|v| levels.apply(v, c)));
        self.levels = Some(levels);
    }

    fn step(&mut self, _scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        for c in 0..3 {
            dest[c] = self.luts[c].get(src[c]);
        }
        crate::color::copy_alpha(src, dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run_to_new;

    #[test]
    fn test_identity_levels() {
        let levels = Levels::identity();
        for v in 0..=255u8 {
            for c in 0..3 {
                let out = levels.apply(v, c);
                assert!((out as i32 - v as i32).abs() <= 1, "{} -> {}", v, out);
            }
        }
    }

    #[test]
    fn test_constant_image_bounds() {
        for c in [0u8, 1, 77, 254, 255] {
            let image = ImageBuffer::filled(4, 4, false, &[c, c, c]).unwrap();
            let hist = Histogram::from_buffer(&image);
            assert_eq!(auto_bounds(&hist, HistogramChannel::Red, AUTO_LEVELS_CLIP), (c, c));
        }
    }

    #[test]
    fn test_empty_histogram_bounds() {
        let hist = Histogram::new();
        assert_eq!(auto_bounds(&hist, HistogramChannel::Green, AUTO_LEVELS_CLIP), (0, 0));
        let levels = Levels::auto(&hist);
        assert_eq!(levels.channel(HistogramChannel::Green).high_input, 0.0);
        assert_eq!(levels.channel(HistogramChannel::Value), &ChannelLevels::default());
    }

    #[test]
    fn test_two_tone_image_stretches() {
        let mut image = ImageBuffer::new(2, 1, true).unwrap();
        image.pixel_mut(0, 0).copy_from_slice(&[40, 40, 40, 9]);
        image.pixel_mut(1, 0).copy_from_slice(&[200, 200, 200, 250]);
        let mut op = AdjustLevels::new();
        let out = run_to_new(&mut op, &image).unwrap();

        let red = op.levels().unwrap().channel(HistogramChannel::Red);
        assert_eq!((red.low_input, red.high_input), (40.0, 200.0));
        assert_eq!(out.pixel(0, 0), &[0, 0, 0, 9]);
        let bright = out.pixel(1, 0);
        assert!(bright[..3].iter().all(|&v| v >= 254), "got {:?}", bright);
        assert_eq!(bright[3], 250);
    }

    #[test]
    fn test_inverted_output_range() {
        let levels = Levels::identity().with_channel(
            HistogramChannel::Value,
            ChannelLevels {
                low_output: 255.0,
                high_output: 0.0,
                ..Default::default()
            },
        );
        assert_eq!(levels.apply(0, 0), 255);
        assert_eq!(levels.apply(255, 1), 0);
    }

    #[test]
    fn test_gamma_and_clamp() {
        let levels = Levels::identity().with_channel(
            HistogramChannel::Blue,
            ChannelLevels {
                gamma: 2.0,
                low_input: 100.0,
                ..Default::default()
            },
        );
        // below the low input goes negative, then clamps to zero
        assert_eq!(levels.apply(50, 2), 0);
        assert!(levels.apply(150, 2) > levels.apply(150, 0) / 2);
        // other channels keep their identity mapping
        assert!((levels.apply(50, 0) as i32 - 50).abs() <= 1);
    }

    #[test]
    fn test_explicit_levels_and_precomputed_histogram() {
        let image = ImageBuffer::filled(3, 3, false, &[10, 128, 250]).unwrap();
        let hist = Histogram::from_buffer(&image);

        let mut from_hist = AdjustLevels::with_histogram(hist);
        let mut auto = AdjustLevels::new();
        assert_eq!(
            run_to_new(&mut from_hist, &image).unwrap(),
            run_to_new(&mut auto, &image).unwrap()
        );

        let mut fixed = AdjustLevels::with_levels(Levels::identity());
        let out = run_to_new(&mut fixed, &image).unwrap();
        assert_eq!(fixed.levels(), Some(&Levels::identity()));
        for (a, b) in out.pixels().iter().zip(image.pixels()) {
            assert!((*a as i32 - *b as i32).abs() <= 1);
        }
    }
}

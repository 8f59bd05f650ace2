//! Per-channel frequency counts of 8-bit samples.
//!
//! A [`Histogram`] is a snapshot: it is computed from one buffer and goes
//! stale as soon as that buffer changes. Recompute it with
//! [`Histogram::calculate`] after every mutation you care about.

use crate::buffer::ImageBuffer;

/// Number of logical channels: Value, R, G, B, A.
pub const MAX_CHANNELS: usize = 5;

/// Number of bins per channel.
pub const BINS: usize = 256;

/// Logical histogram channel.
///
/// `Value` is not stored in the image; it counts `max(R, G, B)` per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistogramChannel {
    Value = 0,
    Red = 1,
    Green = 2,
    Blue = 3,
    Alpha = 4,
}

impl HistogramChannel {
    /// Histogram index of a color sample index (0 = red, 3 = alpha).
    #[inline]
    pub fn for_sample(sample: usize) -> Self {
        match sample {
            0 => HistogramChannel::Red,
            1 => HistogramChannel::Green,
            2 => HistogramChannel::Blue,
            _ => HistogramChannel::Alpha,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Frequency counts for the Value, R, G, B and (optionally) A channels.
///
/// # Example
///
/// ```
/// use pixop_engine::{Histogram, HistogramChannel, ImageBuffer};
///
/// let image = ImageBuffer::filled(4, 2, false, &[10, 200, 30]).unwrap();
/// let hist = Histogram::from_buffer(&image);
///
/// assert_eq!(hist.count(0, 255), 8.0);
/// assert_eq!(hist.channel(HistogramChannel::Value, 200), 8.0);
/// assert_eq!(hist.channel(HistogramChannel::Red, 10), 8.0);
/// assert_eq!(hist.n_channels(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    values: Box<[[u32; BINS]; MAX_CHANNELS]>,
    values_max: [u32; MAX_CHANNELS],
    /// Computed channels including Value; 0 before the first calculation.
    n_channels: usize,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    /// Create an empty histogram with no computed channels.
    pub fn new() -> Self {
        Self {
            values: Box::new([[0; BINS]; MAX_CHANNELS]),
            values_max: [0; MAX_CHANNELS],
            n_channels: 0,
        }
    }

    /// Create and compute a histogram for `image`.
    pub fn from_buffer(image: &ImageBuffer) -> Self {
        let mut hist = Self::new();
        hist.calculate(Some(image));
        hist
    }

    /// Zero every count and forget the channel layout.
    pub fn reset(&mut self) {
        for channel in self.values.iter_mut() {
            channel.fill(0);
        }
        self.values_max = [0; MAX_CHANNELS];
        self.n_channels = 0;
    }

    /// Recompute the counts from `image`. `None` leaves an empty histogram.
    pub fn calculate(&mut self, image: Option<&ImageBuffer>) {
        self.reset();
        let Some(image) = image else {
            return;
        };

        let has_alpha = image.has_alpha();
        self.n_channels = image.n_channels() + 1;

        let values = &mut *self.values;
        let values_max = &mut self.values_max;

        for px in image.iter_pixels() {
            let (r, g, b) = (px[0] as usize, px[1] as usize, px[2] as usize);
            let max = r.max(g).max(b);

            values[0][max] += 1;
            values[1][r] += 1;
            values[2][g] += 1;
            values[3][b] += 1;

            values_max[0] = values_max[0].max(values[0][max]);
            values_max[1] = values_max[1].max(values[1][r]);
            values_max[2] = values_max[2].max(values[2][g]);
            values_max[3] = values_max[3].max(values[3][b]);

            if has_alpha {
                let a = px[3] as usize;
                values[4][a] += 1;
                values_max[4] = values_max[4].max(values[4][a]);
            }
        }

        tracing::trace!(
            pixels = image.pixel_count(),
            channels = self.n_channels,
            "histogram calculated"
        );
    }

    /// Sum of the Value channel over the inclusive bin range `start..=end`.
    ///
    /// Bins past 255 are ignored.
    pub fn count(&self, start: usize, end: usize) -> f64 {
        if start >= BINS || start > end {
            return 0.0;
        }
        let end = end.min(BINS - 1);
        self.values[0][start..=end]
            .iter()
            .map(|&v| v as f64)
            .sum()
    }

    /// Total number of pixels counted.
    #[inline]
    pub fn total(&self) -> f64 {
        self.count(0, BINS - 1)
    }

    /// Count at `bin` of the raw channel index `channel` (0 = Value).
    ///
    /// Returns 0.0 for channels that were not computed and for bins past 255.
    pub fn value(&self, channel: usize, bin: usize) -> f64 {
        if channel < self.n_channels && bin < BINS {
            self.values[channel][bin] as f64
        } else {
            0.0
        }
    }

    /// Count at `bin` of a logical channel.
    #[inline]
    pub fn channel(&self, channel: HistogramChannel, bin: usize) -> f64 {
        self.value(channel.index(), bin)
    }

    /// Largest count in the raw channel index `channel`, 0.0 when not computed.
    pub fn max(&self, channel: usize) -> f64 {
        if channel < self.n_channels {
            self.values_max[channel] as f64
        } else {
            0.0
        }
    }

    /// Largest count in a logical channel.
    #[inline]
    pub fn channel_max(&self, channel: HistogramChannel) -> f64 {
        self.max(channel.index())
    }

    /// Largest count over every computed channel.
    pub fn global_max(&self) -> f64 {
        self.values_max[..self.n_channels]
            .iter()
            .copied()
            .max()
            .unwrap_or(0) as f64
    }

    /// Number of image channels counted: 3 without alpha, 4 with alpha,
    /// 0 before the first calculation. The Value channel is not included.
    #[inline]
    pub fn n_channels(&self) -> usize {
        self.n_channels.saturating_sub(1)
    }
}

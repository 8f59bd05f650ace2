//! Histogram equalization.
//!
//! For each color channel a 257-entry partition table splits the 256 bins
//! into runs holding roughly `total / 256` pixels each. A sample is then
//! replaced by the index of the run it falls into. Partition boundaries are
//! placed at whichever of the two candidate bins lands closer to the ideal
//! cumulative count.

use crate::adjust::Lut;
use crate::buffer::ImageBuffer;
use crate::engine::{PixelOp, Scan};
use crate::histogram::{Histogram, HistogramChannel, BINS};

/// Boundary table: run `i` covers bins `part[i]..part[i + 1]`.
pub type Partition = [usize; BINS + 1];

/// Build the partition table of one channel.
///
/// An empty histogram yields the identity partition.
pub fn partition(hist: &Histogram, channel: HistogramChannel) -> Partition {
    let mut part = [0usize; BINS + 1];
    let total = hist.total();
    if total == 0.0 {
        for (i, p) in part.iter_mut().enumerate() {
            *p = i;
        }
        return part;
    }

    let value = |bin: usize| hist.channel(channel, bin) as i64;
    let per_value = (total / BINS as f64) as i64;

    part[0] = 0;
    part[BINS] = BINS;

    let mut j = 0usize;
    let mut sum = value(0) + value(1);

    for i in 1..BINS {
        let desired = i as i64 * per_value;

        while sum <= desired && j < BINS - 1 {
            j += 1;
            sum += value(j + 1);
        }

        let dif = sum - value(j);
        part[i] = if (sum - desired) as f64 > dif as f64 / 2.0 { j } else { j + 1 };
    }

    part
}

/// Lookup table mapping each sample to its run index.
fn lookup(part: &Partition) -> Lut {
    Lut::from_fn(|v| {
        let v = v as usize;
        let mut i = 0;
        while i < BINS - 1 && part[i + 1] <= v {
            i += 1;
        }
        i as u8
    })
}

/// Equalize the color channels; alpha is copied.
#[derive(Debug, Clone, Default)]
pub struct Equalize {
    histogram: Option<Box<Histogram>>,
    luts: [Lut; 3],
}

impl Equalize {
    /// Equalize using the histogram of the source, computed in `init`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Equalize using a histogram that was already computed.
    pub fn with_histogram(hist: Histogram) -> Self {
        Self {
            histogram: Some(Box::new(hist)),
            luts: Default::default(),
        }
    }
}

impl PixelOp for Equalize {
    fn init(&mut self, src: &ImageBuffer, _scan: &mut Scan) {
        let computed;
        let hist = match self.histogram.as_deref() {
            Some(hist) => hist,
            None => {
                computed = Histogram::from_buffer(src);
                &computed
            }
        };

        tracing::debug!(pixels = hist.total(), "equalize partitions");
        self.luts = [HistogramChannel::Red, HistogramChannel::Green, HistogramChannel::Blue]
            .map(|channel| lookup(&partition(hist, channel)));
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

    fn ramp(width: usize) -> ImageBuffer {
        let mut image = ImageBuffer::new(width, 1, true).unwrap();
        for x in 0..width {
            let v = (x * 255 / (width - 1).max(1)) as u8;
            image.pixel_mut(x, 0).copy_from_slice(&[v, v / 2, 255 - v, 200]);
        }
        image
    }

    fn assert_monotonic(part: &Partition) {
        for i in 0..BINS {
            assert!(
                part[i] <= part[i + 1],
                "part[{}]={} > part[{}]={}",
                i,
                part[i],
                i + 1,
                part[i + 1]
            );
        }
    }

    #[test]
    fn test_uniform_histogram_is_nearly_identity() {
        let mut image = ImageBuffer::new(256, 1, false).unwrap();
        for x in 0..256 {
            image.pixel_mut(x, 0).fill(x as u8);
        }
        let out = run_to_new(&mut Equalize::new(), &image).unwrap();

        // The first boundary rounds down, merging bins 0 and 1
        assert_eq!(out.pixel(0, 0), &[1, 1, 1]);
        assert_eq!(out.pixel(1, 0), &[1, 1, 1]);
        for x in 2..256 {
            assert_eq!(out.pixel(x, 0), image.pixel(x, 0));
        }
    }

    #[test]
    fn test_partitions_monotonic() {
        let hist = Histogram::from_buffer(&ramp(37));
        for channel in [HistogramChannel::Red, HistogramChannel::Green, HistogramChannel::Blue] {
            let part = partition(&hist, channel);
            assert_eq!(part[0], 0);
            assert_eq!(part[BINS], BINS);
            assert_monotonic(&part);
        }
    }

    #[test]
    fn test_empty_histogram_identity_partition() {
        let part = partition(&Histogram::new(), HistogramChannel::Red);
        assert!(part.iter().enumerate().all(|(i, &p)| p == i));
    }

    #[test]
    fn test_tiny_image_does_not_hang() {
        // Fewer than 256 pixels: zero pixels per value
        let image = ImageBuffer::filled(2, 2, false, &[30, 60, 90]).unwrap();
        let hist = Histogram::from_buffer(&image);
        let part = partition(&hist, HistogramChannel::Green);
        assert_monotonic(&part);
        let _ = run_to_new(&mut Equalize::new(), &image).unwrap();
    }

    #[test]
    fn test_dark_image_spreads_out() {
        let mut image = ImageBuffer::new(512, 1, true).unwrap();
        for x in 0..512 {
            let v = (x % 64) as u8;
            image.pixel_mut(x, 0).copy_from_slice(&[v, v, v, 255]);
        }
        let out = run_to_new(&mut Equalize::new(), &image).unwrap();
        let max = out.iter_pixels().map(|p| p[0]).max().unwrap();
        assert!(max > 200, "equalized maximum only {}", max);
        assert!(out.iter_pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_precomputed_histogram_matches() {
        let image = ramp(50);
        let hist = Histogram::from_buffer(&image);
        assert_eq!(
            run_to_new(&mut Equalize::with_histogram(hist), &image).unwrap(),
            run_to_new(&mut Equalize::new(), &image).unwrap()
        );
    }
}

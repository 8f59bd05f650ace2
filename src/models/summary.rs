use pixop_engine::{Histogram, HistogramChannel, ImageBuffer, BINS};
use serde::Serialize;

/// Per-channel statistics of one channel histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub channel: &'static str,
    pub min: u8,
    pub max: u8,
    pub mean: f64,
}

/// Geometry and histogram statistics of a processed buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSummary {
    pub width: usize,
    pub height: usize,
    pub has_alpha: bool,
    pub channels: Vec<ChannelSummary>,
}

fn channel_name(channel: HistogramChannel) -> &'static str {
    match channel {
        HistogramChannel::Value => "value",
        HistogramChannel::Red => "red",
        HistogramChannel::Green => "green",
        HistogramChannel::Blue => "blue",
        HistogramChannel::Alpha => "alpha",
    }
}

fn summarize(hist: &Histogram, channel: HistogramChannel) -> Option<ChannelSummary> {
    let counts: Vec<f64> = (0..BINS).map(|bin| hist.channel(channel, bin)).collect();
    let total: f64 = counts.iter().sum();
    if total == 0.0 {
        return None;
    }

    let min = counts.iter().position(|&c| c > 0.0)?;
    let max = counts.iter().rposition(|&c| c > 0.0)?;
    let weighted: f64 = counts.iter().enumerate().map(|(bin, c)| bin as f64 * c).sum();

    Some(ChannelSummary {
        channel: channel_name(channel),
        min: min as u8,
        max: max as u8,
        mean: weighted / total,
    })
}

impl ImageSummary {
    pub fn from_buffer(image: &ImageBuffer) -> Self {
        let hist = Histogram::from_buffer(image);
        let mut channels = vec![
            HistogramChannel::Value,
            HistogramChannel::Red,
            HistogramChannel::Green,
            HistogramChannel::Blue,
        ];
        if image.has_alpha() {
            channels.push(HistogramChannel::Alpha);
        }

        Self {
            width: image.width(),
            height: image.height(),
            has_alpha: image.has_alpha(),
            channels: channels
                .into_iter()
                .filter_map(|c| summarize(&hist, c))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_image_summary() {
        let image = ImageBuffer::filled(4, 3, true, &[10, 20, 30, 255]).unwrap();
        let summary = ImageSummary::from_buffer(&image);

        assert_eq!(summary.width, 4);
        assert_eq!(summary.height, 3);
        assert_eq!(summary.channels.len(), 5);
        let red = &summary.channels[1];
        assert_eq!(red.channel, "red");
        assert_eq!((red.min, red.max), (10, 10));
        assert_eq!(red.mean, 10.0);
        assert_eq!(summary.channels[0].max, 30);
    }

    #[test]
    fn test_empty_image_has_no_channels() {
        let image = ImageBuffer::new(0, 0, false).unwrap();
        assert!(ImageSummary::from_buffer(&image).channels.is_empty());
    }

    #[test]
    fn test_serializes_to_json() {
        let image = ImageBuffer::filled(1, 1, false, &[0, 128, 255]).unwrap();
        let json = serde_json::to_value(ImageSummary::from_buffer(&image)).unwrap();
        assert_eq!(json["channels"][3]["channel"], "blue");
        assert_eq!(json["channels"][3]["min"], 255);
    }
}

// Per-channel loops index several parallel arrays at once
#![allow(clippy::needless_range_loop)]

//! pixop-engine: scanline pixel transforms for 8-bit RGB(A) raster buffers.
//!
//! One engine, many transforms. Every operation implements [`PixelOp`] and
//! is driven over an [`ImageBuffer`] by [`engine::run`],
//! [`engine::run_in_place`] or [`engine::run_to_new`].
//!
//! # Quick Start
//!
//! ```
//! use pixop_engine::{engine, Desaturate, ImageBuffer, Posterize};
//!
//! let mut image = ImageBuffer::filled(4, 4, true, &[200, 50, 100, 255]).unwrap();
//!
//! engine::run_in_place(&mut Desaturate, &mut image).unwrap();
//! engine::run_in_place(&mut Posterize::new(2), &mut image).unwrap();
//!
//! assert_eq!(image.pixel(0, 0), &[0, 0, 0, 255]);
//! ```
//!
//! # Transforms
//!
//! Per-pixel color adjustments ([`adjust`]):
//!
//! - [`Desaturate`], [`Invert`], [`BrightnessContrast`], [`Posterize`],
//!   [`GammaCorrection`]
//! - [`HueSaturation`]: integer HLS remapping, per hue sextant
//! - [`ColorBalance`]: cyan/red, magenta/green, yellow/blue per tonal range
//! - [`StretchContrast`] / [`NormalizeContrast`]: min/max rescaling
//!
//! Histogram-driven:
//!
//! - [`Equalize`]: equal-population partitions per channel
//! - [`AdjustLevels`]: automatic or explicit [`Levels`]
//!
//! Stateful and geometric:
//!
//! - [`Dither`]: serpentine Floyd-Steinberg to black & white or a 6-level
//!   palette
//! - [`Scale`]: bilinear rescaling, replaces the destination
//!
//! # Numerics
//!
//! Outputs are clamped to 0..=255 at every step, and floating-point
//! intermediates are truncated, never rounded, when converted back to
//! samples. Degenerate inputs (constant channels, empty histograms, empty
//! buffers) fall back to identity mappings instead of failing. The only
//! errors are structural and reported as [`BufferError`].
//!
//! # Alpha
//!
//! Color transforms read and write the first three samples and copy the
//! alpha sample through unchanged. [`Scale`] interpolates alpha like any
//! other channel.

pub mod adjust;
pub mod buffer;
pub mod color;
pub mod dither;
pub mod engine;
pub mod equalize;
pub mod geometry;
pub mod histogram;
pub mod levels;


pub use adjust::{
    BrightnessContrast, ColorBalance, Desaturate, GammaCorrection, HueRange, HueSaturation, Invert,
    Lut, NormalizeContrast, Posterize, StretchContrast, ToneRange,
};
pub use buffer::{BufferError, ImageBuffer};
pub use dither::{Dither, DitherMode};
pub use engine::{PixelOp, Scan};
pub use equalize::Equalize;
pub use geometry::{Scale, ScaleMode};
pub use histogram::{Histogram, HistogramChannel, BINS};
pub use levels::{AdjustLevels, ChannelLevels, Levels, AUTO_LEVELS_CLIP};

//! Color helpers shared by the transforms.
//!
//! - [`Hls`]: integer hue/lightness/saturation on a 0..=255 scale, used by
//!   hue/saturation remapping and luminosity-preserving color balance
//! - [`lightness`]: `(max + min) / 2`, the gray value used by desaturation
//!   and black & white dithering

mod hls;

pub use hls::{lightness, Hls};

/// Sample index of the red channel.
pub const RED: usize = 0;
/// Sample index of the green channel.
pub const GREEN: usize = 1;
/// Sample index of the blue channel.
pub const BLUE: usize = 2;
/// Sample index of the alpha channel, when present.
pub const ALPHA: usize = 3;

/// Clamp an integer intermediate to a sample.
#[inline]
pub fn clamp_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Clamp a floating-point intermediate to a sample, truncating the
/// fractional part.
#[inline]
pub fn clamp_f64_u8(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else {
        value.clamp(0.0, 255.0) as u8
    }
}

/// Copy the alpha sample from `src` to `dest` when the pixel has one.
#[inline]
pub fn copy_alpha(src: &[u8], dest: &mut [u8]) {
    if let (Some(&a), Some(d)) = (src.get(ALPHA), dest.get_mut(ALPHA)) {
        *d = a;
    }
}

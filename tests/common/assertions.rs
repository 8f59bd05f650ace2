//! Assertion helpers for tests.

use pixops::pixop_engine::ImageBuffer;
use pretty_assertions::assert_eq;

/// Assert every pixel has equal red, green and blue samples
pub fn assert_gray(image: &ImageBuffer) {
    for (i, px) in image.iter_pixels().enumerate() {
        assert!(
            px[0] == px[1] && px[1] == px[2],
            "Pixel {i} is not gray: {px:?}"
        );
    }
}

/// Assert every color sample is 0 or 255
pub fn assert_binary(image: &ImageBuffer) {
    for (i, px) in image.iter_pixels().enumerate() {
        assert!(
            px[..3].iter().all(|&v| v == 0 || v == 255),
            "Pixel {i} is not binary: {px:?}"
        );
    }
}

/// Assert width, height and channel count
pub fn assert_layout(image: &ImageBuffer, width: usize, height: usize, channels: usize) {
    assert_eq!(image.layout(), (width, height, channels));
}

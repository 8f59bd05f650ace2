//! Generated input buffers for benchmarking recipes without image files.

use pixop_engine::{BufferError, ImageBuffer};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Horizontal red ramp, vertical green ramp, blue the inverse of their mean.
///
/// Alpha, when present, ramps along the diagonal.
pub fn gradient(width: usize, height: usize, has_alpha: bool) -> Result<ImageBuffer, BufferError> {
    let mut image = ImageBuffer::new(width, height, has_alpha)?;
    let ramp = |i: usize, n: usize| -> u8 {
        if n <= 1 {
            0
        } else {
            (i * 255 / (n - 1)) as u8
        }
    };

    for y in 0..height {
        for x in 0..width {
            let r = ramp(x, width);
            let g = ramp(y, height);
            let b = 255 - ((r as u16 + g as u16) / 2) as u8;
            let px = image.pixel_mut(x, y);
            px[..3].copy_from_slice(&[r, g, b]);
            if has_alpha {
                px[3] = ramp(x + y, width + height - 1);
            }
        }
    }
    Ok(image)
}

/// Uniform random samples from a seeded generator; alpha is left opaque.
pub fn noise(
    width: usize,
    height: usize,
    has_alpha: bool,
    seed: u64,
) -> Result<ImageBuffer, BufferError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut image = ImageBuffer::new(width, height, has_alpha)?;
    for y in 0..height {
        for px in image.row_mut(y).chunks_exact_mut(if has_alpha { 4 } else { 3 }) {
            rng.fill(&mut px[..3]);
            if has_alpha {
                px[3] = 255;
            }
        }
    }
    Ok(image)
}

//! Floyd-Steinberg error diffusion to black & white or a 6-level palette.
//!
//! The quantization error of each pixel is pushed to four neighbors:
//!
//! ```text
//!        X   7
//!    3   5   1
//! ```
//!
//! The kernel is mirrored on rows scanned right to left. Two row buffers
//! hold the accumulated error of the current and the next row; they are
//! swapped and the new next row is cleared whenever a row starts. Error that
//! would land outside the image is dropped.
//!
//! # Example
//!
//! ```
//! use pixop_engine::{engine, Dither, DitherMode, ImageBuffer};
//!
//! let src = ImageBuffer::filled(8, 8, false, &[90, 140, 30]).unwrap();
//! let out = engine::run_to_new(&mut Dither::new(DitherMode::BlackWhite), &src).unwrap();
//!
//! assert!(out.pixels().iter().all(|&v| v == 0 || v == 255));
//! ```

use crate::buffer::ImageBuffer;
use crate::color::{copy_alpha, lightness};
use crate::engine::{PixelOp, Scan};

/// Number of shades per channel in [`DitherMode::WebPalette`].
pub const WEB_SHADES: u32 = 6;

/// Lightness above which black & white dithering emits white.
const BW_THRESHOLD: u8 = 125;

/// Target palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMode {
    /// Desaturate, then quantize each pixel to black or white
    #[default]
    BlackWhite,
    /// Quantize each channel to 6 evenly spaced shades
    WebPalette,
}

/// Nearest of `shades` evenly spaced values for an intensity.
pub fn shade_value(value: i32, shades: u32) -> u8 {
    let shade_size = 256.0 / (shades.max(2) - 1) as f64;
    let v = (value as f64 / shade_size + 0.5).floor() * shade_size;
    v.clamp(0.0, 255.0) as u8
}

/// Accumulated error for the current and the next row.
#[derive(Debug, Clone)]
struct ErrorRows {
    rows: [Vec<[f64; 3]>; 2],
    current: usize,
}

impl ErrorRows {
    fn new(width: usize) -> Self {
        Self {
            rows: [vec![[0.0; 3]; width], vec![[0.0; 3]; width]],
            current: 0,
        }
    }

    /// Make the next row current and clear the new next row.
    fn advance(&mut self) {
        self.current ^= 1;
        self.rows[self.current ^ 1].fill([0.0; 3]);
    }

    #[inline]
    fn current(&self, column: usize) -> [f64; 3] {
        self.rows[self.current][column]
    }

    fn add(&mut self, next_row: bool, column: isize, error: &[f64; 3], weight: f64) {
        let idx = if next_row { self.current ^ 1 } else { self.current };
        let row = &mut self.rows[idx];
        if column < 0 || column as usize >= row.len() {
            return;
        }
        for (acc, e) in row[column as usize].iter_mut().zip(error) {
            *acc += weight * e;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowState {
    /// The next pixel starts a row
    RowTransition,
    Pixel,
}

/// Error diffusion dithering.
#[derive(Debug, Clone)]
pub struct Dither {
    mode: DitherMode,
    serpentine: bool,
    errors: ErrorRows,
    state: RowState,
}

impl Dither {
    pub fn new(mode: DitherMode) -> Self {
        Self {
            mode,
            serpentine: true,
            errors: ErrorRows::new(0),
            state: RowState::RowTransition,
        }
    }

    /// Alternate the scan direction on every row (default: on).
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    #[inline]
    pub fn mode(&self) -> DitherMode {
        self.mode
    }

    fn quantize(&self, v: [i32; 3]) -> [u8; 3] {
        match self.mode {
            DitherMode::BlackWhite => {
                let l = lightness(v[0] as u8, v[1] as u8, v[2] as u8);
                [if l > BW_THRESHOLD { 255 } else { 0 }; 3]
            }
            DitherMode::WebPalette => v.map(|c| shade_value(c, WEB_SHADES)),
        }
    }
}

impl PixelOp for Dither {
    fn init(&mut self, src: &ImageBuffer, _scan: &mut Scan) {
        self.errors = ErrorRows::new(src.width());
        self.state = RowState::RowTransition;
    }

    fn step(&mut self, scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        if self.state == RowState::RowTransition {
            self.errors.advance();
            self.state = RowState::Pixel;
        }

        let samples = match self.mode {
            DitherMode::BlackWhite => [lightness(src[0], src[1], src[2]); 3],
            DitherMode::WebPalette => [src[0], src[1], src[2]],
        };

        let column = scan.column;
        let acc = self.errors.current(column);
        let mut v = [0i32; 3];
        for c in 0..3 {
            v[c] = (samples[c] as f64 + acc[c]).clamp(0.0, 255.0) as i32;
        }

        let out = self.quantize(v);
        dest[..3].copy_from_slice(&out);
        copy_alpha(src, dest);

        let error = [0, 1, 2].map(|c| (v[c] - out[c] as i32) as f64);
        let dir: isize = if scan.ltr { 1 } else { -1 };
        let col = column as isize;

        self.errors.add(false, col + dir, &error, 7.0 / 16.0);
        if !scan.is_last_line() {
            self.errors.add(true, col - dir, &error, 3.0 / 16.0);
            self.errors.add(true, col, &error, 5.0 / 16.0);
            self.errors.add(true, col + dir, &error, 1.0 / 16.0);
        }

        if scan.is_row_end() {
            self.state = RowState::RowTransition;
            if self.serpentine {
                scan.ltr = !scan.ltr;
            }
        }
    }

    fn finalize(&mut self, _scan: &Scan) {
        self.errors = ErrorRows::new(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run_to_new;

    fn gradient(width: usize, height: usize, alpha: bool) -> ImageBuffer {
        let mut image = ImageBuffer::new(width, height, alpha).unwrap();
        for y in 0..height {
            for x in 0..width {
                let px = image.pixel_mut(x, y);
                px[0] = (x * 255 / width.max(1)) as u8;
                px[1] = (y * 255 / height.max(1)) as u8;
                px[2] = ((x + y) * 7 % 256) as u8;
                if alpha {
                    px[3] = (x * 3 + y) as u8;
                }
            }
        }
        image
    }

    #[test]
    fn test_shade_levels() {
        let mut levels: Vec<u8> = (0..=255).map(|v| shade_value(v, WEB_SHADES)).collect();
        levels.dedup();
        assert_eq!(levels, vec![0, 51, 102, 153, 204, 255]);
    }

    #[test]
    fn test_error_carried_to_next_pixel() {
        let src = ImageBuffer::filled(2, 1, false, &[100, 100, 100]).unwrap();
        let out = run_to_new(&mut Dither::new(DitherMode::BlackWhite), &src).unwrap();
        // 100 -> black; 7/16 of the error lifts the neighbour to 143 -> white
        assert_eq!(out.pixel(0, 0), &[0, 0, 0]);
        assert_eq!(out.pixel(1, 0), &[255, 255, 255]);
    }

    #[test]
    fn test_black_white_is_binary() {
        let src = gradient(17, 9, true);
        for serpentine in [true, false] {
            let mut op = Dither::new(DitherMode::BlackWhite).serpentine(serpentine);
            let out = run_to_new(&mut op, &src).unwrap();
            for (o, s) in out.iter_pixels().zip(src.iter_pixels()) {
                assert!(o[0] == 0 || o[0] == 255);
                assert_eq!(o[0], o[1]);
                assert_eq!(o[1], o[2]);
                assert_eq!(o[3], s[3], "alpha copied");
            }
        }
    }

    #[test]
    fn test_web_palette_values() {
        let src = gradient(23, 11, false);
        let out = run_to_new(&mut Dither::new(DitherMode::WebPalette), &src).unwrap();
        let allowed = [0u8, 51, 102, 153, 204, 255];
        assert!(out.pixels().iter().all(|v| allowed.contains(v)));
    }

    #[test]
    fn test_mid_gray_mixes_black_and_white() {
        let src = ImageBuffer::filled(16, 16, false, &[128, 128, 128]).unwrap();
        let out = run_to_new(&mut Dither::new(DitherMode::BlackWhite), &src).unwrap();
        let white = out.iter_pixels().filter(|p| p[0] == 255).count() as f64;
        let ratio = white / 256.0;
        assert!((ratio - 0.5).abs() < 0.1, "white ratio {}", ratio);
    }

    #[test]
    fn test_degenerate_shapes() {
        for (w, h) in [(1, 1), (1, 7), (9, 1), (0, 0)] {
            let src = gradient(w, h, false);
            let out = run_to_new(&mut Dither::new(DitherMode::WebPalette), &src).unwrap();
            assert_eq!(out.layout(), src.layout());
        }
    }

    #[test]
    fn test_op_reusable_across_runs() {
        let src = gradient(6, 4, false);
        let mut op = Dither::new(DitherMode::BlackWhite);
        let first = run_to_new(&mut op, &src).unwrap();
        let second = run_to_new(&mut op, &src).unwrap();
        assert_eq!(first, second);
    }
}

//! In-memory raster image with 8-bit samples.

use super::error::BufferError;

/// Number of color channels (alpha excluded). Alpha, when present, is
/// always the channel at this index.
pub const COLOR_CHANNELS: usize = 3;

/// A raster image: width, height, optional alpha, row stride and owned
/// row-major pixel storage.
///
/// Samples are 8-bit, channel order is R, G, B and then A when
/// [`has_alpha()`](Self::has_alpha) is set. Rows may carry trailing padding:
/// [`rowstride()`](Self::rowstride) is always `>= width * n_channels`.
///
/// # Example
///
/// ```
/// use pixop_engine::ImageBuffer;
///
/// let mut image = ImageBuffer::new(2, 1, false).unwrap();
/// image.pixel_mut(1, 0).copy_from_slice(&[10, 20, 30]);
///
/// assert_eq!(image.n_channels(), 3);
/// assert_eq!(image.pixel(1, 0), &[10, 20, 30]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    has_alpha: bool,
    rowstride: usize,
    pixels: Vec<u8>,
}

#[inline]
fn channels_for(has_alpha: bool) -> usize {
    if has_alpha {
        COLOR_CHANNELS + 1
    } else {
        COLOR_CHANNELS
    }
}

/// Fallible zeroed allocation; running out of memory is reported instead
/// of aborting the process.
fn allocate(len: usize) -> Result<Vec<u8>, BufferError> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|_| BufferError::AllocationFailed { bytes: len })?;
    pixels.resize(len, 0);
    Ok(pixels)
}

fn min_rowstride(width: usize, height: usize, has_alpha: bool) -> Result<usize, BufferError> {
    width
        .checked_mul(channels_for(has_alpha))
        .ok_or(BufferError::DimensionsOverflow { width, height })
}

fn storage_len(
    width: usize,
    height: usize,
    has_alpha: bool,
    rowstride: usize,
) -> Result<usize, BufferError> {
    let min = min_rowstride(width, height, has_alpha)?;
    if rowstride < min {
        return Err(BufferError::InvalidRowstride { rowstride, min });
    }
    rowstride
        .checked_mul(height)
        .ok_or(BufferError::DimensionsOverflow { width, height })
}

impl ImageBuffer {
    /// Allocate a zeroed buffer with a tightly packed row stride.
    pub fn new(width: usize, height: usize, has_alpha: bool) -> Result<Self, BufferError> {
        let rowstride = min_rowstride(width, height, has_alpha)?;
        Self::with_rowstride(width, height, has_alpha, rowstride)
    }

    /// Allocate a zeroed buffer with an explicit row stride.
    pub fn with_rowstride(
        width: usize,
        height: usize,
        has_alpha: bool,
        rowstride: usize,
    ) -> Result<Self, BufferError> {
        let len = storage_len(width, height, has_alpha, rowstride)?;
        Ok(Self {
            width,
            height,
            has_alpha,
            rowstride,
            pixels: allocate(len)?,
        })
    }

    /// Wrap existing pixel storage, as produced by a decoder.
    ///
    /// `pixels` must hold at least `rowstride * height` bytes.
    pub fn from_raw(
        width: usize,
        height: usize,
        has_alpha: bool,
        rowstride: usize,
        pixels: Vec<u8>,
    ) -> Result<Self, BufferError> {
        let expected = storage_len(width, height, has_alpha, rowstride)?;
        if pixels.len() < expected {
            return Err(BufferError::DataTooShort {
                len: pixels.len(),
                expected,
            });
        }
        Ok(Self {
            width,
            height,
            has_alpha,
            rowstride,
            pixels,
        })
    }

    /// Allocate a buffer where every pixel equals `pixel`.
    ///
    /// `pixel` must have exactly `n_channels` samples; extra samples are
    /// ignored and missing ones stay zero.
    pub fn filled(
        width: usize,
        height: usize,
        has_alpha: bool,
        pixel: &[u8],
    ) -> Result<Self, BufferError> {
        let mut image = Self::new(width, height, has_alpha)?;
        let n = image.n_channels().min(pixel.len());
        for y in 0..height {
            for px in image.row_mut(y).chunks_exact_mut(channels_for(has_alpha)) {
                px[..n].copy_from_slice(&pixel[..n]);
            }
        }
        Ok(image)
    }

    /// Allocate a zeroed buffer with the same width, height, alpha flag and
    /// row stride as `self`.
    pub fn empty_like(&self) -> Result<Self, BufferError> {
        Self::with_rowstride(self.width, self.height, self.has_alpha, self.rowstride)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Channels per pixel: 3 without alpha, 4 with alpha.
    #[inline]
    pub fn n_channels(&self) -> usize {
        channels_for(self.has_alpha)
    }

    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Bytes between the starts of two consecutive rows.
    #[inline]
    pub fn rowstride(&self) -> usize {
        self.rowstride
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `(width, height, n_channels)`, used for layout comparisons.
    #[inline]
    pub fn layout(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.n_channels())
    }

    /// Fail with [`BufferError::LayoutMismatch`] unless `other` has the same
    /// width, height and channel count.
    pub fn check_layout(&self, other: &ImageBuffer) -> Result<(), BufferError> {
        if self.layout() == other.layout() {
            Ok(())
        } else {
            Err(BufferError::LayoutMismatch {
                source: self.layout(),
                destination: other.layout(),
            })
        }
    }

    /// Raw storage including row padding.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw storage including row padding.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the buffer and return its raw storage.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Samples of row `y`, padding excluded.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.rowstride;
        &self.pixels[start..start + self.width * self.n_channels()]
    }

    /// Mutable samples of row `y`, padding excluded.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.rowstride;
        let len = self.width * self.n_channels();
        &mut self.pixels[start..start + len]
    }

    /// Samples of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let n = self.n_channels();
        &self.row(y)[x * n..x * n + n]
    }

    /// Mutable samples of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let n = self.n_channels();
        &mut self.row_mut(y)[x * n..x * n + n]
    }

    /// Iterate all pixels in raster order.
    pub fn iter_pixels(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let n = self.n_channels();
        (0..self.height).flat_map(move |y| self.row(y).chunks_exact(n))
    }
}

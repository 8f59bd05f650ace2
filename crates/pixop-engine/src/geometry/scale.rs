//! Bilinear rescaling.

use image::imageops::{self, FilterType};

use crate::buffer::{BufferError, ImageBuffer};
use crate::engine::{PixelOp, Scan};

/// How the target size is derived from the source size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleMode {
    /// Scale each axis by a percentage; the result is truncated.
    Percentage { width: f64, height: f64 },
    /// Fit inside a box, keeping the aspect ratio.
    KeepRatio {
        max_width: usize,
        max_height: usize,
        allow_upscaling: bool,
    },
    /// Scale to an explicit size.
    Exact { width: usize, height: usize },
}

/// Target size for a `width` x `height` source.
pub fn target_size(mode: ScaleMode, width: usize, height: usize) -> (usize, usize) {
    match mode {
        ScaleMode::Percentage { width: pw, height: ph } => (
            (width as f64 * (pw / 100.0)) as usize,
            (height as f64 * (ph / 100.0)) as usize,
        ),
        ScaleMode::KeepRatio {
            max_width,
            max_height,
            allow_upscaling,
        } => {
            if width == 0 || height == 0 {
                return (width, height);
            }
            if !allow_upscaling && width <= max_width && height <= max_height {
                return (width, height);
            }
            let factor = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
            let fit = |len: usize| ((len as f64 * factor + 0.5).floor() as usize).max(1);
            (fit(width), fit(height))
        }
        ScaleMode::Exact { width, height } => (width, height),
    }
}

/// Dimensions as the `u32` pair the `image` crate works with.
fn dims_u32(width: usize, height: usize) -> Result<(u32, u32), BufferError> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(BufferError::DimensionsOverflow { width, height }),
    }
}

/// Rows of `src` with the stride padding removed.
fn packed_rows(src: &ImageBuffer) -> Result<Vec<u8>, BufferError> {
    let row_len = src.width() * src.n_channels();
    let len = row_len * src.height();
    let mut packed = Vec::new();
    packed
        .try_reserve_exact(len)
        .map_err(|_| BufferError::AllocationFailed { bytes: len })?;
    for y in 0..src.height() {
        packed.extend_from_slice(src.row(y));
    }
    Ok(packed)
}

/// Resample `src` to `width` x `height` with a triangle (bilinear) filter.
///
/// Every channel, alpha included, is filtered independently. Sample
/// positions use pixel-center mapping. When shrinking, the filter widens to
/// cover every source pixel. An empty source yields a zeroed destination.
pub fn resample_bilinear(
    src: &ImageBuffer,
    width: usize,
    height: usize,
) -> Result<ImageBuffer, BufferError> {
    if src.is_empty() || width == 0 || height == 0 {
        return ImageBuffer::new(width, height, src.has_alpha());
    }

    let (src_w, src_h) = dims_u32(src.width(), src.height())?;
    let (dst_w, dst_h) = dims_u32(width, height)?;
    let packed = packed_rows(src)?;
    let len = packed.len();
    let too_short = BufferError::DataTooShort {
        len,
        expected: src.width() * src.height() * src.n_channels(),
    };

    let pixels = if src.has_alpha() {
        let image = image::RgbaImage::from_raw(src_w, src_h, packed).ok_or(too_short)?;
        imageops::resize(&image, dst_w, dst_h, FilterType::Triangle).into_raw()
    } else {
        let image = image::RgbImage::from_raw(src_w, src_h, packed).ok_or(too_short)?;
        imageops::resize(&image, dst_w, dst_h, FilterType::Triangle).into_raw()
    };

    ImageBuffer::from_raw(
        width,
        height,
        src.has_alpha(),
        width * src.n_channels(),
        pixels,
    )
}

/// Rescale the image.
///
/// When either target dimension is 1 or less the destination is left as it
/// was handed to the engine.
///
/// # Example
///
/// ```
/// use pixop_engine::{engine, ImageBuffer, Scale, ScaleMode};
///
/// let src = ImageBuffer::new(40, 20, false).unwrap();
/// let mut op = Scale::new(ScaleMode::KeepRatio {
///     max_width: 10,
///     max_height: 10,
///     allow_upscaling: false,
/// });
/// let out = engine::run_to_new(&mut op, &src).unwrap();
///
/// assert_eq!((out.width(), out.height()), (10, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    mode: ScaleMode,
}

impl Scale {
    pub fn new(mode: ScaleMode) -> Self {
        Self { mode }
    }

    #[inline]
    pub fn mode(&self) -> ScaleMode {
        self.mode
    }
}

impl PixelOp for Scale {
    fn step_image(
        &mut self,
        _scan: &Scan,
        src: &ImageBuffer,
    ) -> Result<Option<ImageBuffer>, BufferError> {
        let (width, height) = target_size(self.mode, src.width(), src.height());
        if width <= 1 || height <= 1 {
            tracing::debug!(width, height, "scale target too small, skipped");
            return Ok(None);
        }
        tracing::debug!(
            from_width = src.width(),
            from_height = src.height(),
            width,
            height,
            "scaling"
        );
        resample_bilinear(src, width, height).map(Some)
    }

    fn single_step(&self) -> bool {
        true
    }
}

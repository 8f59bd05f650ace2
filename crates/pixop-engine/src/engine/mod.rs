//! The scanning engine.
//!
//! One engine, many transforms: every transform implements [`PixelOp`] and
//! the engine drives it over an [`ImageBuffer`] in three phases:
//!
//! 1. [`PixelOp::init`] once, with read access to the whole source
//! 2. [`PixelOp::step`] once per pixel in raster order (or
//!    [`PixelOp::step_image`] once for single-step operations)
//! 3. [`PixelOp::finalize`] once after the last step
//!
//! Rows are visited top to bottom. Within a row, columns run left to right
//! unless the operation cleared [`Scan::ltr`] before the row started, in
//! which case they run right to left. Serpentine dithering relies on this.
//!
//! # Example
//!
//! ```
//! use pixop_engine::{engine, ImageBuffer, Invert};
//!
//! let mut image = ImageBuffer::filled(2, 2, false, &[10, 20, 30]).unwrap();
//! engine::run_in_place(&mut Invert, &mut image).unwrap();
//!
//! assert_eq!(image.pixel(0, 0), &[245, 235, 225]);
//! ```

mod scan;

pub use scan::Scan;

use crate::buffer::{BufferError, ImageBuffer};

/// A transform driven by the scanning engine.
///
/// Only [`step`](Self::step) is required. Operations that need lookup tables
/// or statistics build them in [`init`](Self::init); operations that hold
/// per-run working memory drop it in [`finalize`](Self::finalize).
///
/// `step` receives the source samples and the destination samples of the
/// same pixel. Both slices are `scan.bytes_per_pixel` long. Color-only
/// transforms must copy the alpha sample (index 3) through unchanged.
pub trait PixelOp {
    /// Called once before the first step.
    fn init(&mut self, _src: &ImageBuffer, _scan: &mut Scan) {}

    /// Called once per pixel for per-pixel operations.
    fn step(&mut self, _scan: &mut Scan, _src: &[u8], _dest: &mut [u8]) {}

    /// Called once for single-step operations.
    ///
    /// Returning `Some` replaces the destination (geometry-changing
    /// operations); `None` leaves the destination untouched.
    fn step_image(
        &mut self,
        _scan: &Scan,
        _src: &ImageBuffer,
    ) -> Result<Option<ImageBuffer>, BufferError> {
        Ok(None)
    }

    /// Called once after the last step.
    fn finalize(&mut self, _scan: &Scan) {}

    /// Whether the operation runs once over the whole buffer instead of
    /// once per pixel.
    fn single_step(&self) -> bool {
        false
    }
}

impl<T: PixelOp + ?Sized> PixelOp for &mut T {
    fn init(&mut self, src: &ImageBuffer, scan: &mut Scan) {
        (**self).init(src, scan)
    }

    fn step(&mut self, scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        (**self).step(scan, src, dest)
    }

    fn step_image(
        &mut self,
        scan: &Scan,
        src: &ImageBuffer,
    ) -> Result<Option<ImageBuffer>, BufferError> {
        (**self).step_image(scan, src)
    }

    fn finalize(&mut self, scan: &Scan) {
        (**self).finalize(scan)
    }

    fn single_step(&self) -> bool {
        (**self).single_step()
    }
}

impl<T: PixelOp + ?Sized> PixelOp for Box<T> {
    fn init(&mut self, src: &ImageBuffer, scan: &mut Scan) {
        (**self).init(src, scan)
    }

    fn step(&mut self, scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        (**self).step(scan, src, dest)
    }

    fn step_image(
        &mut self,
        scan: &Scan,
        src: &ImageBuffer,
    ) -> Result<Option<ImageBuffer>, BufferError> {
        (**self).step_image(scan, src)
    }

    fn finalize(&mut self, scan: &Scan) {
        (**self).finalize(scan)
    }

    fn single_step(&self) -> bool {
        (**self).single_step()
    }
}

/// Column of the `step`-th pixel visited in a row of `width` pixels.
#[inline]
fn column_at(step: usize, width: usize, ltr: bool) -> usize {
    if ltr {
        step
    } else {
        width - 1 - step
    }
}

/// Run `op` reading `src` and writing `dest`.
///
/// For per-pixel operations `dest` must have the same width, height and
/// channel count as `src` (row strides may differ). Single-step operations
/// may replace `dest` with a buffer of different geometry.
pub fn run<O: PixelOp + ?Sized>(
    op: &mut O,
    src: &ImageBuffer,
    dest: &mut ImageBuffer,
) -> Result<(), BufferError> {
    let mut scan = Scan::new(src);

    if op.single_step() {
        op.init(src, &mut scan);
        let replaced = op.step_image(&scan, src);
        op.finalize(&scan);
        if let Some(image) = replaced? {
            *dest = image;
        }
        return Ok(());
    }

    src.check_layout(dest)?;
    op.init(src, &mut scan);

    let bpp = scan.bytes_per_pixel;
    for y in 0..scan.height {
        scan.begin_row(y);
        let src_row = src.row(y);
        let dest_row = dest.row_mut(y);
        let ltr = scan.ltr;
        for step in 0..scan.width {
            let x = column_at(step, scan.width, ltr);
            scan.column = x;
            let ofs = x * bpp;
            op.step(&mut scan, &src_row[ofs..ofs + bpp], &mut dest_row[ofs..ofs + bpp]);
            scan.line_step += 1;
        }
    }

    op.finalize(&scan);
    Ok(())
}

/// Run `op` with the same buffer as source and destination.
///
/// Each pixel is copied before `step` sees it, so `src` always holds the
/// pre-step value even though `dest` aliases the same storage.
pub fn run_in_place<O: PixelOp + ?Sized>(
    op: &mut O,
    image: &mut ImageBuffer,
) -> Result<(), BufferError> {
    let mut scan = Scan::new(image);

    if op.single_step() {
        op.init(image, &mut scan);
        let replaced = op.step_image(&scan, image);
        op.finalize(&scan);
        if let Some(new_image) = replaced? {
            *image = new_image;
        }
        return Ok(());
    }

    op.init(image, &mut scan);

    let bpp = scan.bytes_per_pixel;
    let mut original = [0u8; 4];
    for y in 0..scan.height {
        scan.begin_row(y);
        let row = image.row_mut(y);
        let ltr = scan.ltr;
        for step in 0..scan.width {
            let x = column_at(step, scan.width, ltr);
            scan.column = x;
            let ofs = x * bpp;
            original[..bpp].copy_from_slice(&row[ofs..ofs + bpp]);
            op.step(&mut scan, &original[..bpp], &mut row[ofs..ofs + bpp]);
            scan.line_step += 1;
        }
    }

    op.finalize(&scan);
    Ok(())
}

/// Run `op` into a freshly allocated destination with the layout of `src`.
pub fn run_to_new<O: PixelOp + ?Sized>(
    op: &mut O,
    src: &ImageBuffer,
) -> Result<ImageBuffer, BufferError> {
    let mut dest = if op.single_step() {
        src.clone()
    } else {
        src.empty_like()?
    };
    run(op, src, &mut dest)?;
    Ok(dest)
}

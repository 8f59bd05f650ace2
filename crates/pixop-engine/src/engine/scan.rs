//! Per-run scan state shared between the engine and the running operation.

use crate::buffer::ImageBuffer;

/// Scan position and source description for one engine run.
///
/// The engine owns the position fields (`line`, `column`, `line_step`); the
/// operation may flip `ltr` to change the direction of the next row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    /// Source width in pixels
    pub width: usize,
    /// Source height in pixels
    pub height: usize,
    /// Whether the source carries an alpha channel
    pub has_alpha: bool,
    /// Samples per pixel (3 or 4)
    pub bytes_per_pixel: usize,
    /// Current row
    pub line: usize,
    /// Current column
    pub column: usize,
    /// Pixels already processed in the current row
    pub line_step: usize,
    /// Left-to-right scan direction, read at the start of each row
    pub ltr: bool,
}

impl Scan {
    /// Initial state for a scan over `src`.
    pub fn new(src: &ImageBuffer) -> Self {
        Self {
            width: src.width(),
            height: src.height(),
            has_alpha: src.has_alpha(),
            bytes_per_pixel: src.n_channels(),
            line: 0,
            column: 0,
            line_step: 0,
            ltr: true,
        }
    }

    /// Whether the current row is the last one.
    #[inline]
    pub fn is_last_line(&self) -> bool {
        self.line + 1 >= self.height
    }

    /// Whether the current pixel is the last one visited in its row.
    #[inline]
    pub fn is_row_end(&self) -> bool {
        self.line_step + 1 == self.width
    }

    pub(crate) fn begin_row(&mut self, y: usize) {
        self.line = y;
        self.line_step = 0;
        self.column = if self.ltr { 0 } else { self.width.saturating_sub(1) };
    }
}

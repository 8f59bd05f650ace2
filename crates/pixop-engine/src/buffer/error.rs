//! Error types for buffer construction and layout checks.

use std::fmt;

/// Error type for image buffer operations.
///
/// Transforms themselves never fail; these errors only describe buffers
/// that cannot be built or source/destination pairs that cannot be scanned
/// together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Row stride is smaller than `width * channels`
    InvalidRowstride {
        /// Requested row stride in bytes
        rowstride: usize,
        /// Minimum stride for the requested width
        min: usize,
    },
    /// Pixel storage is shorter than the layout requires
    DataTooShort {
        /// Bytes supplied
        len: usize,
        /// Bytes required
        expected: usize,
    },
    /// Source and destination differ in width, height or alpha
    LayoutMismatch {
        /// Source layout as (width, height, channels)
        source: (usize, usize, usize),
        /// Destination layout as (width, height, channels)
        destination: (usize, usize, usize),
    },
    /// The pixel storage could not be allocated
    AllocationFailed {
        /// Requested size in bytes
        bytes: usize,
    },
    /// `width * height * channels` does not fit in `usize`
    DimensionsOverflow {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::InvalidRowstride { rowstride, min } => {
                write!(f, "row stride {} is smaller than the minimum {}", rowstride, min)
            }
            BufferError::DataTooShort { len, expected } => {
                write!(f, "pixel data has {} bytes, layout requires {}", len, expected)
            }
            BufferError::LayoutMismatch {
                source,
                destination,
            } => write!(
                f,
                "layout mismatch: source is {}x{}x{}, destination is {}x{}x{}",
                source.0, source.1, source.2, destination.0, destination.1, destination.2
            ),
            BufferError::AllocationFailed { bytes } => {
                write!(f, "failed to allocate {} bytes of pixel storage", bytes)
            }
            BufferError::DimensionsOverflow { width, height } => {
                write!(f, "image dimensions {}x{} overflow", width, height)
            }
        }
    }
}

impl std::error::Error for BufferError {}

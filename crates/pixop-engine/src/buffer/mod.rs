//! Raster image buffers.
//!
//! [`ImageBuffer`] is the data container every transform reads from and
//! writes to: 8-bit samples, 3 color channels plus an optional trailing
//! alpha channel, row-major with an explicit row stride.

mod error;
mod image_buffer;

pub use error::BufferError;
pub use image_buffer::ImageBuffer;

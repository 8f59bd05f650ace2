//! Geometry-changing operations.
//!
//! These run as single-step operations: the engine hands them the whole
//! source once and they return a freshly allocated destination.

mod scale;

pub use scale::{resample_bilinear, target_size, Scale, ScaleMode};

//! Color inversion.

use crate::color::copy_alpha;
use crate::engine::{PixelOp, Scan};

/// Replace every color sample `v` with `255 - v`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Invert;

impl PixelOp for Invert {
    fn step(&mut self, _scan: &mut Scan, src: &[u8], dest: &mut [u8]) {
        for c in 0..3 {
            dest[c] = 255 - src[c];
        }
        copy_alpha(src, dest);
    }
}

//! Test fixtures: recipe files on disk and small input buffers.

use pixops::pixop_engine::ImageBuffer;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Recipe YAML documents used across tests
pub mod recipes {
    pub const GRAYSCALE: &str = r#"
name: grayscale
steps:
  - op: desaturate
"#;

    pub const POSTER: &str = r#"
name: poster
steps:
  - op: auto_levels
  - op: hue_saturation
    saturation: 40
  - op: posterize
    levels: 2
"#;

    pub const THUMBNAIL: &str = r#"
name: thumbnail
steps:
  - op: scale
    mode: keep_ratio
    width: 32
    height: 32
  - op: dither
"#;

    pub const INVERT: &str = r#"
steps:
  - op: invert
"#;

    pub const BAD_GAMMA: &str = r#"
name: broken
steps:
  - op: invert
  - op: gamma
    gamma: .inf
"#;
}

/// A recipe written to a temporary file, removed on drop.
pub struct RecipeFile {
    file: NamedTempFile,
}

impl RecipeFile {
    pub fn new(yaml: &str) -> Self {
        let mut file = NamedTempFile::new().expect("create temp recipe");
        file.write_all(yaml.as_bytes()).expect("write temp recipe");
        file.flush().expect("flush temp recipe");
        Self { file }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Opaque RGBA buffer where every pixel is `rgb` with alpha 255.
pub fn solid(width: usize, height: usize, rgb: [u8; 3]) -> ImageBuffer {
    ImageBuffer::filled(width, height, true, &[rgb[0], rgb[1], rgb[2], 255]).unwrap()
}

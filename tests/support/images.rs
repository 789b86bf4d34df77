use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};

/// Write a solid-color PNG, creating parent folders as needed.
pub fn write_test_png(path: &Path, size: u32, color: [u8; 4]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create png parent dirs");
    }
    RgbaImage::from_pixel(size, size, Rgba(color))
        .save_with_format(path, ImageFormat::Png)
        .expect("write png");
}

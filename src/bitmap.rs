//! Loading pre-rendered bitmaps from the resource directory.

use std::path::Path;

use image::GrayImage;

use crate::canvas::Canvas;

/// Luma below this is ink
pub const THRESHOLD: u8 = 128;

/// Decode an image file (BMP or PNG) into a canvas of the same size
pub fn load(path: &Path) -> Result<Canvas, image::ImageError> {
    log::debug!("Reading bitmap {}", path.display());
    let image = image::open(path)?;
    log::debug!("{}: {}x{}", path.display(), image.width(), image.height());
    Ok(from_luma(&image.to_luma8()))
}

/// Threshold a grayscale image into a canvas
pub fn from_luma(gray: &GrayImage) -> Canvas {
    let mut canvas = Canvas::new(gray.width(), gray.height());
    for (x, y, pixel) in gray.enumerate_pixels() {
        if pixel[0] < THRESHOLD {
            canvas.set_ink(x, y, true);
        }
    }
    canvas
}

//! The seam between the session and a concrete e-paper controller.
//!
//! A driver knows the panel's native (portrait) geometry and exposes the
//! handful of one-shot operations a routine needs. Plane buffers follow the
//! Waveshare convention: row-major, MSB first, `ceil(width / 8)` bytes per row,
//! a set bit means no ink.

pub use display_interface::DisplayError;

use crate::canvas::Canvas;

/// Lifecycle operations of a black/red e-paper panel
pub trait EpaperDriver {
    /// Native width in pixels (the short side)
    fn width(&self) -> u32;

    /// Native height in pixels (the long side)
    fn height(&self) -> u32;

    /// Power up the panel and run the controller's initialization sequence
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Blank both planes and refresh
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Transfer both planes and refresh. Both slices must be [`EpaperDriver::buffer_len`] long.
    fn display(&mut self, black: &[u8], red: &[u8]) -> Result<(), DisplayError>;

    /// Power the panel down into deep sleep
    fn sleep(&mut self) -> Result<(), DisplayError>;

    /// Release the control lines and panel power
    fn module_exit(&mut self) -> Result<(), DisplayError>;

    /// Bytes in one plane buffer
    fn buffer_len(&self) -> usize {
        epd_waveshare::buffer_len(self.width() as usize, self.height() as usize)
    }

    /// Encode a canvas as a plane buffer
    fn get_buffer(&self, canvas: &Canvas) -> Result<Vec<u8>, DisplayError> {
        pack_plane(canvas, self.width(), self.height())
    }
}

/// Pack a canvas into a plane buffer for a `width` x `height` panel.
///
/// A canvas with the native geometry is packed as is. A landscape canvas
/// (`height` x `width`) is rotated so that canvas pixel `(x, y)` lands on native
/// pixel `(y, height - 1 - x)`. Any other size is rejected.
pub fn pack_plane(canvas: &Canvas, width: u32, height: u32) -> Result<Vec<u8>, DisplayError> {
    let line_bytes = width.div_ceil(8) as usize;
    let mut buffer = vec![0xFF; epd_waveshare::buffer_len(width as usize, height as usize)];

    let mut clear_bit = |x: u32, y: u32| {
        let index = y as usize * line_bytes + (x / 8) as usize;
        buffer[index] &= !(0x80 >> (x % 8));
    };

    match (canvas.width(), canvas.height()) {
        (w, h) if (w, h) == (width, height) => {
            for (x, y) in canvas.ink_points() {
                clear_bit(x, y);
            }
        }
        (w, h) if (w, h) == (height, width) => {
            log::debug!("Horizontal canvas, rotating into panel orientation");
            for (x, y) in canvas.ink_points() {
                clear_bit(y, height - x - 1);
            }
        }
        (w, h) => {
            log::warn!(
                "Wrong image dimensions {}x{}: must be {}x{} or {}x{}",
                w,
                h,
                width,
                height,
                height,
                width
            );
            return Err(DisplayError::OutOfBoundsError);
        }
    }

    Ok(buffer)
}

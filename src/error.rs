use core::convert::Infallible;

use display_interface::DisplayError;
use embedded_graphics::geometry::Size;
use thiserror::Error;

/// Everything that can end a routine early
#[derive(Debug, Error)]
pub enum SessionError {
    /// SPI or GPIO failure inside the display driver
    #[error("display I/O failed: {0:?}")]
    Display(DisplayError),

    /// Ctrl+C arrived while a routine was running
    #[error("interrupted")]
    Interrupted,

    /// A bitmap in the resource directory could not be read or decoded
    #[error("bitmap: {0}")]
    Image(#[from] image::ImageError),

    /// A canvas does not match the panel in either orientation
    #[error("canvas is {}x{}, panel needs {}x{} or {}x{}",
        .actual.width, .actual.height,
        .expected.width, .expected.height,
        .expected.height, .expected.width)]
    CanvasSize {
        /// Native panel geometry
        expected: Size,
        /// The offending canvas
        actual: Size,
    },
}

impl From<DisplayError> for SessionError {
    fn from(e: DisplayError) -> Self {
        SessionError::Display(e)
    }
}

impl From<Infallible> for SessionError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

//! Waveshare 2.13" B/C ePaper Display Driver
//!
//! Used in the [Waveshare 2.13inch e-Paper HAT (B)](https://www.waveshare.com/wiki/2.13inch_e-Paper_HAT_(B))
//! and the yellow (C) variant, 104 x 212 pixels with a black and a red/yellow plane.
//!
//! This driver is losely modeled after the
//! [epd-waveshare](https://github.com/caemor/epd-waveshare) drivers but built for my needs.
//!
//! ### Usage
//! This driver does not hide that you're working with two planes. To
//! display something you:
//!
//! 1. first draw onto two [`crate::canvas::Canvas`] values, preferably
//! with [`embedded_graphics`](https://github.com/jamwaffles/embedded-graphics).
//! 1. then pack them with [`crate::driver::EpaperDriver::get_buffer`]
//! 1. then send both planes with [`crate::driver::EpaperDriver::display`]
//!
#![allow(clippy::cast_possible_truncation)]

pub mod driver;
pub mod interface;
pub mod pins;

mod cmd;
mod flag;

pub use driver::Epd2in13bc;
pub use pins::Pins;

/// Display width, pixels horizontally in the panel's native orientation
pub const WIDTH: u32 = epd_waveshare::epd2in13bc::WIDTH;

/// Display height, pixels vertically in the panel's native orientation
pub const HEIGHT: u32 = epd_waveshare::epd2in13bc::HEIGHT;

//! One-bit canvases, one per ink plane.
//!
//! A canvas is an `embedded-graphics` draw target over [`BinaryColor`]:
//! `On` is ink (the plane's color), `Off` is paper. Pixels are stored packed,
//! MSB first, with a set bit meaning paper, so a fresh canvas is all `0xFF`.

use core::convert::Infallible;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::Rectangle};

/// Pixel value reported for paper
pub const PAPER: u8 = 255;
/// Pixel value reported for ink
pub const INK: u8 = 0;

/// In-memory 1-bit bitmap
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    line_bytes: usize,
    bits: Vec<u8>,
}

impl core::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// New canvas filled with paper
    pub fn new(width: u32, height: u32) -> Self {
        let line_bytes = width.div_ceil(8) as usize;
        Self {
            width,
            height,
            line_bytes,
            bits: vec![0xFF; line_bytes * height as usize],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.line_bytes + (x / 8) as usize, 0x80 >> (x % 8)))
    }

    /// `true` if the pixel carries ink. Out of range pixels are paper.
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.locate(x, y)
            .is_some_and(|(index, mask)| self.bits[index] & mask == 0)
    }

    /// Pixel value as [`INK`] or [`PAPER`], `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        self.locate(x, y)
            .map(|(index, mask)| if self.bits[index] & mask == 0 { INK } else { PAPER })
    }

    /// Set or clear ink at a pixel, ignoring coordinates outside the canvas
    pub fn set_ink(&mut self, x: u32, y: u32, ink: bool) {
        if let Some((index, mask)) = self.locate(x, y) {
            if ink {
                self.bits[index] &= !mask;
            } else {
                self.bits[index] |= mask;
            }
        }
    }

    /// Coordinates of every inked pixel, row by row
    pub fn ink_points(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| self.is_ink(x, y).then_some((x, y)))
        })
    }

    /// Copy `source` onto this canvas with its top-left corner at `offset`.
    ///
    /// Every source pixel overwrites the destination, paper included; pixels
    /// that land outside this canvas are dropped.
    pub fn paste(&mut self, source: &Canvas, offset: Point) {
        for y in 0..source.height {
            for x in 0..source.width {
                let target = offset + Point::new(x as i32, y as i32);
                if let (Ok(tx), Ok(ty)) = (u32::try_from(target.x), u32::try_from(target.y)) {
                    self.set_ink(tx, ty, source.is_ink(x, y));
                }
            }
        }
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.set_ink(x, y, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0x00 } else { 0xFF };
        self.bits.iter_mut().for_each(|b| *b = fill);
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if let Some(bottom_right) = area.bottom_right() {
            for y in area.top_left.y..=bottom_right.y {
                for x in area.top_left.x..=bottom_right.x {
                    self.set_ink(x as u32, y as u32, color.is_on());
                }
            }
        }
        Ok(())
    }
}

/// Canvas geometry relative to the panel's native orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Long side horizontal: the canvas is panel height wide and panel width tall
    Landscape,
    /// The panel's native geometry
    Portrait,
}

impl Orientation {
    /// Orientation of a canvas: wider than tall is landscape
    pub fn of(size: Size) -> Self {
        if size.width > size.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Canvas size for a panel of native `width` x `height`
    pub fn canvas_size(self, width: u32, height: u32) -> Size {
        match self {
            Orientation::Landscape => Size::new(height, width),
            Orientation::Portrait => Size::new(width, height),
        }
    }
}

/// The black and red canvases composed together for one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planes {
    /// Black ink plane
    pub black: Canvas,
    /// Red (or yellow) ink plane
    pub red: Canvas,
    /// How the canvases are laid out relative to the panel
    pub orientation: Orientation,
}

impl Planes {
    /// Two blank canvases in `orientation` for a panel of native `width` x `height`
    pub fn new(orientation: Orientation, width: u32, height: u32) -> Self {
        let size = orientation.canvas_size(width, height);
        Self {
            black: Canvas::new(size.width, size.height),
            red: Canvas::new(size.width, size.height),
            orientation,
        }
    }

    /// Pair two canvases that were produced elsewhere, e.g. loaded from files.
    ///
    /// The orientation is taken from the black canvas.
    pub fn from_canvases(black: Canvas, red: Canvas) -> Self {
        let orientation = Orientation::of(black.size());
        Self {
            black,
            red,
            orientation,
        }
    }
}

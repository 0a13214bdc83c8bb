//! Text rendering onto canvases.
//!
//! TrueType/OpenType collections are rasterized with `fontdue`. Without a font
//! file the built-in `embedded-graphics` mono fonts stand in, so routines still
//! produce something readable on a bare checkout.

use std::path::Path;

use embedded_graphics::{
    mono_font::{iso_8859_15, MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use fontdue::{Font, FontSettings};

use crate::canvas::Canvas;

/// Glyph coverage above this is drawn
const COVERAGE_THRESHOLD: u8 = 128;

/// Built-in fallback fonts, smallest first
const MONO_FONTS: [&MonoFont<'static>; 8] = [
    &iso_8859_15::FONT_4X6,
    &iso_8859_15::FONT_5X8,
    &iso_8859_15::FONT_6X10,
    &iso_8859_15::FONT_6X12,
    &iso_8859_15::FONT_7X13,
    &iso_8859_15::FONT_8X13,
    &iso_8859_15::FONT_9X15,
    &iso_8859_15::FONT_10X20,
];

/// The typeface a session draws text with
pub enum Typeface {
    /// A scalable font loaded from disk
    TrueType(Box<Font>),
    /// Built-in bitmap fonts
    Mono,
}

impl core::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Typeface::TrueType(font) => f
                .debug_tuple("TrueType")
                .field(&font.name().unwrap_or("unnamed"))
                .finish(),
            Typeface::Mono => f.write_str("Mono"),
        }
    }
}

impl Typeface {
    /// Load the first face of a font file or collection, falling back to the
    /// built-in fonts when the file is missing or not a font
    pub fn load(path: &Path) -> Self {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!(
                    "Font {} not readable ({}), using built-in fonts",
                    path.display(),
                    e
                );
                return Typeface::Mono;
            }
        };

        let settings = FontSettings {
            collection_index: 0,
            ..FontSettings::default()
        };
        match Font::from_bytes(bytes, settings) {
            Ok(font) => {
                log::debug!("Loaded font {}", path.display());
                Typeface::TrueType(Box::new(font))
            }
            Err(e) => {
                log::warn!(
                    "Failed to parse font {}: {}, using built-in fonts",
                    path.display(),
                    e
                );
                Typeface::Mono
            }
        }
    }

    /// Draw `text` with its ascender line at `position.y` and pen origin at `position.x`.
    ///
    /// `size` is the em size in pixels.
    pub fn draw_text(
        &self,
        canvas: &mut Canvas,
        text: &str,
        position: Point,
        size: u32,
        color: BinaryColor,
    ) {
        match self {
            Typeface::TrueType(font) => draw_truetype(font, canvas, text, position, size, color),
            Typeface::Mono => draw_mono(canvas, text, position, size, color),
        }
    }
}

/// Largest built-in font whose glyphs are at most `size` pixels tall
pub fn mono_font_for(size: u32) -> &'static MonoFont<'static> {
    MONO_FONTS
        .iter()
        .rev()
        .find(|font| font.character_size.height <= size)
        .copied()
        .unwrap_or(MONO_FONTS[0])
}

fn draw_mono(canvas: &mut Canvas, text: &str, position: Point, size: u32, color: BinaryColor) {
    let style = MonoTextStyle::new(mono_font_for(size), color);
    // Canvas drawing is infallible
    let _ = Text::with_baseline(text, position, style, Baseline::Top).draw(canvas);
}

fn draw_truetype(
    font: &Font,
    canvas: &mut Canvas,
    text: &str,
    position: Point,
    size: u32,
    color: BinaryColor,
) {
    let px = size as f32;
    let ascent = font
        .horizontal_line_metrics(px)
        .map(|m| m.ascent)
        .unwrap_or(px);
    let baseline_y = position.y as f32 + ascent;
    let mut cursor_x = position.x as f32;

    for ch in text.chars() {
        let (metrics, bitmap) = font.rasterize(ch, px);

        let glyph_x = (cursor_x + metrics.xmin as f32).round() as i32;
        let glyph_y = (baseline_y - metrics.ymin as f32 - metrics.height as f32).round() as i32;

        let pixels = bitmap
            .iter()
            .enumerate()
            .filter(|(_, coverage)| **coverage > COVERAGE_THRESHOLD)
            .map(|(i, _)| {
                let col = (i % metrics.width) as i32;
                let row = (i / metrics.width) as i32;
                Pixel(Point::new(glyph_x + col, glyph_y + row), color)
            });
        let _ = canvas.draw_iter(pixels);

        cursor_x += metrics.advance_width;
    }
}

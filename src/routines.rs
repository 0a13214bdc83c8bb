//! The named routines selectable from the command line.
//!
//! Each routine runs on an initialized [`Session`]; [`Session::run`] takes care
//! of initialization before and shutdown after. The `compose_*` functions do
//! the drawing only, so they can be checked without a panel.

use core::fmt;

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Arc, Circle, Line, PrimitiveStyle, Rectangle},
};

use crate::bitmap;
use crate::canvas::{Canvas, Orientation, Planes};
use crate::config::Badge;
use crate::driver::EpaperDriver;
use crate::error::SessionError;
use crate::font::Typeface;
use crate::session::Session;

/// A routine body
pub type Procedure<D> = fn(&mut Session<D>) -> Result<(), SessionError>;

/// Bitmaps in the resource directory
pub mod files {
    /// Badge artwork, black plane
    pub const BADGE_BLACK: &str = "badge_b.bmp";
    /// Badge artwork, red plane
    pub const BADGE_RED: &str = "badge_ry.bmp";
    /// Full-screen demo picture, black plane
    pub const DEMO_BLACK: &str = "2in13bc-b.bmp";
    /// Full-screen demo picture, red plane
    pub const DEMO_RED: &str = "2in13bc-ry.bmp";
    /// Small picture pasted in a window
    pub const DEMO_WINDOW: &str = "100x100.bmp";
}

/// Where the windowed bitmap is pasted in the demo
pub const WINDOW_OFFSET: Point = Point::new(10, 10);

/// Named routines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Routine {
    /// Red name badge with the callsign knocked out
    #[default]
    NameBadge,
    /// Name badge from pre-rendered bitmaps
    BadgeImg,
    /// Blank the panel
    Clear,
    /// Drawing and bitmap showcase
    Demo,
}

impl Routine {
    /// Every routine, in dispatch-table order
    pub const ALL: [Routine; 4] = [
        Routine::NameBadge,
        Routine::BadgeImg,
        Routine::Clear,
        Routine::Demo,
    ];

    /// Command-line name
    pub fn name(self) -> &'static str {
        match self {
            Routine::NameBadge => "name_badge",
            Routine::BadgeImg => "badge_img",
            Routine::Clear => "clear",
            Routine::Demo => "demo",
        }
    }

    /// Exact lookup by command-line name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    /// The routine named by the command line, or the default one
    pub fn resolve(name: Option<&str>) -> Self {
        match name {
            None => Self::default(),
            Some(name) => Self::from_name(name).unwrap_or_else(|| {
                log::warn!(
                    "Unknown routine {:?}, running {}",
                    name,
                    Self::default().name()
                );
                Self::default()
            }),
        }
    }

    /// The body run for this routine
    pub fn procedure<D: EpaperDriver>(self) -> Procedure<D> {
        match self {
            Routine::NameBadge => name_badge::<D>,
            Routine::BadgeImg => badge_img::<D>,
            Routine::Clear => clear::<D>,
            Routine::Demo => demo::<D>,
        }
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn stroke() -> PrimitiveStyle<BinaryColor> {
    PrimitiveStyle::with_stroke(BinaryColor::On, 1)
}

fn fill(color: BinaryColor) -> PrimitiveStyle<BinaryColor> {
    PrimitiveStyle::with_fill(color)
}

/// Box with both corners inclusive
fn corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Rectangle {
    Rectangle::with_corners(Point::new(x0, y0), Point::new(x1, y1))
}

/// Circle inscribed in a square box
fn inscribed(bounds: Rectangle) -> Circle {
    Circle::new(bounds.top_left, bounds.size.width.min(bounds.size.height))
}

/// Full-turn arc inscribed in a square box
fn full_arc(bounds: Rectangle) -> Arc {
    Arc::new(
        bounds.top_left,
        bounds.size.width.min(bounds.size.height),
        0.0f32.deg(),
        360.0f32.deg(),
    )
}

/// Two diagonals and the outline of a box
fn crossed_box(canvas: &mut Canvas, bounds: Rectangle) -> Result<(), SessionError> {
    let (x0, y0) = (bounds.top_left.x, bounds.top_left.y);
    let bottom_right = bounds.bottom_right().unwrap_or(bounds.top_left);
    let (x1, y1) = (bottom_right.x, bottom_right.y);

    Line::new(Point::new(x0, y0), Point::new(x1, y1))
        .into_styled(stroke())
        .draw(canvas)?;
    Line::new(Point::new(x1, y0), Point::new(x0, y1))
        .into_styled(stroke())
        .draw(canvas)?;
    bounds.into_styled(stroke()).draw(canvas)?;
    Ok(())
}

/// Red field with the callsign knocked out, name in black
pub fn compose_name_badge(
    typeface: &Typeface,
    badge: &Badge,
    planes: &mut Planes,
) -> Result<(), SessionError> {
    planes.red.clear(BinaryColor::On)?;
    typeface.draw_text(
        &mut planes.black,
        &badge.name,
        Point::new(15, 0),
        30,
        BinaryColor::On,
    );
    typeface.draw_text(
        &mut planes.red,
        &badge.callsign,
        Point::new(10, 40),
        40,
        BinaryColor::Off,
    );
    Ok(())
}

/// Demo stage 1, drawn on landscape planes
pub fn compose_demo_landscape(typeface: &Typeface, planes: &mut Planes) -> Result<(), SessionError> {
    let black = &mut planes.black;
    typeface.draw_text(black, "hello world", Point::new(10, 0), 20, BinaryColor::On);
    typeface.draw_text(black, "2.13inch e-Paper bc", Point::new(10, 20), 20, BinaryColor::On);
    typeface.draw_text(black, "微雪电子", Point::new(120, 0), 20, BinaryColor::On);
    crossed_box(black, corners(20, 50, 70, 100))?;

    let red = &mut planes.red;
    Line::new(Point::new(165, 50), Point::new(165, 100))
        .into_styled(stroke())
        .draw(red)?;
    Line::new(Point::new(140, 75), Point::new(190, 75))
        .into_styled(stroke())
        .draw(red)?;
    full_arc(corners(140, 50, 190, 100))
        .into_styled(stroke())
        .draw(red)?;
    corners(80, 50, 130, 100)
        .into_styled(fill(BinaryColor::On))
        .draw(red)?;
    inscribed(corners(85, 55, 125, 95))
        .into_styled(fill(BinaryColor::Off))
        .draw(red)?;
    Ok(())
}

/// Demo stage 2, drawn on portrait planes
pub fn compose_demo_portrait(typeface: &Typeface, planes: &mut Planes) -> Result<(), SessionError> {
    let black = &mut planes.black;
    typeface.draw_text(black, "hello world", Point::new(2, 0), 18, BinaryColor::On);
    typeface.draw_text(black, "2.13 epd b", Point::new(2, 20), 18, BinaryColor::On);
    typeface.draw_text(black, "微雪电子", Point::new(20, 50), 18, BinaryColor::On);
    crossed_box(black, corners(10, 90, 60, 140))?;

    let red = &mut planes.red;
    corners(10, 150, 60, 200)
        .into_styled(fill(BinaryColor::On))
        .draw(red)?;
    full_arc(corners(15, 95, 55, 135))
        .into_styled(stroke())
        .draw(red)?;
    inscribed(corners(15, 155, 55, 195))
        .into_styled(fill(BinaryColor::Off))
        .draw(red)?;
    Ok(())
}

fn name_badge<D: EpaperDriver>(session: &mut Session<D>) -> Result<(), SessionError> {
    session.clear()?;
    session.settle_after_clear()?;
    let mut planes = session.planes(Orientation::Landscape);
    compose_name_badge(session.typeface(), &session.config().badge, &mut planes)?;
    session.submit(planes)?;
    session.settle_after_submit()
}

fn badge_img<D: EpaperDriver>(session: &mut Session<D>) -> Result<(), SessionError> {
    session.clear()?;
    session.settle_after_clear()?;
    let black = bitmap::load(&session.config().resource(files::BADGE_BLACK))?;
    let red = bitmap::load(&session.config().resource(files::BADGE_RED))?;
    session.submit(Planes::from_canvases(black, red))?;
    session.settle_after_submit()
}

fn clear<D: EpaperDriver>(session: &mut Session<D>) -> Result<(), SessionError> {
    session.clear()?;
    session.settle_after_clear()
}

fn demo<D: EpaperDriver>(session: &mut Session<D>) -> Result<(), SessionError> {
    log::info!("epd2in13bc Demo");
    session.clear()?;
    session.settle_after_clear()?;

    log::info!("1.Drawing on the Horizontal image...");
    let mut planes = session.planes(Orientation::Landscape);
    compose_demo_landscape(session.typeface(), &mut planes)?;
    session.submit(planes)?;
    session.settle_after_submit()?;

    log::info!("2.Drawing on the Vertical image...");
    let mut planes = session.planes(Orientation::Portrait);
    compose_demo_portrait(session.typeface(), &mut planes)?;
    session.submit(planes)?;
    session.settle_after_submit()?;

    log::info!("3.read bmp file");
    let black = bitmap::load(&session.config().resource(files::DEMO_BLACK))?;
    let red = bitmap::load(&session.config().resource(files::DEMO_RED))?;
    session.submit(Planes::from_canvases(black, red))?;
    session.settle_after_submit()?;

    log::info!("4.read bmp file on window");
    let mut planes = session.planes(Orientation::Landscape);
    let window = bitmap::load(&session.config().resource(files::DEMO_WINDOW))?;
    planes.black.paste(&window, WINDOW_OFFSET);
    session.submit(planes)?;
    session.settle_after_submit()?;

    session.initialize()?;
    session.clear()?;
    session.settle_after_clear()
}

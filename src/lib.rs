//! Name badge and demo routines for the Waveshare 2.13" black/red e-paper HAT.
//!
//! A [`session::Session`] owns one opened panel. A [`routines::Routine`] is
//! chosen by name, run on the session, and the panel is always left in deep
//! sleep afterwards, also after Ctrl+C or an I/O error.
//!
//! Drawing happens on two [`canvas::Canvas`] planes through `embedded-graphics`;
//! the [`driver::EpaperDriver`] trait packs and transfers them.

pub mod bitmap;
pub mod canvas;
pub mod config;
pub mod driver;
pub mod epd2in13bc;
pub mod error;
pub mod font;
pub mod hardware;
pub mod interrupt;
pub mod mocks;
pub mod routines;
pub mod session;

pub use canvas::{Canvas, Orientation, Planes};
pub use config::Config;
pub use driver::{DisplayError, EpaperDriver};
pub use error::SessionError;
pub use interrupt::Interrupt;
pub use routines::Routine;
pub use session::{Session, SessionState};

//! The display session: one opened panel and the steps a routine runs on it.
//!
//! ```text
//! Uninitialized --initialize--> Initialized --clear/submit/settle--> Initialized
//!        \                           |
//!         \------------------shutdown-----------------------------> Asleep
//! ```
//!
//! A session always ends asleep: [`Session::run`] shuts the panel down after
//! the routine, whether it finished, failed, or was interrupted.

use std::time::{Duration, Instant};

use embedded_graphics::geometry::{OriginDimensions, Size};

use crate::canvas::{Canvas, Orientation, Planes};
use crate::config::Config;
use crate::driver::EpaperDriver;
use crate::error::SessionError;
use crate::font::Typeface;
use crate::interrupt::Interrupt;
use crate::routines::Routine;

/// Longest uninterrupted sleep while settling
const SETTLE_SLICE: Duration = Duration::from_millis(100);

/// Where the panel is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Lines opened, controller not yet set up
    Uninitialized,
    /// Ready for clears and submissions
    Initialized,
    /// Deep sleep, lines released
    Asleep,
}

/// An opened display plus everything routines draw with
pub struct Session<D> {
    driver: D,
    config: Config,
    typeface: Typeface,
    interrupt: Interrupt,
    state: SessionState,
}

impl<D: EpaperDriver> Session<D> {
    /// Wrap a driver. Loads the font; touches no hardware.
    pub fn new(driver: D, config: Config, interrupt: Interrupt) -> Self {
        let typeface = Typeface::load(&config.font_path());
        Self::with_typeface(driver, config, interrupt, typeface)
    }

    /// Wrap a driver with an already chosen typeface
    pub fn with_typeface(
        driver: D,
        config: Config,
        interrupt: Interrupt,
        typeface: Typeface,
    ) -> Self {
        Self {
            driver,
            config,
            typeface,
            interrupt,
            state: SessionState::Uninitialized,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The run configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Typeface for [`Typeface::draw_text`]
    pub fn typeface(&self) -> &Typeface {
        &self.typeface
    }

    /// The wrapped driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Unwrap the driver
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Native panel geometry
    pub fn panel_size(&self) -> Size {
        Size::new(self.driver.width(), self.driver.height())
    }

    /// Run the controller's init sequence, then clear if configured to.
    ///
    /// Valid from any state; a sleeping panel is woken by the reset it performs.
    pub fn initialize(&mut self) -> Result<(), SessionError> {
        self.interrupt.check()?;
        log::info!("init and Clear");
        self.driver.init()?;
        self.state = SessionState::Initialized;
        if self.config.clear_on_init {
            self.clear()?;
        }
        Ok(())
    }

    /// Blank the panel
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.interrupt.check()?;
        log::info!("Clear...");
        self.driver.clear()?;
        Ok(())
    }

    /// Blank canvases sized for the panel in `orientation`
    pub fn planes(&self, orientation: Orientation) -> Planes {
        Planes::new(orientation, self.driver.width(), self.driver.height())
    }

    /// Pack both planes and send them to the panel.
    ///
    /// The planes are consumed; both must have the same size, equal to the
    /// panel's in one of the two orientations.
    pub fn submit(&mut self, planes: Planes) -> Result<(), SessionError> {
        self.interrupt.check()?;
        self.check_canvas(&planes.black)?;
        self.check_canvas(&planes.red)?;
        if planes.black.size() != planes.red.size() {
            return Err(SessionError::CanvasSize {
                expected: planes.black.size(),
                actual: planes.red.size(),
            });
        }

        let black = self.driver.get_buffer(&planes.black)?;
        let red = self.driver.get_buffer(&planes.red)?;
        log::debug!(
            "Submitting {:?} planes, {} + {} bytes",
            planes.orientation,
            black.len(),
            red.len()
        );
        self.driver.display(&black, &red)?;
        Ok(())
    }

    fn check_canvas(&self, canvas: &Canvas) -> Result<(), SessionError> {
        let panel = self.panel_size();
        let actual = canvas.size();
        if actual == panel || actual == Size::new(panel.height, panel.width) {
            Ok(())
        } else {
            Err(SessionError::CanvasSize {
                expected: panel,
                actual,
            })
        }
    }

    /// Wait for the panel to physically settle, waking early on Ctrl+C
    pub fn settle(&self, duration: Duration) -> Result<(), SessionError> {
        let deadline = Instant::now() + duration;
        loop {
            self.interrupt.check()?;
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            std::thread::sleep((deadline - now).min(SETTLE_SLICE));
        }
    }

    /// Settle for the configured post-clear time
    pub fn settle_after_clear(&self) -> Result<(), SessionError> {
        self.settle(self.config.settle_after_clear)
    }

    /// Settle for the configured post-submission time
    pub fn settle_after_submit(&self) -> Result<(), SessionError> {
        self.settle(self.config.settle_after_submit)
    }

    /// Put the panel to sleep and release the module lines.
    ///
    /// Runs even when interrupted. A panel that never finished initializing is
    /// only released, since the controller was not powered up. A second call
    /// on a sleeping panel does nothing.
    pub fn shutdown(&mut self) -> Result<(), SessionError> {
        let slept = match self.state {
            SessionState::Asleep => return Ok(()),
            SessionState::Uninitialized => {
                log::info!("Releasing uninitialized display");
                Ok(())
            }
            SessionState::Initialized => {
                log::info!("Goto Sleep...");
                self.driver.sleep()
            }
        };
        let exited = self.driver.module_exit();
        self.state = SessionState::Asleep;
        slept?;
        exited?;
        Ok(())
    }

    /// Initialize the panel, run a routine, and always leave the panel asleep.
    ///
    /// An interrupt is logged and turned into a clean shutdown. Other errors
    /// are logged, the panel is shut down as far as possible, and the error is
    /// returned.
    pub fn run(&mut self, routine: Routine) -> Result<(), SessionError> {
        log::info!("Running {}", routine.name());
        let procedure = routine.procedure::<D>();
        let outcome = self.initialize().and_then(|()| procedure(self));

        match outcome {
            Ok(()) => self.shutdown(),
            Err(SessionError::Interrupted) => {
                log::info!("ctrl + c");
                self.shutdown()
            }
            Err(e) => {
                log::error!("{} failed: {}", routine.name(), e);
                if let Err(shutdown_err) = self.shutdown() {
                    log::warn!("Shutdown after failure also failed: {}", shutdown_err);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{DriverCall, RecordingDriver};

    fn session() -> Session<RecordingDriver> {
        Session::with_typeface(
            RecordingDriver::epd2in13bc(),
            Config::without_settle(),
            Interrupt::new(),
            Typeface::Mono,
        )
    }

    #[test]
    fn starts_uninitialized_and_initializes() {
        let mut session = session();
        assert_eq!(session.state(), SessionState::Uninitialized);
        session.initialize().unwrap();
        assert_eq!(session.state(), SessionState::Initialized);
        assert_eq!(session.driver().calls(), &[DriverCall::Init]);
    }

    #[test]
    fn clear_on_init_clears_once() {
        let mut config = Config::without_settle();
        config.clear_on_init = true;
        let mut session = Session::with_typeface(
            RecordingDriver::epd2in13bc(),
            config,
            Interrupt::new(),
            Typeface::Mono,
        );
        session.initialize().unwrap();
        assert_eq!(
            session.driver().calls(),
            &[DriverCall::Init, DriverCall::Clear]
        );
    }

    #[test]
    fn submit_accepts_both_orientations() {
        let mut session = session();
        session.initialize().unwrap();
        let landscape = session.planes(Orientation::Landscape);
        session.submit(landscape).unwrap();
        let portrait = session.planes(Orientation::Portrait);
        session.submit(portrait).unwrap();
        assert_eq!(session.driver().display_count(), 2);
    }

    #[test]
    fn submit_rejects_wrong_size_without_touching_driver() {
        let mut session = session();
        let planes = Planes::from_canvases(Canvas::new(100, 100), Canvas::new(100, 100));
        let err = session.submit(planes).unwrap_err();
        assert!(matches!(err, SessionError::CanvasSize { .. }));
        assert_eq!(session.driver().display_count(), 0);
    }

    #[test]
    fn submit_rejects_mixed_orientations() {
        let mut session = session();
        let planes = Planes::from_canvases(Canvas::new(212, 104), Canvas::new(104, 212));
        assert!(matches!(
            session.submit(planes),
            Err(SessionError::CanvasSize { .. })
        ));
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut session = session();
        session.initialize().unwrap();
        session.shutdown().unwrap();
        session.shutdown().unwrap();
        assert_eq!(session.state(), SessionState::Asleep);
        assert_eq!(
            session.driver().calls(),
            &[DriverCall::Init, DriverCall::Sleep, DriverCall::ModuleExit]
        );
    }

    #[test]
    fn shutdown_before_initialize_only_releases_the_lines() {
        let mut session = session();
        session.shutdown().unwrap();
        assert_eq!(session.state(), SessionState::Asleep);
        assert_eq!(session.driver().calls(), &[DriverCall::ModuleExit]);
    }

    #[test]
    fn settle_returns_early_when_interrupted() {
        let interrupt = Interrupt::new();
        let session = Session::with_typeface(
            RecordingDriver::epd2in13bc(),
            Config::without_settle(),
            interrupt.clone(),
            Typeface::Mono,
        );
        interrupt.trigger();
        let started = Instant::now();
        assert!(matches!(
            session.settle(Duration::from_secs(30)),
            Err(SessionError::Interrupted)
        ));
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}

//! Mock implementations for testing
//!
//! [`RecordingDriver`] stands in for the panel in unit and integration tests:
//! it remembers every call, keeps the submitted buffers, and can be told to
//! fail a given operation.

use display_interface::DisplayError;

use crate::driver::EpaperDriver;
use crate::epd2in13bc::{HEIGHT, WIDTH};

/// One call received by the [`RecordingDriver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    /// `init`
    Init,
    /// `clear`
    Clear,
    /// `display` with the packed planes
    Display {
        /// Black plane buffer
        black: Vec<u8>,
        /// Red plane buffer
        red: Vec<u8>,
    },
    /// `sleep`
    Sleep,
    /// `module_exit`
    ModuleExit,
}

/// Which operation a [`RecordingDriver`] should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `init`
    Init,
    /// `clear`
    Clear,
    /// `display`
    Display,
    /// `sleep`
    Sleep,
}

/// Mock panel that records calls
#[derive(Debug, Clone)]
pub struct RecordingDriver {
    width: u32,
    height: u32,
    calls: Vec<DriverCall>,
    fail_on: Option<Operation>,
}

impl RecordingDriver {
    /// Mock panel with the given native geometry
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
            fail_on: None,
        }
    }

    /// Mock of the 2.13" B/C panel
    pub fn epd2in13bc() -> Self {
        Self::new(WIDTH, HEIGHT)
    }

    /// Fail every call to `operation` with a bus write error
    pub fn failing_on(mut self, operation: Operation) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// Every call so far, in order
    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    /// Number of `clear` calls
    pub fn clear_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DriverCall::Clear))
            .count()
    }

    /// Number of `display` calls
    pub fn display_count(&self) -> usize {
        self.displayed().count()
    }

    /// Submitted (black, red) buffers, in order
    pub fn displayed(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        self.calls.iter().filter_map(|c| match c {
            DriverCall::Display { black, red } => Some((black.as_slice(), red.as_slice())),
            _ => None,
        })
    }

    /// Whether the last two calls put the panel to sleep and released it
    pub fn ends_asleep(&self) -> bool {
        self.calls.ends_with(&[DriverCall::Sleep, DriverCall::ModuleExit])
    }

    fn record(&mut self, call: DriverCall, operation: Option<Operation>) -> Result<(), DisplayError> {
        self.calls.push(call);
        if operation.is_some() && operation == self.fail_on {
            Err(DisplayError::BusWriteError)
        } else {
            Ok(())
        }
    }
}

impl EpaperDriver for RecordingDriver {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.record(DriverCall::Init, Some(Operation::Init))
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.record(DriverCall::Clear, Some(Operation::Clear))
    }

    fn display(&mut self, black: &[u8], red: &[u8]) -> Result<(), DisplayError> {
        let call = DriverCall::Display {
            black: black.to_vec(),
            red: red.to_vec(),
        };
        self.record(call, Some(Operation::Display))
    }

    fn sleep(&mut self) -> Result<(), DisplayError> {
        self.record(DriverCall::Sleep, Some(Operation::Sleep))
    }

    fn module_exit(&mut self) -> Result<(), DisplayError> {
        self.record(DriverCall::ModuleExit, None)
    }
}

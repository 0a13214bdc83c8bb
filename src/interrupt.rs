//! Ctrl+C handling.
//!
//! The signal handler only raises a flag; the session polls it between driver
//! calls and while settling, and unwinds the routine with
//! [`SessionError::Interrupted`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::SessionError;

/// Shared "stop now" flag
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    raised: Arc<AtomicBool>,
}

impl Interrupt {
    /// A flag that is never raised by a signal, for tests and embedding
    pub fn new() -> Self {
        Self::default()
    }

    /// A flag raised by SIGINT (and SIGTERM when `ctrlc` is built with `termination`)
    pub fn install() -> Result<Self, ctrlc::Error> {
        let interrupt = Self::new();
        let raised = Arc::clone(&interrupt.raised);
        ctrlc::set_handler(move || {
            raised.store(true, Ordering::SeqCst);
        })?;
        Ok(interrupt)
    }

    /// Raise the flag by hand
    pub fn trigger(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Whether the flag is raised
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// `Err(Interrupted)` once the flag is raised
    pub fn check(&self) -> Result<(), SessionError> {
        if self.is_raised() {
            Err(SessionError::Interrupted)
        } else {
            Ok(())
        }
    }
}

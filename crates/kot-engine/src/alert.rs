//! New-order audio alert.
//!
//! Playback is fire-and-forget: the engine logs a failed `play` and moves on.

use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertError {
    /// The output refuses to play sound, e.g. no terminal attached.
    #[error("alert playback blocked: {0}")]
    Blocked(String),

    #[error("alert output error: {0}")]
    Io(String),
}

/// Something that can sound the new-order alert.
pub trait AlertSink: Send + Sync {
    fn play(&self) -> Result<(), AlertError>;
}

impl<T: AlertSink + ?Sized> AlertSink for Arc<T> {
    fn play(&self) -> Result<(), AlertError> {
        (**self).play()
    }
}

/// Rings the terminal bell on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl AlertSink for TerminalBell {
    fn play(&self) -> Result<(), AlertError> {
        let mut stdout = std::io::stdout();
        if !stdout.is_terminal() {
            return Err(AlertError::Blocked("stdout is not a terminal".into()));
        }
        stdout
            .write_all(b"\x07")
            .and_then(|()| stdout.flush())
            .map_err(|e| AlertError::Io(e.to_string()))
    }
}

/// Alerts are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlert;

impl AlertSink for SilentAlert {
    fn play(&self) -> Result<(), AlertError> {
        Ok(())
    }
}

/// Counts playback attempts; optionally fails every one.
#[derive(Debug, Default)]
pub struct RecordingAlert {
    plays: AtomicUsize,
    fail: bool,
}

impl RecordingAlert {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose playback is always blocked.
    pub fn failing() -> Self {
        Self {
            plays: AtomicUsize::new(0),
            fail: true,
        }
    }

    /// Number of times `play` was called.
    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl AlertSink for RecordingAlert {
    fn play(&self) -> Result<(), AlertError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AlertError::Blocked("autoplay disabled".into()));
        }
        Ok(())
    }
}

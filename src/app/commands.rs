//! Inbound commissioning commands.
//!
//! A [`WindowRequest`] is created per button gesture or direct call and
//! consumed once by the [`WindowWorker`](super::window::WindowWorker).

/// Default pairing window length, in seconds.
pub const DEFAULT_WINDOW_TIMEOUT_SECS: u16 = 300;

/// Open or close the commissioning window.
///
/// A zero timeout means "close"; anything else opens for that many seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRequest {
    pub timeout_secs: u16,
}

impl WindowRequest {
    pub const fn open(timeout_secs: u16) -> Self {
        Self { timeout_secs }
    }

    pub const fn close() -> Self {
        Self { timeout_secs: 0 }
    }

    pub const fn is_close(&self) -> bool {
        self.timeout_secs == 0
    }

    /// The open timeout, or `None` for a close request.
    pub const fn open_timeout(&self) -> Option<u16> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(self.timeout_secs)
        }
    }
}

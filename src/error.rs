//! Unified error types for the SmartNode firmware.
//!
//! Bootstrap steps funnel their failures into [`Error`] so `main()` has a
//! single type to report before halting. Port-level errors live next to the
//! port traits in [`crate::app::ports`]; the button driver owns
//! [`ButtonError`](crate::drivers::button::ButtonError).

use core::fmt;

use crate::app::ports::{FrameworkError, StorageInitError};
use crate::drivers::button::ButtonError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fatal bootstrap failure, plus the one degraded case (button).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration failed validation before bootstrap began.
    Config(&'static str),
    /// Persistent storage could not be initialised, even after erase.
    Storage(StorageInitError),
    /// The framework refused to create the root node.
    NodeCreate(FrameworkError),
    /// The framework event loop failed to start.
    FrameworkStart(FrameworkError),
    /// Button peripheral could not be set up. Non-fatal during bootstrap.
    Button(ButtonError),
}

impl Error {
    /// Whether this error aborts bootstrap.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Button(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::NodeCreate(e) => write!(f, "root node: {e}"),
            Self::FrameworkStart(e) => write!(f, "framework start: {e}"),
            Self::Button(e) => write!(f, "button: {e}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<StorageInitError> for Error {
    fn from(e: StorageInitError) -> Self {
        Self::Storage(e)
    }
}

impl From<ButtonError> for Error {
    fn from(e: ButtonError) -> Self {
        Self::Button(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

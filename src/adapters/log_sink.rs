//! Log-based outcome sink adapter.
//!
//! Implements [`OutcomeSink`] by writing one line per applied window
//! request to the ESP-IDF logger (UART / USB-CDC in production).

use log::{error, info, warn};

use crate::app::commands::WindowRequest;
use crate::app::events::WindowOutcome;
use crate::app::ports::OutcomeSink;

/// Adapter that logs every [`WindowOutcome`] to the serial console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOutcomeSink;

impl LogOutcomeSink {
    pub fn new() -> Self {
        Self
    }
}

impl OutcomeSink for LogOutcomeSink {
    fn report(&self, request: WindowRequest, outcome: &WindowOutcome) {
        match outcome {
            WindowOutcome::Opened { timeout_secs } => {
                info!("WINDOW | opened | timeout={}s", timeout_secs);
            }
            WindowOutcome::Closed => {
                info!("WINDOW | closed");
            }
            WindowOutcome::AlreadyOpen | WindowOutcome::FailSafeArmed => {
                warn!("WINDOW | {:?} rejected | {}", request, outcome);
            }
            WindowOutcome::TimeoutOutOfBounds { .. } | WindowOutcome::OpenFailed(_) => {
                error!("WINDOW | {:?} rejected | {}", request, outcome);
            }
        }
    }
}

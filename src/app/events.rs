//! Inbound platform notifications and outbound window outcomes.
//!
//! [`PlatformEvent`]s arrive from the framework's event-delivery context and
//! are consumed by the [`LifecycleDispatcher`](super::dispatcher::LifecycleDispatcher).
//! [`WindowOutcome`]s are produced by the window worker for every request
//! it runs and handed to an [`OutcomeSink`](super::ports::OutcomeSink).

use core::fmt;

use super::ports::FrameworkError;

/// Lifecycle notifications from the commissioning framework.
///
/// The device shim translates framework event types into the small codes
/// matched by [`PlatformEvent::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    Ipv6Assigned,
    Ipv4Assigned,
    SessionStarted,
    SessionStopped,
    CommissioningComplete,
    FailSafeExpired,
    WindowOpened,
    WindowClosed,
    /// Anything the firmware does not act on.
    Other(u8),
}

impl PlatformEvent {
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Ipv6Assigned,
            2 => Self::Ipv4Assigned,
            3 => Self::SessionStarted,
            4 => Self::SessionStopped,
            5 => Self::CommissioningComplete,
            6 => Self::FailSafeExpired,
            7 => Self::WindowOpened,
            8 => Self::WindowClosed,
            other => Self::Other(other),
        }
    }
}

/// What the worker did with one [`WindowRequest`](super::commands::WindowRequest).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOutcome {
    /// A basic window was opened for `timeout_secs`.
    Opened { timeout_secs: u16 },
    /// Close request handled (including the no-op case).
    Closed,
    /// A window was still open at the re-check; retry later.
    AlreadyOpen,
    /// A commissioning attempt holds the fail-safe armed.
    FailSafeArmed,
    /// Requested timeout is outside the manager's limits.
    TimeoutOutOfBounds { requested: u16, min: u16, max: u16 },
    /// The framework rejected the open call.
    OpenFailed(FrameworkError),
}

impl WindowOutcome {
    /// `true` for the precondition rejections (no framework call made).
    pub const fn is_rejected(&self) -> bool {
        matches!(
            self,
            Self::AlreadyOpen | Self::FailSafeArmed | Self::TimeoutOutOfBounds { .. }
        )
    }
}

impl fmt::Display for WindowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opened { timeout_secs } => write!(f, "opened ({}s)", timeout_secs),
            Self::Closed => write!(f, "closed"),
            Self::AlreadyOpen => write!(f, "window already open (busy)"),
            Self::FailSafeArmed => write!(f, "fail-safe not fully disarmed (busy)"),
            Self::TimeoutOutOfBounds { requested, min, max } => {
                write!(f, "timeout {}s outside {}..={}s", requested, min, max)
            }
            Self::OpenFailed(e) => write!(f, "open failed: {}", e),
        }
    }
}

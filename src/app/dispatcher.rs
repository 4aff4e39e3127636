//! Lifecycle event dispatcher.
//!
//! Runs on the framework's event-delivery context. Each call does at most
//! one atomic write and one log line; it never blocks and never posts work,
//! so it cannot deadlock the context that delivers it.
//!
//! | Event                   | Session flag | Log level |
//! |-------------------------|--------------|-----------|
//! | IPv6 / IPv4 assigned    | —            | info      |
//! | Session started         | `true`       | info      |
//! | Session stopped         | `false`      | info      |
//! | Commissioning complete  | `false`      | info      |
//! | Fail-safe expired       | `false`      | error     |
//! | Window opened / closed  | —            | info      |
//! | anything else           | —            | —         |

use std::sync::Arc;

use log::{Level, info, log};

use super::events::PlatformEvent;
use super::session::SessionTracker;

/// A change applied to the [`SessionTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTransition {
    Started,
    Stopped,
    Completed,
    /// Commissioning failed: the fail-safe timer ran out.
    Failed,
}

impl SessionTransition {
    /// Flag value after this transition.
    pub const fn in_progress(self) -> bool {
        matches!(self, Self::Started)
    }

    /// Severity the transition is logged at.
    pub const fn level(self) -> Level {
        match self {
            Self::Failed => Level::Error,
            _ => Level::Info,
        }
    }

    const fn message(self) -> &'static str {
        match self {
            Self::Started => "Commissioning session started",
            Self::Stopped => "Commissioning session stopped",
            Self::Completed => "Commissioning complete",
            Self::Failed => "Commissioning failed, fail-safe timer expired",
        }
    }
}

/// Event sink registered with the framework at start-up.
#[derive(Debug, Clone)]
pub struct LifecycleDispatcher {
    session: Arc<SessionTracker>,
}

impl LifecycleDispatcher {
    pub fn new(session: Arc<SessionTracker>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionTracker {
        &self.session
    }

    /// Apply one platform event. Returns the session transition, if any.
    pub fn handle(&self, event: PlatformEvent) -> Option<SessionTransition> {
        let transition = match event {
            PlatformEvent::Ipv6Assigned => {
                info!("Lifecycle: IPv6 address assigned");
                return None;
            }
            PlatformEvent::Ipv4Assigned => {
                info!("Lifecycle: IPv4 address assigned");
                return None;
            }
            PlatformEvent::WindowOpened => {
                info!("Lifecycle: commissioning window opened");
                return None;
            }
            PlatformEvent::WindowClosed => {
                info!("Lifecycle: commissioning window closed");
                return None;
            }
            PlatformEvent::Other(_) => return None,
            PlatformEvent::SessionStarted => SessionTransition::Started,
            PlatformEvent::SessionStopped => SessionTransition::Stopped,
            PlatformEvent::CommissioningComplete => SessionTransition::Completed,
            PlatformEvent::FailSafeExpired => SessionTransition::Failed,
        };

        self.session.set_in_progress(transition.in_progress());
        log!(transition.level(), "Lifecycle: {}", transition.message());
        Some(transition)
    }
}

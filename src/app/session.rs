//! Commissioning session tracker.
//!
//! One boolean with process lifetime. Only the lifecycle dispatcher writes
//! it (from the framework's event context); any context may read it and
//! must tolerate a stale value.

use core::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct SessionTracker {
    in_progress: AtomicBool,
}

impl SessionTracker {
    pub const fn new() -> Self {
        Self {
            in_progress: AtomicBool::new(false),
        }
    }

    /// Whether a pairing session is currently running.
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    pub(crate) fn set_in_progress(&self, value: bool) {
        self.in_progress.store(value, Ordering::Release);
    }
}

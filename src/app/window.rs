//! Commissioning window controller and worker.
//!
//! ```text
//!  button task ─┐                         serialized context
//!  main task   ─┼─▶ WindowController ──post──▶ WindowWorker ──▶ WindowManagerPort
//!  any thread  ─┘        │                         │
//!                        └── is_window_open ───────┴──────────▶ (read-only)
//! ```
//!
//! The controller never touches the window manager's mutating calls. It
//! posts a [`WindowRequest`] to a [`SerialExecutor`] and returns whether the
//! post succeeded. The worker runs later, one request at a time, and is the
//! only code that opens or closes windows.

use std::sync::Arc;

use log::{error, info};

use super::commands::{DEFAULT_WINDOW_TIMEOUT_SECS, WindowRequest};
use super::events::WindowOutcome;
use super::ports::{Advertisement, FailSafePort, OutcomeSink, SerialExecutor, WindowManagerPort};

// ───────────────────────────────────────────────────────────────
// Worker (runs on the serialized context)
// ───────────────────────────────────────────────────────────────

/// Applies window requests. Must only be driven from one serialized
/// context; it holds no locks of its own.
pub struct WindowWorker<W, F, S = ()> {
    manager: Arc<W>,
    fail_safe: F,
    sink: S,
}

impl<W, F> WindowWorker<W, F>
where
    W: WindowManagerPort,
    F: FailSafePort,
{
    pub fn new(manager: Arc<W>, fail_safe: F) -> Self {
        Self {
            manager,
            fail_safe,
            sink: (),
        }
    }
}

impl<W, F, S> WindowWorker<W, F, S>
where
    W: WindowManagerPort,
    F: FailSafePort,
    S: OutcomeSink,
{
    /// Replace the outcome sink.
    pub fn with_sink<S2: OutcomeSink>(self, sink: S2) -> WindowWorker<W, F, S2> {
        WindowWorker {
            manager: self.manager,
            fail_safe: self.fail_safe,
            sink,
        }
    }

    /// Run one request to completion and report its outcome.
    pub fn apply(&self, request: WindowRequest) -> WindowOutcome {
        let outcome = self.run(request);
        self.sink.report(request, &outcome);
        outcome
    }

    fn run(&self, request: WindowRequest) -> WindowOutcome {
        if self.manager.is_window_open() {
            self.manager.close_window();
        }

        let Some(timeout_secs) = request.open_timeout() else {
            return WindowOutcome::Closed;
        };

        info!("Window: opening basic commissioning window (timeout: {}s)", timeout_secs);

        // Closing may complete asynchronously, so the window can still
        // report open here. The caller may retry.
        if self.manager.is_window_open() {
            error!("Window: commissioning window is already open (busy)");
            return WindowOutcome::AlreadyOpen;
        }
        if !self.fail_safe.is_fully_disarmed() {
            error!("Window: fail-safe is not fully disarmed (busy)");
            return WindowOutcome::FailSafeArmed;
        }

        let min = self.manager.min_timeout_secs();
        let max = self.manager.max_timeout_secs();
        if timeout_secs > max {
            error!("Window: timeout {}s exceeds max {}s", timeout_secs, max);
            return WindowOutcome::TimeoutOutOfBounds { requested: timeout_secs, min, max };
        }
        if timeout_secs < min {
            error!("Window: timeout {}s below min {}s", timeout_secs, min);
            return WindowOutcome::TimeoutOutOfBounds { requested: timeout_secs, min, max };
        }

        match self
            .manager
            .open_basic_window(timeout_secs, Advertisement::DnssdOnly)
        {
            Ok(()) => {
                info!("Window: opened for {}s", timeout_secs);
                WindowOutcome::Opened { timeout_secs }
            }
            Err(e) => {
                error!("Window: failed to open basic commissioning window ({})", e);
                WindowOutcome::OpenFailed(e)
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Controller (callable from any context)
// ───────────────────────────────────────────────────────────────

/// Caller-facing API. Cheap to share behind an `Arc`.
pub struct WindowController<E, W> {
    executor: E,
    manager: Arc<W>,
}

impl<E, W> WindowController<E, W>
where
    E: SerialExecutor,
    W: WindowManagerPort,
{
    pub fn new(executor: E, manager: Arc<W>) -> Self {
        Self { executor, manager }
    }

    /// Post a request to open a window for `timeout_secs`.
    ///
    /// `true` only means the request was queued. Whether the window opened
    /// is reported to the worker's [`OutcomeSink`].
    pub fn open_window(&self, timeout_secs: u16) -> bool {
        self.post(WindowRequest::open(timeout_secs))
    }

    /// [`open_window`](Self::open_window) with the default timeout.
    pub fn open_default_window(&self) -> bool {
        self.open_window(DEFAULT_WINDOW_TIMEOUT_SECS)
    }

    /// Post a request to close the window.
    pub fn close_window(&self) -> bool {
        self.post(WindowRequest::close())
    }

    /// Direct read-only query; no scheduling involved.
    pub fn is_window_open(&self) -> bool {
        self.manager.is_window_open()
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    fn post(&self, request: WindowRequest) -> bool {
        match self.executor.post(request) {
            Ok(()) => true,
            Err(e) => {
                error!("Window: failed to schedule {:?} ({})", request, e);
                false
            }
        }
    }
}

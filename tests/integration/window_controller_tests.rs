//! Integration tests for WindowController → QueueExecutor → WindowWorker.
//!
//! The queue is drained on the test thread so every test observes the
//! exact order in which the worker touched the window manager.

use std::sync::Arc;

use smartnode::app::commands::WindowRequest;
use smartnode::app::events::WindowOutcome;
use smartnode::app::ports::{Advertisement, FrameworkError};
use smartnode::app::window::{WindowController, WindowWorker};
use smartnode::executor::QueueExecutor;

use crate::mock_platform::{MockFailSafe, MockWindowManager, OutcomeRecorder, WindowCall};

const MIN: u16 = 60;
const MAX: u16 = 900;

type Worker = WindowWorker<MockWindowManager, MockFailSafe, Arc<OutcomeRecorder>>;
type Controller = WindowController<QueueExecutor, MockWindowManager>;

struct Rig {
    manager: Arc<MockWindowManager>,
    fail_safe: MockFailSafe,
    outcomes: Arc<OutcomeRecorder>,
    worker: Worker,
    controller: Controller,
}

impl Rig {
    fn with_manager(manager: MockWindowManager) -> Self {
        let manager = Arc::new(manager);
        let fail_safe = MockFailSafe::disarmed();
        let outcomes = Arc::new(OutcomeRecorder::default());
        let worker = WindowWorker::new(manager.clone(), fail_safe.clone()).with_sink(outcomes.clone());
        let controller = WindowController::new(QueueExecutor::new(), manager.clone());
        Self { manager, fail_safe, outcomes, worker, controller }
    }

    fn new() -> Self {
        Self::with_manager(MockWindowManager::new(MIN, MAX))
    }

    fn run(&self) -> usize {
        self.controller.executor().drain(&self.worker)
    }
}

fn open_call(timeout_secs: u16) -> WindowCall {
    WindowCall::Open { timeout_secs, advertisement: Advertisement::DnssdOnly }
}

// ── Idempotent close ──────────────────────────────────────────

#[test]
fn close_when_already_closed_is_a_no_op() {
    let rig = Rig::new();

    assert!(rig.controller.close_window());
    assert!(rig.controller.close_window());
    assert_eq!(rig.run(), 2);

    assert!(rig.manager.calls().is_empty(), "closed window must not be touched");
    assert!(!rig.controller.is_window_open());
    assert_eq!(rig.outcomes.outcomes(), vec![WindowOutcome::Closed, WindowOutcome::Closed]);
}

#[test]
fn close_closes_an_open_window() {
    let rig = Rig::new();
    rig.manager.set_open(true);

    assert!(rig.controller.close_window());
    rig.run();

    assert_eq!(rig.manager.calls(), vec![WindowCall::Close]);
    assert!(!rig.controller.is_window_open());
}

// ── Bounds enforcement ────────────────────────────────────────

#[test]
fn timeout_below_min_is_rejected() {
    let rig = Rig::new();

    assert!(rig.controller.open_window(30), "post still succeeds");
    rig.run();

    assert_eq!(rig.manager.open_calls(), 0);
    assert!(!rig.controller.is_window_open());
    assert_eq!(
        rig.outcomes.outcomes(),
        vec![WindowOutcome::TimeoutOutOfBounds { requested: 30, min: MIN, max: MAX }]
    );
}

#[test]
fn timeout_above_max_is_rejected() {
    let rig = Rig::new();

    assert!(rig.controller.open_window(1000));
    rig.run();

    assert_eq!(rig.manager.open_calls(), 0);
    assert_eq!(
        rig.outcomes.outcomes(),
        vec![WindowOutcome::TimeoutOutOfBounds { requested: 1000, min: MIN, max: MAX }]
    );
}

#[test]
fn timeout_in_range_opens_with_dnssd_only() {
    let rig = Rig::new();

    assert!(rig.controller.open_window(300));
    rig.run();

    assert_eq!(rig.manager.calls(), vec![open_call(300)]);
    assert!(rig.controller.is_window_open());
    assert_eq!(rig.outcomes.outcomes(), vec![WindowOutcome::Opened { timeout_secs: 300 }]);
}

#[test]
fn limits_are_inclusive() {
    let rig = Rig::new();

    rig.controller.open_window(MIN);
    rig.controller.open_window(MAX);
    rig.run();

    assert_eq!(
        rig.outcomes.outcomes(),
        vec![
            WindowOutcome::Opened { timeout_secs: MIN },
            WindowOutcome::Opened { timeout_secs: MAX },
        ]
    );
}

#[test]
fn default_window_uses_300_seconds() {
    let rig = Rig::new();

    assert!(rig.controller.open_default_window());
    rig.run();

    assert_eq!(rig.manager.calls(), vec![open_call(300)]);
}

// ── Mutual exclusion ──────────────────────────────────────────

#[test]
fn open_while_window_stays_open_is_busy() {
    let rig = Rig::with_manager(MockWindowManager::new(MIN, MAX).with_deferred_close());
    rig.manager.set_open(true);

    assert!(rig.controller.open_window(300));
    rig.run();

    assert_eq!(rig.manager.calls(), vec![WindowCall::Close], "no second open attempted");
    assert_eq!(rig.outcomes.outcomes(), vec![WindowOutcome::AlreadyOpen]);
    assert!(rig.controller.is_window_open());
}

#[test]
fn open_replaces_window_when_close_is_immediate() {
    let rig = Rig::new();
    rig.manager.set_open(true);

    rig.controller.open_window(600);
    rig.run();

    assert_eq!(rig.manager.calls(), vec![WindowCall::Close, open_call(600)]);
}

// ── Fail-safe gating ──────────────────────────────────────────

#[test]
fn armed_fail_safe_blocks_open() {
    let rig = Rig::new();
    rig.fail_safe.set_disarmed(false);

    assert!(rig.controller.open_window(300));
    rig.run();

    assert_eq!(rig.manager.open_calls(), 0);
    assert_eq!(rig.outcomes.outcomes(), vec![WindowOutcome::FailSafeArmed]);
    assert!(!rig.controller.is_window_open());

    rig.fail_safe.set_disarmed(true);
    rig.controller.open_window(300);
    rig.run();
    assert_eq!(rig.manager.open_calls(), 1);
}

#[test]
fn framework_refusal_is_reported() {
    let rig = Rig::with_manager(MockWindowManager::new(MIN, MAX).failing_open(0x2d));

    assert!(rig.controller.open_window(300));
    rig.run();

    assert_eq!(rig.outcomes.outcomes(), vec![WindowOutcome::OpenFailed(FrameworkError(0x2d))]);
    assert!(!rig.controller.is_window_open());
}

// ── FIFO ordering ─────────────────────────────────────────────

#[test]
fn close_then_open_runs_in_post_order() {
    let rig = Rig::new();
    rig.manager.set_open(true);

    assert!(rig.controller.close_window());
    assert!(rig.controller.open_window(300));
    assert_eq!(rig.controller.executor().pending(), 2);
    rig.run();

    assert_eq!(rig.manager.calls(), vec![WindowCall::Close, open_call(300)]);
    assert_eq!(rig.outcomes.requests(), vec![WindowRequest::close(), WindowRequest::open(300)]);
    assert_eq!(
        rig.outcomes.outcomes(),
        vec![WindowOutcome::Closed, WindowOutcome::Opened { timeout_secs: 300 }]
    );
}

#[test]
fn nothing_runs_until_the_worker_drains() {
    let rig = Rig::new();

    rig.controller.open_window(300);
    assert!(rig.manager.calls().is_empty());
    assert!(!rig.controller.is_window_open());
}

// ── Worker thread ─────────────────────────────────────────────

#[test]
fn worker_thread_applies_requests_in_order() {
    let manager = Arc::new(MockWindowManager::new(MIN, MAX));
    let outcomes = Arc::new(OutcomeRecorder::default());
    let worker = WindowWorker::new(manager.clone(), MockFailSafe::disarmed())
        .with_sink(outcomes.clone());
    let executor = QueueExecutor::new();
    let controller = WindowController::new(executor.clone(), manager.clone());
    let running = executor.spawn_worker(worker).unwrap();

    assert!(controller.open_window(300));
    assert!(controller.close_window());
    assert!(controller.open_window(120));

    // Stop is queued behind the three requests, so all of them run.
    running.shutdown();

    assert_eq!(
        manager.calls(),
        vec![open_call(300), WindowCall::Close, open_call(120)]
    );
    assert_eq!(outcomes.outcomes().len(), 3);
    assert!(!controller.open_window(300), "posts after shutdown are refused");
    assert_eq!(manager.open_calls(), 2);
}

//! Integration tests for framework events → LifecycleDispatcher → SessionTracker.

use std::sync::Arc;

use log::Level;
use smartnode::app::dispatcher::{LifecycleDispatcher, SessionTransition};
use smartnode::app::events::PlatformEvent;
use smartnode::app::session::SessionTracker;

fn dispatcher() -> (LifecycleDispatcher, Arc<SessionTracker>) {
    let session = Arc::new(SessionTracker::new());
    (LifecycleDispatcher::new(session.clone()), session)
}

#[test]
fn fail_safe_expiry_ends_session_at_error_level() {
    let (d, session) = dispatcher();

    let started = d.handle(PlatformEvent::SessionStarted);
    assert_eq!(started, Some(SessionTransition::Started));
    assert!(session.is_in_progress());

    let failed = d.handle(PlatformEvent::FailSafeExpired);
    assert_eq!(failed, Some(SessionTransition::Failed));
    assert!(!session.is_in_progress());
    assert_eq!(failed.map(SessionTransition::level), Some(Level::Error));
}

#[test]
fn successful_commissioning_sequence() {
    let (d, session) = dispatcher();

    let transitions: Vec<_> = [
        PlatformEvent::Ipv6Assigned,
        PlatformEvent::WindowOpened,
        PlatformEvent::SessionStarted,
        PlatformEvent::CommissioningComplete,
        PlatformEvent::SessionStopped,
        PlatformEvent::WindowClosed,
    ]
    .into_iter()
    .filter_map(|e| d.handle(e))
    .collect();

    assert_eq!(
        transitions,
        vec![
            SessionTransition::Started,
            SessionTransition::Completed,
            SessionTransition::Stopped,
        ]
    );
    assert!(transitions.iter().all(|t| t.level() == Level::Info));
    assert!(!session.is_in_progress());
}

#[test]
fn informational_events_leave_flag_alone() {
    let (d, session) = dispatcher();
    d.handle(PlatformEvent::SessionStarted);

    for event in [
        PlatformEvent::Ipv4Assigned,
        PlatformEvent::Ipv6Assigned,
        PlatformEvent::WindowOpened,
        PlatformEvent::WindowClosed,
        PlatformEvent::Other(42),
    ] {
        assert_eq!(d.handle(event), None);
        assert!(session.is_in_progress(), "{:?} must not clear the flag", event);
    }
}

#[test]
fn codes_from_the_shim_drive_the_flag() {
    let (d, session) = dispatcher();

    d.handle(PlatformEvent::from_code(3));
    assert!(session.is_in_progress());
    d.handle(PlatformEvent::from_code(4));
    assert!(!session.is_in_progress());
}

#[test]
fn clones_share_one_tracker() {
    let (d, session) = dispatcher();
    let other = d.clone();

    other.handle(PlatformEvent::SessionStarted);
    assert!(d.session().is_in_progress());
    assert!(session.is_in_progress());
}

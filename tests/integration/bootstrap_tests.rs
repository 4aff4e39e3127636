//! Integration tests for the NodeService bootstrap sequence.

use std::sync::Arc;

use smartnode::app::events::PlatformEvent;
use smartnode::app::ports::{
    AttributeUpdate, FrameworkError, IdentifyRequest, NodeHooks, StorageInitError,
};
use smartnode::app::service::NodeService;
use smartnode::app::session::SessionTracker;
use smartnode::config::NodeConfig;
use smartnode::error::Error;

use crate::mock_platform::{CallLog, MockButton, MockFramework, MockStorage};

type Service = NodeService<MockStorage, MockFramework, MockButton>;

fn service(storage: MockStorage, framework: MockFramework, button: MockButton) -> Service {
    NodeService::new(
        NodeConfig::default(),
        storage,
        framework,
        button,
        Arc::new(SessionTracker::new()),
    )
}

#[test]
fn happy_path_runs_every_step_in_order() {
    let log = CallLog::default();
    let mut svc = service(
        MockStorage::new(log.clone()),
        MockFramework::new(log.clone()),
        MockButton::new(log.clone()),
    );

    let info = svc.initialize().unwrap();

    assert_eq!(
        log.calls(),
        vec![
            "storage.init",
            "button.initialize",
            "framework.create_root_node",
            "framework.start",
        ]
    );
    assert_eq!(svc.framework().label.as_deref(), Some("SmartNode"));
    assert!(svc.button().active);
    assert_eq!(svc.button().config, Some(svc.config().button));
    assert!(!info.project_name.is_empty());
}

#[test]
fn unrecoverable_storage_stops_bootstrap() {
    let log = CallLog::default();
    let mut svc = service(
        MockStorage::new(log.clone()).with_init_results([Err(StorageInitError::Other(0x1105))]),
        MockFramework::new(log.clone()),
        MockButton::new(log.clone()),
    );

    let err = svc.initialize().unwrap_err();

    assert_eq!(err, Error::Storage(StorageInitError::Other(0x1105)));
    assert!(err.is_fatal());
    assert_eq!(log.calls(), vec!["storage.init"], "no later step attempted");
    assert!(svc.framework().dispatcher.is_none());
}

#[test]
fn no_free_pages_erases_and_retries_once() {
    let log = CallLog::default();
    let mut svc = service(
        MockStorage::new(log.clone()).with_init_results([Err(StorageInitError::NoFreePages)]),
        MockFramework::new(log.clone()),
        MockButton::new(log.clone()),
    );

    assert!(svc.initialize().is_ok());
    assert_eq!(
        &log.calls()[..3],
        &["storage.init", "storage.erase", "storage.init"]
    );
}

#[test]
fn failed_retry_after_new_version_is_fatal() {
    let log = CallLog::default();
    let mut svc = service(
        MockStorage::new(log.clone()).with_init_results([
            Err(StorageInitError::NewVersionFound),
            Err(StorageInitError::NewVersionFound),
        ]),
        MockFramework::new(log.clone()),
        MockButton::new(log.clone()),
    );

    assert_eq!(
        svc.initialize(),
        Err(Error::Storage(StorageInitError::NewVersionFound))
    );
    assert_eq!(log.calls(), vec!["storage.init", "storage.erase", "storage.init"]);
}

#[test]
fn failed_erase_is_fatal() {
    let log = CallLog::default();
    let mut svc = service(
        MockStorage::new(log.clone())
            .with_init_results([Err(StorageInitError::NoFreePages)])
            .failing_erase(StorageInitError::Other(-1)),
        MockFramework::new(log.clone()),
        MockButton::new(log.clone()),
    );

    assert_eq!(svc.initialize(), Err(Error::Storage(StorageInitError::Other(-1))));
    assert_eq!(log.calls(), vec!["storage.init", "storage.erase"]);
}

#[test]
fn button_failure_only_degrades() {
    let log = CallLog::default();
    let mut svc = service(
        MockStorage::new(log.clone()),
        MockFramework::new(log.clone()),
        MockButton::new(log.clone()).failing(),
    );

    assert!(svc.initialize().is_ok());
    assert!(!svc.button().active);
    assert!(svc.framework().dispatcher.is_some());
}

#[test]
fn root_node_failure_is_fatal_and_skips_start() {
    let log = CallLog::default();
    let mut svc = service(
        MockStorage::new(log.clone()),
        MockFramework::new(log.clone()).failing_create(-1),
        MockButton::new(log.clone()),
    );

    assert_eq!(svc.initialize(), Err(Error::NodeCreate(FrameworkError(-1))));
    assert!(!log.calls().contains(&"framework.start"));
}

#[test]
fn framework_start_failure_is_fatal() {
    let log = CallLog::default();
    let mut svc = service(
        MockStorage::new(log.clone()),
        MockFramework::new(log.clone()).failing_start(0x03),
        MockButton::new(log.clone()),
    );

    let err = svc.initialize().unwrap_err();
    assert_eq!(err, Error::FrameworkStart(FrameworkError(0x03)));
    assert_eq!(err.to_string(), "framework start: framework error 3");
}

#[test]
fn registered_hooks_accept_everything() {
    let log = CallLog::default();
    let mut svc = service(
        MockStorage::new(log.clone()),
        MockFramework::new(log.clone()),
        MockButton::new(log.clone()),
    );
    svc.initialize().unwrap();

    let hooks = svc.framework().hooks.as_ref().unwrap();
    let update = AttributeUpdate { phase: 0, endpoint_id: 0, cluster_id: 0x28, attribute_id: 5 };
    let identify = IdentifyRequest { kind: 0, endpoint_id: 0, effect_id: 0, effect_variant: 0 };
    assert!(hooks.on_attribute_update(&update).is_ok());
    assert!(hooks.on_identify(&identify).is_ok());
}

#[test]
fn started_framework_feeds_the_session_tracker() {
    let log = CallLog::default();
    let mut svc = service(
        MockStorage::new(log.clone()),
        MockFramework::new(log.clone()),
        MockButton::new(log.clone()),
    );
    svc.initialize().unwrap();

    svc.framework().emit(PlatformEvent::SessionStarted);
    assert!(svc.session().is_in_progress());
    svc.framework().emit(PlatformEvent::FailSafeExpired);
    assert!(!svc.session().is_in_progress());
}

#[test]
fn release_tears_down_the_button_once() {
    let log = CallLog::default();
    let mut svc = service(
        MockStorage::new(log.clone()),
        MockFramework::new(log.clone()),
        MockButton::new(log.clone()),
    );
    svc.initialize().unwrap();

    assert!(svc.release());
    assert!(!svc.release());
}

#[test]
fn invalid_config_is_rejected_before_storage() {
    let log = CallLog::default();
    let mut config = NodeConfig::default();
    config.button.short_press_ms = config.button.long_press_ms;
    let mut svc = NodeService::new(
        config,
        MockStorage::new(log.clone()),
        MockFramework::new(log.clone()),
        MockButton::new(log.clone()),
        Arc::new(SessionTracker::new()),
    );

    assert!(matches!(svc.initialize(), Err(Error::Config(_))));
    assert!(log.calls().is_empty());
}

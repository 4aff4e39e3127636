//! SmartNode Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  NvsFlash        MatterFramework   MatterWindowManager         │
//! │  (StoragePort)   (FrameworkPort)   (WindowManagerPort)         │
//! │  ButtonAdapter   MatterExecutor    LogOutcomeSink              │
//! │  (ButtonPort)    (SerialExecutor)  (OutcomeSink)               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  NodeService (bootstrap) · WindowController/Worker     │    │
//! │  │  LifecycleDispatcher · SessionTracker                  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};
use log::{error, info};

use smartnode::adapters::log_sink::LogOutcomeSink;
use smartnode::adapters::matter::{
    MatterExecutor, MatterFailSafe, MatterFramework, MatterWindowManager,
};
use smartnode::adapters::nvs::NvsFlash;
use smartnode::app::service::{NodeService, handle_gesture};
use smartnode::app::session::SessionTracker;
use smartnode::app::window::{WindowController, WindowWorker};
use smartnode::config::{ActiveLevel, ButtonConfig, NodeConfig};
use smartnode::diagnostics;
use smartnode::drivers::button::{ButtonAdapter, ButtonError};

const STATUS_INTERVAL: Duration = Duration::from_secs(60);

type ButtonPin = PinDriver<'static, AnyIOPin, Input>;

fn open_button_pin(config: &ButtonConfig) -> Result<ButtonPin, ButtonError> {
    // SAFETY: the button GPIO is reserved for this driver in `pins.rs`;
    // nothing else claims it.
    let pin = unsafe { AnyIOPin::new(config.gpio) };
    let mut driver = PinDriver::input(pin).map_err(|e| {
        error!("Button: GPIO{} input setup failed: {}", config.gpio, e);
        ButtonError::PeripheralInitFailed
    })?;
    let pull = match config.active_level {
        ActiveLevel::Low => Pull::Up,
        ActiveLevel::High => Pull::Down,
    };
    driver
        .set_pull(pull)
        .map_err(|_| ButtonError::PeripheralInitFailed)?;
    Ok(driver)
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    diagnostics::install_panic_handler();

    info!("╔══════════════════════════════════════╗");
    info!("║  SmartNode v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = NodeConfig::load().map_err(|e| anyhow!("config: {e}"))?;

    // ── 2. Window control wiring ──────────────────────────────
    let session = Arc::new(SessionTracker::new());
    let manager = Arc::new(MatterWindowManager::new());
    let worker =
        WindowWorker::new(manager.clone(), MatterFailSafe).with_sink(LogOutcomeSink::new());
    let controller = Arc::new(WindowController::new(MatterExecutor::new(worker), manager));

    let timeout = config.window_timeout_secs;
    let gesture_controller = controller.clone();
    let button = ButtonAdapter::new(Box::new(open_button_pin), move |gesture| {
        let _ = handle_gesture(&gesture_controller, gesture, timeout);
    });

    // ── 3. Bootstrap ──────────────────────────────────────────
    let mut node = NodeService::new(
        config,
        NvsFlash::new(),
        MatterFramework::new(),
        button,
        session,
    );
    if let Err(e) = node.initialize() {
        error!("Bootstrap failed: {}", e);
        return Err(e.into());
    }

    // ── 4. Idle ───────────────────────────────────────────────
    // The framework's tasks and the button task do the work from here.
    loop {
        std::thread::sleep(STATUS_INTERVAL);
        info!(
            "Node: window_open={} commissioning={}",
            controller.is_window_open(),
            node.session().is_in_progress()
        );
    }
}

//! Node service, the bootstrap orchestrator.
//!
//! [`NodeService`] owns the storage, framework and button ports and brings
//! them up in a fixed order, failing fast on anything the node cannot run
//! without. After [`initialize`](NodeService::initialize) returns the
//! framework's own contexts drive everything; the service only keeps the
//! button alive until [`release`](NodeService::release).
//!
//! ```text
//!  StoragePort ──▶ ┌────────────────────────┐
//!   ButtonPort ──▶ │      NodeService       │ ──▶ SystemInfo summary
//! FrameworkPort ◀──│  storage · button ·    │
//!                  │  root node · start     │
//!                  └────────────────────────┘
//! ```

use std::sync::Arc;

use log::{info, warn};

use crate::config::NodeConfig;
use crate::diagnostics::SystemInfo;
use crate::drivers::button::ButtonGesture;
use crate::error::{Error, Result};

use super::commands::WindowRequest;
use super::dispatcher::LifecycleDispatcher;
use super::ports::{
    ButtonPort, DefaultNodeHooks, FrameworkPort, SerialExecutor, StoragePort, WindowManagerPort,
};
use super::session::SessionTracker;
use super::window::WindowController;

// ───────────────────────────────────────────────────────────────
// Gesture mapping
// ───────────────────────────────────────────────────────────────

/// Single click opens for `timeout_secs`; double click closes.
pub const fn gesture_request(gesture: ButtonGesture, timeout_secs: u16) -> WindowRequest {
    match gesture {
        ButtonGesture::SingleClick => WindowRequest::open(timeout_secs),
        ButtonGesture::DoubleClick => WindowRequest::close(),
    }
}

/// Forward a gesture to the controller. Returns whether it was posted.
pub fn handle_gesture<E, W>(
    controller: &WindowController<E, W>,
    gesture: ButtonGesture,
    timeout_secs: u16,
) -> bool
where
    E: SerialExecutor,
    W: WindowManagerPort,
{
    info!("Button: {:?}", gesture);
    match gesture_request(gesture, timeout_secs).open_timeout() {
        Some(t) => controller.open_window(t),
        None => controller.close_window(),
    }
}

// ───────────────────────────────────────────────────────────────
// NodeService
// ───────────────────────────────────────────────────────────────

pub struct NodeService<S, N, B> {
    config: NodeConfig,
    storage: S,
    framework: N,
    button: B,
    session: Arc<SessionTracker>,
}

impl<S, N, B> NodeService<S, N, B>
where
    S: StoragePort,
    N: FrameworkPort,
    B: ButtonPort,
{
    pub fn new(
        config: NodeConfig,
        storage: S,
        framework: N,
        button: B,
        session: Arc<SessionTracker>,
    ) -> Self {
        Self {
            config,
            storage,
            framework,
            button,
            session,
        }
    }

    /// Run the bootstrap sequence.
    ///
    /// 1. validate configuration
    /// 2. storage (erase and retry once on a recoverable error)
    /// 3. button (a failure only degrades the node)
    /// 4. root node with no-op attribute/identify hooks
    /// 5. framework start with the lifecycle dispatcher
    /// 6. diagnostic summary
    ///
    /// Stops at the first fatal step; later steps are not attempted.
    pub fn initialize(&mut self) -> Result<SystemInfo> {
        self.config.validate().map_err(Error::Config)?;

        self.init_storage()?;

        if let Err(e) = self.button.initialize(&self.config.button) {
            warn!("Bootstrap: {} (continuing without button)", Error::from(e));
        }

        self.framework
            .create_root_node(&self.config.identity, Box::new(DefaultNodeHooks))
            .map_err(Error::NodeCreate)?;

        self.framework
            .start(LifecycleDispatcher::new(self.session.clone()))
            .map_err(Error::FrameworkStart)?;

        let info = SystemInfo::collect();
        info.log_summary();
        info!("Bootstrap: complete");
        Ok(info)
    }

    /// Release the button. Returns whether it had been initialised.
    pub fn release(&mut self) -> bool {
        self.button.teardown()
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionTracker {
        &self.session
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn framework(&self) -> &N {
        &self.framework
    }

    pub fn button(&self) -> &B {
        &self.button
    }

    fn init_storage(&mut self) -> Result<()> {
        match self.storage.init() {
            Ok(()) => Ok(()),
            Err(e) if e.is_recoverable() => {
                warn!("NVS: {}, erasing and retrying", e);
                self.storage.erase()?;
                self.storage.init()?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

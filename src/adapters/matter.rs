//! Commissioning framework adapter.
//!
//! Implements the framework-facing ports:
//!
//! | Type                  | Port                | Framework object              |
//! |-----------------------|---------------------|-------------------------------|
//! | `MatterWindowManager` | WindowManagerPort   | commissioning window manager  |
//! | `MatterFailSafe`      | FailSafePort        | fail-safe context             |
//! | `MatterFramework`     | FrameworkPort       | root node + event loop        |
//! | `MatterExecutor`      | SerialExecutor      | platform work queue (device)  |
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: calls into the `node_shim` C++ component,
//!   which wraps the esp-matter SDK behind a flat C ABI.
//! - **all other targets**: in-memory simulation with the SDK's default
//!   timeout limits (3–15 min). The simulation has no work queue; pair it
//!   with [`QueueExecutor`](crate::executor::QueueExecutor).

use log::info;

use crate::app::dispatcher::LifecycleDispatcher;
use crate::app::ports::{
    Advertisement, FailSafePort, FrameworkError, FrameworkPort, NodeHooks, WindowManagerPort,
};
use crate::config::NodeIdentity;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

/// SDK default minimum window length (3 minutes).
pub const SIM_MIN_TIMEOUT_SECS: u16 = 180;
/// SDK default maximum window length (15 minutes).
pub const SIM_MAX_TIMEOUT_SECS: u16 = 900;

// ───────────────────────────────────────────────────────────────
// FFI surface of components/node_shim
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod ffi {
    use core::ffi::{c_char, c_void};

    pub type EventCb = extern "C" fn(code: u8, arg: isize);
    pub type WorkCb = extern "C" fn(arg: isize);
    pub type AttrCb = extern "C" fn(u8, u16, u32, u32, *mut c_void) -> i32;
    pub type IdentCb = extern "C" fn(u8, u16, u8, u8, *mut c_void) -> i32;

    unsafe extern "C" {
        pub fn node_shim_create_root_node(
            label: *const c_char,
            attr_cb: AttrCb,
            ident_cb: IdentCb,
            priv_data: *mut c_void,
        ) -> bool;
        pub fn node_shim_start(cb: EventCb, arg: isize) -> i32;
        pub fn node_shim_schedule_work(cb: WorkCb, arg: isize) -> i32;
        pub fn node_shim_window_is_open() -> bool;
        pub fn node_shim_window_close();
        pub fn node_shim_window_open_basic(timeout_secs: u16, dnssd_only: bool) -> i32;
        pub fn node_shim_window_min_timeout() -> u16;
        pub fn node_shim_window_max_timeout() -> u16;
        pub fn node_shim_failsafe_fully_disarmed() -> bool;
    }
}

// ───────────────────────────────────────────────────────────────
// Window manager
// ───────────────────────────────────────────────────────────────

/// The framework's commissioning window manager.
#[derive(Debug, Default)]
pub struct MatterWindowManager {
    #[cfg(not(target_os = "espidf"))]
    open: AtomicBool,
}

impl MatterWindowManager {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(target_os = "espidf")]
impl WindowManagerPort for MatterWindowManager {
    fn is_window_open(&self) -> bool {
        // SAFETY: read-only query; the SDK allows it from any task.
        unsafe { ffi::node_shim_window_is_open() }
    }

    fn close_window(&self) {
        // SAFETY: only reached from the worker on the platform work queue.
        unsafe { ffi::node_shim_window_close() }
    }

    fn open_basic_window(
        &self,
        timeout_secs: u16,
        advertisement: Advertisement,
    ) -> Result<(), FrameworkError> {
        let dnssd_only = advertisement == Advertisement::DnssdOnly;
        // SAFETY: only reached from the worker on the platform work queue.
        match unsafe { ffi::node_shim_window_open_basic(timeout_secs, dnssd_only) } {
            0 => Ok(()),
            code => Err(FrameworkError(code)),
        }
    }

    fn min_timeout_secs(&self) -> u16 {
        // SAFETY: constant query.
        unsafe { ffi::node_shim_window_min_timeout() }
    }

    fn max_timeout_secs(&self) -> u16 {
        // SAFETY: constant query.
        unsafe { ffi::node_shim_window_max_timeout() }
    }
}

#[cfg(not(target_os = "espidf"))]
impl WindowManagerPort for MatterWindowManager {
    fn is_window_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn close_window(&self) {
        if self.open.swap(false, Ordering::AcqRel) {
            info!("Matter(sim): window closed");
        }
    }

    fn open_basic_window(
        &self,
        timeout_secs: u16,
        advertisement: Advertisement,
    ) -> Result<(), FrameworkError> {
        self.open.store(true, Ordering::Release);
        info!("Matter(sim): window open for {}s ({:?})", timeout_secs, advertisement);
        Ok(())
    }

    fn min_timeout_secs(&self) -> u16 {
        SIM_MIN_TIMEOUT_SECS
    }

    fn max_timeout_secs(&self) -> u16 {
        SIM_MAX_TIMEOUT_SECS
    }
}

// ───────────────────────────────────────────────────────────────
// Fail-safe
// ───────────────────────────────────────────────────────────────

/// The framework's fail-safe context.
#[derive(Debug, Default, Clone, Copy)]
pub struct MatterFailSafe;

impl FailSafePort for MatterFailSafe {
    #[cfg(target_os = "espidf")]
    fn is_fully_disarmed(&self) -> bool {
        // SAFETY: read-only query.
        unsafe { ffi::node_shim_failsafe_fully_disarmed() }
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_fully_disarmed(&self) -> bool {
        true
    }
}

// ───────────────────────────────────────────────────────────────
// Root node + event loop
// ───────────────────────────────────────────────────────────────

/// Root node creation and framework start-up.
#[derive(Default)]
pub struct MatterFramework {
    #[cfg(not(target_os = "espidf"))]
    label: Option<heapless::String<32>>,
    #[cfg(not(target_os = "espidf"))]
    dispatcher: Option<LifecycleDispatcher>,
}

impl MatterFramework {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(target_os = "espidf")]
mod callbacks {
    use core::ffi::c_void;

    use crate::app::dispatcher::LifecycleDispatcher;
    use crate::app::events::PlatformEvent;
    use crate::app::ports::{AttributeUpdate, IdentifyRequest, NodeHooks};

    pub extern "C" fn on_event(code: u8, arg: isize) {
        // SAFETY: `arg` is the leaked dispatcher box from `start`, alive for
        // the rest of the process.
        let dispatcher = unsafe { &*(arg as *const LifecycleDispatcher) };
        dispatcher.handle(PlatformEvent::from_code(code));
    }

    fn hooks<'a>(priv_data: *mut c_void) -> Option<&'a dyn NodeHooks> {
        if priv_data.is_null() {
            return None;
        }
        // SAFETY: non-null `priv_data` is the leaked hooks box from
        // `create_root_node`.
        Some(unsafe { &**(priv_data as *const Box<dyn NodeHooks>) })
    }

    pub extern "C" fn on_attribute(
        phase: u8,
        endpoint_id: u16,
        cluster_id: u32,
        attribute_id: u32,
        priv_data: *mut c_void,
    ) -> i32 {
        let update = AttributeUpdate { phase, endpoint_id, cluster_id, attribute_id };
        match hooks(priv_data).map(|h| h.on_attribute_update(&update)) {
            Some(Err(e)) => e.0,
            _ => 0,
        }
    }

    pub extern "C" fn on_identify(
        kind: u8,
        endpoint_id: u16,
        effect_id: u8,
        effect_variant: u8,
        priv_data: *mut c_void,
    ) -> i32 {
        let request = IdentifyRequest { kind, endpoint_id, effect_id, effect_variant };
        match hooks(priv_data).map(|h| h.on_identify(&request)) {
            Some(Err(e)) => e.0,
            _ => 0,
        }
    }
}

#[cfg(target_os = "espidf")]
impl FrameworkPort for MatterFramework {
    fn create_root_node(
        &mut self,
        identity: &NodeIdentity,
        hooks: Box<dyn NodeHooks>,
    ) -> Result<(), FrameworkError> {
        let mut label = [0u8; 33];
        let bytes = identity.product_name.as_bytes();
        label[..bytes.len()].copy_from_slice(bytes);

        let priv_data = Box::into_raw(Box::new(hooks));
        // SAFETY: `label` is null-terminated and copied by the SDK;
        // `priv_data` stays alive for the process on success.
        let created = unsafe {
            ffi::node_shim_create_root_node(
                label.as_ptr().cast(),
                callbacks::on_attribute,
                callbacks::on_identify,
                priv_data.cast(),
            )
        };
        if !created {
            // SAFETY: the SDK did not keep the pointer.
            drop(unsafe { Box::from_raw(priv_data) });
            return Err(FrameworkError(-1));
        }
        info!("Matter: root node (endpoint 0) added, label '{}'", identity.product_name);
        Ok(())
    }

    fn start(&mut self, dispatcher: LifecycleDispatcher) -> Result<(), FrameworkError> {
        let arg = Box::into_raw(Box::new(dispatcher));
        // SAFETY: `arg` is leaked for the process lifetime once the event
        // loop is running; there is no framework shutdown path.
        let ret = unsafe { ffi::node_shim_start(callbacks::on_event, arg as isize) };
        if ret != 0 {
            // SAFETY: the event loop did not start, so no callback holds `arg`.
            drop(unsafe { Box::from_raw(arg) });
            return Err(FrameworkError(ret));
        }
        info!("Matter: started");
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl FrameworkPort for MatterFramework {
    fn create_root_node(
        &mut self,
        identity: &NodeIdentity,
        _hooks: Box<dyn NodeHooks>,
    ) -> Result<(), FrameworkError> {
        self.label = Some(identity.product_name.clone());
        info!("Matter(sim): root node (endpoint 0) added, label '{}'", identity.product_name);
        Ok(())
    }

    fn start(&mut self, dispatcher: LifecycleDispatcher) -> Result<(), FrameworkError> {
        self.dispatcher = Some(dispatcher);
        info!("Matter(sim): started");
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl MatterFramework {
    /// Label of the created root node, if any.
    pub fn root_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Deliver a platform event as the event loop would.
    pub fn emit(&self, event: crate::app::events::PlatformEvent) {
        if let Some(d) = &self.dispatcher {
            d.handle(event);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Platform work queue (device)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use device_executor::MatterExecutor;

#[cfg(target_os = "espidf")]
mod device_executor {
    use std::sync::Arc;

    use super::{MatterFailSafe, MatterWindowManager, ffi};
    use crate::app::commands::WindowRequest;
    use crate::app::ports::{FrameworkError, OutcomeSink, PostError, SerialExecutor};
    use crate::app::window::WindowWorker;

    type Worker<S> = WindowWorker<MatterWindowManager, MatterFailSafe, S>;

    struct Job<S> {
        worker: Arc<Worker<S>>,
        request: WindowRequest,
    }

    extern "C" fn run_job<S: OutcomeSink + 'static>(arg: isize) {
        // SAFETY: `arg` came from `Box::into_raw` in `post` and the SDK
        // runs each work item exactly once.
        let job = unsafe { Box::from_raw(arg as *mut Job<S>) };
        job.worker.apply(job.request);
    }

    /// Posts requests onto the framework's platform work queue, which
    /// runs them one at a time in post order.
    pub struct MatterExecutor<S> {
        worker: Arc<Worker<S>>,
    }

    impl<S: OutcomeSink + 'static> MatterExecutor<S> {
        pub fn new(worker: Worker<S>) -> Self {
            Self { worker: Arc::new(worker) }
        }
    }

    impl<S: OutcomeSink + 'static> SerialExecutor for MatterExecutor<S> {
        fn post(&self, request: WindowRequest) -> Result<(), PostError> {
            let job = Box::into_raw(Box::new(Job { worker: self.worker.clone(), request }));
            // SAFETY: ownership of `job` passes to the work item on success.
            let ret = unsafe { ffi::node_shim_schedule_work(run_job::<S>, job as isize) };
            if ret != 0 {
                // SAFETY: the SDK rejected the item and will never run it.
                drop(unsafe { Box::from_raw(job) });
                return Err(PostError::Rejected(FrameworkError(ret)));
            }
            Ok(())
        }
    }
}

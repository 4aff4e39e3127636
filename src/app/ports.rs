//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ WindowWorker / NodeService (domain)
//! ```
//!
//! The commissioning framework is split into narrow capabilities so the
//! window worker only sees what it needs (window manager + fail-safe) and
//! the bootstrap service only sees node creation and start-up.
//!
//! ## Threading
//!
//! [`WindowManagerPort`] and [`FailSafePort`] take `&self`: the real
//! framework serialises mutation itself, and `is_window_open` must be
//! callable from any context. Implementations that keep local state use
//! interior mutability.

use core::fmt;

use super::commands::WindowRequest;
use super::dispatcher::LifecycleDispatcher;
use super::events::WindowOutcome;
use crate::config::NodeIdentity;

// ───────────────────────────────────────────────────────────────
// Commissioning window manager (driven adapter: domain → framework)
// ───────────────────────────────────────────────────────────────

/// How an opened window is advertised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advertisement {
    /// Local service discovery only.
    DnssdOnly,
    /// Local service discovery plus BLE.
    DnssdAndBle,
}

/// The framework's commissioning-window subsystem.
pub trait WindowManagerPort: Send + Sync {
    /// Whether a commissioning window is currently open.
    fn is_window_open(&self) -> bool;

    /// Close the current window. Closing when none is open is a no-op.
    fn close_window(&self);

    /// Open a basic (non-enhanced) commissioning window.
    fn open_basic_window(
        &self,
        timeout_secs: u16,
        advertisement: Advertisement,
    ) -> Result<(), FrameworkError>;

    /// Smallest window timeout the manager accepts, in seconds.
    fn min_timeout_secs(&self) -> u16;

    /// Largest window timeout the manager accepts, in seconds.
    fn max_timeout_secs(&self) -> u16;
}

/// The framework's fail-safe context.
pub trait FailSafePort: Send + Sync {
    /// `true` when no commissioning attempt holds the fail-safe armed.
    fn is_fully_disarmed(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Serialized execution context
// ───────────────────────────────────────────────────────────────

/// Posts a request onto the single serialized context that owns the
/// window manager. Fire-and-forget: `Ok` means queued, nothing more.
pub trait SerialExecutor: Send + Sync {
    fn post(&self, request: WindowRequest) -> Result<(), PostError>;
}

/// Receives the structured result of every request the worker runs.
pub trait OutcomeSink: Send + Sync {
    fn report(&self, request: WindowRequest, outcome: &WindowOutcome);
}

impl OutcomeSink for () {
    fn report(&self, _request: WindowRequest, _outcome: &WindowOutcome) {}
}

impl<T: OutcomeSink + ?Sized> OutcomeSink for std::sync::Arc<T> {
    fn report(&self, request: WindowRequest, outcome: &WindowOutcome) {
        (**self).report(request, outcome);
    }
}

// ───────────────────────────────────────────────────────────────
// Persistent storage (driven adapter: bootstrap → NVS flash)
// ───────────────────────────────────────────────────────────────

/// Bring-up of the key-value flash partition. No keys are read or written
/// through this port; it only exists so bootstrap can fail fast.
pub trait StoragePort {
    fn init(&mut self) -> Result<(), StorageInitError>;

    /// Erase the whole partition. Only used for the one-shot recovery path.
    fn erase(&mut self) -> Result<(), StorageInitError>;
}

// ───────────────────────────────────────────────────────────────
// Framework lifecycle (driven adapter: bootstrap → framework)
// ───────────────────────────────────────────────────────────────

/// Attribute write notification handed to [`NodeHooks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeUpdate {
    /// Framework callback phase (pre-update, post-update, read, write).
    pub phase: u8,
    pub endpoint_id: u16,
    pub cluster_id: u32,
    pub attribute_id: u32,
}

/// Identify command handed to [`NodeHooks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifyRequest {
    /// Framework callback kind (start, stop, effect).
    pub kind: u8,
    pub endpoint_id: u16,
    pub effect_id: u8,
    pub effect_variant: u8,
}

/// Per-attribute and identification hooks registered on the root node.
///
/// Both default to accepting the request; products override them once
/// endpoints carry real attributes.
pub trait NodeHooks: Send + Sync {
    fn on_attribute_update(&self, _update: &AttributeUpdate) -> Result<(), FrameworkError> {
        Ok(())
    }

    fn on_identify(&self, _request: &IdentifyRequest) -> Result<(), FrameworkError> {
        Ok(())
    }
}

/// Hooks that accept everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNodeHooks;

impl NodeHooks for DefaultNodeHooks {}

/// Node creation and event-loop start-up.
pub trait FrameworkPort {
    /// Create the root configuration node (endpoint 0).
    fn create_root_node(
        &mut self,
        identity: &NodeIdentity,
        hooks: Box<dyn NodeHooks>,
    ) -> Result<(), FrameworkError>;

    /// Start the framework, delivering lifecycle events to `dispatcher`.
    fn start(&mut self, dispatcher: LifecycleDispatcher) -> Result<(), FrameworkError>;
}

// ───────────────────────────────────────────────────────────────
// Button peripheral (driven adapter: bootstrap → GPIO)
// ───────────────────────────────────────────────────────────────

/// Lifecycle of the physical button. Gesture delivery is configured when
/// the adapter is constructed.
pub trait ButtonPort {
    fn initialize(
        &mut self,
        config: &crate::config::ButtonConfig,
    ) -> Result<(), crate::drivers::button::ButtonError>;

    /// Release the peripheral. `false` if it was never initialised.
    fn teardown(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageInitError {
    /// Partition has no free pages; recoverable by erase.
    NoFreePages,
    /// Partition was written by a newer layout; recoverable by erase.
    NewVersionFound,
    /// Any other driver error code.
    Other(i32),
}

impl StorageInitError {
    /// Whether erasing the partition and retrying may succeed.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoFreePages | Self::NewVersionFound)
    }
}

/// Opaque framework error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkError(pub i32);

/// Errors from [`SerialExecutor::post`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostError {
    /// The request queue is full.
    QueueFull,
    /// The worker has shut down.
    Closed,
    /// The framework refused the work item.
    Rejected(FrameworkError),
}

impl fmt::Display for StorageInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFreePages => write!(f, "no free pages"),
            Self::NewVersionFound => write!(f, "new version found"),
            Self::Other(code) => write!(f, "driver error {}", code),
        }
    }
}

impl fmt::Display for FrameworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "framework error {}", self.0)
    }
}

impl fmt::Display for PostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => write!(f, "request queue full"),
            Self::Closed => write!(f, "worker stopped"),
            Self::Rejected(e) => write!(f, "work item rejected: {}", e),
        }
    }
}

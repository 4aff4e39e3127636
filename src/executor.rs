//! Queue-backed serialized executor.
//!
//! Producers post typed [`WindowRequest`]s into a bounded `embassy-sync`
//! channel; exactly one consumer applies them in FIFO order. The consumer
//! is either a dedicated worker thread ([`QueueExecutor::spawn_worker`]) or
//! a caller that owns the serialized context and calls
//! [`QueueExecutor::drain`] itself.
//!
//! ```text
//! ┌──────────────┐  WindowRequest  ┌──────────────┐
//! │ button task  │───────────────▶│              │    ┌──────────────┐
//! │ main task    │───────────────▶│ Job channel  │───▶│ WindowWorker │
//! │ other tasks  │───────────────▶│  (depth 8)   │    │ (one thread) │
//! └──────────────┘                 └──────────────┘    └──────────────┘
//! ```
//!
//! On the device the framework's own work queue plays this role (see
//! `adapters::matter::MatterExecutor`); this executor backs the simulation
//! build and the host tests.

use core::sync::atomic::{AtomicBool, Ordering};
use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};

use crate::app::commands::WindowRequest;
use crate::app::ports::{FailSafePort, OutcomeSink, PostError, SerialExecutor, WindowManagerPort};
use crate::app::window::WindowWorker;
use crate::drivers::task_pin::{self, Core};

/// Maximum number of requests waiting for the worker.
pub const QUEUE_DEPTH: usize = 8;

const WORKER_PRIORITY: u8 = 5;
const WORKER_STACK_KB: usize = 6;

enum Job {
    Window(WindowRequest),
    Stop,
}

type JobChannel = Channel<CriticalSectionRawMutex, Job, QUEUE_DEPTH>;

/// Cloneable producer handle onto the shared request queue.
#[derive(Clone)]
pub struct QueueExecutor {
    channel: Arc<JobChannel>,
    closed: Arc<AtomicBool>,
}

impl Default for QueueExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueExecutor {
    pub fn new() -> Self {
        Self {
            channel: Arc::new(Channel::new()),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests waiting to run.
    pub fn pending(&self) -> usize {
        self.channel.len()
    }

    /// Run every queued request on the calling thread, in post order.
    ///
    /// The caller becomes the serialized context for the duration of the
    /// call; do not mix with [`spawn_worker`](Self::spawn_worker).
    pub fn drain<W, F, S>(&self, worker: &WindowWorker<W, F, S>) -> usize
    where
        W: WindowManagerPort,
        F: FailSafePort,
        S: OutcomeSink,
    {
        let mut ran = 0;
        while let Ok(job) = self.channel.try_receive() {
            if let Job::Window(request) = job {
                worker.apply(request);
                ran += 1;
            }
        }
        ran
    }

    /// Start a worker thread that owns `worker` and applies requests as
    /// they arrive.
    pub fn spawn_worker<W, F, S>(&self, worker: WindowWorker<W, F, S>) -> io::Result<QueueWorker>
    where
        W: WindowManagerPort + 'static,
        F: FailSafePort + 'static,
        S: OutcomeSink + 'static,
    {
        let channel = self.channel.clone();
        let task = task_pin::spawn_on_core(
            Core::App,
            WORKER_PRIORITY,
            WORKER_STACK_KB,
            "window-worker\0",
            move || {
                loop {
                    match futures_lite::future::block_on(channel.receive()) {
                        Job::Window(request) => {
                            worker.apply(request);
                        }
                        Job::Stop => break,
                    }
                }
                info!("Executor: worker stopped");
            },
        )?;

        Ok(QueueWorker {
            executor: self.clone(),
            task,
        })
    }
}

impl SerialExecutor for QueueExecutor {
    fn post(&self, request: WindowRequest) -> Result<(), PostError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PostError::Closed);
        }
        self.channel
            .try_send(Job::Window(request))
            .map_err(|_| PostError::QueueFull)
    }
}

/// Running worker thread. Requests posted before
/// [`shutdown`](Self::shutdown) still run.
pub struct QueueWorker {
    executor: QueueExecutor,
    task: JoinHandle<()>,
}

impl QueueWorker {
    /// Refuse new posts, let queued requests finish, then join the thread.
    pub fn shutdown(self) {
        self.executor.closed.store(true, Ordering::Release);
        futures_lite::future::block_on(self.executor.channel.send(Job::Stop));
        if self.task.join().is_err() {
            warn!("Executor: worker panicked");
        }
    }
}

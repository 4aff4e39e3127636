//! Application core: pure domain logic, zero I/O.
//!
//! Commissioning-window rules, session tracking, lifecycle dispatch and
//! the bootstrap sequence. All interaction with the framework, flash and
//! GPIO happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod dispatcher;
pub mod events;
pub mod ports;
pub mod service;
pub mod session;
pub mod window;

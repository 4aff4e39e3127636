//! Peripheral drivers and task helpers.

pub mod button;
pub mod task_pin;

//! GPIO pin assignments for the SmartNode board.
//!
//! Single source of truth for default wiring. The button pin can still be
//! overridden through [`ButtonConfig`](crate::config::ButtonConfig).

/// On-board user button (BOOT strap on ESP32-C3/C6 devkits).
/// Active LOW with the internal pull-up enabled.
pub const DEFAULT_BUTTON_GPIO: i32 = 9;

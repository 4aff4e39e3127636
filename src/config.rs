//! Node configuration parameters
//!
//! Product identity, button wiring, and commissioning defaults.
//! Values come from [`NodeConfig::default()`] unless a JSON override is
//! baked in at build time through `SMARTNODE_CONFIG_JSON`.

use serde::{Deserialize, Serialize};

use crate::app::commands::DEFAULT_WINDOW_TIMEOUT_SECS;
use crate::pins;

/// Node label published on the root endpoint.
pub const PRODUCT_NAME: &str = "SmartNode";

/// Product identity metadata for the root node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIdentity {
    /// Basic-information node label (32 bytes max, framework limit).
    pub product_name: heapless::String<32>,
}

impl Default for NodeIdentity {
    fn default() -> Self {
        let mut product_name = heapless::String::new();
        let _ = product_name.push_str(PRODUCT_NAME);
        Self { product_name }
    }
}

/// Electrical level that means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveLevel {
    Low,
    High,
}

/// Button peripheral configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonConfig {
    /// GPIO number of the on-board button.
    pub gpio: i32,
    pub active_level: ActiveLevel,
    /// Maximum gap between clicks of a double click (milliseconds).
    pub short_press_ms: u16,
    /// Holds this long or longer are not clicks (milliseconds).
    pub long_press_ms: u16,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            gpio: pins::DEFAULT_BUTTON_GPIO,
            active_level: ActiveLevel::Low,
            short_press_ms: 180,
            long_press_ms: 5000,
        }
    }
}

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub identity: NodeIdentity,
    pub button: ButtonConfig,
    /// Window length used for a single click (seconds).
    pub window_timeout_secs: u16,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            identity: NodeIdentity::default(),
            button: ButtonConfig::default(),
            window_timeout_secs: DEFAULT_WINDOW_TIMEOUT_SECS,
        }
    }
}

impl NodeConfig {
    /// Build-time configuration: `SMARTNODE_CONFIG_JSON` if set, else defaults.
    pub fn load() -> Result<Self, &'static str> {
        match option_env!("SMARTNODE_CONFIG_JSON") {
            Some(json) => Self::from_json(json),
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, &'static str> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| "malformed config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the bootstrap cannot work with.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.identity.product_name.is_empty() {
            return Err("product_name must not be empty");
        }
        if self.button.short_press_ms == 0 {
            return Err("short_press_ms must be > 0");
        }
        if self.button.short_press_ms >= self.button.long_press_ms {
            return Err("short_press_ms must be < long_press_ms");
        }
        if self.window_timeout_secs == 0 {
            return Err("window_timeout_secs must be > 0");
        }
        Ok(())
    }
}

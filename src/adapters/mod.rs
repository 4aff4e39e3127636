//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to                     |
//! |-------------|--------------------|---------------------------------|
//! | `matter`    | WindowManagerPort  | commissioning window manager    |
//! |             | FailSafePort       | fail-safe context               |
//! |             | FrameworkPort      | root node + event loop          |
//! |             | SerialExecutor     | platform work queue (device)    |
//! | `log_sink`  | OutcomeSink        | Serial log output               |
//! | `nvs`       | StoragePort        | NVS flash / in-memory sim       |
//! | `device_id` | —                  | eFuse factory MAC               |

pub mod device_id;
pub mod log_sink;
pub mod matter;
pub mod nvs;

//! NVS (Non-Volatile Storage) flash adapter.
//!
//! Implements [`StoragePort`] for bootstrap. The firmware itself stores no
//! keys; the commissioning framework keeps fabrics and credentials in the
//! default NVS partition, so the partition must be up before the framework
//! starts.
//!
//! - **`target_os = "espidf"`**: `nvs_flash_init` / `nvs_flash_erase`.
//! - **other targets**: in-memory simulation that always succeeds.

use log::info;

use crate::app::ports::{StorageInitError, StoragePort};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{
    ESP_ERR_NVS_NEW_VERSION_FOUND, ESP_ERR_NVS_NO_FREE_PAGES, ESP_OK, esp_err_t,
    nvs_flash_erase, nvs_flash_init,
};

#[cfg(target_os = "espidf")]
fn map_err(ret: esp_err_t) -> Result<(), StorageInitError> {
    match ret {
        r if r == ESP_OK as esp_err_t => Ok(()),
        r if r == ESP_ERR_NVS_NO_FREE_PAGES as esp_err_t => Err(StorageInitError::NoFreePages),
        r if r == ESP_ERR_NVS_NEW_VERSION_FOUND as esp_err_t => {
            Err(StorageInitError::NewVersionFound)
        }
        r => Err(StorageInitError::Other(r)),
    }
}

/// Default NVS partition.
#[derive(Debug, Default)]
pub struct NvsFlash {
    #[cfg(not(target_os = "espidf"))]
    erase_count: u32,
}

impl NvsFlash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of erases performed (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn erase_count(&self) -> u32 {
        self.erase_count
    }
}

impl StoragePort for NvsFlash {
    #[cfg(target_os = "espidf")]
    fn init(&mut self) -> Result<(), StorageInitError> {
        // SAFETY: called once from the main task before the framework (the
        // only other NVS user) starts.
        map_err(unsafe { nvs_flash_init() })?;
        info!("NVS: default partition initialised");
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn init(&mut self) -> Result<(), StorageInitError> {
        info!("NVS(sim): initialised");
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn erase(&mut self) -> Result<(), StorageInitError> {
        log::warn!("NVS: erasing default partition");
        // SAFETY: see `init`.
        map_err(unsafe { nvs_flash_erase() })
    }

    #[cfg(not(target_os = "espidf"))]
    fn erase(&mut self) -> Result<(), StorageInitError> {
        self.erase_count += 1;
        info!("NVS(sim): erased");
        Ok(())
    }
}

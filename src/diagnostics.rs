//! Boot diagnostics and panic logging.
//!
//! [`SystemInfo`] is a read-only snapshot printed once at the end of
//! bootstrap: firmware identity, chip, flash, heap and station network
//! state. Nothing here changes device state.

use core::fmt::Write;
use std::net::Ipv4Addr;

use log::info;

use crate::adapters::device_id::{self, MacAddress};

/// Snapshot of the running system, collected on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub project_name: heapless::String<32>,
    pub app_version: heapless::String<32>,
    pub cores: u8,
    /// Chip revision as reported by the ROM, `major * 100 + minor`.
    pub revision: u16,
    pub flash_mb: u32,
    pub embedded_flash: bool,
    /// Free 8-bit capable heap, bytes.
    pub free_heap: u32,
    pub ipv4: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub mac: MacAddress,
}

impl SystemInfo {
    /// `(major, minor)` chip revision.
    pub const fn chip_revision(&self) -> (u16, u16) {
        (self.revision / 100, self.revision % 100)
    }

    pub const fn flash_kind(&self) -> &'static str {
        if self.embedded_flash { "embedded" } else { "external" }
    }

    /// Print the summary, one line per field.
    pub fn log_summary(&self) {
        let (major, minor) = self.chip_revision();
        info!("SYS | project: {}", self.project_name);
        info!("SYS | app version: {}", self.app_version);
        info!("SYS | cores: {}", self.cores);
        info!("SYS | chip revision: v{}.{}", major, minor);
        info!("SYS | flash: {}MB {}", self.flash_mb, self.flash_kind());
        info!("SYS | free heap: {} bytes", self.free_heap);
        info!("SYS | IPv4: {}", self.ipv4);
        info!("SYS | gateway: {}", self.gateway);
        info!(
            "SYS | MAC: {} ({})",
            device_id::format_mac(&self.mac),
            device_id::node_tag(&self.mac)
        );
    }

    #[cfg(target_os = "espidf")]
    pub fn collect() -> Self {
        use esp_idf_svc::sys::*;

        // SAFETY: every call below only fills caller-owned out-parameters
        // or returns pointers to static ROM/app data.
        unsafe {
            let mut chip: esp_chip_info_t = core::mem::zeroed();
            esp_chip_info(&mut chip);

            let mut flash_bytes: u32 = 0;
            if esp_flash_get_size(core::ptr::null_mut(), &mut flash_bytes) != ESP_OK as esp_err_t {
                flash_bytes = 0;
            }

            let desc = esp_app_get_description();
            let (project_name, app_version) = if desc.is_null() {
                (heapless::String::new(), heapless::String::new())
            } else {
                (c_field(&(*desc).project_name), c_field(&(*desc).version))
            };

            let (ipv4, gateway) = station_ip_info();

            let mut mac: MacAddress = [0u8; 6];
            if esp_read_mac(mac.as_mut_ptr(), esp_mac_type_t_ESP_MAC_WIFI_STA) != ESP_OK as esp_err_t
            {
                mac = device_id::read_mac();
            }

            Self {
                project_name,
                app_version,
                cores: chip.cores,
                revision: chip.revision,
                flash_mb: flash_bytes / (1024 * 1024),
                embedded_flash: chip.features & CHIP_FEATURE_EMB_FLASH != 0,
                free_heap: heap_caps_get_free_size(MALLOC_CAP_8BIT) as u32,
                ipv4,
                gateway,
                mac,
            }
        }
    }

    /// Simulation: fixed values shaped like a single-core C6 module.
    #[cfg(not(target_os = "espidf"))]
    pub fn collect() -> Self {
        let mut project_name = heapless::String::new();
        let _ = project_name.push_str(env!("CARGO_PKG_NAME"));
        let mut app_version = heapless::String::new();
        let _ = app_version.push_str(env!("CARGO_PKG_VERSION"));

        Self {
            project_name,
            app_version,
            cores: 1,
            revision: 1,
            flash_mb: 4,
            embedded_flash: false,
            free_heap: 307_200,
            ipv4: Ipv4Addr::UNSPECIFIED,
            gateway: Ipv4Addr::UNSPECIFIED,
            mac: device_id::read_mac(),
        }
    }
}

#[cfg(target_os = "espidf")]
fn c_field(raw: &[core::ffi::c_char]) -> heapless::String<32> {
    let mut s = heapless::String::new();
    for &c in raw.iter().take_while(|&&c| c != 0) {
        if s.push(c as u8 as char).is_err() {
            break;
        }
    }
    s
}

/// Station address and gateway, or `0.0.0.0` when there is no Wi-Fi
/// station interface (Thread builds) or no lease yet.
#[cfg(target_os = "espidf")]
fn station_ip_info() -> (Ipv4Addr, Ipv4Addr) {
    use esp_idf_svc::sys::*;

    // SAFETY: the key is a static C string; `ip` is caller-owned.
    unsafe {
        let netif = esp_netif_get_handle_from_ifkey(c"WIFI_STA_DEF".as_ptr());
        if netif.is_null() {
            return (Ipv4Addr::UNSPECIFIED, Ipv4Addr::UNSPECIFIED);
        }
        let mut ip: esp_netif_ip_info_t = core::mem::zeroed();
        if esp_netif_get_ip_info(netif, &mut ip) != ESP_OK as esp_err_t {
            return (Ipv4Addr::UNSPECIFIED, Ipv4Addr::UNSPECIFIED);
        }
        (
            Ipv4Addr::from(ip.ip.addr.to_le_bytes()),
            Ipv4Addr::from(ip.gw.addr.to_le_bytes()),
        )
    }
}

// ───────────────────────────────────────────────────────────────
// Panic hook
// ───────────────────────────────────────────────────────────────

/// Log the panic message before the default handler resets the chip.
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };

        let mut location = heapless::String::<96>::new();
        if let Some(loc) = info.location() {
            let _ = write!(location, " at {}:{}", loc.file(), loc.line());
        }
        log::error!("PANIC: {}{}", reason, location);
    }));
}

//! Device identity derived from the ESP32 factory MAC address.
//!
//! The MAC is printed in the boot summary; the short suffix is handy for
//! telling nodes apart on a shared serial console.

use core::fmt::Write;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// `AA:BB:CC:DD:EE:FF` (17 chars).
pub type MacString = heapless::String<18>;

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: `mac` is a valid 6-byte buffer.
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Colon-separated uppercase hex.
pub fn format_mac(mac: &MacAddress) -> MacString {
    let mut s = MacString::new();
    let _ = write!(
        s,
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    );
    s
}

/// Short node tag from the last 3 MAC bytes, e.g. `SN-EFCAFE`.
pub fn node_tag(mac: &MacAddress) -> heapless::String<16> {
    let mut id = heapless::String::<16>::new();
    let _ = write!(id, "SN-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
    id
}

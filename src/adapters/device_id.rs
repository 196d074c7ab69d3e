//! Device identity derived from the ESP32 factory MAC address.
//!
//! `TR-XXYYZZ` (last three MAC bytes, uppercase hex) names the unit in MQTT
//! topics; `thermorelay-xxyyzz` is its MQTT client ID. Both are stable
//! across reboots since the MAC is burned into eFuse.

use core::fmt::Write;

/// "TR-XXYYZZ".
pub type DeviceIdString = heapless::String<16>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: writes exactly six bytes into `mac`.
    let ret = unsafe { esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr()) };
    if ret != esp_idf_svc::sys::ESP_OK as i32 {
        log::warn!("device_id: eFuse MAC read failed ({})", ret);
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0x24, 0x6F, 0x28, 0x1A, 0x2B, 0x3C]
}

pub fn device_id(mac: &MacAddress) -> DeviceIdString {
    let mut id = DeviceIdString::new();
    let _ = write!(id, "TR-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
    id
}

pub fn client_id(mac: &MacAddress) -> heapless::String<24> {
    let mut name = heapless::String::<24>::new();
    let _ = write!(name, "thermorelay-{:02x}{:02x}{:02x}", mac[3], mac[4], mac[5]);
    name
}

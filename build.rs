fn main() {
    println!("cargo:rerun-if-env-changed=THERMORELAY_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=THERMORELAY_WIFI_PASS");
    println!("cargo:rerun-if-env-changed=THERMORELAY_MQTT_URL");

    // Host test builds run with --no-default-features and have no ESP-IDF
    // toolchain to export.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}

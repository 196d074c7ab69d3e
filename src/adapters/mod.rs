//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to                  |
//! |-------------|--------------------|------------------------------|
//! | `hardware`  | SensorPort         | ESP32 ADC1, button GPIOs     |
//! |             | ActuatorPort       | Relay GPIO, link LED         |
//! | `log_sink`  | EventSink          | Serial log output            |
//! | `mqtt`      | CloudTransport     | ESP-IDF MQTT client          |
//! | `nvs`       | ConfigPort         | NVS / in-memory store        |
//! |             | StoragePort        |                              |
//! | `time`      | —                  | ESP32 system timer           |
//! | `wifi`      | ConnectivityPort   | ESP-IDF WiFi STA             |
//! | `device_id` | —                  | Factory MAC in eFuse         |

pub mod device_id;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod nvs;
pub mod time;
pub mod wifi;

//! ThermoRelay Firmware — Main Entry Point
//!
//! Hexagonal architecture driven by a cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   NvsAdapter   OledDisplay     │
//! │  (Sensor+Actuator) (EventSink)    (Config+NVS) (DisplayPort)   │
//! │  WifiAdapter       MqttTransport  Esp32TimeAdapter  Watchdog   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ThermostatService (pure logic)              │    │
//! │  │  Debounce · Control policy · Persistence               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Runtime (owns everything) · Scheduler · CloudSession          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{PinDriver, Pull};
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::units::FromValueType;
use esp_idf_svc::wifi::EspWifi;

use thermorelay::adapters::device_id;
use thermorelay::adapters::hardware::HardwareAdapter;
use thermorelay::adapters::log_sink::LogEventSink;
use thermorelay::adapters::mqtt::MqttTransport;
use thermorelay::adapters::nvs::NvsAdapter;
use thermorelay::adapters::time::Esp32TimeAdapter;
use thermorelay::adapters::wifi::{ConnectivityPort, WifiAdapter};
use thermorelay::app::ports::ConfigPort;
use thermorelay::app::runtime::Runtime;
use thermorelay::cloud::{CloudTransport, NullTransport};
use thermorelay::config::SystemConfig;
use thermorelay::control::persist;
use thermorelay::drivers::relay::RelayDriver;
use thermorelay::drivers::oled::OledDisplay;
use thermorelay::drivers::status_led::StatusLed;
use thermorelay::drivers::watchdog::Watchdog;
use thermorelay::drivers::hw_init;
use thermorelay::pins;
use thermorelay::sensors::temperature::TemperatureSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  ThermoRelay v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Storage and config ─────────────────────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            NvsAdapter::unavailable()
        }
    };
    let config = match nvs.load() {
        Ok(c) => c,
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };
    let initial = persist::load_state(&nvs, &config);
    info!("Restored state: {:?}", initial);

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(thermorelay::error::Error::from)?;
    let mut watchdog = Watchdog::new(config.watchdog_timeout_ms);

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    let relay_pin = PinDriver::output(peripherals.pins.gpio15)?;
    let led_pin = PinDriver::output(peripherals.pins.gpio2)?;
    let mut button1 = PinDriver::input(peripherals.pins.gpio4)?;
    button1.set_pull(Pull::Up)?;
    let mut button2 = PinDriver::input(peripherals.pins.gpio5)?;
    button2.set_pull(Pull::Up)?;

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(pins::I2C_FREQ_HZ.Hz().into()),
    )?;
    let display = OledDisplay::new(i2c, pins::DISPLAY_I2C_ADDR);

    let hw = HardwareAdapter::new(
        TemperatureSensor::new(pins::THERMISTOR_ADC_CHANNEL, config.thermistor),
        RelayDriver::new(relay_pin),
        StatusLed::new(led_pin),
        button1,
        button2,
    );

    // ── 4. Network ────────────────────────────────────────────
    let mac = device_id::read_mac();
    let dev_id = device_id::device_id(&mac);
    info!("Device ID: {}", dev_id);

    let mut wifi = WifiAdapter::new(EspWifi::new(peripherals.modem, sysloop, None)?);
    let have_wifi = match option_env!("THERMORELAY_WIFI_SSID") {
        Some(ssid) => {
            let pass = option_env!("THERMORELAY_WIFI_PASS").unwrap_or("");
            match wifi.set_credentials(ssid, pass) {
                Ok(()) => true,
                Err(e) => {
                    warn!("WiFi: {}", e);
                    false
                }
            }
        }
        None => {
            warn!("WiFi: no credentials compiled in, cloud link disabled");
            false
        }
    };

    let transport: Box<dyn CloudTransport> = if have_wifi {
        let url = option_env!("THERMORELAY_MQTT_URL").unwrap_or(config.cloud.broker_url.as_str());
        match MqttTransport::new(
            url,
            &device_id::client_id(&mac),
            &config.cloud.topic_prefix,
            &dev_id,
        ) {
            Ok(t) => Box::new(t),
            Err(e) => {
                warn!("MQTT: {}, cloud link disabled", e);
                Box::new(NullTransport)
            }
        }
    } else {
        Box::new(NullTransport)
    };

    // ── 5. Runtime ────────────────────────────────────────────
    let time = Esp32TimeAdapter::new();
    let mut runtime = Runtime::new(
        &config,
        initial,
        hw,
        nvs,
        display,
        transport,
        LogEventSink::new(),
    );
    if let Err(e) = runtime.start() {
        error!("Startup failed: {}, halting", e);
        watchdog.unsubscribe();
        loop {
            FreeRtos::delay_ms(1_000);
        }
    }

    if have_wifi {
        if let Err(e) = wifi.connect(time.uptime_ms()) {
            warn!("WiFi: {} (will retry)", e);
        }
    }

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        let now_ms = time.uptime_ms();
        wifi.poll(now_ms);
        runtime.step(now_ms);
        watchdog.feed();
        FreeRtos::delay_ms(config.loop_idle_ms);
    }
}

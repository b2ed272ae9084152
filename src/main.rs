//! GrowHub Firmware: Main Entry Point
//!
//! Polled control loop over the hardware adapters.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Control loop                         │
//! │                                                            │
//! │  KeypadDriver ──▶ Menu ──▶ MenuAction                      │
//! │                              │ assign / manual send        │
//! │                              ▼                             │
//! │  Esp32Clock ────────────▶ ZoneEngine ──▶ ZoneBus           │
//! │                              │              │              │
//! │  StatusReport ◀── observed ──┘        I2cBusAdapter        │
//! │       │                                     │              │
//! │       ▼ console UART                 zone nodes (I²C)      │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
mod adapters;
mod bus;
mod config;
mod drivers;
mod engine;
mod error;
mod menu;
mod pins;
mod profiles;
mod protocol;
mod telemetry;
mod zone;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::i2c::I2cBusAdapter;
use adapters::time::Esp32Clock;
use config::SystemConfig;
use drivers::keypad::KeypadDriver;
use engine::{CycleReadings, ZoneEngine};
use menu::{Menu, MenuAction, ScreenView};
use telemetry::StatusReport;
use zone::ZoneId;

/// Keypad poll cadence. The menu debounce needs several samples inside
/// its 200 ms window, and the control cycle gate rounds to this grid.
const LOOP_TICK_MS: u32 = 10;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GrowHub v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is unrecoverable; log and halt. The
        // watchdog resets the board once it stops being fed.
        log::error!("hw init failed: {}; halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    info!(
        "config: nodes at 0x{:02x}/0x{:02x}, control tick {} ms, retry {}x every {} ms",
        config.zone_addresses[0],
        config.zone_addresses[1],
        config.control_interval_ms,
        config.retry_max_attempts,
        config.retry_delay_ms
    );

    // ── 4. Construct adapters ─────────────────────────────────
    let clock = Esp32Clock::new();
    let mut keypad = KeypadDriver::new();

    #[cfg(target_os = "espidf")]
    let mut link = {
        let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
        I2cBusAdapter::new(
            peripherals.i2c0,
            peripherals.pins.gpio21,
            peripherals.pins.gpio22,
            &config,
        )?
    };
    #[cfg(not(target_os = "espidf"))]
    let mut link = I2cBusAdapter::new(&config);

    #[cfg(target_os = "espidf")]
    let mut engine = ZoneEngine::new(&config, esp_idf_hal::delay::FreeRtos);
    #[cfg(not(target_os = "espidf"))]
    let mut engine = ZoneEngine::new(&config, bus::NoDelay);

    let mut menu = Menu::new(&config);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    let mut readings: CycleReadings = [None; ZoneId::COUNT];
    let mut last_view = ScreenView::default();
    let mut last_poll_ms: u32 = 0;
    let mut last_telemetry_ms: u32 = 0;
    let mut led_on = false;

    loop {
        let now = clock.now_ms();

        // Keypad → menu → engine.
        let key = keypad.scan();
        match menu.process_key(key, now) {
            Some(MenuAction::AssignProfile {
                zone,
                profile_index,
            }) => match engine.assign_policy(zone, profile_index, now) {
                Ok(()) => info!(
                    "{}: profile '{}' assigned",
                    zone,
                    profiles::name(profile_index)
                ),
                Err(e) => warn!("menu: assignment rejected ({})", e),
            },
            Some(MenuAction::ManualCommand { zone, byte }) => {
                if let Err(e) = engine.send_manual_command(&mut link, zone, byte) {
                    warn!("{}: manual command 0x{:02x} lost ({})", zone, byte, e);
                }
            }
            None => {}
        }

        // Sensor refresh and control pass at the control cadence.
        if now.wrapping_sub(last_poll_ms) >= config.control_interval_ms {
            last_poll_ms = now;

            for z in ZoneId::ALL {
                if engine.zone_state(z).assigned_policy().is_none() {
                    continue;
                }
                match engine.read_sensors(&mut link, z) {
                    Ok(r) => readings[z.index()] = Some(r),
                    Err(e) => warn!("{}: sensor read failed ({}); keeping last frame", z, e),
                }
            }

            // Manual mode hands the actuators to the operator; automatic
            // control resumes where it left off when the mode flips back.
            if !menu.is_manual_mode() {
                engine.run_cycle(&mut link, now, readings);
            }

            led_on = !led_on;
            drivers::hw_init::gpio_write(pins::STATUS_LED_GPIO, led_on);
        }

        // Telemetry line. The console UART carries it verbatim, line
        // terminator included, so downstream parsers see the same frame
        // a dedicated serial port would.
        if now.wrapping_sub(last_telemetry_ms) >= config.telemetry_interval_ms {
            last_telemetry_ms = now;
            match StatusReport::collect(&engine, readings).render() {
                Ok(line) => print!("{}", line),
                Err(e) => warn!("telemetry: encode failed ({})", e),
            }
        }

        // LCD substitute: log the menu screen whenever it changes.
        let assigned = ZoneId::ALL.map(|z| engine.zone_state(z).assigned_policy());
        let view = menu.render(assigned, readings);
        if view != last_view {
            for line in view.lines() {
                info!("lcd: {}", line);
            }
            last_view = view;
        }

        #[cfg(target_os = "espidf")]
        esp_idf_hal::delay::FreeRtos::delay_ms(LOOP_TICK_MS);
        // Simulate the FreeRTOS tick via sleep on non-espidf targets.
        #[cfg(not(target_os = "espidf"))]
        std::thread::sleep(std::time::Duration::from_millis(LOOP_TICK_MS as u64));
    }
}

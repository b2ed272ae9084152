//! Polled 4x4 matrix keypad driver.
//!
//! ## Hardware
//!
//! Row lines are push-pull outputs parked HIGH between scans. A scan
//! drives one row LOW at a time and samples the column inputs, which
//! carry internal pull-ups. A pressed key connects its row to its
//! column, so a column reads LOW exactly when its key sits on the
//! driven row.
//!
//! ## Key codes
//!
//! | Row | Keys        |
//! |-----|-------------|
//! | 0   | 1 2 3 4     |
//! | 1   | 5 6 7 8     |
//! | 2   | 9 10 11 12  |
//! | 3   | 13 14 15 16 |
//!
//! `scan()` reports 0 when nothing is pressed. Debounce and held-key
//! suppression live in [`crate::menu::Menu`], which sees every raw
//! sample, so this driver stays stateless.

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Microseconds for a driven row to settle before the columns are read.
#[cfg(target_os = "espidf")]
const ROW_SETTLE_US: u32 = 5;

pub struct KeypadDriver;

impl Default for KeypadDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl KeypadDriver {
    pub fn new() -> Self {
        Self
    }

    /// Scans the matrix once. Returns the first pressed key (1..=16)
    /// in row-major order, or 0 when no key is down.
    #[cfg(target_os = "espidf")]
    pub fn scan(&mut self) -> u8 {
        for (r, &row) in pins::KEYPAD_ROW_GPIOS.iter().enumerate() {
            hw_init::gpio_write(row, false);
            // SAFETY: ROM busy-wait, touches no shared state.
            unsafe { esp_idf_svc::sys::esp_rom_delay_us(ROW_SETTLE_US) };

            let mut hit = 0;
            for (c, &col) in pins::KEYPAD_COL_GPIOS.iter().enumerate() {
                if !hw_init::gpio_read(col) {
                    hit = key_code(r, c);
                    break;
                }
            }

            hw_init::gpio_write(row, true);
            if hit != 0 {
                return hit;
            }
        }
        0
    }

    /// On non-ESP targets (simulation) the keypad is never pressed.
    #[cfg(not(target_os = "espidf"))]
    pub fn scan(&mut self) -> u8 {
        0
    }
}

#[allow(unused)]
const fn key_code(row: usize, col: usize) -> u8 {
    (row * 4 + col + 1) as u8
}

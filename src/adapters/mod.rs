//! Adapters: concrete implementations of the hardware-facing seams.
//!
//! | Adapter | Implements        | Connects to              |
//! |---------|-------------------|--------------------------|
//! | `i2c`   | BusLink           | ESP32 I²C master driver  |
//! | `time`  | millisecond clock | ESP-IDF esp_timer        |

pub mod i2c;
pub mod time;

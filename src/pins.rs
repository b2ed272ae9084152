//! GPIO / peripheral pin assignments for the GrowHub controller board.
//!
//! Single source of truth: every adapter references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// I²C bus (shared by both zone nodes)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;

/// Standard-mode clock. The zone nodes are slow slaves and do not tolerate
/// fast-mode timing.
pub const I2C_CLOCK_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Keypad (4x4 matrix, active-low columns with internal pull-ups)
// ---------------------------------------------------------------------------

/// Row outputs, driven low one at a time during a scan.
pub const KEYPAD_ROW_GPIOS: [i32; 4] = [32, 33, 25, 26];
/// Column inputs. A pressed key shorts its column to the driven row.
pub const KEYPAD_COL_GPIOS: [i32; 4] = [27, 14, 12, 13];

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// Heartbeat LED, toggled once per control cycle.
pub const STATUS_LED_GPIO: i32 = 2;

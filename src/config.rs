//! System configuration parameters
//!
//! All tunable parameters for the irrigation controller: zone node
//! addressing, bus retry behavior, and loop timing.

use serde::{Deserialize, Serialize};

use crate::bus::RetryPolicy;
use crate::zone::ZoneId;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Bus ---
    /// 7-bit node address per zone, indexed by [`ZoneId::index`]
    pub zone_addresses: [u8; ZoneId::COUNT],
    /// Per-attempt transfer timeout (milliseconds)
    pub bus_timeout_ms: u32,
    /// Settle time after each half of a bus reset (milliseconds)
    pub bus_settle_ms: u32,

    // --- Retry ---
    /// Attempts per bus operation before giving up
    pub retry_max_attempts: u8,
    /// Pause after a failed attempt (milliseconds)
    pub retry_delay_ms: u32,

    // --- Timing ---
    /// Decision cycle interval (milliseconds)
    pub control_interval_ms: u32,
    /// Keypad debounce window (milliseconds)
    pub key_debounce_ms: u32,
    /// Status report interval (milliseconds)
    pub telemetry_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Bus
            zone_addresses: [0x08, 0x07],
            bus_timeout_ms: 1000,
            bus_settle_ms: 10,

            // Retry
            retry_max_attempts: 3,
            retry_delay_ms: 50,

            // Timing
            control_interval_ms: 250, // 4 Hz
            key_debounce_ms: 200,
            telemetry_interval_ms: 1000, // 1 Hz
        }
    }
}

impl SystemConfig {
    /// Bus address of one zone's node.
    pub fn zone_address(&self, zone: ZoneId) -> u8 {
        self.zone_addresses[zone.index()]
    }

    /// Retry parameters for the bus layer.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            retry_delay_ms: self.retry_delay_ms,
        }
    }
}

//! Unified error types for the GrowHub firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level control loop's error handling uniform.  All variants are `Copy`
//! so they can be cheaply passed through the engine and logged without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A bus transaction failed after exhausting all retry attempts.
    Bus(BusExhausted),
    /// Profile index does not exist in the catalog.
    UnknownProfile(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::UnknownProfile(idx) => write!(f, "unknown profile index {idx}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bus faults (single attempt)
// ---------------------------------------------------------------------------

/// One failed bus attempt.  Recovered inside the transport by a bus reset
/// and retry; never surfaces to the engine on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusFault {
    /// Node did not acknowledge its address or a data byte.
    Nack,
    /// Lost arbitration against another master mid-transfer.
    ArbitrationLost,
    /// Controller busy or in an invalid state for the transfer.
    BusBusy,
    /// Transfer did not complete within the per-attempt timeout.
    Timeout,
}

impl fmt::Display for BusFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nack => write!(f, "no acknowledge"),
            Self::ArbitrationLost => write!(f, "arbitration lost"),
            Self::BusBusy => write!(f, "bus busy"),
            Self::Timeout => write!(f, "transfer timeout"),
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal transport failure
// ---------------------------------------------------------------------------

/// All retry attempts for one send/receive call failed.
///
/// Terminal for that call only: the engine treats it as "this tick's
/// command did not happen" and the next decision cycle re-evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusExhausted {
    /// Number of attempts made (equals the configured maximum).
    pub attempts: u8,
    /// Fault returned by the final attempt.
    pub last: BusFault,
}

impl fmt::Display for BusExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exhausted after {} attempts (last: {})", self.attempts, self.last)
    }
}

impl From<BusExhausted> for Error {
    fn from(e: BusExhausted) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_converts_into_error() {
        let e = BusExhausted {
            attempts: 3,
            last: BusFault::Nack,
        };
        assert_eq!(Error::from(e), Error::Bus(e));
    }

    #[test]
    fn display_is_informative() {
        let e = Error::Bus(BusExhausted {
            attempts: 3,
            last: BusFault::Timeout,
        });
        let s = format!("{e}");
        assert!(s.contains("3 attempts"));
        assert!(s.contains("timeout"));
    }
}

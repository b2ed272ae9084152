//! Shared-bus transport with bounded retry and reset recovery.
//!
//! ```text
//!   Engine ──▶ ZoneBus ──▶ BusLink trait ──▶ I2C adapter / test mock
//! ```
//!
//! Both zone nodes hang off one physical bus, so any transfer can fail
//! transiently (lost arbitration, a node stretching the clock, noise).
//! The policy is fixed: try an operation up to `max_attempts` times, and
//! after **every** failed attempt reset the bus and pause before moving
//! on.  The terminal failure gets the same treatment, so an abandoned
//! operation still leaves the bus clean for the next one.

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::error::{BusExhausted, BusFault};
use crate::protocol::{SENSOR_FRAME_LEN, SensorReadings};

// ───────────────────────────────────────────────────────────────
// Link port (driven adapter: transport → bus hardware)
// ───────────────────────────────────────────────────────────────

/// Byte-level access to the shared zone bus.
///
/// One transfer per call, addressed by 7-bit node address.  Retry and
/// recovery policy live above this trait, in [`ZoneBus`].
pub trait BusLink {
    /// Write a single opcode byte to a node.
    fn send_byte(&mut self, addr: u8, byte: u8) -> Result<(), BusFault>;

    /// Read one raw sensor frame from a node into `frame`.
    ///
    /// On failure `frame` must be left untouched.
    fn read_frame(&mut self, addr: u8, frame: &mut [u8; SENSOR_FRAME_LEN])
    -> Result<(), BusFault>;

    /// Reset the bus controller after a failed transfer, leaving it
    /// ready for the next attempt.  Resets do not themselves fail.
    fn recover(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Retry policy
// ───────────────────────────────────────────────────────────────

/// Bounded-retry parameters, normally sourced from
/// [`SystemConfig::retry_policy`](crate::config::SystemConfig::retry_policy).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per operation.  Treated as at least 1.
    pub max_attempts: u8,
    /// Pause after each failed attempt (milliseconds).
    pub retry_delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 50,
        }
    }
}

/// Run one bus operation under the retry policy.
///
/// After every failed attempt (the last one included) the link is reset
/// and the retry delay elapses.
pub fn attempt_with_recovery<L, D, T, F>(
    link: &mut L,
    delay: &mut D,
    policy: RetryPolicy,
    addr: u8,
    label: &str,
    mut op: F,
) -> Result<T, BusExhausted>
where
    L: BusLink + ?Sized,
    D: DelayNs,
    F: FnMut(&mut L) -> Result<T, BusFault>,
{
    let max = policy.max_attempts.max(1);
    let mut attempts = 0;
    loop {
        attempts += 1;
        match op(link) {
            Ok(value) => return Ok(value),
            Err(fault) => {
                warn!(
                    "bus: {} 0x{:02x} attempt {}/{} failed ({}); resetting",
                    label, addr, attempts, max, fault
                );
                link.recover();
                delay.delay_ms(policy.retry_delay_ms);
                if attempts >= max {
                    return Err(BusExhausted {
                        attempts,
                        last: fault,
                    });
                }
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Delivery token
// ───────────────────────────────────────────────────────────────

/// Proof that one opcode byte was acknowledged by a node.
///
/// Minted only by [`ZoneBus::send`] on success.  The engine consumes the
/// token to fold the byte into per-zone observed actuator state, so a
/// command that was never acknowledged cannot be recorded.
#[must_use = "a confirmed send must be folded into observed actuator state"]
#[derive(Debug, PartialEq, Eq)]
pub struct Delivery {
    byte: u8,
}

impl Delivery {
    pub(crate) fn new(byte: u8) -> Self {
        Self { byte }
    }

    /// The opcode byte that was acknowledged.
    pub fn byte(&self) -> u8 {
        self.byte
    }

    /// Consume the token, yielding the acknowledged byte.
    pub fn into_byte(self) -> u8 {
        self.byte
    }
}

// ───────────────────────────────────────────────────────────────
// Retry-wrapped node operations
// ───────────────────────────────────────────────────────────────

/// Retry-wrapped operations against zone nodes.
///
/// Owns the retry policy and the delay provider; borrows the link per
/// call, so one instance serves every node on the bus.
pub struct ZoneBus<D> {
    policy: RetryPolicy,
    delay: D,
}

impl<D: DelayNs> ZoneBus<D> {
    pub fn new(policy: RetryPolicy, delay: D) -> Self {
        Self { policy, delay }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Send one opcode byte to the node at `addr`.
    pub fn send<L>(&mut self, link: &mut L, addr: u8, byte: u8) -> Result<Delivery, BusExhausted>
    where
        L: BusLink + ?Sized,
    {
        attempt_with_recovery(link, &mut self.delay, self.policy, addr, "write", |l| {
            l.send_byte(addr, byte)
        })
        .map(|()| {
            debug!("bus: 0x{:02x} acknowledged 0x{:02x}", addr, byte);
            Delivery::new(byte)
        })
    }

    /// Read and decode one sensor frame from the node at `addr`.
    pub fn receive<L>(&mut self, link: &mut L, addr: u8) -> Result<SensorReadings, BusExhausted>
    where
        L: BusLink + ?Sized,
    {
        let mut frame = [0u8; SENSOR_FRAME_LEN];
        attempt_with_recovery(link, &mut self.delay, self.policy, addr, "read", |l| {
            l.read_frame(addr, &mut frame)
        })?;
        let readings = SensorReadings::from_frame(&frame);
        debug!(
            "bus: 0x{:02x} frame h={} t={} l={}",
            addr, readings.humidity, readings.temperature, readings.light
        );
        Ok(readings)
    }
}

/// A delay provider that returns immediately.
/// Useful for host-side tests where real pauses only slow the suite down.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

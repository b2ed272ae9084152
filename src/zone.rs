//! Per-zone identity and control state.
//!
//! Two fixed zones, each an addressable remote unit with 3 sensor channels
//! and 4 binary actuators.  [`ZoneControlState`] is the scheduler's view
//! (what the engine believes about irrigation); [`ActuatorObservedState`]
//! is the reporting view (what was actually confirmed on the wire).  The
//! two can disagree after a failed send, and reporting shows both.

use crate::protocol::{Actuator, Command};

// ---------------------------------------------------------------------------
// Zone identity
// ---------------------------------------------------------------------------

/// Fixed zone identity.  All engine APIs take a `ZoneId`, so an invalid
/// zone index cannot reach the bus; [`ZoneId::from_index`] is the only
/// boundary where raw indices are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ZoneId {
    Zone0 = 0,
    Zone1 = 1,
}

impl ZoneId {
    /// Total number of zones, used to size per-zone arrays.
    pub const COUNT: usize = 2;

    /// All zones in decision-cycle evaluation order.
    pub const ALL: [ZoneId; Self::COUNT] = [Self::Zone0, Self::Zone1];

    /// Convert a raw index into a zone.  `None` outside `{0, 1}`.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Zone0),
            1 => Some(Self::Zone1),
            _ => None,
        }
    }

    /// Array slot for this zone.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "zone {}", self.index())
    }
}

// ---------------------------------------------------------------------------
// Scheduler-side control state
// ---------------------------------------------------------------------------

/// Per-zone irrigation scheduling state, mutated only by the engine.
///
/// A zone with no assigned policy is inert: no irrigation, no hysteresis
/// control, no bus traffic.  `irrigating == true` implies a policy is
/// assigned, because only the decision cycle (which skips unassigned
/// zones) starts an irrigation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneControlState {
    assigned_policy: Option<u8>,
    last_irrigation_time: u32,
    irrigating: bool,
    irrigation_start_time: u32,
}

impl ZoneControlState {
    pub const fn new() -> Self {
        Self {
            assigned_policy: None,
            last_irrigation_time: 0,
            irrigating: false,
            irrigation_start_time: 0,
        }
    }

    /// Catalog index of the assigned policy, if any.
    pub fn assigned_policy(&self) -> Option<u8> {
        self.assigned_policy
    }

    /// Whether the pump is in its timed-on phase.
    pub fn is_irrigating(&self) -> bool {
        self.irrigating
    }

    /// When the most recent irrigation cycle started (ms).
    pub fn last_irrigation_time(&self) -> u32 {
        self.last_irrigation_time
    }

    /// When the current irrigation phase began (ms).  Meaningful only
    /// while [`is_irrigating`](Self::is_irrigating) is true.
    pub fn irrigation_start_time(&self) -> u32 {
        self.irrigation_start_time
    }

    /// Assign a policy and restart the interval clock so a freshly
    /// assigned zone does not irrigate immediately.  A running irrigation
    /// phase is not interrupted; it finishes under the new profile's
    /// duration.
    pub(crate) fn assign(&mut self, profile_index: u8, now_ms: u32) {
        self.assigned_policy = Some(profile_index);
        self.last_irrigation_time = now_ms;
    }

    /// Enter the timed pump-on phase, stamping both timers.
    pub(crate) fn begin_irrigation(&mut self, now_ms: u32) {
        debug_assert!(self.assigned_policy.is_some());
        self.irrigating = true;
        self.irrigation_start_time = now_ms;
        self.last_irrigation_time = now_ms;
    }

    /// Leave the timed pump-on phase.
    pub(crate) fn end_irrigation(&mut self) {
        self.irrigating = false;
    }
}

impl Default for ZoneControlState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Wire-side observed state
// ---------------------------------------------------------------------------

/// Last actuator levels confirmed transmitted to a zone node.
///
/// Ground truth for external reporting.  Updated only from the explicit
/// command vocabulary after a confirmed send; toggle codes and failed
/// sends never touch it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorObservedState {
    pump_on: bool,
    humidifier_on: bool,
    fan_on: bool,
    light_on: bool,
}

impl ActuatorObservedState {
    pub const fn new() -> Self {
        Self {
            pump_on: false,
            humidifier_on: false,
            fan_on: false,
            light_on: false,
        }
    }

    /// Fold a confirmed command into the observed levels.
    pub(crate) fn apply(&mut self, cmd: Command) {
        let on = cmd.is_on();
        match cmd.actuator() {
            Actuator::Pump => self.pump_on = on,
            Actuator::Humidifier => self.humidifier_on = on,
            Actuator::Fan => self.fan_on = on,
            Actuator::Light => self.light_on = on,
        }
    }

    /// Last confirmed level for one actuator.
    pub fn get(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::Pump => self.pump_on,
            Actuator::Humidifier => self.humidifier_on,
            Actuator::Fan => self.fan_on,
            Actuator::Light => self.light_on,
        }
    }

    pub fn pump_on(&self) -> bool {
        self.pump_on
    }

    pub fn humidifier_on(&self) -> bool {
        self.humidifier_on
    }

    pub fn fan_on(&self) -> bool {
        self.fan_on
    }

    pub fn light_on(&self) -> bool {
        self.light_on
    }
}

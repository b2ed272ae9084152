//! Upstream status report for the dashboard link.
//!
//! One compact JSON line per report, CRLF terminated, byte-compatible
//! with the existing dashboard parser.  Note the split sourcing:
//! `irrigation` reports the scheduler's phase machine, while `humid`,
//! `fan` and `light1` report the last actuator levels confirmed on the
//! wire.  The two can disagree after a failed pump send, and the report
//! shows exactly that.

use embedded_hal::delay::DelayNs;
use serde::Serialize;

use crate::engine::{CycleReadings, ZoneEngine};
use crate::profiles;
use crate::zone::ZoneId;

/// Reported name for a zone with no assigned profile.
const PROFILE_NONE: &str = "None";

#[derive(Debug, Serialize)]
struct NodeStatus {
    humidity: u16,
    temp: u16,
    light: u16,
    profile: &'static str,
    irrigation: u8,
    humid: u8,
    fan: u8,
    light1: u8,
}

impl NodeStatus {
    fn for_zone<D: DelayNs>(
        engine: &ZoneEngine<D>,
        zone: ZoneId,
        readings: CycleReadings,
    ) -> Self {
        let state = engine.zone_state(zone);
        let observed = engine.observed(zone);
        // Zones that never produced a frame report zeros, like at boot.
        let r = readings[zone.index()].unwrap_or_default();

        Self {
            humidity: r.humidity,
            temp: r.temperature,
            light: r.light,
            profile: match state.assigned_policy() {
                Some(index) => profiles::name(index),
                None => PROFILE_NONE,
            },
            irrigation: u8::from(state.is_irrigating()),
            humid: u8::from(observed.humidifier_on()),
            fan: u8::from(observed.fan_on()),
            light1: u8::from(observed.light_on()),
        }
    }
}

/// Snapshot of both zones, ready to serialize.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    node1: NodeStatus,
    node2: NodeStatus,
}

impl StatusReport {
    /// Capture the current state of both zones.
    pub fn collect<D: DelayNs>(engine: &ZoneEngine<D>, readings: CycleReadings) -> Self {
        Self {
            node1: NodeStatus::for_zone(engine, ZoneId::Zone0, readings),
            node2: NodeStatus::for_zone(engine, ZoneId::Zone1, readings),
        }
    }

    /// Render the CRLF-terminated report line.
    pub fn render(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push_str("\r\n");
        Ok(line)
    }
}

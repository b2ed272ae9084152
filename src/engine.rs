//! Node control engine: the periodic decision cycle over both zones.
//!
//! Owns per-zone control state and observed actuator state, and is the
//! only writer of either.  Once per rate-limited tick it walks the zones
//! in order and issues at most the commands justified by the assigned
//! profile, the latest readings, and elapsed time:
//!
//! - an irrigation phase machine (interval-scheduled pump-on, timed
//!   pump-off),
//! - three independent hysteresis loops (humidifier, fan, light) with
//!   fixed dead-bands around the profile thresholds.
//!
//! Every command, automatic or manual, funnels through the same
//! [`ZoneBus`] send and the same [`Delivery`] accounting, so observed
//! actuator state only ever reflects bytes a node acknowledged.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::bus::{BusLink, Delivery, ZoneBus};
use crate::config::SystemConfig;
use crate::error::{BusExhausted, Error, Result};
use crate::profiles;
use crate::protocol::{Command, SensorReadings};
use crate::zone::{ActuatorObservedState, ZoneControlState, ZoneId};

/// Dead-band width per channel, in raw sensor units.  Profiles supply
/// only the center threshold; the bands are fixed.
const HUMIDITY_BAND: u16 = 50;
const TEMP_BAND: u16 = 50;
const LIGHT_BAND: u16 = 100;

/// Per-zone sensor readings fed into one decision tick.  `None` means
/// "no update for this zone yet"; threshold control then holds while
/// irrigation timing keeps running.
pub type CycleReadings = [Option<SensorReadings>; ZoneId::COUNT];

pub struct ZoneEngine<D> {
    bus: ZoneBus<D>,
    addresses: [u8; ZoneId::COUNT],
    control_interval_ms: u32,
    zones: [ZoneControlState; ZoneId::COUNT],
    observed: [ActuatorObservedState; ZoneId::COUNT],
    last_cycle_ms: u32,
}

impl<D: DelayNs> ZoneEngine<D> {
    pub fn new(config: &SystemConfig, delay: D) -> Self {
        Self {
            bus: ZoneBus::new(config.retry_policy(), delay),
            addresses: config.zone_addresses,
            control_interval_ms: config.control_interval_ms,
            zones: [ZoneControlState::new(); ZoneId::COUNT],
            observed: [ActuatorObservedState::new(); ZoneId::COUNT],
            last_cycle_ms: 0,
        }
    }

    // ── Reported state ──────────────────────────────────────────

    /// Scheduler-side view of one zone.
    pub fn zone_state(&self, zone: ZoneId) -> &ZoneControlState {
        &self.zones[zone.index()]
    }

    /// Last actuator levels confirmed on the wire for one zone.
    pub fn observed(&self, zone: ZoneId) -> &ActuatorObservedState {
        &self.observed[zone.index()]
    }

    // ── Operations ──────────────────────────────────────────────

    /// Assign a catalog profile to a zone, restarting its interval clock
    /// so the zone does not irrigate immediately.  A running irrigation
    /// phase is left to finish under the new profile's duration.
    pub fn assign_policy(&mut self, zone: ZoneId, profile_index: u8, now_ms: u32) -> Result<()> {
        let profile =
            profiles::get(profile_index).ok_or(Error::UnknownProfile(profile_index))?;
        info!("{}: assigned profile {} ({})", zone, profile_index, profile.name);
        self.zones[zone.index()].assign(profile_index, now_ms);
        Ok(())
    }

    /// Route a raw command byte to a zone outside the decision cycle.
    ///
    /// No thresholding, and the irrigation phase machine is untouched: a
    /// manual pump byte neither sets `irrigating` nor stamps the timers,
    /// so scheduler state can drift from the hardware until the next
    /// automatic command.  Confirmed sends still land in observed state
    /// through the same accounting as automatic ones.
    pub fn send_manual_command<L>(
        &mut self,
        link: &mut L,
        zone: ZoneId,
        byte: u8,
    ) -> core::result::Result<(), BusExhausted>
    where
        L: BusLink + ?Sized,
    {
        let delivery = self.bus.send(link, self.addresses[zone.index()], byte)?;
        self.record_delivery(zone, delivery);
        Ok(())
    }

    /// Fetch one frame of sensor readings from a zone.
    ///
    /// Exhausted retries surface as an error; callers keep their last
    /// good readings instead of mistaking zeros for data.
    pub fn read_sensors<L>(
        &mut self,
        link: &mut L,
        zone: ZoneId,
    ) -> core::result::Result<SensorReadings, BusExhausted>
    where
        L: BusLink + ?Sized,
    {
        self.bus.receive(link, self.addresses[zone.index()])
    }

    /// Fold a confirmed command byte into a zone's observed actuator
    /// state.  Any path that sends outside this engine must call this on
    /// success.  Bytes outside the command vocabulary (manual toggle
    /// codes) change nothing, since the resulting actuator level is not
    /// knowable here.
    pub fn record_actuator_command(&mut self, zone: ZoneId, byte: u8) {
        if let Some(cmd) = Command::from_byte(byte) {
            self.observed[zone.index()].apply(cmd);
        }
    }

    // ── Decision cycle ──────────────────────────────────────────

    /// Run one decision tick at `now_ms`, if the rate gate allows it.
    ///
    /// Calls inside the gate window are no-ops.  Zones are evaluated in
    /// index order; each zone without an assigned profile is skipped
    /// entirely and generates no bus traffic.
    pub fn run_cycle<L>(&mut self, link: &mut L, now_ms: u32, readings: CycleReadings)
    where
        L: BusLink + ?Sized,
    {
        if now_ms.wrapping_sub(self.last_cycle_ms) < self.control_interval_ms {
            return;
        }
        self.last_cycle_ms = now_ms;

        for zone in ZoneId::ALL {
            self.run_zone(link, zone, now_ms, readings[zone.index()]);
        }
    }

    fn run_zone<L>(
        &mut self,
        link: &mut L,
        zone: ZoneId,
        now_ms: u32,
        readings: Option<SensorReadings>,
    ) where
        L: BusLink + ?Sized,
    {
        let state = self.zones[zone.index()];
        let Some(index) = state.assigned_policy() else {
            return;
        };
        let Some(profile) = profiles::get(index) else {
            return;
        };

        if state.is_irrigating() {
            let elapsed_secs = now_ms.wrapping_sub(state.irrigation_start_time()) / 1000;
            if elapsed_secs >= u32::from(profile.irrigation_duration_secs) {
                info!("{}: irrigation phase done ({}s), pump off", zone, elapsed_secs);
                self.send_auto(link, zone, Command::PumpOff);
                self.zones[zone.index()].end_irrigation();
            }
            // Threshold control stays paused for the whole phase.
            return;
        }

        let idle_secs = now_ms.wrapping_sub(state.last_irrigation_time()) / 1000;
        if idle_secs >= u32::from(profile.irrigation_interval_secs) {
            info!(
                "{}: interval reached, pump on for {}s",
                zone, profile.irrigation_duration_secs
            );
            self.send_auto(link, zone, Command::PumpOn);
            // The phase advances even when the send exhausted its
            // retries: the duration clock runs and the matching pump-off
            // still goes out on schedule.
            self.zones[zone.index()].begin_irrigation(now_ms);
        }

        let Some(r) = readings else {
            return;
        };

        if r.humidity < profile.humidity_threshold {
            self.send_auto(link, zone, Command::HumidifierOn);
        } else if r.humidity > profile.humidity_threshold.saturating_add(HUMIDITY_BAND) {
            self.send_auto(link, zone, Command::HumidifierOff);
        }

        if r.temperature > profile.temp_threshold {
            self.send_auto(link, zone, Command::FanOn);
        } else if r.temperature < profile.temp_threshold.saturating_sub(TEMP_BAND) {
            self.send_auto(link, zone, Command::FanOff);
        }

        if r.light < profile.light_threshold {
            self.send_auto(link, zone, Command::LightOn);
        } else if r.light > profile.light_threshold.saturating_add(LIGHT_BAND) {
            self.send_auto(link, zone, Command::LightOff);
        }
    }

    /// Issue one automatic-cycle command.  Exhaustion is logged and
    /// dropped; the next tick re-evaluates and may resend.
    fn send_auto<L>(&mut self, link: &mut L, zone: ZoneId, cmd: Command)
    where
        L: BusLink + ?Sized,
    {
        match self.bus.send(link, self.addresses[zone.index()], cmd.byte()) {
            Ok(delivery) => self.record_delivery(zone, delivery),
            Err(err) => warn!("{}: {} dropped ({})", zone, cmd, err),
        }
    }

    /// Sole consumer of [`Delivery`] tokens.
    fn record_delivery(&mut self, zone: ZoneId, delivery: Delivery) {
        self.record_actuator_command(zone, delivery.into_byte());
    }
}

//! Zone node wire protocol: command bytes and the sensor frame layout.
//!
//! Each zone node accepts single-byte commands and answers read requests
//! with a fixed 6-byte frame.  The vocabulary is frozen; the nodes ignore
//! unrecognised bytes, so extending it is backward compatible.
//!
//! | Byte        | Meaning                  |
//! |-------------|--------------------------|
//! | 0x01–0x04   | toggle pump/humid/fan/light (manual path only) |
//! | 0x10 / 0x11 | pump off / on            |
//! | 0x12 / 0x13 | humidifier off / on      |
//! | 0x14 / 0x15 | fan off / on             |
//! | 0x16 / 0x17 | grow light off / on      |

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// The four binary actuators on every zone node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuator {
    Pump,
    Humidifier,
    Fan,
    Light,
}

impl Actuator {
    /// Total number of actuators per zone.
    pub const COUNT: usize = 4;

    /// All actuators, in toggle-code order.
    pub const ALL: [Actuator; Self::COUNT] = [
        Self::Pump,
        Self::Humidifier,
        Self::Fan,
        Self::Light,
    ];

    /// Node-side toggle code for this actuator (0x01–0x04).
    ///
    /// Toggles flip the output pin on the node; the hub cannot know the
    /// resulting level, so they are never reflected in observed state.
    pub const fn toggle_code(self) -> u8 {
        match self {
            Self::Pump => 0x01,
            Self::Humidifier => 0x02,
            Self::Fan => 0x03,
            Self::Light => 0x04,
        }
    }
}

// ---------------------------------------------------------------------------
// Explicit on/off commands
// ---------------------------------------------------------------------------

/// Explicit actuator command, one byte on the wire.
///
/// Even byte = off, odd byte = on.  Only these eight bytes update
/// observed actuator state after a confirmed send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    PumpOff = 0x10,
    PumpOn = 0x11,
    HumidifierOff = 0x12,
    HumidifierOn = 0x13,
    FanOff = 0x14,
    FanOn = 0x15,
    LightOff = 0x16,
    LightOn = 0x17,
}

impl Command {
    /// The wire byte for this command.
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Decode a wire byte.  Returns `None` for anything outside the
    /// command vocabulary (including the toggle codes).
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x10 => Some(Self::PumpOff),
            0x11 => Some(Self::PumpOn),
            0x12 => Some(Self::HumidifierOff),
            0x13 => Some(Self::HumidifierOn),
            0x14 => Some(Self::FanOff),
            0x15 => Some(Self::FanOn),
            0x16 => Some(Self::LightOff),
            0x17 => Some(Self::LightOn),
            _ => None,
        }
    }

    /// Build the command that drives `actuator` to the given level.
    pub const fn for_actuator(actuator: Actuator, on: bool) -> Self {
        match (actuator, on) {
            (Actuator::Pump, false) => Self::PumpOff,
            (Actuator::Pump, true) => Self::PumpOn,
            (Actuator::Humidifier, false) => Self::HumidifierOff,
            (Actuator::Humidifier, true) => Self::HumidifierOn,
            (Actuator::Fan, false) => Self::FanOff,
            (Actuator::Fan, true) => Self::FanOn,
            (Actuator::Light, false) => Self::LightOff,
            (Actuator::Light, true) => Self::LightOn,
        }
    }

    /// Which actuator this command addresses.
    pub const fn actuator(self) -> Actuator {
        match self {
            Self::PumpOff | Self::PumpOn => Actuator::Pump,
            Self::HumidifierOff | Self::HumidifierOn => Actuator::Humidifier,
            Self::FanOff | Self::FanOn => Actuator::Fan,
            Self::LightOff | Self::LightOn => Actuator::Light,
        }
    }

    /// Whether this command turns its actuator on.
    pub const fn is_on(self) -> bool {
        (self as u8) & 1 == 1
    }
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self.actuator() {
            Actuator::Pump => "pump",
            Actuator::Humidifier => "humidifier",
            Actuator::Fan => "fan",
            Actuator::Light => "light",
        };
        let level = if self.is_on() { "on" } else { "off" };
        write!(f, "{name} {level}")
    }
}

// ---------------------------------------------------------------------------
// Sensor frame
// ---------------------------------------------------------------------------

/// Length of the read-request response: 3 big-endian u16 channels.
pub const SENSOR_FRAME_LEN: usize = 6;

/// One set of zone sensor readings, in raw 10-bit ADC counts.
///
/// Each value is the node-side average of 100 raw samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorReadings {
    pub humidity: u16,
    pub temperature: u16,
    pub light: u16,
}

impl SensorReadings {
    /// Unpack the fixed wire frame: channel order humidity, temperature,
    /// light, each big-endian.
    pub const fn from_frame(frame: &[u8; SENSOR_FRAME_LEN]) -> Self {
        Self {
            humidity: u16::from_be_bytes([frame[0], frame[1]]),
            temperature: u16::from_be_bytes([frame[2], frame[3]]),
            light: u16::from_be_bytes([frame[4], frame[5]]),
        }
    }
}

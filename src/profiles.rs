//! Plant-care policy catalog.
//!
//! A read-only table of named profiles, looked up by index.  Thresholds are
//! raw 10-bit ADC counts matched against zone sensor readings; the interval
//! and duration drive the irrigation phase machine.  The hysteresis bands
//! around each threshold are fixed engine constants, deliberately not part
//! of the profile data.

/// One plant-care policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantProfile {
    pub name: &'static str,
    /// Humidifier turns on below this reading.
    pub humidity_threshold: u16,
    /// Fan turns on above this reading.
    pub temp_threshold: u16,
    /// Grow light turns on below this reading.
    pub light_threshold: u16,
    /// Seconds between irrigation cycle starts.
    pub irrigation_interval_secs: u16,
    /// Seconds the pump stays on per cycle.
    pub irrigation_duration_secs: u16,
}

// Add more profiles here to scale; the menu scroll window adapts.
static CATALOG: [PlantProfile; 7] = [
    PlantProfile {
        name: "TOMATO",
        humidity_threshold: 450,
        temp_threshold: 280,
        light_threshold: 650,
        irrigation_interval_secs: 30,
        irrigation_duration_secs: 5,
    },
    PlantProfile {
        name: "PEPPER",
        humidity_threshold: 420,
        temp_threshold: 260,
        light_threshold: 600,
        irrigation_interval_secs: 28,
        irrigation_duration_secs: 4,
    },
    PlantProfile {
        name: "LETTUCE",
        humidity_threshold: 500,
        temp_threshold: 200,
        light_threshold: 400,
        irrigation_interval_secs: 20,
        irrigation_duration_secs: 3,
    },
    PlantProfile {
        name: "HERBS",
        humidity_threshold: 480,
        temp_threshold: 240,
        light_threshold: 550,
        irrigation_interval_secs: 25,
        irrigation_duration_secs: 4,
    },
    PlantProfile {
        name: "BASIL",
        humidity_threshold: 470,
        temp_threshold: 250,
        light_threshold: 580,
        irrigation_interval_secs: 22,
        irrigation_duration_secs: 4,
    },
    PlantProfile {
        name: "CUCUMBER",
        humidity_threshold: 490,
        temp_threshold: 270,
        light_threshold: 620,
        irrigation_interval_secs: 35,
        irrigation_duration_secs: 6,
    },
    PlantProfile {
        name: "STRAWBERRY",
        humidity_threshold: 460,
        temp_threshold: 240,
        light_threshold: 600,
        irrigation_interval_secs: 28,
        irrigation_duration_secs: 5,
    },
];

/// Number of profiles in the catalog.
pub fn count() -> u8 {
    CATALOG.len() as u8
}

/// Look up a profile by index.  `None` for out-of-range indices.
pub fn get(index: u8) -> Option<&'static PlantProfile> {
    CATALOG.get(index as usize)
}

/// Display name for a profile index, or `"INVALID"` when out of range.
pub fn name(index: u8) -> &'static str {
    get(index).map_or("INVALID", |p| p.name)
}

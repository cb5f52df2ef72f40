//! Outbound command definitions.
//!
//! Commands are tagged by the `cmd` field and flattened into the
//! [`Request`](super::Request) envelope.
//!
//! | `cmd` | Extra fields |
//! |-------|--------------|
//! | `getState` | none |
//! | `run` | `systemType` |
//! | `stop` | none |
//! | `preset` | `systemType` |
//! | `updateSensor` | `sensor`, `value` |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// SystemType
// ============================================================================

/// Unit preset selected on the control server.
///
/// Kept as a free-form string since the server owns the list of presets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemType(String);

impl SystemType {
    /// Wire name of the carrier preset.
    pub const CARRIER: &'static str = "carrier";
    /// Wire name of the Thermo King preset.
    pub const THERMO_KING: &'static str = "thermoking";
    /// Wire name of the APU preset.
    pub const APU: &'static str = "apu";
    /// Wire name of the container preset.
    pub const CONTAINER: &'static str = "container";

    /// Creates a system type from its wire name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The carrier preset (hall-effect RPM pickup).
    #[inline]
    #[must_use]
    pub fn carrier() -> Self {
        Self::new(Self::CARRIER)
    }

    /// Returns `true` for the carrier preset.
    #[inline]
    #[must_use]
    pub fn is_carrier(&self) -> bool {
        self.0 == Self::CARRIER
    }

    /// Returns the wire name.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Command
// ============================================================================

/// Commands understood by the control server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum Command {
    /// Request a full status snapshot.
    #[serde(rename = "getState")]
    GetState,

    /// Start the system.
    #[serde(rename = "run")]
    Run {
        /// Preset to run with.
        #[serde(rename = "systemType")]
        system_type: SystemType,
    },

    /// Stop the system.
    #[serde(rename = "stop")]
    Stop,

    /// Switch the active preset.
    #[serde(rename = "preset")]
    Preset {
        /// Preset to load.
        #[serde(rename = "systemType")]
        system_type: SystemType,
    },

    /// Set a simulated sensor value.
    #[serde(rename = "updateSensor")]
    UpdateSensor {
        /// Sensor key as used by the server.
        sensor: String,
        /// New value.
        value: f64,
    },
}

impl Command {
    /// Creates a `run` command.
    #[inline]
    #[must_use]
    pub fn run(system_type: SystemType) -> Self {
        Self::Run { system_type }
    }

    /// Creates a `preset` command.
    #[inline]
    #[must_use]
    pub fn preset(system_type: SystemType) -> Self {
        Self::Preset { system_type }
    }

    /// Creates an `updateSensor` command.
    #[inline]
    #[must_use]
    pub fn update_sensor(sensor: impl Into<String>, value: f64) -> Self {
        Self::UpdateSensor {
            sensor: sensor.into(),
            value,
        }
    }

    /// Creates an `updateSensor` command from an arrow-button adjustment.
    ///
    /// The new value is `current + adjustment * step`, clamped to the limits.
    #[must_use]
    pub fn adjust_sensor(
        sensor: impl Into<String>,
        current: f64,
        adjustment: f64,
        limits: SensorLimits,
    ) -> Self {
        Self::update_sensor(sensor, limits.apply(current, adjustment))
    }

    /// Returns the `cmd` discriminator.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetState => "getState",
            Self::Run { .. } => "run",
            Self::Stop => "stop",
            Self::Preset { .. } => "preset",
            Self::UpdateSensor { .. } => "updateSensor",
        }
    }
}

// ============================================================================
// SensorLimits
// ============================================================================

/// Step size and bounds of an adjustable sensor input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorLimits {
    /// Amount added per adjustment unit.
    pub step: f64,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl SensorLimits {
    /// Creates limits with explicit step and bounds.
    #[inline]
    #[must_use]
    pub const fn new(step: f64, min: f64, max: f64) -> Self {
        Self { step, min, max }
    }

    /// Applies `adjustment` steps to `current` and clamps the result.
    #[inline]
    #[must_use]
    pub fn apply(&self, current: f64, adjustment: f64) -> f64 {
        (current + adjustment * self.step).max(self.min).min(self.max)
    }
}

impl Default for SensorLimits {
    fn default() -> Self {
        Self::new(100.0, 0.0, 100_000.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

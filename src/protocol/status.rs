//! Status snapshot message.
//!
//! A `status` message is a full, authoritative state push. Fields the server
//! leaves out or sends as `null` decode as `None`.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::SystemType;

// ============================================================================
// Sensor
// ============================================================================

/// Sensor readings carried by a status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sensor {
    /// Return air temperature.
    ReturnAirTemp,
    /// Discharge air temperature.
    DischargeAirTemp,
    /// Ambient temperature.
    AmbientTemp,
    /// Coolant temperature.
    CoolantTemp,
    /// Evaporator coil temperature.
    CoilTemp,
    /// Redundant return air temperature (not fitted on every preset).
    RedundantAirTemp,
    /// Suction pressure.
    SuctionPressure,
    /// Discharge pressure.
    DischargePressure,
}

impl Sensor {
    /// Every sensor, in display order.
    pub const ALL: [Self; 8] = [
        Self::ReturnAirTemp,
        Self::DischargeAirTemp,
        Self::AmbientTemp,
        Self::CoolantTemp,
        Self::CoilTemp,
        Self::RedundantAirTemp,
        Self::SuctionPressure,
        Self::DischargePressure,
    ];

    /// Returns the field name used on the wire.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::ReturnAirTemp => "returnAirTemp",
            Self::DischargeAirTemp => "dischargeAirTemp",
            Self::AmbientTemp => "ambientTemp",
            Self::CoolantTemp => "coolantTemp",
            Self::CoilTemp => "coilTemp",
            Self::RedundantAirTemp => "redundantAirTemp",
            Self::SuctionPressure => "suctionPressure",
            Self::DischargePressure => "dischargePressure",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.wire_name())
    }
}

/// Formats a reading with one decimal, or `--` when absent.
#[must_use]
pub fn format_reading(reading: Option<f64>) -> String {
    match reading {
        Some(value) if value.is_finite() => format!("{value:.1}"),
        _ => "--".to_string(),
    }
}

// ============================================================================
// StatusSnapshot
// ============================================================================

/// A full state snapshot from the server.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// Whether the unit is running. Accepts any JSON value and applies
    /// truthiness: non-zero numbers and non-empty strings count as running.
    #[serde(default, deserialize_with = "truthy")]
    pub system_running: bool,

    /// Active preset.
    #[serde(default)]
    pub system_type: Option<SystemType>,

    /// Whether the unit restarts automatically.
    #[serde(default)]
    pub auto_run_enabled: Option<bool>,

    /// Status LED state.
    #[serde(default)]
    pub led_state: Option<bool>,

    /// Hall-effect RPM pickup.
    #[serde(default)]
    pub hall_rpm: Option<f64>,

    /// Inductive RPM pickup.
    #[serde(default)]
    pub ind_rpm: Option<f64>,

    /// Return air temperature.
    #[serde(default)]
    pub return_air_temp: Option<f64>,

    /// Discharge air temperature.
    #[serde(default)]
    pub discharge_air_temp: Option<f64>,

    /// Ambient temperature.
    #[serde(default)]
    pub ambient_temp: Option<f64>,

    /// Coolant temperature.
    #[serde(default)]
    pub coolant_temp: Option<f64>,

    /// Coil temperature.
    #[serde(default)]
    pub coil_temp: Option<f64>,

    /// Redundant return air temperature.
    #[serde(default)]
    pub redundant_air_temp: Option<f64>,

    /// Suction pressure.
    #[serde(default)]
    pub suction_pressure: Option<f64>,

    /// Discharge pressure.
    #[serde(default)]
    pub discharge_pressure: Option<f64>,
}

impl StatusSnapshot {
    /// Returns the reading for `sensor`.
    #[must_use]
    pub fn reading(&self, sensor: Sensor) -> Option<f64> {
        match sensor {
            Sensor::ReturnAirTemp => self.return_air_temp,
            Sensor::DischargeAirTemp => self.discharge_air_temp,
            Sensor::AmbientTemp => self.ambient_temp,
            Sensor::CoolantTemp => self.coolant_temp,
            Sensor::CoilTemp => self.coil_temp,
            Sensor::RedundantAirTemp => self.redundant_air_temp,
            Sensor::SuctionPressure => self.suction_pressure,
            Sensor::DischargePressure => self.discharge_pressure,
        }
    }

    /// Returns the RPM pickup matching the active preset.
    #[must_use]
    pub fn active_rpm(&self) -> Option<f64> {
        match &self.system_type {
            Some(system_type) if system_type.is_carrier() => self.hall_rpm,
            _ => self.ind_rpm,
        }
    }

    /// Upper-cased preset name for notices.
    #[must_use]
    pub fn type_label(&self) -> String {
        self.system_type
            .as_ref()
            .map_or_else(|| "UNKNOWN".to_string(), |t| t.as_str().to_uppercase())
    }
}

// ============================================================================
// Truthiness
// ============================================================================

/// Deserializes any JSON value into a boolean by truthiness.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

/// Truthiness of a JSON value.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Tests
// ============================================================================

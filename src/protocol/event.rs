//! Server-pushed event and RPM update messages.
//!
//! | `type` | Struct | Purpose |
//! |--------|--------|---------|
//! | `event` | [`Event`] | Discrete occurrence with a human-readable message |
//! | `rpmUpdate` | [`RpmUpdate`] | Periodic RPM push |

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::SystemType;

// ============================================================================
// Constants
// ============================================================================

/// Event type announcing an RPM change.
pub const RPM_CHANGED: &str = "rpmChanged";

/// Matches the `<N> RPM` fragment embedded in event messages.
static RPM_IN_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*RPM").expect("rpm regex is valid"));

// ============================================================================
// Event
// ============================================================================

/// A discrete occurrence reported by the server.
///
/// # Format
///
/// ```json
/// {
///   "type": "event",
///   "eventType": "rpmChanged",
///   "message": "Changed to 1800 RPM",
///   "timestamp": 123456
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    /// Event kind, e.g. `rpmChanged`.
    #[serde(rename = "eventType", default)]
    pub event_type: Option<String>,

    /// Human-readable description.
    #[serde(default)]
    pub message: Option<String>,

    /// Server uptime in milliseconds when the event was raised.
    #[serde(default)]
    pub timestamp: Option<u64>,
}

impl Event {
    /// Returns `true` for `rpmChanged` events.
    #[inline]
    #[must_use]
    pub fn is_rpm_changed(&self) -> bool {
        self.event_type.as_deref() == Some(RPM_CHANGED)
    }

    /// Extracts the RPM value embedded in the message as `<N> RPM`.
    #[must_use]
    pub fn rpm(&self) -> Option<i64> {
        let message = self.message.as_deref()?;
        RPM_IN_MESSAGE
            .captures(message)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

// ============================================================================
// RpmUpdate
// ============================================================================

/// A periodic RPM push.
///
/// `activeRpm` is authoritative; the raw pickups are a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct RpmUpdate {
    /// Reading of the pickup matching the active preset.
    #[serde(rename = "activeRpm", default)]
    pub active_rpm: Option<f64>,

    /// Hall-effect pickup reading (carrier preset).
    #[serde(rename = "hallRpm", default)]
    pub hall_rpm: Option<f64>,

    /// Inductive pickup reading (every other preset).
    #[serde(rename = "indRpm", default)]
    pub ind_rpm: Option<f64>,
}

impl RpmUpdate {
    /// Selects the reading to display.
    ///
    /// Prefers `activeRpm`; otherwise picks the pickup matching
    /// `system_type` (hall for carrier, inductive for anything else,
    /// including an unknown type).
    #[must_use]
    pub fn reading_for(&self, system_type: Option<&SystemType>) -> Option<f64> {
        if self.active_rpm.is_some() {
            return self.active_rpm;
        }
        match system_type {
            Some(system_type) if system_type.is_carrier() => self.hall_rpm,
            _ => self.ind_rpm,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_parse() {
        let event: Event = serde_json::from_str(
            r#"{"eventType": "rpmChanged", "message": "Changed to 1800 RPM", "timestamp": 5}"#,
        )
        .expect("parse");
        assert!(event.is_rpm_changed());
        assert_eq!(event.rpm(), Some(1800));
    }

    #[test]
    fn test_event_rpm_without_space() {
        let event = Event {
            event_type: Some(RPM_CHANGED.into()),
            message: Some("now 950RPM".into()),
            timestamp: None,
        };
        assert_eq!(event.rpm(), Some(950));
    }

    #[test]
    fn test_event_rpm_missing() {
        let event = Event {
            event_type: Some("other".into()),
            message: Some("Preset loaded".into()),
            timestamp: None,
        };
        assert!(!event.is_rpm_changed());
        assert_eq!(event.rpm(), None);
    }

    #[test]
    fn test_rpm_update_prefers_active() {
        let update = RpmUpdate {
            active_rpm: Some(1523.7),
            hall_rpm: Some(1.0),
            ind_rpm: Some(2.0),
        };
        assert_eq!(update.reading_for(Some(&SystemType::carrier())), Some(1523.7));
    }

    #[test]
    fn test_rpm_update_falls_back_by_type() {
        let update = RpmUpdate {
            active_rpm: None,
            hall_rpm: Some(1100.0),
            ind_rpm: Some(2200.0),
        };
        assert_eq!(update.reading_for(Some(&SystemType::carrier())), Some(1100.0));
        assert_eq!(update.reading_for(Some(&SystemType::new("apu"))), Some(2200.0));
        assert_eq!(update.reading_for(None), Some(2200.0));
    }
}

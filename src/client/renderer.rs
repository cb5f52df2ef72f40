//! Renderer collaborator.
//!
//! The client core never touches a display. It describes what should be
//! shown through this trait and leaves layout and styling to the
//! implementation.

// ============================================================================
// Imports
// ============================================================================

use crate::protocol::{Sensor, SystemType};

// ============================================================================
// StatusView
// ============================================================================

/// Display state derived from the running flag of a status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusView {
    /// Whether the unit is running.
    pub running: bool,
    /// Status text, `Running` or `Stopped`.
    pub label: &'static str,
    /// Whether the run control accepts input.
    pub run_enabled: bool,
    /// Whether the stop control accepts input.
    pub stop_enabled: bool,
    /// Whether the system type selector accepts input.
    pub type_selector_enabled: bool,
}

impl StatusView {
    /// Derives the view for a running flag.
    #[must_use]
    pub const fn from_running(running: bool) -> Self {
        Self {
            running,
            label: if running { "Running" } else { "Stopped" },
            run_enabled: !running,
            stop_enabled: running,
            type_selector_enabled: !running,
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Display and notification sink driven by the client core.
pub trait Renderer {
    /// Toggles the connected indicator.
    fn set_connected(&mut self, connected: bool);

    /// Shows a transient notice.
    fn show_notice(&mut self, message: &str);

    /// Hides the current notice.
    fn hide_notice(&mut self) {}

    /// Renders status text and control enablement.
    fn render_status(&mut self, view: &StatusView);

    /// Renders one sensor reading; `None` means no value.
    fn render_sensor(&mut self, sensor: Sensor, reading: Option<f64>);

    /// Renders the RPM display.
    fn render_rpm(&mut self, rpm: i64);

    /// Returns the system type currently shown in the selector.
    fn selected_system_type(&self) -> Option<SystemType> {
        None
    }

    /// Overwrites the system type selector.
    fn select_system_type(&mut self, _system_type: &SystemType) {}
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_view() {
        let view = StatusView::from_running(true);
        assert_eq!(view.label, "Running");
        assert!(!view.run_enabled);
        assert!(view.stop_enabled);
        assert!(!view.type_selector_enabled);
    }

    #[test]
    fn test_stopped_view() {
        let view = StatusView::from_running(false);
        assert_eq!(view.label, "Stopped");
        assert!(view.run_enabled);
        assert!(!view.stop_enabled);
        assert!(view.type_selector_enabled);
    }
}

//! Status snapshot application and transition notices.

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::protocol::{Sensor, StatusSnapshot};
use crate::scheduler::Scheduler;
use crate::transport::Transport;

use super::context::ClientContext;
use super::renderer::{Renderer, StatusView};

// ============================================================================
// ClientContext - Status
// ============================================================================

impl<S, T, R> ClientContext<S, T, R>
where
    S: Scheduler,
    T: Transport,
    R: Renderer,
{
    /// Replaces the last known status and renders it.
    ///
    /// A change of the running flag, including the first snapshot after
    /// start, raises a `System started`/`System stopped` notice.
    pub fn apply_status(&mut self, snapshot: StatusSnapshot) {
        let running = snapshot.system_running;
        let previous = self.last_status.as_ref().map(|s| s.system_running);

        if previous != Some(running) {
            let verb = if running { "started" } else { "stopped" };
            self.notify(&format!("System {verb} - {}", snapshot.type_label()));
        }

        self.renderer.render_status(&StatusView::from_running(running));

        if let Some(system_type) = &snapshot.system_type
            && self.renderer.selected_system_type().as_ref() != Some(system_type)
        {
            self.renderer.select_system_type(system_type);
        }

        for sensor in Sensor::ALL {
            self.renderer.render_sensor(sensor, snapshot.reading(sensor));
        }

        if let Some(rpm) = snapshot.active_rpm() {
            self.renderer.render_rpm(rpm.round() as i64);
        }

        debug!(running, system_type = %snapshot.type_label(), "Status applied");
        self.last_status = Some(snapshot);
    }
}

// ============================================================================
// Tests
// ============================================================================

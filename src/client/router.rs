//! Inbound message router.
//!
//! | `type` | Handling |
//! |--------|----------|
//! | `status` | [`apply_status`](ClientContext::apply_status) |
//! | `response` | Settles the pending command; errors become notices |
//! | `event` | Notice; `rpmChanged` also updates the RPM display |
//! | `rpmUpdate` | RPM display |
//!
//! Malformed and unrecognized messages are logged and dropped.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, info, trace, warn};

use crate::error::Error;
use crate::identifiers::CommandId;
use crate::protocol::{Event, InboundMessage, Response, RpmUpdate};
use crate::scheduler::Scheduler;
use crate::transport::Transport;

use super::context::ClientContext;
use super::renderer::Renderer;

// ============================================================================
// ClientContext - Routing
// ============================================================================

impl<S, T, R> ClientContext<S, T, R>
where
    S: Scheduler,
    T: Transport,
    R: Renderer,
{
    /// Classifies and handles one inbound frame.
    pub fn route_message(&mut self, text: &str) {
        let message = match InboundMessage::parse(text) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Dropping malformed message");
                return;
            }
        };
        trace!(kind = message.label(), "Routing message");

        match message {
            InboundMessage::Status(snapshot) => self.apply_status(snapshot),
            InboundMessage::Response(response) => self.handle_response(response),
            InboundMessage::Event(event) => self.handle_event(event),
            InboundMessage::RpmUpdate(update) => self.handle_rpm_update(update),
            InboundMessage::Unknown { kind } => {
                info!(kind = kind.as_deref().unwrap_or("<none>"), "Unrecognized message");
            }
        }
    }

    fn handle_response(&mut self, response: Response) {
        let Some(id) = response.id else {
            debug!("Response without commandId");
            return;
        };
        if self.pending.remove(id, &mut self.scheduler).is_none() {
            debug!(command_id = %id, "Response for unknown command");
            return;
        }

        if response.is_error() {
            self.reject(id, &response);
        } else {
            debug!(command_id = %id, "Command acknowledged");
        }
    }

    fn reject(&mut self, id: CommandId, response: &Response) {
        let notice = response.error_notice();
        warn!(error = %Error::command_rejected(id, notice), "Command rejected");
        self.notify(notice);
    }

    fn handle_event(&mut self, event: Event) {
        if let Some(message) = event.message.as_deref() {
            self.notify(message);
        }
        if event.is_rpm_changed()
            && let Some(rpm) = event.rpm()
        {
            self.renderer.render_rpm(rpm);
        }
    }

    fn handle_rpm_update(&mut self, update: RpmUpdate) {
        let system_type = self.last_status.as_ref().and_then(|s| s.system_type.as_ref());
        if let Some(reading) = update.reading_for(system_type) {
            self.renderer.render_rpm(reading.round() as i64);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

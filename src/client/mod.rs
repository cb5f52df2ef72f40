//! Client core: command reliability and connection lifecycle.
//!
//! [`ClientContext`] owns the session handle, the pending command table and
//! the last known status. All state changes go through
//! [`ClientContext::dispatch`], one [`ClientEvent`] at a time.
//!
//! | Component | Module |
//! |-----------|--------|
//! | Transport session | `session` |
//! | Reconnection supervisor and health monitor | `supervisor` |
//! | Command dispatcher | `dispatcher` |
//! | Pending command table | `pending` |
//! | Inbound message router | `router` |
//! | Status update and transition notices | `status` |
//! | Notice display timing | `notice` |
//! | Renderer collaborator | `renderer` |
//!
//! # Example
//!
//! ```
//! use stand_control::client::{ClientContext, ClientEvent, Renderer, StatusView};
//! use stand_control::protocol::{Command, Sensor, SystemType};
//! use stand_control::scheduler::ManualScheduler;
//! use stand_control::transport::Transport;
//! use stand_control::{ClientConfig, SessionId};
//!
//! struct Log(Vec<String>);
//!
//! impl Transport for Log {
//!     fn open(&mut self, _: SessionId, _: &url::Url) -> stand_control::Result<()> { Ok(()) }
//!     fn send(&mut self, text: String) -> stand_control::Result<()> { self.0.push(text); Ok(()) }
//!     fn close(&mut self) {}
//! }
//!
//! struct Silent;
//!
//! impl Renderer for Silent {
//!     fn set_connected(&mut self, _: bool) {}
//!     fn show_notice(&mut self, _: &str) {}
//!     fn render_status(&mut self, _: &StatusView) {}
//!     fn render_sensor(&mut self, _: Sensor, _: Option<f64>) {}
//!     fn render_rpm(&mut self, _: i64) {}
//! }
//!
//! let config = ClientConfig::for_origin("http://192.168.4.1").unwrap();
//! let mut ctx = ClientContext::new(config, ManualScheduler::starting_at(1_000), Log(Vec::new()), Silent);
//!
//! ctx.start();
//! let session = ctx.session_id().unwrap();
//! ctx.dispatch(ClientEvent::Opened(session));
//!
//! assert!(ctx.send_command(Command::run(SystemType::carrier())));
//! assert_eq!(ctx.pending().len(), 2); // implicit getState + run
//! ```

// ============================================================================
// Imports
// ============================================================================

use crate::identifiers::{SessionId, TimerId};
use crate::scheduler::TimerKind;

// ============================================================================
// Submodules
// ============================================================================

/// Owned client state and event dispatch.
pub mod context;

/// Command dispatcher.
pub mod dispatcher;

/// Notice display timing.
pub mod notice;

/// Pending command table.
pub mod pending;

/// Renderer collaborator.
pub mod renderer;

/// Inbound message router.
pub mod router;

/// Transport session lifecycle.
pub mod session;

/// Status update and transition notices.
pub mod status;

/// Reconnection supervisor and health monitor.
pub mod supervisor;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::ClientContext;
pub use pending::{PendingCommand, PendingTable};
pub use renderer::{Renderer, StatusView};
pub use session::{ConnectionState, Session};
pub use supervisor::ReconnectState;

// ============================================================================
// ClientEvent
// ============================================================================

/// Input to [`ClientContext::dispatch`].
///
/// Transport events carry the [`SessionId`] of the session that produced
/// them; events from a replaced session are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Session handshake completed.
    Opened(SessionId),
    /// Session ended, gracefully or not.
    Closed(SessionId),
    /// Transport-level error. A [`Closed`](Self::Closed) follows.
    Errored {
        /// Session that failed.
        session: SessionId,
        /// Error description.
        message: String,
    },
    /// Text frame received.
    MessageReceived {
        /// Session that received the frame.
        session: SessionId,
        /// Raw frame text.
        text: String,
    },
    /// A scheduler timer fired.
    Timer {
        /// Handle returned when the timer was armed.
        id: TimerId,
        /// What the timer is for.
        kind: TimerKind,
    },
}

//! Transport session lifecycle.
//!
//! At most one session is live. [`ClientContext::connect`] closes the
//! previous one before opening the next, and every transport event is
//! checked against the current [`SessionId`] so a replaced session's late
//! close cannot flip the indicator or arm the reconnect timer.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::{debug, info, trace, warn};

use crate::identifiers::SessionId;
use crate::protocol::Command;
use crate::scheduler::Scheduler;
use crate::transport::Transport;

use super::context::ClientContext;
use super::renderer::Renderer;

// ============================================================================
// ConnectionState
// ============================================================================

/// State of a transport session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Connect attempt in flight.
    Connecting,
    /// Handshake completed; commands may be sent.
    Open,
    /// Close requested locally.
    Closing,
    /// Session ended.
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "CONNECTING",
            Self::Open => "OPEN",
            Self::Closing => "CLOSING",
            Self::Closed => "CLOSED",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Session
// ============================================================================

/// The current transport session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Generation tag carried by transport events.
    pub id: SessionId,
    /// Lifecycle state.
    pub state: ConnectionState,
}

impl Session {
    /// Creates a session in [`ConnectionState::Connecting`].
    #[inline]
    #[must_use]
    pub const fn connecting(id: SessionId) -> Self {
        Self {
            id,
            state: ConnectionState::Connecting,
        }
    }

    /// Returns `true` if commands may be sent.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }
}

// ============================================================================
// ClientContext - Session Handling
// ============================================================================

impl<S, T, R> ClientContext<S, T, R>
where
    S: Scheduler,
    T: Transport,
    R: Renderer,
{
    /// Replaces the current session with a fresh connect attempt.
    pub fn connect(&mut self) {
        if let Some(previous) = self.session.take() {
            self.transport.close();
            if previous.is_open() {
                self.renderer.set_connected(false);
            }
            debug!(session = %previous.id, state = %previous.state, "Replacing session");
        }

        let id = self.last_session.map_or(SessionId::new(1), SessionId::next);
        self.last_session = Some(id);
        self.session = Some(Session::connecting(id));

        info!(session = %id, endpoint = %self.config.endpoint, "Connecting");
        if let Err(e) = self.transport.open(id, &self.config.endpoint) {
            warn!(session = %id, error = %e, "Connect attempt could not start");
            self.handle_close(id);
        }
    }

    pub(super) fn handle_open(&mut self, id: SessionId) {
        let Some(session) = self.session.as_mut().filter(|s| s.id == id) else {
            trace!(session = %id, "Ignoring open of replaced session");
            return;
        };
        session.state = ConnectionState::Open;

        info!(session = %id, "Connected");
        self.renderer.set_connected(true);
        self.supervisor.disarm_reconnect(&mut self.scheduler);
        self.send_command(Command::GetState);
    }

    pub(super) fn handle_close(&mut self, id: SessionId) {
        let Some(session) = self.session.as_mut().filter(|s| s.id == id) else {
            trace!(session = %id, "Ignoring close of replaced session");
            return;
        };
        if session.state == ConnectionState::Closed {
            return;
        }
        session.state = ConnectionState::Closed;

        info!(session = %id, "Disconnected");
        self.renderer.set_connected(false);

        if !self.stopped {
            let delay = self.config.reconnect_delay;
            self.supervisor.arm_reconnect(&mut self.scheduler, delay);
        }
    }

    pub(super) fn handle_error(&mut self, id: SessionId, message: &str) {
        if self.is_current(id) {
            warn!(session = %id, error = message, "Transport error");
        } else {
            trace!(session = %id, error = message, "Transport error on replaced session");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::client::{ClientEvent, ReconnectState};
    use crate::scheduler::TimerKind;
    use crate::testing::{context, open_context};

    #[test]
    fn test_connection_state_display() {
        assert_eq!(ConnectionState::Open.to_string(), "OPEN");
        assert_eq!(ConnectionState::Closing.to_string(), "CLOSING");
        assert_eq!(ConnectionState::Closed.to_string(), "CLOSED");
    }

    #[test]
    fn test_open_sends_get_state_and_sets_indicator() {
        let ctx = open_context();

        assert_eq!(ctx.connection_state(), Some(ConnectionState::Open));
        assert_eq!(ctx.renderer().connected, vec![true]);
        assert_eq!(ctx.transport().sent.len(), 1);
        assert!(ctx.transport().sent[0].contains(r#""cmd":"getState""#));
        assert_eq!(ctx.pending().len(), 1);
    }

    #[test]
    fn test_close_arms_reconnect_once() {
        let mut ctx = open_context();
        let session = ctx.session_id().expect("session");

        ctx.dispatch(ClientEvent::Closed(session));
        assert_eq!(ctx.connection_state(), Some(ConnectionState::Closed));
        assert_eq!(ctx.renderer().connected, vec![true, false]);
        assert!(matches!(ctx.reconnect_state(), ReconnectState::Retrying(_)));

        // Duplicate close is a no-op.
        ctx.dispatch(ClientEvent::Closed(session));
        assert_eq!(ctx.renderer().connected, vec![true, false]);
    }

    #[test]
    fn test_open_failure_is_handled_as_close() {
        let mut ctx = context();
        ctx.transport_mut().fail_open = true;
        ctx.start();

        assert_eq!(ctx.connection_state(), Some(ConnectionState::Closed));
        assert_eq!(ctx.renderer().connected, vec![false]);
        assert!(ctx.scheduler().is_armed(TimerKind::Reconnect));
    }

    #[test]
    fn test_replaced_session_close_is_ignored() {
        let mut ctx = open_context();
        let old = ctx.session_id().expect("session");

        ctx.connect();
        assert_eq!(ctx.renderer().connected, vec![true, false]);
        assert_eq!(ctx.transport().closes, 1);

        ctx.dispatch(ClientEvent::Closed(old));
        assert_eq!(ctx.connection_state(), Some(ConnectionState::Connecting));
        assert_eq!(ctx.reconnect_state(), ReconnectState::Idle);
    }

    #[test]
    fn test_error_does_not_reconnect() {
        let mut ctx = open_context();
        let session = ctx.session_id().expect("session");

        ctx.dispatch(ClientEvent::Errored {
            session,
            message: "reset by peer".into(),
        });
        assert_eq!(ctx.connection_state(), Some(ConnectionState::Open));
        assert_eq!(ctx.reconnect_state(), ReconnectState::Idle);
    }
}

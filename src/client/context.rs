//! Owned client state and event dispatch.
//!
//! The behaviour of the context is split across sibling modules, each adding
//! an `impl ClientContext` block:
//!
//! | Module | Methods |
//! |--------|---------|
//! | `session` | `connect`, `handle_open`, `handle_close`, `handle_error` |
//! | `supervisor` | reconnect and health ticks |
//! | `dispatcher` | `send_command`, command timeouts |
//! | `router` | `route_message` |
//! | `status` | `apply_status` |
//! | `notice` | `notify`, notice expiry |

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tracing::{debug, info, trace};

use crate::config::ClientConfig;
use crate::identifiers::{CommandId, SessionId, TimerId};
use crate::protocol::StatusSnapshot;
use crate::scheduler::{ManualScheduler, Scheduler, TimerKind};
use crate::transport::Transport;

use super::ClientEvent;
use super::pending::PendingTable;
use super::renderer::Renderer;
use super::session::{ConnectionState, Session};
use super::supervisor::{ReconnectState, Supervisor};

// ============================================================================
// ClientContext
// ============================================================================

/// Single owner of all client state.
///
/// Generic over its collaborators so the same logic runs against the tokio
/// runtime and against virtual time in tests.
pub struct ClientContext<S, T, R> {
    /// Timing and endpoint configuration.
    pub(super) config: ClientConfig,
    /// Timer capability.
    pub(super) scheduler: S,
    /// Duplex channel to the server.
    pub(super) transport: T,
    /// Display sink.
    pub(super) renderer: R,
    /// Current session, if any.
    pub(super) session: Option<Session>,
    /// Most recently allocated session id.
    pub(super) last_session: Option<SessionId>,
    /// Commands awaiting acknowledgment.
    pub(super) pending: PendingTable,
    /// Most recently applied status snapshot.
    pub(super) last_status: Option<StatusSnapshot>,
    /// Reconnect timer and health monitor.
    pub(super) supervisor: Supervisor,
    /// Hide timer of the visible notice.
    pub(super) notice_timer: Option<TimerId>,
    /// Most recently issued command id.
    pub(super) last_command_id: Option<CommandId>,
    /// Set by `shutdown`; suppresses reconnection.
    pub(super) stopped: bool,
}

// ============================================================================
// Lifecycle
// ============================================================================

impl<S, T, R> ClientContext<S, T, R>
where
    S: Scheduler,
    T: Transport,
    R: Renderer,
{
    /// Creates an idle context. Nothing happens until [`start`](Self::start).
    pub fn new(config: ClientConfig, scheduler: S, transport: T, renderer: R) -> Self {
        Self {
            config,
            scheduler,
            transport,
            renderer,
            session: None,
            last_session: None,
            pending: PendingTable::new(),
            last_status: None,
            supervisor: Supervisor::default(),
            notice_timer: None,
            last_command_id: None,
            stopped: false,
        }
    }

    /// Opens the first session and starts the health monitor.
    pub fn start(&mut self) {
        self.stopped = false;
        self.connect();
        let interval = self.config.health_check_interval;
        self.supervisor
            .start_health_monitor(&mut self.scheduler, interval);
    }

    /// Applies one event.
    pub fn dispatch(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Opened(session) => self.handle_open(session),
            ClientEvent::Closed(session) => self.handle_close(session),
            ClientEvent::Errored { session, message } => self.handle_error(session, &message),
            ClientEvent::MessageReceived { session, text } => {
                if self.is_current(session) {
                    self.route_message(&text);
                } else {
                    trace!(%session, "Dropping frame from replaced session");
                }
            }
            ClientEvent::Timer { id, kind } => self.handle_timer(id, kind),
        }
    }

    /// Cancels every timer, abandons pending commands and closes the session.
    pub fn shutdown(&mut self) {
        self.stopped = true;
        self.supervisor.stop(&mut self.scheduler);
        if let Some(timer) = self.notice_timer.take() {
            self.scheduler.cancel(timer);
        }

        let abandoned = self.pending.clear(&mut self.scheduler);
        // The transport reports the final close; until then the session is
        // closing.
        if let Some(session) = self
            .session
            .as_mut()
            .filter(|s| s.state != ConnectionState::Closed)
        {
            session.state = ConnectionState::Closing;
        }
        self.transport.close();

        info!(abandoned, "Client shut down");
    }

    fn handle_timer(&mut self, id: TimerId, kind: TimerKind) {
        match kind {
            TimerKind::CommandTimeout(command_id) => self.handle_command_timeout(id, command_id),
            TimerKind::Reconnect => self.handle_reconnect_tick(id),
            TimerKind::HealthCheck => self.handle_health_tick(id),
            TimerKind::NoticeExpiry => self.handle_notice_expiry(id),
        }
    }

    /// Returns `true` if `session` is the current session.
    #[inline]
    pub(super) fn is_current(&self, session: SessionId) -> bool {
        self.session.as_ref().is_some_and(|s| s.id == session)
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl<S, T, R> ClientContext<S, T, R> {
    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the current session id, if any.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Returns the current session state, if any.
    #[inline]
    #[must_use]
    pub fn connection_state(&self) -> Option<ConnectionState> {
        self.session.as_ref().map(|s| s.state)
    }

    /// Returns the pending command table.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &PendingTable {
        &self.pending
    }

    /// Returns the last applied status snapshot.
    #[inline]
    #[must_use]
    pub fn last_status(&self) -> Option<&StatusSnapshot> {
        self.last_status.as_ref()
    }

    /// Returns the reconnection supervisor state.
    #[inline]
    #[must_use]
    pub fn reconnect_state(&self) -> ReconnectState {
        self.supervisor.reconnect
    }

    /// Returns the scheduler.
    #[inline]
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Returns the scheduler mutably.
    #[inline]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Returns the transport.
    #[inline]
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the transport mutably.
    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Returns the renderer.
    #[inline]
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the renderer mutably.
    #[inline]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Consumes the context, returning the renderer.
    #[inline]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

// ============================================================================
// Virtual Time
// ============================================================================

impl<T, R> ClientContext<ManualScheduler, T, R>
where
    T: Transport,
    R: Renderer,
{
    /// Advances virtual time by `by`, dispatching every timer that falls due.
    ///
    /// Timers armed while dispatching fire in the same call if they fall due
    /// before the new time.
    pub fn advance(&mut self, by: Duration) {
        let target = self
            .scheduler
            .now_ms()
            .saturating_add(u64::try_from(by.as_millis()).unwrap_or(u64::MAX));

        while let Some((id, kind)) = self.scheduler.pop_due(target) {
            debug!(%id, ?kind, now_ms = self.scheduler.now_ms(), "Timer fired");
            self.dispatch(ClientEvent::Timer { id, kind });
        }
        self.scheduler.set_now(target);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::protocol::Command;
    use crate::testing::{RecordingRenderer, RecordingTransport, context};

    #[test]
    fn test_new_context_is_idle() {
        let ctx = context();
        assert!(ctx.session_id().is_none());
        assert!(ctx.connection_state().is_none());
        assert!(ctx.pending().is_empty());
        assert_eq!(ctx.reconnect_state(), ReconnectState::Idle);
        assert!(ctx.transport().opened.is_empty());
    }

    #[test]
    fn test_start_connects_and_arms_health_monitor() {
        let mut ctx = context();
        ctx.start();

        assert_eq!(ctx.connection_state(), Some(ConnectionState::Connecting));
        assert_eq!(ctx.transport().opened.len(), 1);
        assert!(ctx.scheduler().is_armed(TimerKind::HealthCheck));
    }

    #[test]
    fn test_frames_from_replaced_session_are_ignored() {
        let mut ctx = context();
        ctx.start();
        let first = ctx.session_id().expect("session");
        ctx.connect();
        let second = ctx.session_id().expect("session");
        assert_ne!(first, second);

        ctx.dispatch(ClientEvent::MessageReceived {
            session: first,
            text: r#"{"type":"event","message":"late"}"#.into(),
        });
        assert!(ctx.renderer().notices.is_empty());

        ctx.dispatch(ClientEvent::MessageReceived {
            session: second,
            text: r#"{"type":"event","message":"fresh"}"#.into(),
        });
        assert_eq!(ctx.renderer().notices, vec!["fresh".to_string()]);
    }

    #[test]
    fn test_shutdown_cancels_everything() {
        let mut ctx = context();
        ctx.start();
        let session = ctx.session_id().expect("session");
        ctx.dispatch(ClientEvent::Opened(session));
        assert!(ctx.send_command(Command::Stop));

        ctx.shutdown();

        assert!(ctx.pending().is_empty());
        assert_eq!(ctx.scheduler().armed(), 0);
        assert_eq!(ctx.transport().closes, 1);
        assert_eq!(ctx.connection_state(), Some(ConnectionState::Closing));
        assert!(!ctx.send_command(Command::Stop));

        // The transport's own close report must not restart anything.
        ctx.dispatch(ClientEvent::Closed(session));
        assert_eq!(ctx.connection_state(), Some(ConnectionState::Closed));
        assert_eq!(ctx.renderer().connected, vec![true, false]);
        assert_eq!(ctx.reconnect_state(), ReconnectState::Idle);
        assert_eq!(ctx.scheduler().armed(), 0);
    }

    #[test]
    fn test_advance_moves_clock() {
        let mut ctx = ClientContext::new(
            crate::testing::config(),
            ManualScheduler::starting_at(10_000),
            RecordingTransport::default(),
            RecordingRenderer::default(),
        );
        ctx.advance(Duration::from_millis(250));
        assert_eq!(ctx.scheduler().now_ms(), 10_250);
    }
}

//! Reconnection supervisor and health monitor.
//!
//! # State Machine
//!
//! ```text
//!            session closed              reconnect tick
//!   ┌──────┐ ───────────────► ┌──────────┐ ───────┐
//!   │ Idle │                  │ Retrying │        │ connect()
//!   └──────┘ ◄─────────────── └──────────┘ ◄──────┘
//!            session opened
//! ```
//!
//! The health monitor runs independently of the state machine. Each tick it
//! abandons pending commands if the session is not open and reconnects if the
//! session is closed.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::identifiers::TimerId;
use crate::scheduler::{Scheduler, TimerKind};
use crate::transport::Transport;

use super::context::ClientContext;
use super::renderer::Renderer;
use super::session::ConnectionState;

// ============================================================================
// ReconnectState
// ============================================================================

/// Reconnection supervisor state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconnectState {
    /// No reconnection in flight.
    #[default]
    Idle,
    /// A repeating reconnect timer is armed.
    Retrying(TimerId),
}

// ============================================================================
// Supervisor
// ============================================================================

/// Timers owned by the supervisor.
#[derive(Debug, Default)]
pub(super) struct Supervisor {
    pub(super) reconnect: ReconnectState,
    health_timer: Option<TimerId>,
    last_observed: Option<ConnectionState>,
}

impl Supervisor {
    /// Idle → Retrying. No-op while already retrying.
    pub(super) fn arm_reconnect<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
        delay: Duration,
    ) {
        if self.reconnect == ReconnectState::Idle {
            let timer = scheduler.schedule_repeating(delay, TimerKind::Reconnect);
            self.reconnect = ReconnectState::Retrying(timer);
            debug!(%timer, delay_ms = delay.as_millis() as u64, "Reconnect timer armed");
        }
    }

    /// Retrying → Idle.
    pub(super) fn disarm_reconnect<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let ReconnectState::Retrying(timer) = self.reconnect {
            scheduler.cancel(timer);
            self.reconnect = ReconnectState::Idle;
            debug!(%timer, "Reconnect timer cleared");
        }
    }

    pub(super) fn start_health_monitor<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
        interval: Duration,
    ) {
        if self.health_timer.is_none() {
            self.health_timer = Some(scheduler.schedule_repeating(interval, TimerKind::HealthCheck));
        }
    }

    /// Cancels both timers.
    pub(super) fn stop<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        self.disarm_reconnect(scheduler);
        if let Some(timer) = self.health_timer.take() {
            scheduler.cancel(timer);
        }
    }

    /// Records the state seen by a health tick; returns `true` if it changed.
    fn observe(&mut self, state: ConnectionState) -> bool {
        self.last_observed.replace(state) != Some(state)
    }
}

// ============================================================================
// ClientContext - Supervision
// ============================================================================

impl<S, T, R> ClientContext<S, T, R>
where
    S: Scheduler,
    T: Transport,
    R: Renderer,
{
    pub(super) fn handle_reconnect_tick(&mut self, timer: TimerId) {
        if self.supervisor.reconnect != ReconnectState::Retrying(timer) {
            debug!(%timer, "Ignoring stale reconnect tick");
            return;
        }
        info!("Attempting reconnect");
        self.connect();
    }

    pub(super) fn handle_health_tick(&mut self, timer: TimerId) {
        if self.supervisor.health_timer != Some(timer) {
            return;
        }
        let Some(state) = self.connection_state() else {
            return;
        };

        if self.supervisor.observe(state) {
            info!(%state, "Connection state changed");
        }

        if state != ConnectionState::Open {
            let abandoned = self.pending.clear(&mut self.scheduler);
            if abandoned > 0 {
                warn!(abandoned, %state, "Abandoned pending commands");
            }
        }

        if state == ConnectionState::Closed {
            info!("Health check reconnecting");
            self.connect();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

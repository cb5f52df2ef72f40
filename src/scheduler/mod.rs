//! Timer scheduling.
//!
//! The client core never sleeps or spawns timers itself. It asks a
//! [`Scheduler`] to arm timers and later receives the firing back as a
//! [`ClientEvent::Timer`](crate::client::ClientEvent::Timer).
//!
//! | Implementation | Clock | Use |
//! |----------------|-------|-----|
//! | [`ManualScheduler`] | Virtual, advanced explicitly | Deterministic tests |
//! | [`TokioScheduler`] | Wall clock, `tokio::time` | Runtime |

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::identifiers::{CommandId, TimerId};

// ============================================================================
// Submodules
// ============================================================================

/// Virtual-time scheduler.
pub mod manual;

/// Wall-clock scheduler backed by tokio.
pub mod wall_clock;

// ============================================================================
// Re-exports
// ============================================================================

pub use manual::ManualScheduler;
pub use wall_clock::TokioScheduler;

// ============================================================================
// TimerKind
// ============================================================================

/// What a timer is for. Delivered back to the core when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Acknowledgment deadline of a pending command.
    CommandTimeout(CommandId),
    /// Reconnection attempt while the supervisor is retrying.
    Reconnect,
    /// Periodic session health check.
    HealthCheck,
    /// Hide the currently shown notice.
    NoticeExpiry,
}

// ============================================================================
// Scheduler
// ============================================================================

/// Timer capability injected into the client core.
pub trait Scheduler {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;

    /// Arms a timer that fires once after `delay`.
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId;

    /// Arms a timer that fires every `period` until cancelled.
    fn schedule_repeating(&mut self, period: Duration, kind: TimerKind) -> TimerId;

    /// Cancels a timer. Unknown or already fired handles are ignored.
    fn cancel(&mut self, id: TimerId);
}

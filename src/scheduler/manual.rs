//! Virtual-time scheduler.
//!
//! Time only moves when the owner calls [`ManualScheduler::pop_due`] or
//! [`ManualScheduler::set_now`]. Timers due at the same instant fire in the
//! order they were armed.

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::identifiers::TimerId;

use super::{Scheduler, TimerKind};

// ============================================================================
// Types
// ============================================================================

/// An armed timer.
#[derive(Debug, Clone, Copy)]
struct Entry {
    kind: TimerKind,
    period: Option<Duration>,
}

// ============================================================================
// ManualScheduler
// ============================================================================

/// Deterministic scheduler driven by explicit time advancement.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    /// Current virtual time in milliseconds.
    now: u64,
    /// Next handle to hand out.
    next_id: u64,
    /// Armed timers ordered by (due time, handle).
    queue: BTreeMap<(u64, TimerId), Entry>,
    /// Due time of each armed handle.
    due: FxHashMap<TimerId, u64>,
}

impl ManualScheduler {
    /// Creates a scheduler whose clock starts at `start_ms`.
    #[inline]
    #[must_use]
    pub fn starting_at(start_ms: u64) -> Self {
        Self {
            now: start_ms,
            ..Self::default()
        }
    }

    /// Returns the number of armed timers.
    #[inline]
    #[must_use]
    pub fn armed(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if a timer of `kind` is armed.
    #[must_use]
    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.queue.values().any(|entry| entry.kind == kind)
    }

    /// Moves the clock forward to `now_ms` without firing anything.
    ///
    /// The clock never moves backwards.
    #[inline]
    pub fn set_now(&mut self, now_ms: u64) {
        self.now = self.now.max(now_ms);
    }

    /// Pops the earliest timer due at or before `until_ms`.
    ///
    /// Advances the clock to the timer's due time. Repeating timers are
    /// re-armed one period later.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, TimerKind)> {
        let (&(due, id), _) = self.queue.first_key_value()?;
        if due > until_ms {
            return None;
        }

        let entry = self.queue.remove(&(due, id))?;
        self.due.remove(&id);
        self.now = self.now.max(due);

        if let Some(period) = entry.period {
            self.arm(id, due + millis(period), entry);
        }

        Some((id, entry.kind))
    }

    fn allocate(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId::new(self.next_id)
    }

    fn arm(&mut self, id: TimerId, due: u64, entry: Entry) {
        self.queue.insert((due, id), entry);
        self.due.insert(id, due);
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        let id = self.allocate();
        let due = self.now + millis(delay);
        self.arm(id, due, Entry { kind, period: None });
        id
    }

    fn schedule_repeating(&mut self, period: Duration, kind: TimerKind) -> TimerId {
        let id = self.allocate();
        // Zero periods would re-arm at the same instant forever.
        let period = period.max(Duration::from_millis(1));
        let due = self.now + millis(period);
        self.arm(
            id,
            due,
            Entry {
                kind,
                period: Some(period),
            },
        );
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(due) = self.due.remove(&id) {
            self.queue.remove(&(due, id));
        }
    }
}

/// Whole milliseconds of a duration, saturating.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::identifiers::CommandId;

    #[test]
    fn test_once_fires_at_due_time() {
        let mut scheduler = ManualScheduler::starting_at(1_000);
        let id = scheduler.schedule_once(Duration::from_millis(300), TimerKind::Reconnect);

        assert_eq!(scheduler.pop_due(1_299), None);
        assert_eq!(scheduler.pop_due(1_300), Some((id, TimerKind::Reconnect)));
        assert_eq!(scheduler.now_ms(), 1_300);
        assert_eq!(scheduler.armed(), 0);
    }

    #[test]
    fn test_repeating_rearms() {
        let mut scheduler = ManualScheduler::starting_at(0);
        let id = scheduler.schedule_repeating(Duration::from_millis(100), TimerKind::HealthCheck);

        assert_eq!(scheduler.pop_due(250), Some((id, TimerKind::HealthCheck)));
        assert_eq!(scheduler.pop_due(250), Some((id, TimerKind::HealthCheck)));
        assert_eq!(scheduler.pop_due(250), None);
        assert_eq!(scheduler.now_ms(), 200);
        assert!(scheduler.is_armed(TimerKind::HealthCheck));
    }

    #[test]
    fn test_cancel_removes_timer() {
        let mut scheduler = ManualScheduler::default();
        let kind = TimerKind::CommandTimeout(CommandId::new(1));
        let id = scheduler.schedule_once(Duration::from_millis(10), kind);

        scheduler.cancel(id);
        scheduler.cancel(id);

        assert_eq!(scheduler.pop_due(1_000), None);
        assert!(!scheduler.is_armed(kind));
    }

    #[test]
    fn test_same_instant_fires_in_arm_order() {
        let mut scheduler = ManualScheduler::default();
        let first = scheduler.schedule_once(Duration::from_millis(5), TimerKind::Reconnect);
        let second = scheduler.schedule_once(Duration::from_millis(5), TimerKind::NoticeExpiry);

        assert_eq!(scheduler.pop_due(5).map(|(id, _)| id), Some(first));
        assert_eq!(scheduler.pop_due(5).map(|(id, _)| id), Some(second));
    }

    #[test]
    fn test_set_now_never_rewinds() {
        let mut scheduler = ManualScheduler::starting_at(500);
        scheduler.set_now(100);
        assert_eq!(scheduler.now_ms(), 500);
        scheduler.set_now(900);
        assert_eq!(scheduler.now_ms(), 900);
    }
}

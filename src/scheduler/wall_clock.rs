//! Wall-clock scheduler backed by tokio.
//!
//! Each timer is a spawned task that sleeps and then posts a
//! [`ClientEvent::Timer`] into the client's event channel. Cancelling aborts
//! the task; a firing that was already queued before the abort still reaches
//! the core, which treats stale handles as no-ops.

// ============================================================================
// Imports
// ============================================================================

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tracing::trace;

use crate::client::ClientEvent;
use crate::identifiers::TimerId;

use super::{Scheduler, TimerKind};

// ============================================================================
// TokioScheduler
// ============================================================================

/// Scheduler that arms timers as tokio tasks.
///
/// Must be used from within a tokio runtime.
pub struct TokioScheduler {
    /// Channel into the client event loop.
    events: mpsc::UnboundedSender<ClientEvent>,
    /// Live timer tasks by handle.
    timers: FxHashMap<TimerId, JoinHandle<()>>,
    /// Next handle to hand out.
    next_id: u64,
}

impl TokioScheduler {
    /// Creates a scheduler posting firings into `events`.
    #[must_use]
    pub fn new(events: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self {
            events,
            timers: FxHashMap::default(),
            next_id: 0,
        }
    }

    /// Returns the number of timer tasks still running.
    #[must_use]
    pub fn live_timers(&self) -> usize {
        self.timers.values().filter(|task| !task.is_finished()).count()
    }

    /// Cancels every timer.
    pub fn cancel_all(&mut self) {
        for (_, task) in self.timers.drain() {
            task.abort();
        }
    }

    fn allocate(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId::new(self.next_id)
    }

    fn track(&mut self, id: TimerId, task: JoinHandle<()>) {
        // Drop handles of one-shot timers that already fired.
        self.timers.retain(|_, task| !task.is_finished());
        self.timers.insert(id, task);
    }
}

impl Scheduler for TokioScheduler {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default()
    }

    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        let id = self.allocate();
        let events = self.events.clone();

        let task = tokio::spawn(async move {
            sleep(delay).await;
            let _ = events.send(ClientEvent::Timer { id, kind });
        });

        trace!(%id, ?kind, delay_ms = delay.as_millis() as u64, "Timer armed");
        self.track(id, task);
        id
    }

    fn schedule_repeating(&mut self, period: Duration, kind: TimerKind) -> TimerId {
        let id = self.allocate();
        let events = self.events.clone();
        let period = period.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if events.send(ClientEvent::Timer { id, kind }).is_err() {
                    break;
                }
            }
        });

        trace!(%id, ?kind, period_ms = period.as_millis() as u64, "Repeating timer armed");
        self.track(id, task);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.timers.remove(&id) {
            task.abort();
            trace!(%id, "Timer cancelled");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::identifiers::CommandId;

    #[tokio::test(start_paused = true)]
    async fn test_once_timer_posts_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);

        let kind = TimerKind::CommandTimeout(CommandId::new(9));
        let id = scheduler.schedule_once(Duration::from_millis(3_000), kind);

        match rx.recv().await {
            Some(ClientEvent::Timer { id: fired, kind: fired_kind }) => {
                assert_eq!(fired, id);
                assert_eq!(fired_kind, kind);
            }
            other => panic!("expected timer event, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeating_timer_fires_repeatedly() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);

        let id = scheduler.schedule_repeating(Duration::from_millis(2_000), TimerKind::Reconnect);

        for _ in 0..3 {
            match rx.recv().await {
                Some(ClientEvent::Timer { id: fired, .. }) => assert_eq!(fired, id),
                other => panic!("expected timer event, got {other:?}"),
            }
        }

        scheduler.cancel(id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);

        let id = scheduler.schedule_once(Duration::from_millis(100), TimerKind::NoticeExpiry);
        scheduler.cancel(id);

        let fired = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
        assert!(fired.is_err(), "cancelled timer should not fire");
    }

    #[tokio::test]
    async fn test_now_is_wall_clock() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(tx);
        // 2020-01-01 in milliseconds.
        assert!(scheduler.now_ms() > 1_577_836_800_000);
    }
}

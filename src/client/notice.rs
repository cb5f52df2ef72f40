//! Transient notices.
//!
//! One notice is visible at a time. Showing a new notice re-arms the hide
//! timer so the latest message always gets the full display time.

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::identifiers::TimerId;
use crate::scheduler::{Scheduler, TimerKind};
use crate::transport::Transport;

use super::context::ClientContext;
use super::renderer::Renderer;

// ============================================================================
// ClientContext - Notices
// ============================================================================

impl<S, T, R> ClientContext<S, T, R>
where
    S: Scheduler,
    T: Transport,
    R: Renderer,
{
    /// Shows `message` and schedules it to be hidden.
    pub fn notify(&mut self, message: &str) {
        if let Some(previous) = self.notice_timer.take() {
            self.scheduler.cancel(previous);
        }

        debug!(message, "Notice");
        self.renderer.show_notice(message);
        self.notice_timer = Some(
            self.scheduler
                .schedule_once(self.config.notice_duration, TimerKind::NoticeExpiry),
        );
    }

    pub(super) fn handle_notice_expiry(&mut self, timer: TimerId) {
        if self.notice_timer == Some(timer) {
            self.notice_timer = None;
            self.renderer.hide_notice();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::NOTICE_DURATION;
    use crate::testing::context;

    #[test]
    fn test_notice_hides_after_duration() {
        let mut ctx = context();
        ctx.notify("hello");
        assert_eq!(ctx.renderer().notices, vec!["hello".to_string()]);

        ctx.advance(NOTICE_DURATION - Duration::from_millis(1));
        assert_eq!(ctx.renderer().hidden, 0);

        ctx.advance(Duration::from_millis(1));
        assert_eq!(ctx.renderer().hidden, 1);
    }

    #[test]
    fn test_newer_notice_restarts_timer() {
        let mut ctx = context();
        ctx.notify("first");
        ctx.advance(Duration::from_millis(4_000));
        ctx.notify("second");

        ctx.advance(Duration::from_millis(4_000));
        assert_eq!(ctx.renderer().hidden, 0);

        ctx.advance(Duration::from_millis(1_000));
        assert_eq!(ctx.renderer().hidden, 1);
        assert_eq!(ctx.scheduler().armed(), 0);
    }
}

//! Command dispatcher.
//!
//! Every command is sent inside a `{"type":"command","commandId":..}`
//! envelope, tracked in the pending table and guarded by an acknowledgment
//! timeout. A timed-out command is re-sent under a fresh id until the retry
//! limit is reached, then reported once as failed.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::identifiers::{CommandId, TimerId};
use crate::protocol::{Command, Request};
use crate::scheduler::{Scheduler, TimerKind};
use crate::transport::Transport;

use super::context::ClientContext;
use super::pending::PendingCommand;
use super::renderer::Renderer;

// ============================================================================
// ClientContext - Dispatch
// ============================================================================

impl<S, T, R> ClientContext<S, T, R>
where
    S: Scheduler,
    T: Transport,
    R: Renderer,
{
    /// Sends `command` on the open session.
    ///
    /// Returns `false` without side effects if the session is not open or
    /// the frame could not be written.
    pub fn send_command(&mut self, command: Command) -> bool {
        match self.dispatch_command(command, 0) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Command not sent");
                false
            }
        }
    }

    /// Sends one attempt of `command` and tracks it.
    pub(crate) fn dispatch_command(&mut self, command: Command, retry_count: u8) -> Result<CommandId> {
        match self.session {
            Some(session) if session.is_open() => {}
            Some(session) => return Err(Error::not_connected(session.state.to_string())),
            None => return Err(Error::not_connected("NONE")),
        }

        let issued_at = self.scheduler.now_ms();
        let id = CommandId::next_after(self.last_command_id, issued_at);
        let name = command.name();
        let text = Request::new(id, command.clone()).to_json()?;

        self.transport.send(text)?;
        self.last_command_id = Some(id);

        let timeout = self
            .scheduler
            .schedule_once(self.config.command_timeout, TimerKind::CommandTimeout(id));
        self.pending.insert(
            PendingCommand {
                id,
                command,
                retry_count,
                timeout,
                issued_at,
            },
            &mut self.scheduler,
        );

        debug!(command_id = %id, command = name, retry_count, "Command sent");
        Ok(id)
    }

    pub(super) fn handle_command_timeout(&mut self, timer: TimerId, id: CommandId) {
        match self.pending.get(id) {
            Some(entry) if entry.timeout == timer => {}
            _ => return,
        }
        let Some(entry) = self.pending.remove(id, &mut self.scheduler) else {
            return;
        };
        let name = entry.command.name();

        if entry.retry_count < self.config.max_retries {
            let attempt = entry.retry_count + 1;
            warn!(command_id = %id, command = name, attempt, "Command timed out, retrying");
            match self.dispatch_command(entry.command, attempt) {
                Ok(retry_id) => debug!(command_id = %id, %retry_id, "Command re-sent"),
                Err(e) => warn!(command_id = %id, command = name, error = %e, "Retry not sent"),
            }
        } else {
            let failure = Error::command_timeout(id, name, entry.retry_count);
            error!(error = %failure, "Command failed");
            self.notify(&format!("Command failed: {name}"));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use proptest::prelude::*;
    use serde_json::Value;

    use crate::client::ClientEvent;
    use crate::config::COMMAND_TIMEOUT;
    use crate::protocol::SystemType;
    use crate::testing::{context, open_context};

    fn sent_json(frame: &str) -> Value {
        serde_json::from_str(frame).expect("valid frame")
    }

    #[test]
    fn test_envelope_carries_clock_id() {
        let mut ctx = open_context();
        let now = ctx.scheduler().now_ms();
        ctx.transport_mut().sent.clear();

        assert!(ctx.send_command(Command::run(SystemType::carrier())));

        let frame = sent_json(&ctx.transport().sent[0]);
        assert_eq!(frame["type"], "command");
        assert_eq!(frame["cmd"], "run");
        assert_eq!(frame["systemType"], "carrier");
        // getState was issued at `now`, so the run command is bumped by one.
        assert_eq!(frame["commandId"], now + 1);
        let entry = ctx.pending().get(CommandId::new(now + 1)).expect("pending entry");
        assert_eq!(entry.retry_count, 0);
        assert_eq!(entry.command, Command::run(SystemType::carrier()));
    }

    #[test]
    fn test_ids_stay_unique_within_one_millisecond() {
        let mut ctx = open_context();
        for _ in 0..5 {
            assert!(ctx.send_command(Command::Stop));
        }
        assert_eq!(ctx.pending().len(), 6);
    }

    #[test]
    fn test_send_without_session_fails() {
        let mut ctx = context();
        assert!(!ctx.send_command(Command::Stop));
        assert!(ctx.transport().sent.is_empty());
        assert!(ctx.pending().is_empty());
    }

    #[test]
    fn test_send_while_connecting_fails() {
        let mut ctx = context();
        ctx.start();
        let err = ctx.dispatch_command(Command::Stop, 0).unwrap_err();
        assert!(matches!(err, Error::NotConnected { ref state } if state == "CONNECTING"));
    }

    #[test]
    fn test_transport_failure_returns_false() {
        let mut ctx = open_context();
        ctx.transport_mut().fail_send = true;
        assert!(!ctx.send_command(Command::Stop));
        assert_eq!(ctx.pending().len(), 1);
    }

    #[test]
    fn test_retries_then_reports_once() {
        let mut ctx = open_context();
        ctx.transport_mut().sent.clear();

        assert!(ctx.send_command(Command::Stop));
        // Let getState be acknowledged so only `stop` is in play.
        let get_state = ctx
            .pending()
            .iter()
            .find(|e| e.command == Command::GetState)
            .map(|e| e.id)
            .expect("getState pending");
        let session = ctx.session_id().expect("session");
        ctx.dispatch(ClientEvent::MessageReceived {
            session,
            text: format!(r#"{{"type":"response","commandId":{get_state},"status":"ok"}}"#),
        });

        let original = ctx.pending().iter().next().map(|e| e.id).expect("stop");

        ctx.advance(COMMAND_TIMEOUT);
        let first_retry = ctx.pending().iter().next().cloned().expect("retry 1");
        assert_ne!(first_retry.id, original);
        assert_eq!(first_retry.retry_count, 1);

        ctx.advance(COMMAND_TIMEOUT);
        let second_retry = ctx.pending().iter().next().cloned().expect("retry 2");
        assert_eq!(second_retry.retry_count, 2);

        ctx.advance(COMMAND_TIMEOUT);
        assert!(ctx.pending().is_empty());
        assert_eq!(ctx.transport().sent.len(), 3);
        assert_eq!(ctx.renderer().notices, vec!["Command failed: stop".to_string()]);

        // Nothing left to fire.
        ctx.advance(COMMAND_TIMEOUT * 3);
        assert_eq!(ctx.renderer().notices.len(), 1);
    }

    #[test]
    fn test_stale_timeout_is_noop() {
        let mut ctx = open_context();
        let id = ctx.pending().iter().next().map(|e| e.id).expect("getState");
        let stale = ctx.pending().get(id).map(|e| e.timeout).expect("timer");
        let session = ctx.session_id().expect("session");
        ctx.dispatch(ClientEvent::MessageReceived {
            session,
            text: format!(r#"{{"type":"response","commandId":{id}}}"#),
        });

        ctx.dispatch(ClientEvent::Timer {
            id: stale,
            kind: TimerKind::CommandTimeout(id),
        });
        assert!(ctx.pending().is_empty());
        assert!(ctx.renderer().notices.is_empty());
    }

    #[test]
    fn test_retry_while_disconnected_drops_command() {
        let mut ctx = open_context();
        let session = ctx.session_id().expect("session");
        ctx.dispatch(ClientEvent::Closed(session));

        ctx.advance(Duration::from_millis(1_999));
        ctx.transport_mut().sent.clear();
        ctx.advance(COMMAND_TIMEOUT);

        assert!(ctx.pending().is_empty());
        assert!(ctx.transport().sent.is_empty());
    }

    proptest! {
        #[test]
        fn prop_send_while_disconnected_has_no_effect(
            commands in prop::collection::vec(0u8..4, 1..16),
            closed in any::<bool>(),
        ) {
            let mut ctx = open_context();
            let session = ctx.session_id().expect("session");
            if closed {
                ctx.dispatch(ClientEvent::Closed(session));
            } else {
                ctx.connect();
            }
            let before = ctx.pending().len();
            let sent = ctx.transport().sent.len();

            for pick in commands {
                let command = match pick {
                    0 => Command::Stop,
                    1 => Command::GetState,
                    2 => Command::run(SystemType::carrier()),
                    _ => Command::update_sensor("coilTemp", 12.5),
                };
                prop_assert!(!ctx.send_command(command));
            }

            prop_assert_eq!(ctx.pending().len(), before);
            prop_assert_eq!(ctx.transport().sent.len(), sent);
        }
    }
}

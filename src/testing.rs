//! Recording doubles and context helpers for unit tests.

// ============================================================================
// Imports
// ============================================================================

use url::Url;

use crate::client::{ClientContext, ClientEvent, Renderer, StatusView};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::protocol::{Sensor, SystemType};
use crate::scheduler::ManualScheduler;
use crate::transport::Transport;

// ============================================================================
// Constants
// ============================================================================

/// Virtual clock start, in milliseconds.
pub const START_MS: u64 = 1_700_000_000_000;

// ============================================================================
// RecordingTransport
// ============================================================================

/// Transport that records every call.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    /// Sessions passed to `open`.
    pub opened: Vec<SessionId>,
    /// Frames passed to `send`.
    pub sent: Vec<String>,
    /// Number of `close` calls.
    pub closes: usize,
    /// Makes `open` fail.
    pub fail_open: bool,
    /// Makes `send` fail.
    pub fail_send: bool,
}

impl Transport for RecordingTransport {
    fn open(&mut self, session: SessionId, _endpoint: &Url) -> Result<()> {
        if self.fail_open {
            return Err(Error::connection("refused"));
        }
        self.opened.push(session);
        Ok(())
    }

    fn send(&mut self, text: String) -> Result<()> {
        if self.fail_send {
            return Err(Error::ConnectionClosed);
        }
        self.sent.push(text);
        Ok(())
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}

// ============================================================================
// RecordingRenderer
// ============================================================================

/// Renderer that records every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Connected indicator history.
    pub connected: Vec<bool>,
    /// Notices shown.
    pub notices: Vec<String>,
    /// Number of `hide_notice` calls.
    pub hidden: usize,
    /// Status views rendered.
    pub statuses: Vec<StatusView>,
    /// Sensor readings rendered.
    pub sensors: Vec<(Sensor, Option<f64>)>,
    /// RPM values rendered.
    pub rpms: Vec<i64>,
    /// Current selector value.
    pub selected: Option<SystemType>,
    /// Selector writes.
    pub selections: Vec<SystemType>,
}

impl Renderer for RecordingRenderer {
    fn set_connected(&mut self, connected: bool) {
        self.connected.push(connected);
    }

    fn show_notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn hide_notice(&mut self) {
        self.hidden += 1;
    }

    fn render_status(&mut self, view: &StatusView) {
        self.statuses.push(*view);
    }

    fn render_sensor(&mut self, sensor: Sensor, reading: Option<f64>) {
        self.sensors.push((sensor, reading));
    }

    fn render_rpm(&mut self, rpm: i64) {
        self.rpms.push(rpm);
    }

    fn selected_system_type(&self) -> Option<SystemType> {
        self.selected.clone()
    }

    fn select_system_type(&mut self, system_type: &SystemType) {
        self.selected = Some(system_type.clone());
        self.selections.push(system_type.clone());
    }
}

// ============================================================================
// Context Helpers
// ============================================================================

/// Context wired to the recording doubles.
pub type TestContext = ClientContext<ManualScheduler, RecordingTransport, RecordingRenderer>;

/// Default configuration for a local test server.
pub fn config() -> ClientConfig {
    ClientConfig::for_origin("http://192.168.4.1").expect("valid origin")
}

/// Idle context with the default configuration.
pub fn context() -> TestContext {
    context_with(config())
}

/// Idle context with `config`.
pub fn context_with(config: ClientConfig) -> TestContext {
    ClientContext::new(
        config,
        ManualScheduler::starting_at(START_MS),
        RecordingTransport::default(),
        RecordingRenderer::default(),
    )
}

/// Started context whose first session has opened.
///
/// The implicit `getState` is sent and pending.
pub fn open_context() -> TestContext {
    open_context_with(config())
}

/// Started context with `config` whose first session has opened.
pub fn open_context_with(config: ClientConfig) -> TestContext {
    let mut ctx = context_with(config);
    ctx.start();
    let session = ctx.session_id().expect("session after start");
    ctx.dispatch(ClientEvent::Opened(session));
    ctx
}

/// Delivers `text` on the current session.
pub fn deliver(ctx: &mut TestContext, text: &str) {
    let session = ctx.session_id().expect("current session");
    ctx.dispatch(ClientEvent::MessageReceived {
        session,
        text: text.to_string(),
    });
}

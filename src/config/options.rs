//! Endpoint and timing options.
//!
//! Defaults match the control server's firmware expectations:
//!
//! | Knob | Default |
//! |------|---------|
//! | Command acknowledgment timeout | 3000 ms |
//! | Retries after the first attempt | 2 |
//! | Reconnect interval | 2000 ms |
//! | Health check interval | 5000 ms |
//! | Notice display time | 5000 ms |

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Time a command may stay unacknowledged before it is retried.
pub const COMMAND_TIMEOUT: Duration = Duration::from_millis(3_000);

/// Retries after the first attempt before a command is reported as failed.
pub const MAX_RETRIES: u8 = 2;

/// Interval between reconnection attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(2_000);

/// Interval of the session health monitor.
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_millis(5_000);

/// How long a notice stays visible.
pub const NOTICE_DURATION: Duration = Duration::from_millis(5_000);

/// Path of the WebSocket endpoint on the control server.
const WS_PATH: &str = "/ws";

// ============================================================================
// ClientConfig
// ============================================================================

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket endpoint of the control server.
    pub endpoint: Url,

    /// Acknowledgment timeout per command attempt.
    pub command_timeout: Duration,

    /// Retries after the first attempt.
    pub max_retries: u8,

    /// Interval between reconnection attempts.
    pub reconnect_delay: Duration,

    /// Interval of the health monitor.
    pub health_check_interval: Duration,

    /// How long a notice stays visible.
    pub notice_duration: Duration,
}

impl ClientConfig {
    /// Creates a configuration with default timings.
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            command_timeout: COMMAND_TIMEOUT,
            max_retries: MAX_RETRIES,
            reconnect_delay: RECONNECT_DELAY,
            health_check_interval: HEALTH_CHECK_INTERVAL,
            notice_duration: NOTICE_DURATION,
        }
    }

    /// Creates a configuration from a page origin such as `http://192.168.4.1`.
    ///
    /// # Errors
    ///
    /// See [`endpoint_for_origin`].
    pub fn for_origin(origin: &str) -> Result<Self> {
        Ok(Self::new(endpoint_for_origin(origin)?))
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ClientConfig {
    /// Sets the command acknowledgment timeout.
    #[inline]
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Sets the retry limit.
    #[inline]
    #[must_use]
    pub fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the reconnection interval.
    #[inline]
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Sets the health monitor interval.
    #[inline]
    #[must_use]
    pub fn with_health_check_interval(mut self, interval: Duration) -> Self {
        self.health_check_interval = interval;
        self
    }

    /// Sets the notice display time.
    #[inline]
    #[must_use]
    pub fn with_notice_duration(mut self, duration: Duration) -> Self {
        self.notice_duration = duration;
        self
    }
}

// ============================================================================
// Endpoint Derivation
// ============================================================================

/// Derives the WebSocket endpoint from a page origin.
///
/// `https` maps to `wss`, `http` to `ws`; `ws`/`wss` origins keep their
/// scheme. Path, query and fragment of the origin are replaced by `/ws`.
///
/// # Errors
///
/// - [`Error::Url`] if `origin` does not parse
/// - [`Error::Config`] if the scheme is unsupported or the host is missing
pub fn endpoint_for_origin(origin: &str) -> Result<Url> {
    let page = Url::parse(origin)?;

    let scheme = match page.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => {
            return Err(Error::config(format!(
                "Unsupported origin scheme '{other}'. Use http:// or https://.\n\
                 Example: ClientBuilder::new().origin(\"http://192.168.4.1\")"
            )));
        }
    };

    let host = page
        .host_str()
        .ok_or_else(|| Error::config(format!("Origin '{origin}' has no host")))?;

    let authority = match page.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    Ok(Url::parse(&format!("{scheme}://{authority}{WS_PATH}"))?)
}

// ============================================================================
// Tests
// ============================================================================

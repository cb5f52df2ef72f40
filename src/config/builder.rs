//! Builder pattern for client configuration.
//!
//! Provides a fluent API for configuring and creating [`Client`] instances.
//!
//! # Example
//!
//! ```no_run
//! use stand_control::{ClientBuilder, Renderer};
//!
//! # fn example<R: Renderer>(renderer: R) -> stand_control::Result<()> {
//! let client = ClientBuilder::new()
//!     .origin("http://192.168.4.1")
//!     .build(renderer)?;
//! # let _ = client;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::client::Renderer;
use crate::error::{Error, Result};
use crate::runtime::Client;

use super::options::{ClientConfig, endpoint_for_origin};

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for configuring a [`Client`].
#[derive(Debug, Default, Clone)]
pub struct ClientBuilder {
    /// Page origin the endpoint is derived from.
    origin: Option<String>,
    /// Explicit endpoint, overriding the origin.
    endpoint: Option<String>,
    /// Command acknowledgment timeout.
    command_timeout: Option<Duration>,
    /// Retry limit.
    max_retries: Option<u8>,
    /// Reconnection interval.
    reconnect_delay: Option<Duration>,
    /// Health monitor interval.
    health_check_interval: Option<Duration>,
    /// Notice display time.
    notice_duration: Option<Duration>,
}

// ============================================================================
// ClientBuilder Implementation
// ============================================================================

impl ClientBuilder {
    /// Creates a new builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page origin, e.g. `http://192.168.4.1`.
    ///
    /// The endpoint becomes `ws://<host>/ws` (or `wss://` for `https`).
    #[inline]
    #[must_use]
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Sets the WebSocket endpoint directly.
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the command acknowledgment timeout.
    #[inline]
    #[must_use]
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    /// Sets the number of retries after the first attempt.
    #[inline]
    #[must_use]
    pub fn max_retries(mut self, retries: u8) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Sets the reconnection interval.
    #[inline]
    #[must_use]
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = Some(delay);
        self
    }

    /// Sets the health monitor interval.
    #[inline]
    #[must_use]
    pub fn health_check_interval(mut self, interval: Duration) -> Self {
        self.health_check_interval = Some(interval);
        self
    }

    /// Sets how long notices stay visible.
    #[inline]
    #[must_use]
    pub fn notice_duration(mut self, duration: Duration) -> Self {
        self.notice_duration = Some(duration);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if neither origin nor endpoint is set
    /// - [`Error::Config`] if the endpoint scheme is not `ws`/`wss`
    /// - [`Error::Config`] if a timing knob is zero
    /// - [`Error::Url`] if the origin or endpoint does not parse
    pub fn build_config(self) -> Result<ClientConfig> {
        let endpoint = self.validate_endpoint()?;
        let mut config = ClientConfig::new(endpoint);

        if let Some(timeout) = self.command_timeout {
            config = config.with_command_timeout(non_zero("command timeout", timeout)?);
        }
        if let Some(retries) = self.max_retries {
            config = config.with_max_retries(retries);
        }
        if let Some(delay) = self.reconnect_delay {
            config = config.with_reconnect_delay(non_zero("reconnect delay", delay)?);
        }
        if let Some(interval) = self.health_check_interval {
            config = config.with_health_check_interval(non_zero("health check interval", interval)?);
        }
        if let Some(duration) = self.notice_duration {
            config = config.with_notice_duration(duration);
        }

        Ok(config)
    }

    /// Builds a [`Client`] rendering through `renderer`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// See [`build_config`](Self::build_config).
    pub fn build<R: Renderer>(self, renderer: R) -> Result<Client<R>> {
        Ok(Client::new(self.build_config()?, renderer))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ClientBuilder {
    /// Validates the endpoint configuration.
    fn validate_endpoint(&self) -> Result<Url> {
        if let Some(endpoint) = &self.endpoint {
            let url = Url::parse(endpoint)?;
            if !matches!(url.scheme(), "ws" | "wss") {
                return Err(Error::config(format!(
                    "Endpoint must use ws:// or wss://, got: {endpoint}"
                )));
            }
            return Ok(url);
        }

        let origin = self.origin.as_deref().ok_or_else(|| {
            Error::config(
                "Page origin is required. Use .origin() or .endpoint() to set it.\n\
                 Example: ClientBuilder::new().origin(\"http://192.168.4.1\")",
            )
        })?;

        endpoint_for_origin(origin)
    }
}

/// Rejects zero durations for knobs that drive timers.
fn non_zero(name: &str, value: Duration) -> Result<Duration> {
    if value.is_zero() {
        return Err(Error::config(format!("{name} must be greater than zero")));
    }
    Ok(value)
}

// ============================================================================
// Tests
// ============================================================================

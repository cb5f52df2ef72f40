//! Error types for the stand control client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! Fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use stand_control::{ClientBuilder, Result};
//!
//! fn config() -> Result<()> {
//!     let config = ClientBuilder::new().origin("http://192.168.4.1").build_config()?;
//!     println!("endpoint: {}", config.endpoint);
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`], [`Error::NotConnected`] |
//! | Protocol | [`Error::Protocol`] |
//! | Command | [`Error::CommandTimeout`], [`Error::CommandRejected`] |
//! | External | [`Error::Json`], [`Error::WebSocket`], [`Error::Url`], [`Error::ChannelClosed`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;
use url::ParseError;

use crate::identifiers::CommandId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when the client configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// WebSocket connection closed.
    ///
    /// Returned when the transport has no live session to write to.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Attempted to send while the session is not open.
    #[error("Not connected (session state: {state})")]
    NotConnected {
        /// Observed session state.
        state: String,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or unexpected message shape.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    // ========================================================================
    // Command Errors
    // ========================================================================
    /// Command went unacknowledged through every retry.
    #[error("Command {command_id} ({command}) failed after {retries} retries")]
    CommandTimeout {
        /// Identifier of the final attempt.
        command_id: CommandId,
        /// Command name on the wire.
        command: String,
        /// Retries performed before giving up.
        retries: u8,
    },

    /// Server answered a command with an error status.
    #[error("Command {command_id} rejected: {message}")]
    CommandRejected {
        /// Identifier of the rejected command.
        command_id: CommandId,
        /// Message reported by the server.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// URL parse error.
    #[error("Invalid URL: {0}")]
    Url(#[from] ParseError),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a not-connected error for the observed session state.
    #[inline]
    pub fn not_connected(state: impl Into<String>) -> Self {
        Self::NotConnected {
            state: state.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a command timeout error.
    #[inline]
    pub fn command_timeout(command_id: CommandId, command: impl Into<String>, retries: u8) -> Self {
        Self::CommandTimeout {
            command_id,
            command: command.into(),
            retries,
        }
    }

    /// Creates a command rejected error.
    #[inline]
    pub fn command_rejected(command_id: CommandId, message: impl Into<String>) -> Self {
        Self::CommandRejected {
            command_id,
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionClosed
                | Self::NotConnected { .. }
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed once the session is re-established.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionClosed
                | Self::NotConnected { .. }
                | Self::CommandTimeout { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

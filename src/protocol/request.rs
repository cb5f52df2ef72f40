//! Command envelope and response message types.
//!
//! A [`Request`] wraps a [`Command`] with the `"command"` discriminator and a
//! correlation identifier. A [`Response`] acknowledges it.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::identifiers::CommandId;

use super::Command;

// ============================================================================
// Request
// ============================================================================

/// Discriminator value carried by every command envelope.
pub const COMMAND_TYPE: &str = "command";

/// A command envelope from client to server.
///
/// # Format
///
/// ```json
/// {
///   "type": "command",
///   "commandId": 1700000000000,
///   "cmd": "run",
///   "systemType": "carrier"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Always `"command"`.
    #[serde(rename = "type")]
    pub message_type: &'static str,

    /// Correlation identifier.
    #[serde(rename = "commandId")]
    pub id: CommandId,

    /// Command with `cmd` tag and its fields.
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    /// Creates a new envelope.
    #[inline]
    #[must_use]
    pub fn new(id: CommandId, command: Command) -> Self {
        Self {
            message_type: COMMAND_TYPE,
            id,
            command,
        }
    }

    /// Serializes the envelope to JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Response
// ============================================================================

/// Status value marking a failed command.
const ERROR_STATUS: &str = "error";

/// An acknowledgment from server to client.
///
/// # Format
///
/// ```json
/// {
///   "type": "response",
///   "commandId": 1700000000000,
///   "status": "error",
///   "message": "Invalid system type"
/// }
/// ```
///
/// Any status other than `"error"` counts as success.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    /// Matches the command's `commandId`.
    #[serde(rename = "commandId", default)]
    pub id: Option<CommandId>,

    /// Outcome reported by the server.
    #[serde(default)]
    pub status: Option<String>,

    /// Human-readable detail.
    #[serde(default)]
    pub message: Option<String>,
}

impl Response {
    /// Returns `true` if the server reported an error.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some(ERROR_STATUS)
    }

    /// Returns the message to show for an error response.
    #[inline]
    #[must_use]
    pub fn error_notice(&self) -> &str {
        self.message.as_deref().unwrap_or("Command failed")
    }
}

// ============================================================================
// Tests
// ============================================================================

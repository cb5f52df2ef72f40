//! Inbound message classification.
//!
//! Every frame from the server is a JSON object whose `type` field selects
//! the payload shape. Classification happens in two steps so that malformed
//! JSON and unrecognized kinds can be told apart in logs.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::error::{Error, Result};

use super::{Event, Response, RpmUpdate, StatusSnapshot};

// ============================================================================
// InboundMessage
// ============================================================================

/// A classified server message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Full state snapshot (`type: "status"`).
    Status(StatusSnapshot),
    /// Command acknowledgment (`type: "response"`).
    Response(Response),
    /// Discrete occurrence (`type: "event"`).
    Event(Event),
    /// Periodic RPM push (`type: "rpmUpdate"`).
    RpmUpdate(RpmUpdate),
    /// Any other discriminator, or none.
    Unknown {
        /// The `type` value, if it was a string.
        kind: Option<String>,
    },
}

impl InboundMessage {
    /// Parses and classifies a text frame.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the text is not valid JSON or a known kind has
    ///   fields of the wrong shape
    /// - [`Error::Protocol`] if the frame is not a JSON object
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(Error::protocol(format!(
                "expected JSON object, got: {}",
                kind_of(&value)
            )));
        }

        let kind = value.get("type").and_then(Value::as_str).map(str::to_owned);

        let message = match kind.as_deref() {
            Some("status") => Self::Status(serde_json::from_value(value)?),
            Some("response") => Self::Response(serde_json::from_value(value)?),
            Some("event") => Self::Event(serde_json::from_value(value)?),
            Some("rpmUpdate") => Self::RpmUpdate(serde_json::from_value(value)?),
            _ => Self::Unknown { kind },
        };

        Ok(message)
    }

    /// Returns the discriminator as a static label for logging.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Response(_) => "response",
            Self::Event(_) => "event",
            Self::RpmUpdate(_) => "rpmUpdate",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// JSON type name used in protocol errors.
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Tests
// ============================================================================

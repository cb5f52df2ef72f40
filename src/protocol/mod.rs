//! WebSocket protocol message types.
//!
//! This module defines the JSON messages exchanged with the control server.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | [`Request`] | Client → Server | Command envelope (`type: "command"`) |
//! | [`StatusSnapshot`] | Server → Client | Full state push (`type: "status"`) |
//! | [`Response`] | Server → Client | Command acknowledgment (`type: "response"`) |
//! | [`Event`] | Server → Client | Discrete occurrence (`type: "event"`) |
//! | [`RpmUpdate`] | Server → Client | Periodic RPM push (`type: "rpmUpdate"`) |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Command definitions |
//! | `event` | Event and RPM update types |
//! | `message` | Inbound classification |
//! | `request` | Command envelope and response |
//! | `status` | Status snapshot and sensors |

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions.
pub mod command;

/// Event and RPM update message types.
pub mod event;

/// Inbound message classification.
pub mod message;

/// Command envelope and response message types.
pub mod request;

/// Status snapshot message.
pub mod status;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{Command, SensorLimits, SystemType};
pub use event::{Event, RpmUpdate};
pub use message::InboundMessage;
pub use request::{Request, Response};
pub use status::{Sensor, StatusSnapshot, format_reading};

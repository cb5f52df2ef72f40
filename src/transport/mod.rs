//! WebSocket transport layer.
//!
//! This module handles the duplex channel between the client and the
//! control server.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                              ┌──────────────────┐
//! │  ClientContext   │                              │  Control server  │
//! │                  │         WebSocket            │                  │
//! │  Transport ──────┼─────────────────────────────►│  /ws             │
//! │  ◄── ClientEvent │◄─────────────────────────────┤                  │
//! └──────────────────┘                              └──────────────────┘
//! ```
//!
//! # Session Lifecycle
//!
//! 1. `Transport::open` - Start a connect attempt tagged with a [`SessionId`]
//! 2. `ClientEvent::Opened` - Handshake completed
//! 3. `Transport::send` - Write text frames
//! 4. `ClientEvent::MessageReceived` - Text frames from the server
//! 5. `ClientEvent::Closed` - Session ended (always posted exactly once)
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | tokio-tungstenite session task |

// ============================================================================
// Imports
// ============================================================================

use url::Url;

use crate::error::Result;
use crate::identifiers::SessionId;

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket session task.
pub mod connection;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::WsTransport;

// ============================================================================
// Transport
// ============================================================================

/// Duplex channel used by the client core.
///
/// Implementations report progress asynchronously as
/// [`ClientEvent`](crate::client::ClientEvent)s tagged with the session id
/// passed to [`open`](Transport::open).
pub trait Transport {
    /// Starts a connect attempt to `endpoint`.
    ///
    /// Any previous session must already have been closed by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt could not be started at all.
    fn open(&mut self, session: SessionId, endpoint: &Url) -> Result<()>;

    /// Queues a text frame on the current session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`](crate::Error::ConnectionClosed)
    /// if there is no live session.
    fn send(&mut self, text: String) -> Result<()>;

    /// Closes the current session, if any.
    fn close(&mut self);
}

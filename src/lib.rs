//! Stand control - reliable command client for a test-stand control unit.
//!
//! This library connects to the control server of a refrigeration test stand
//! over a WebSocket, issues commands (run, stop, preset, sensor updates) and
//! renders the state the server pushes back.
//!
//! # Architecture
//!
//! The client is split into a sans-IO core and a tokio runtime around it:
//!
//! - **Core ([`ClientContext`])**: owns the session handle, pending command
//!   table and last known status; mutated only through
//!   [`ClientContext::dispatch`]
//! - **Runtime ([`Client`])**: spawns the WebSocket session task and timers,
//!   feeds their events to the core one at a time
//!
//! Key design principles:
//!
//! - Every command carries a `commandId` and is retried on timeout, at most
//!   [`MAX_RETRIES`] times
//! - A dropped connection is re-established at a fixed interval
//! - Display goes through the [`Renderer`] trait; the core never draws
//! - Timers go through the [`Scheduler`](scheduler::Scheduler) trait, so
//!   tests run in virtual time
//!
//! # Quick Start
//!
//! ```no_run
//! use stand_control::{ClientBuilder, Command, Renderer, Result, Sensor, StatusView, SystemType};
//!
//! struct Console;
//!
//! impl Renderer for Console {
//!     fn set_connected(&mut self, connected: bool) {
//!         println!("connected: {connected}");
//!     }
//!     fn show_notice(&mut self, message: &str) {
//!         println!("notice: {message}");
//!     }
//!     fn render_status(&mut self, view: &StatusView) {
//!         println!("status: {}", view.label);
//!     }
//!     fn render_sensor(&mut self, _sensor: Sensor, _reading: Option<f64>) {}
//!     fn render_rpm(&mut self, rpm: i64) {
//!         println!("rpm: {rpm}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ClientBuilder::new()
//!         .origin("http://192.168.4.1")
//!         .build(Console)?;
//!     let handle = client.handle();
//!     let task = tokio::spawn(client.run());
//!
//!     handle.send(Command::run(SystemType::carrier())).await?;
//!
//!     handle.shutdown();
//!     let _ = task.await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client core: dispatcher, pending table, supervisor, router |
//! | [`config`] | Configuration and builder |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Wire message types |
//! | [`runtime`] | Tokio event loop and [`ClientHandle`] |
//! | [`scheduler`] | Timer capability, wall-clock and virtual |
//! | [`transport`] | WebSocket transport |

// ============================================================================
// Modules
// ============================================================================

/// Client core.
///
/// [`ClientContext`] and the [`Renderer`] collaborator it drives.
pub mod client;

/// Client configuration.
///
/// Use [`ClientBuilder`] to derive the endpoint from a page origin.
pub mod config;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
///
/// Newtype wrappers prevent mixing command, session and timer ids.
pub mod identifiers;

/// WebSocket protocol message types.
pub mod protocol;

/// Tokio event loop.
pub mod runtime;

/// Timer scheduling.
pub mod scheduler;

/// WebSocket transport layer.
pub mod transport;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{ClientContext, ClientEvent, ConnectionState, ReconnectState, Renderer, StatusView};

// Config types
pub use config::{ClientBuilder, ClientConfig, MAX_RETRIES};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{CommandId, SessionId, TimerId};

// Protocol types
pub use protocol::{Command, Sensor, SensorLimits, StatusSnapshot, SystemType};

// Runtime types
pub use runtime::{Client, ClientHandle};

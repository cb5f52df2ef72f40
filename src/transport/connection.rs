//! WebSocket session task.
//!
//! Each session is one spawned tokio task that owns the socket and handles:
//!
//! - The connect handshake
//! - Outgoing frames queued by [`WsTransport::send`]
//! - Incoming text frames, forwarded as [`ClientEvent::MessageReceived`]
//! - Close and error detection, forwarded as [`ClientEvent::Closed`]

// ============================================================================
// Imports
// ============================================================================

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::client::ClientEvent;
use crate::error::{Error, Result};
use crate::identifiers::SessionId;

use super::Transport;

// ============================================================================
// Types
// ============================================================================

/// Socket type produced by `connect_async`.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Internal commands for the session task.
enum SessionCommand {
    /// Write a text frame.
    Send(String),
    /// Send a close frame and stop.
    Shutdown,
}

/// Handle to the running session task.
struct SessionLink {
    /// Session this task belongs to.
    session: SessionId,
    /// Channel for sending commands to the task.
    command_tx: mpsc::UnboundedSender<SessionCommand>,
}

// ============================================================================
// WsTransport
// ============================================================================

/// [`Transport`] over `tokio-tungstenite`.
///
/// Must be used from within a tokio runtime.
pub struct WsTransport {
    /// Channel into the client event loop.
    events: mpsc::UnboundedSender<ClientEvent>,
    /// Current session task, if any.
    link: Option<SessionLink>,
}

impl WsTransport {
    /// Creates a transport posting session events into `events`.
    #[must_use]
    pub fn new(events: mpsc::UnboundedSender<ClientEvent>) -> Self {
        // wss handshakes need a process-wide rustls provider; a second
        // install is a no-op.
        let _ = rustls::crypto::ring::default_provider().install_default();
        Self { events, link: None }
    }

    /// Returns the id of the current session task, if any.
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<SessionId> {
        self.link.as_ref().map(|link| link.session)
    }

    /// Session task: connect, then pump frames until either side stops.
    async fn run_session(
        session: SessionId,
        endpoint: Url,
        command_rx: mpsc::UnboundedReceiver<SessionCommand>,
        events: mpsc::UnboundedSender<ClientEvent>,
    ) {
        match connect_async(endpoint.as_str()).await {
            Ok((ws_stream, _)) => {
                info!(%session, %endpoint, "WebSocket connected");
                let _ = events.send(ClientEvent::Opened(session));
                Self::run_event_loop(session, ws_stream, command_rx, &events).await;
            }
            Err(e) => {
                let _ = events.send(ClientEvent::Errored {
                    session,
                    message: Error::from(e).to_string(),
                });
            }
        }

        let _ = events.send(ClientEvent::Closed(session));
        debug!(%session, "Session task terminated");
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop(
        session: SessionId,
        ws_stream: WsStream,
        mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
        events: &mpsc::UnboundedSender<ClientEvent>,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                // Incoming frames from the server
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            let _ = events.send(ClientEvent::MessageReceived {
                                session,
                                text: text.to_string(),
                            });
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!(%session, "WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            let _ = events.send(ClientEvent::Errored {
                                session,
                                message: e.to_string(),
                            });
                            break;
                        }

                        None => {
                            debug!(%session, "WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Commands from the client core
                command = command_rx.recv() => {
                    match command {
                        Some(SessionCommand::Send(text)) => {
                            if let Err(e) = ws_write.send(Message::Text(text.into())).await {
                                warn!(%session, error = %e, "Failed to write frame");
                                let _ = events.send(ClientEvent::Errored {
                                    session,
                                    message: e.to_string(),
                                });
                                break;
                            }
                            trace!(%session, "Frame sent");
                        }

                        Some(SessionCommand::Shutdown) => {
                            debug!(%session, "Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!(%session, "Command channel closed");
                            let _ = ws_write.close().await;
                            break;
                        }
                    }
                }
            }
        }
    }
}

impl Transport for WsTransport {
    fn open(&mut self, session: SessionId, endpoint: &Url) -> Result<()> {
        match endpoint.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(Error::connection(format!(
                    "unsupported WebSocket scheme: {other}"
                )));
            }
        }

        self.close();

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::run_session(
            session,
            endpoint.clone(),
            command_rx,
            self.events.clone(),
        ));

        debug!(%session, %endpoint, "Session task spawned");
        self.link = Some(SessionLink {
            session,
            command_tx,
        });
        Ok(())
    }

    fn send(&mut self, text: String) -> Result<()> {
        let link = self.link.as_ref().ok_or(Error::ConnectionClosed)?;
        link.command_tx
            .send(SessionCommand::Send(text))
            .map_err(|_| Error::ConnectionClosed)
    }

    fn close(&mut self) {
        if let Some(link) = self.link.take() {
            let _ = link.command_tx.send(SessionCommand::Shutdown);
            debug!(session = %link.session, "Session close requested");
        }
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.close();
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Tokio event loop driving a [`ClientContext`].
//!
//! [`Client::run`] owns the context and feeds it, one at a time:
//!
//! - transport and timer events from the [`WsTransport`] session task and
//!   the [`TokioScheduler`]
//! - user requests from any number of cloned [`ClientHandle`]s
//!
//! # Example
//!
//! ```no_run
//! use stand_control::{ClientBuilder, Command, Renderer, SystemType};
//!
//! # async fn example<R: Renderer + Send + 'static>(renderer: R) -> stand_control::Result<()> {
//! let client = ClientBuilder::new()
//!     .origin("http://192.168.4.1")
//!     .build(renderer)?;
//! let handle = client.handle();
//! let task = tokio::spawn(client.run());
//!
//! if !handle.send(Command::run(SystemType::carrier())).await? {
//!     eprintln!("not connected");
//! }
//!
//! handle.shutdown();
//! let _ = task.await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::client::{ClientContext, ClientEvent, Renderer};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::protocol::Command;
use crate::scheduler::TokioScheduler;
use crate::transport::WsTransport;

// ============================================================================
// Types
// ============================================================================

/// Requests from handles to the event loop.
#[derive(Debug)]
enum ClientRequest {
    /// Send a command and report whether it went out.
    Send {
        command: Command,
        reply: oneshot::Sender<bool>,
    },
    /// Stop the loop and close the session.
    Shutdown,
}

/// Context type used by the runtime.
type RuntimeContext<R> = ClientContext<TokioScheduler, WsTransport, R>;

// ============================================================================
// ClientHandle
// ============================================================================

/// Cloneable handle for issuing commands to a running [`Client`].
#[derive(Debug, Clone)]
pub struct ClientHandle {
    requests: mpsc::UnboundedSender<ClientRequest>,
}

impl ClientHandle {
    /// Sends `command` through the event loop.
    ///
    /// Resolves to `false` if the session was not open or the frame could
    /// not be written; the outcome of the command itself is reported through
    /// the renderer.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the event loop has stopped
    /// - [`Error::ChannelClosed`] if the loop stopped before replying
    pub async fn send(&self, command: Command) -> Result<bool> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(ClientRequest::Send { command, reply })
            .map_err(|_| Error::ConnectionClosed)?;
        Ok(response.await?)
    }

    /// Asks the event loop to stop. Returns immediately.
    pub fn shutdown(&self) {
        let _ = self.requests.send(ClientRequest::Shutdown);
    }

    /// Returns `true` once the event loop has stopped.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }
}

// ============================================================================
// Client
// ============================================================================

/// A control client bound to one endpoint.
pub struct Client<R> {
    context: RuntimeContext<R>,
    events_rx: mpsc::UnboundedReceiver<ClientEvent>,
    requests_tx: mpsc::UnboundedSender<ClientRequest>,
    requests_rx: mpsc::UnboundedReceiver<ClientRequest>,
}

impl<R: Renderer> Client<R> {
    /// Creates a client. Nothing connects until [`run`](Self::run).
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(config: ClientConfig, renderer: R) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();

        let context = ClientContext::new(
            config,
            TokioScheduler::new(events_tx.clone()),
            WsTransport::new(events_tx),
            renderer,
        );

        Self {
            context,
            events_rx,
            requests_tx,
            requests_rx,
        }
    }

    /// Returns a handle for issuing commands.
    #[must_use]
    pub fn handle(&self) -> ClientHandle {
        ClientHandle {
            requests: self.requests_tx.clone(),
        }
    }

    /// Runs until [`ClientHandle::shutdown`] or until every handle is dropped.
    ///
    /// Returns the renderer.
    pub async fn run(self) -> R {
        let Self {
            mut context,
            mut events_rx,
            requests_tx,
            mut requests_rx,
        } = self;
        // Only external handles keep the loop alive.
        drop(requests_tx);

        info!(endpoint = %context.config().endpoint, "Client started");
        context.start();

        loop {
            tokio::select! {
                Some(event) = events_rx.recv() => {
                    context.dispatch(event);
                }

                request = requests_rx.recv() => {
                    match request {
                        Some(ClientRequest::Send { command, reply }) => {
                            let _ = reply.send(context.send_command(command));
                        }

                        Some(ClientRequest::Shutdown) => {
                            debug!("Shutdown requested");
                            break;
                        }

                        None => {
                            debug!("All handles dropped");
                            break;
                        }
                    }
                }
            }
        }

        context.shutdown();
        context.scheduler_mut().cancel_all();
        info!("Client stopped");

        context.into_renderer()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::time::Duration;

    use tokio::net::TcpListener;
    use tokio::time::timeout;
    use url::Url;

    use crate::testing::RecordingRenderer;

    const WAIT: Duration = Duration::from_secs(5);

    /// Endpoint on a port nothing listens on.
    async fn dead_endpoint() -> Url {
        let listener = TcpListener::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
            .await
            .expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);
        Url::parse(&format!("ws://127.0.0.1:{port}/ws")).expect("url")
    }

    #[tokio::test]
    async fn test_send_before_open_returns_false() {
        let client = Client::new(ClientConfig::new(dead_endpoint().await), RecordingRenderer::default());
        let handle = client.handle();
        let task = tokio::spawn(client.run());

        let sent = timeout(WAIT, handle.send(Command::Stop))
            .await
            .expect("reply within timeout")
            .expect("loop running");
        assert!(!sent);

        handle.shutdown();
        let renderer = timeout(WAIT, task).await.expect("stops").expect("join");
        assert!(renderer.connected.iter().all(|c| !c));
    }

    #[tokio::test]
    async fn test_handle_fails_after_shutdown() {
        let client = Client::new(ClientConfig::new(dead_endpoint().await), RecordingRenderer::default());
        let handle = client.handle();
        let task = tokio::spawn(client.run());

        handle.shutdown();
        timeout(WAIT, task).await.expect("stops").expect("join");

        assert!(handle.is_closed());
        assert!(matches!(
            handle.send(Command::Stop).await,
            Err(Error::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_dropping_handles_stops_loop() {
        let client = Client::new(ClientConfig::new(dead_endpoint().await), RecordingRenderer::default());
        let handle = client.handle();
        let task = tokio::spawn(client.run());

        drop(handle);
        timeout(WAIT, task).await.expect("stops").expect("join");
    }
}

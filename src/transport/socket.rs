//! WebSocket adapter for standalone content development.
//!
//! During content development the web front-end runs in a plain desktop
//! browser served by a dev server, outside any host shell. This adapter lets
//! such a content build still reach a host: the host binds a local
//! [`SignalSocket`], the content connects a [`SocketTransport`], and signal
//! envelopes travel as JSON text frames.
//!
//! # Connection Flow
//!
//! 1. Host binds to `localhost:0` (random port) and shares the URL
//! 2. Content connects and starts emitting signals
//! 3. Host accepts; inbound frames are parsed and forwarded in order
//! 4. Malformed or unknown frames are logged and dropped, never errors

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, accept_async, connect_async};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::protocol::SignalMessage;

use super::SignalTransport;
use super::channel::SignalStream;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for waiting for the content build to connect.
const ACCEPT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// SignalSocket
// ============================================================================

/// Host-side WebSocket endpoint, bound but not yet connected.
///
/// # Example
///
/// ```ignore
/// use std::net::{IpAddr, Ipv4Addr};
/// use webshell_bridge::transport::SignalSocket;
///
/// let socket = SignalSocket::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await?;
/// println!("content dev URL: {}", socket.ws_url());
///
/// let stream = socket.accept().await?;
/// shell.receiver().attach(stream);
/// ```
pub struct SignalSocket {
    /// TCP listener for the single content connection.
    listener: TcpListener,
    /// Port the socket is bound to.
    port: u16,
}

impl SignalSocket {
    /// Binds a signal socket to the specified address and port.
    ///
    /// Use port 0 to let the OS assign a random available port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind(ip: IpAddr, port: u16) -> Result<Self> {
        let addr = SocketAddr::new(ip, port);
        let listener = TcpListener::bind(addr).await?;
        let actual_port = listener.local_addr()?.port();

        debug!(port = actual_port, "Signal socket bound");

        Ok(Self {
            listener,
            port: actual_port,
        })
    }

    /// Returns the port the socket is bound to.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the WebSocket URL content should connect to.
    ///
    /// Format: `ws://127.0.0.1:{port}`
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Accepts the content connection and starts forwarding frames.
    ///
    /// Each JSON text frame is parsed into a [`SignalMessage`] and forwarded
    /// in arrival order; frames that fail to parse are dropped with a log
    /// line. The returned stream ends when the content side disconnects.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if content doesn't connect within 30s
    /// - [`Error::Io`] if the TCP accept fails
    /// - [`Error::WebSocket`] if the WebSocket upgrade fails
    pub async fn accept(self) -> Result<SignalStream> {
        let accept_result = timeout(ACCEPT_TIMEOUT, self.listener.accept()).await;

        let (stream, addr) = accept_result
            .map_err(|_| Error::connection_timeout(ACCEPT_TIMEOUT.as_millis() as u64))??;

        debug!(?addr, "TCP connection accepted");

        let ws_stream = accept_async(stream).await?;

        info!(port = self.port, "Content signal connection established");

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_read_loop(ws_stream, tx));

        Ok(SignalStream::from_receiver(rx))
    }
}

/// Reads text frames from the content connection and forwards parsed signals.
async fn run_read_loop(
    mut ws_stream: WebSocketStream<TcpStream>,
    tx: mpsc::UnboundedSender<SignalMessage>,
) {
    while let Some(message) = ws_stream.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<SignalMessage>(&text) {
                Ok(signal) => {
                    if tx.send(signal).is_err() {
                        debug!("signal stream dropped; stopping read loop");
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Dropping malformed signal frame");
                }
            },

            Ok(Message::Close(_)) => {
                debug!("Content connection closed");
                break;
            }

            Err(e) => {
                warn!(error = %e, "Signal socket error");
                break;
            }

            // Ignore Binary, Ping, Pong
            _ => {}
        }
    }
}

// ============================================================================
// SocketTransport
// ============================================================================

/// Content-side WebSocket transport.
///
/// Sends are queued to an internal writer task, so [`SignalTransport::send`]
/// never blocks the caller. Once the connection drops, the transport reports
/// unavailable and further sends are silently discarded.
pub struct SocketTransport {
    /// Outbound frame queue consumed by the writer task.
    tx: mpsc::UnboundedSender<SignalMessage>,
    /// Cleared by the writer task when the connection dies.
    connected: Arc<AtomicBool>,
}

impl SocketTransport {
    /// Connects to a host signal socket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WebSocket`] if the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws_stream, _) = connect_async(url).await?;

        debug!(url = %url, "Connected to host signal socket");

        let (tx, rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(true));

        tokio::spawn(run_write_loop(ws_stream, rx, Arc::clone(&connected)));

        Ok(Self { tx, connected })
    }
}

impl SignalTransport for SocketTransport {
    fn name(&self) -> &'static str {
        "socket"
    }

    fn is_available(&self) -> bool {
        self.connected.load(Ordering::Acquire) && !self.tx.is_closed()
    }

    fn send(&self, message: SignalMessage) {
        if self.tx.send(message).is_err() {
            debug!("signal socket writer gone; signal dropped");
        }
    }
}

/// Serializes queued signals onto the WebSocket until either side closes.
async fn run_write_loop(
    ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut rx: mpsc::UnboundedReceiver<SignalMessage>,
    connected: Arc<AtomicBool>,
) {
    let (mut ws_write, mut ws_read) = ws_stream.split();

    loop {
        tokio::select! {
            outbound = rx.recv() => {
                match outbound {
                    Some(message) => {
                        let json = match serde_json::to_string(&message) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!(error = %e, "Failed to serialize signal; dropped");
                                continue;
                            }
                        };
                        if let Err(e) = ws_write.send(Message::Text(json.into())).await {
                            warn!(error = %e, "Failed to send signal frame");
                            break;
                        }
                    }
                    None => {
                        debug!("transport dropped; closing signal connection");
                        let _ = ws_write.close().await;
                        break;
                    }
                }
            }

            // The host never sends frames; reads only detect disconnect.
            inbound = ws_read.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("Host closed signal connection");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Signal connection error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    connected.store(false, Ordering::Release);
}

// ============================================================================
// Tests
// ============================================================================

//! WebSocket binding for out-of-process native hosts.
//!
//! The facade itself is transport-agnostic: it consumes a
//! [`RawChannel`] of serialized frames. This module produces such a
//! channel from a WebSocket, for embeddings where the privileged native
//! host lives in another process.
//!
//! # Connection Flow
//!
//! Dial-out (UI connects to the host):
//!
//! 1. [`connect`] dials `ws://host:port`
//! 2. A pump task bridges WebSocket text frames to the raw pipe
//! 3. [`Channel`](crate::transport::Channel) runs over the pipe
//!
//! Dial-in (host connects to the UI):
//!
//! 1. [`SocketHost::bind`] binds `localhost:0` (random port)
//! 2. The native host is launched with the URL from [`SocketHost::ws_url`]
//! 3. [`SocketHost::accept`] upgrades the first connection

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::transport::RawChannel;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for dialing or accepting a native host.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// connect
// ============================================================================

/// Dials a native host over WebSocket and returns the raw channel.
///
/// # Errors
///
/// - [`Error::Channel`] if the URL is not a `ws`/`wss` endpoint
/// - [`Error::ConnectTimeout`] if the host does not answer within 30s
/// - [`Error::WebSocket`] if the handshake fails
pub async fn connect(endpoint: &str) -> Result<RawChannel> {
    let url = Url::parse(endpoint).map_err(|e| Error::channel(format!("Invalid endpoint: {e}")))?;

    if !matches!(url.scheme(), "ws" | "wss") {
        return Err(Error::channel(format!(
            "Unsupported endpoint scheme: {}",
            url.scheme()
        )));
    }

    let (ws_stream, _) = timeout(CONNECT_TIMEOUT, tokio_tungstenite::connect_async(endpoint))
        .await
        .map_err(|_| Error::connect_timeout(CONNECT_TIMEOUT.as_millis() as u64))??;

    info!(endpoint, "Connected to native host");

    Ok(spawn_pump(ws_stream))
}

// ============================================================================
// SocketHost
// ============================================================================

/// A bound WebSocket endpoint waiting for a native host to dial in.
///
/// # Example
///
/// ```ignore
/// use std::net::{IpAddr, Ipv4Addr};
/// use webui_bridge::transport::socket::SocketHost;
///
/// let host = SocketHost::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await?;
/// let ws_url = host.ws_url();
///
/// // Launch the native host with ws_url...
///
/// let raw = host.accept().await?;
/// ```
pub struct SocketHost {
    /// TCP listener for the incoming connection.
    listener: TcpListener,
    /// Port the endpoint is bound to.
    port: u16,
}

impl SocketHost {
    /// Binds a WebSocket endpoint to the specified address and port.
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

        debug!(port = actual_port, "Socket host bound");

        Ok(Self {
            listener,
            port: actual_port,
        })
    }

    /// Returns the port the endpoint is bound to.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the WebSocket URL for this endpoint.
    ///
    /// Format: `ws://127.0.0.1:{port}`
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Accepts the native host's connection and upgrades it.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectTimeout`] if nothing connects within 30s
    /// - [`Error::Channel`] if the WebSocket upgrade fails
    pub async fn accept(self) -> Result<RawChannel> {
        let accept_result = timeout(CONNECT_TIMEOUT, self.listener.accept()).await;

        let (stream, addr) = accept_result
            .map_err(|_| Error::connect_timeout(CONNECT_TIMEOUT.as_millis() as u64))??;

        debug!(?addr, "TCP connection accepted");

        let ws_stream = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| Error::channel(format!("WebSocket upgrade failed: {e}")))?;

        info!(port = self.port, "Native host connected");

        Ok(spawn_pump(ws_stream))
    }
}

// ============================================================================
// Frame Pump
// ============================================================================

/// Bridges a WebSocket stream to a raw frame pipe.
///
/// Spawns one task that forwards outbound frames as text messages and
/// inbound text messages as frames. Binary, ping and pong frames are
/// ignored; a close frame or either pipe half going away terminates
/// the pump.
fn spawn_pump<S>(ws_stream: WebSocketStream<S>) -> RawChannel
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let (in_tx, in_rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                frame = out_rx.recv() => {
                    match frame {
                        Some(text) => {
                            if let Err(e) = ws_write.send(Message::Text(text.into())).await {
                                warn!(error = %e, "Outbound frame send failed");
                                break;
                            }
                        }
                        None => {
                            let _ = ws_write.close().await;
                            break;
                        }
                    }
                }

                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            if in_tx.send(text.to_string()).is_err() {
                                break;
                            }
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }
            }
        }

        debug!("Frame pump terminated");
    });

    RawChannel::new(out_tx, in_rx)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::Ipv4Addr;

    use serde_json::json;
    use tokio_test::assert_ok;

    use crate::protocol::{Request, Response};
    use crate::transport::Channel;

    #[tokio::test]
    async fn test_host_bind_random_port() {
        let host = SocketHost::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
            .await
            .expect("bind should succeed");

        assert!(host.port() > 0);
        assert!(host.ws_url().starts_with("ws://127.0.0.1:"));
    }

    #[tokio::test]
    async fn test_host_ws_url_format() {
        let host = SocketHost::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
            .await
            .expect("bind should succeed");

        let url = host.ws_url();
        let expected = format!("ws://127.0.0.1:{}", host.port());
        assert_eq!(url, expected);
    }

    #[tokio::test]
    async fn test_connect_rejects_non_ws_scheme() {
        let err = connect("https://127.0.0.1:1/").await.expect_err("scheme");
        assert!(matches!(err, Error::Channel { .. }));

        let err = connect("not a url").await.expect_err("parse");
        assert!(matches!(err, Error::Channel { .. }));
    }

    #[tokio::test]
    async fn test_loopback_request_over_websocket() {
        let host = SocketHost::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
            .await
            .expect("bind");
        let ws_url = host.ws_url();

        let client = tokio::spawn(async move {
            let raw = connect(&ws_url).await.expect("connect");
            let channel = Channel::new(raw);
            channel
                .request("getString", vec![json!("braveSyncTitle")])
                .await
        });

        // Host side plays native: answer the one request it receives.
        let mut raw = host.accept().await.expect("accept");
        let frame = raw.inbound.recv().await.expect("request frame");
        let request: Request = serde_json::from_str(&frame).expect("parse request");
        assert_eq!(request.method, "getString");

        let response = Response::success(request.id, json!("Brave Sync"));
        raw.outbound
            .send(serde_json::to_string(&response).expect("serialize"))
            .expect("send");

        let value = tokio_test::assert_ok!(client.await.expect("join"));
        assert_eq!(value, json!("Brave Sync"));
    }
}

//! TCP transport to the relay server.
//!
//! The agent opens one TCP connection at startup and writes framed
//! [`InputEvent`]s to it for the life of the process.  Connection
//! establishment is bounded by [`CONNECT_TIMEOUT`] and failures are
//! classified into [`ConnectError`] variants so the operator sees *why*
//! the relay is unreachable (bad hostname, firewall drop, refused port,
//! unroutable subnet) instead of a generic socket error.

use std::time::Duration;

use async_trait::async_trait;
use relay_core::{encode_event, InputEvent};
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tracing::{debug, info};

use crate::application::forward_input::EventTransport;

/// How long to wait for the TCP handshake before giving up.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Classified connection-establishment failure.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The hostname did not resolve to any address.
    #[error("could not resolve host {host:?}: {detail}")]
    DnsFailure { host: String, detail: String },
    /// No handshake completed within [`CONNECT_TIMEOUT`].
    #[error("connection to {host}:{port} timed out after {:?}", CONNECT_TIMEOUT)]
    Timeout { host: String, port: u16 },
    /// The host is up but nothing is listening on the port.
    #[error("connection to {host}:{port} refused (is the relay server running?)")]
    Refused { host: String, port: u16 },
    /// No route to the host or its network.
    #[error("no route to {host}:{port}: {detail}")]
    NoRoute {
        host: String,
        port: u16,
        detail: String,
    },
    /// Any other socket-level failure.
    #[error("failed to connect to {host}:{port}: {detail}")]
    Other {
        host: String,
        port: u16,
        detail: String,
    },
}

/// Opens a connection to the relay server.
///
/// Resolves `host`, attempts the TCP handshake with a [`CONNECT_TIMEOUT`]
/// bound, and disables Nagle's algorithm on success (input events are tiny
/// and latency-sensitive).
///
/// # Errors
///
/// Returns a classified [`ConnectError`]; all variants are terminal, the
/// agent does not retry.
pub async fn connect(host: &str, port: u16) -> Result<TcpTransport, ConnectError> {
    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|e| ConnectError::DnsFailure {
            host: host.to_string(),
            detail: e.to_string(),
        })?;
    let addr = addrs.next().ok_or_else(|| ConnectError::DnsFailure {
        host: host.to_string(),
        detail: "name resolved to no addresses".to_string(),
    })?;

    debug!("connecting to {addr} (resolved from {host})");
    let stream = match tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
        Err(_elapsed) => {
            return Err(ConnectError::Timeout {
                host: host.to_string(),
                port,
            })
        }
        Ok(Err(e)) => return Err(classify_io_error(e, host, port)),
        Ok(Ok(stream)) => stream,
    };

    stream.set_nodelay(true).map_err(|e| ConnectError::Other {
        host: host.to_string(),
        port,
        detail: e.to_string(),
    })?;

    info!("connected to relay at {addr}");
    Ok(FramedTransport::new(stream))
}

/// Maps a socket error from `TcpStream::connect` to a [`ConnectError`].
fn classify_io_error(e: std::io::Error, host: &str, port: u16) -> ConnectError {
    // ENETUNREACH / EHOSTUNREACH: 101 / 113 on Linux, 51 / 65 on macOS and
    // the BSDs.  Stable Rust has no ErrorKind for these.
    const NO_ROUTE_CODES: [i32; 4] = [101, 113, 51, 65];

    if e.kind() == std::io::ErrorKind::ConnectionRefused {
        return ConnectError::Refused {
            host: host.to_string(),
            port,
        };
    }
    if matches!(e.raw_os_error(), Some(code) if NO_ROUTE_CODES.contains(&code)) {
        return ConnectError::NoRoute {
            host: host.to_string(),
            port,
            detail: e.to_string(),
        };
    }
    ConnectError::Other {
        host: host.to_string(),
        port,
        detail: e.to_string(),
    }
}

/// An [`EventTransport`] that writes framed events to an async byte stream.
///
/// Generic over the writer so tests can substitute an in-memory pipe for a
/// real socket.
pub struct FramedTransport<W> {
    writer: W,
}

/// The production transport over a TCP socket.
pub type TcpTransport = FramedTransport<TcpStream>;

impl<W: AsyncWrite + Unpin + Send> FramedTransport<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> EventTransport for FramedTransport<W> {
    async fn send_event(&mut self, event: &InputEvent) -> Result<(), String> {
        let frame = encode_event(event).map_err(|e| e.to_string())?;
        self.writer
            .write_all(&frame)
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

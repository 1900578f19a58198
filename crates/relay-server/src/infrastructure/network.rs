//! TCP listener and per-session read loops for the relay server.
//!
//! The server accepts any number of agent connections.  Each connection gets
//! its own session task and read buffer; all sessions funnel decoded events
//! into one shared [`ReplayInputUseCase`] behind a Tokio mutex, so injection
//! into the OS is serialized even when multiple agents send concurrently.
//!
//! A failure inside one session (malformed frame, socket reset) closes that
//! session only.  The listener keeps accepting.

use std::net::SocketAddr;
use std::sync::Arc;

use relay_core::{decode_event, InputEvent, ProtocolError};
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::application::replay_input::ReplayInputUseCase;

/// Classified listener-bind failure.
#[derive(Debug, Error)]
pub enum BindError {
    /// Another process already listens on the address.
    #[error("address {addr} already in use (is another relay server running?)")]
    AddressInUse { addr: SocketAddr },
    /// Binding requires privileges this process lacks (ports below 1024).
    #[error("permission denied binding {addr}")]
    PermissionDenied { addr: SocketAddr },
    /// Any other bind failure.
    #[error("failed to bind {addr}: {detail}")]
    Other { addr: SocketAddr, detail: String },
}

/// Binds the listening socket, classifying failures.
///
/// # Errors
///
/// Returns a classified [`BindError`]; all variants are fatal at startup.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, BindError> {
    TcpListener::bind(addr).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::AddrInUse => BindError::AddressInUse { addr },
        std::io::ErrorKind::PermissionDenied => BindError::PermissionDenied { addr },
        _ => BindError::Other {
            addr,
            detail: e.to_string(),
        },
    })
}

/// Accepts agent connections forever, spawning one session task each.
///
/// Runs until the listener fails; callers typically race it against a
/// shutdown signal with `select!`.
///
/// # Errors
///
/// Returns the I/O error if `accept` itself fails, which on a healthy
/// system it does not.
pub async fn run_server(
    listener: TcpListener,
    use_case: Arc<Mutex<ReplayInputUseCase>>,
) -> std::io::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        let session_id = Uuid::new_v4();
        info!("session {session_id}: agent connected from {peer}");
        let uc = Arc::clone(&use_case);
        tokio::spawn(async move {
            handle_session(session_id, socket, uc).await;
        });
    }
}

/// Reads framed events from one agent until EOF or a session-fatal error.
async fn handle_session(
    session_id: Uuid,
    mut socket: TcpStream,
    use_case: Arc<Mutex<ReplayInputUseCase>>,
) {
    let mut buf: Vec<u8> = Vec::with_capacity(4096);
    let mut chunk = [0u8; 1024];
    let mut received: u64 = 0;

    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) => {
                info!("session {session_id}: agent disconnected ({received} event(s) replayed)");
                return;
            }
            Ok(n) => n,
            Err(e) => {
                warn!("session {session_id}: read error: {e}");
                return;
            }
        };
        buf.extend_from_slice(&chunk[..n]);

        // Drain every complete frame from the buffer.
        loop {
            match next_frame(&buf) {
                Ok(None) => break, // partial frame, wait for more bytes
                Ok(Some((event, consumed))) => {
                    buf.drain(..consumed);
                    debug!("session {session_id}: received {event:?}");
                    let mut uc = use_case.lock().await;
                    match uc.handle_event(&event) {
                        Ok(()) => received += 1,
                        // Injection failures are local trouble, not the
                        // agent's; keep the session alive.
                        Err(e) => error!("session {session_id}: injection failed: {e}"),
                    }
                }
                Err(e) => {
                    warn!("session {session_id}: protocol error, closing session: {e}");
                    return;
                }
            }
        }
    }
}

/// Attempts to decode one frame from the front of `buf`.
///
/// Returns `Ok(None)` when the buffer holds only a partial frame, and
/// `Ok(Some((event, consumed)))` for a complete one.
///
/// # Errors
///
/// Returns the [`ProtocolError`] for frames that can never become valid
/// (bad version, unknown type, malformed payload).
fn next_frame(buf: &[u8]) -> Result<Option<(InputEvent, usize)>, ProtocolError> {
    match decode_event(buf) {
        Ok((event, consumed)) => Ok(Some((event, consumed))),
        // Both variants mean the same thing on a stream: the frame's tail
        // has not arrived yet.
        Err(ProtocolError::InsufficientData { .. })
        | Err(ProtocolError::PayloadLengthMismatch { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

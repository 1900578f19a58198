//! Binary codec for encoding and decoding Input Relay frames.
//!
//! Wire format:
//! ```text
//! [version:1][msg_type:1][payload_len:2][payload:N]
//! ```
//! Total header size: 4 bytes.  All multi-byte integers are big-endian;
//! floating-point values are IEEE-754 bit patterns, big-endian.
//!
//! The `payload_len` field is the explicit framing layer: a reader pulls the
//! header with `read_exact`, then exactly `payload_len` more bytes.  Stream
//! sockets give no guarantee that one write arrives as one read, so frames
//! must never rely on write boundaries.

use crate::protocol::messages::{
    InputEvent, MessageType, MouseButton, HEADER_SIZE, PROTOCOL_VERSION,
};
use thiserror::Error;

/// Errors that can occur during frame encoding or decoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The byte slice is shorter than the minimum required length.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The message type byte in the header is not a recognized value.
    #[error("unknown message type: 0x{0:02X}")]
    UnknownMessageType(u8),

    /// The protocol version in the header is not supported.
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// The payload could not be parsed (field out of range, UTF-8 error, etc.).
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The encoded payload length field does not match the data available.
    #[error("payload length mismatch: header says {declared}, available is {available}")]
    PayloadLengthMismatch { declared: usize, available: usize },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes an [`InputEvent`] into a byte vector including the 4-byte header.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedPayload`] if a key name exceeds the
/// 2-byte length prefix.
///
/// # Examples
///
/// ```rust
/// use relay_core::protocol::{encode_event, decode_event};
/// use relay_core::InputEvent;
///
/// let event = InputEvent::MouseScroll { dx: 0, dy: -5 };
/// let bytes = encode_event(&event).unwrap();
/// let (decoded, consumed) = decode_event(&bytes).unwrap();
/// assert_eq!(decoded, event);
/// assert_eq!(consumed, bytes.len());
/// ```
pub fn encode_event(event: &InputEvent) -> Result<Vec<u8>, ProtocolError> {
    let payload = encode_payload(event)?;
    if payload.len() > u16::MAX as usize {
        return Err(ProtocolError::MalformedPayload(format!(
            "payload of {} bytes exceeds frame limit",
            payload.len()
        )));
    }

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.push(PROTOCOL_VERSION);
    buf.push(event.message_type() as u8);
    buf.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decodes one [`InputEvent`] from the beginning of `bytes`.
///
/// Returns the decoded event and the total number of bytes consumed
/// (header + payload), so the caller can advance their read cursor.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the bytes are malformed.
pub fn decode_event(bytes: &[u8]) -> Result<(InputEvent, usize), ProtocolError> {
    if bytes.len() < HEADER_SIZE {
        return Err(ProtocolError::InsufficientData {
            needed: HEADER_SIZE,
            available: bytes.len(),
        });
    }

    let version = bytes[0];
    if version != PROTOCOL_VERSION {
        return Err(ProtocolError::UnsupportedVersion(version));
    }

    let msg_type_byte = bytes[1];
    let msg_type = MessageType::try_from(msg_type_byte)
        .map_err(|_| ProtocolError::UnknownMessageType(msg_type_byte))?;

    let payload_len = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;

    let total_needed = HEADER_SIZE + payload_len;
    if bytes.len() < total_needed {
        return Err(ProtocolError::PayloadLengthMismatch {
            declared: payload_len,
            available: bytes.len() - HEADER_SIZE,
        });
    }

    let payload = &bytes[HEADER_SIZE..total_needed];
    let event = decode_payload(msg_type, payload)?;
    Ok((event, total_needed))
}

// ── Payload encoding ──────────────────────────────────────────────────────────

fn encode_payload(event: &InputEvent) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::new();
    match event {
        InputEvent::MouseMove { x, y } => {
            buf.extend_from_slice(&x.to_be_bytes());
            buf.extend_from_slice(&y.to_be_bytes());
        }
        InputEvent::MouseClick { button, pressed } => {
            buf.push(*button as u8);
            buf.push(u8::from(*pressed));
        }
        InputEvent::MouseScroll { dx, dy } => {
            buf.extend_from_slice(&dx.to_be_bytes());
            buf.extend_from_slice(&dy.to_be_bytes());
        }
        InputEvent::Key { key, pressed } => {
            buf.push(u8::from(*pressed));
            write_length_prefixed_string(&mut buf, key)?;
        }
    }
    Ok(buf)
}

// ── Payload decoding ──────────────────────────────────────────────────────────

fn decode_payload(msg_type: MessageType, payload: &[u8]) -> Result<InputEvent, ProtocolError> {
    match msg_type {
        MessageType::MouseMove => {
            // 8 (x) + 8 (y) = 16
            require_len(payload, 16, "MouseMove")?;
            let x = f64::from_be_bytes(payload[0..8].try_into().expect("length checked"));
            let y = f64::from_be_bytes(payload[8..16].try_into().expect("length checked"));
            Ok(InputEvent::MouseMove { x, y })
        }
        MessageType::MouseClick => {
            // 1 (button) + 1 (pressed) = 2
            require_len(payload, 2, "MouseClick")?;
            let button = MouseButton::try_from(payload[0]).map_err(|_| {
                ProtocolError::MalformedPayload(format!("unknown mouse button: {}", payload[0]))
            })?;
            let pressed = payload[1] != 0;
            Ok(InputEvent::MouseClick { button, pressed })
        }
        MessageType::MouseScroll => {
            // 4 (dx) + 4 (dy) = 8
            require_len(payload, 8, "MouseScroll")?;
            let dx = i32::from_be_bytes(payload[0..4].try_into().expect("length checked"));
            let dy = i32::from_be_bytes(payload[4..8].try_into().expect("length checked"));
            Ok(InputEvent::MouseScroll { dx, dy })
        }
        MessageType::Key => {
            // 1 (pressed) + 2 (key_len) + key
            require_len(payload, 3, "Key")?;
            let pressed = payload[0] != 0;
            let (key, _) = read_length_prefixed_string(payload, 1)?;
            Ok(InputEvent::Key { key, pressed })
        }
    }
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn require_len(buf: &[u8], needed: usize, context: &str) -> Result<(), ProtocolError> {
    if buf.len() < needed {
        Err(ProtocolError::MalformedPayload(format!(
            "{context}: need {needed} bytes, got {}",
            buf.len()
        )))
    } else {
        Ok(())
    }
}

/// Writes a 2-byte length prefix followed by the UTF-8 string bytes.
fn write_length_prefixed_string(buf: &mut Vec<u8>, s: &str) -> Result<(), ProtocolError> {
    let bytes = s.as_bytes();
    if bytes.len() > u16::MAX as usize {
        return Err(ProtocolError::MalformedPayload(format!(
            "string of {} bytes exceeds length prefix",
            bytes.len()
        )));
    }
    buf.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Reads a 2-byte length prefix and then that many UTF-8 bytes.
/// Returns the string and the offset of the byte after the string.
fn read_length_prefixed_string(buf: &[u8], offset: usize) -> Result<(String, usize), ProtocolError> {
    if buf.len() < offset + 2 {
        return Err(ProtocolError::MalformedPayload(format!(
            "need 2 bytes for string length at offset {offset}"
        )));
    }
    let len = u16::from_be_bytes([buf[offset], buf[offset + 1]]) as usize;
    let start = offset + 2;
    if buf.len() < start + len {
        return Err(ProtocolError::MalformedPayload(format!(
            "string of length {len} at offset {start} exceeds buffer"
        )));
    }
    let s = std::str::from_utf8(&buf[start..start + len])
        .map_err(|e| ProtocolError::MalformedPayload(format!("invalid UTF-8: {e}")))?
        .to_string();
    Ok((s, start + len))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

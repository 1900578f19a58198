//! Input Relay wire message types.
//!
//! The agent sends a unidirectional stream of [`InputEvent`] frames to the
//! relay server.  Mouse positions are normalized by the sender to fractions
//! of its own screen; key codes are opaque platform key names.

use serde::{Deserialize, Serialize};

// ── Protocol constants ────────────────────────────────────────────────────────

/// Current protocol version byte.
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Total size of the frame header in bytes.
///
/// Layout: `[version:1][msg_type:1][payload_len:2]`.
pub const HEADER_SIZE: usize = 4;

// ── Message type codes ────────────────────────────────────────────────────────

/// Frame type codes, one per [`InputEvent`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    MouseMove = 0x01,
    MouseClick = 0x02,
    MouseScroll = 0x03,
    Key = 0x04,
}

impl TryFrom<u8> for MessageType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(MessageType::MouseMove),
            0x02 => Ok(MessageType::MouseClick),
            0x03 => Ok(MessageType::MouseScroll),
            0x04 => Ok(MessageType::Key),
            _ => Err(()),
        }
    }
}

// ── Event payload types ───────────────────────────────────────────────────────

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MouseButton {
    Left = 0x01,
    Right = 0x02,
    Middle = 0x03,
}

impl TryFrom<u8> for MouseButton {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(MouseButton::Left),
            0x02 => Ok(MouseButton::Right),
            0x03 => Ok(MouseButton::Middle),
            _ => Err(()),
        }
    }
}

/// A single forwarded input event, discriminated by type.
///
/// This is the only entity that crosses the wire.  An event is constructed
/// at capture time, exists in serialized form in transit, and is discarded
/// immediately after the relay replays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Absolute cursor position as fractions of the sender's screen.
    ///
    /// Both coordinates are in `[0, 1]`; the receiver rescales them to its
    /// own screen before injecting.
    MouseMove { x: f64, y: f64 },
    /// A mouse button was pressed (`pressed == true`) or released.
    MouseClick { button: MouseButton, pressed: bool },
    /// Wheel scroll deltas; positive `dy` scrolls away from the user.
    MouseScroll { dx: i32, dy: i32 },
    /// A key was pressed or released.  `key` is the platform key name as
    /// reported by the capture library (e.g. `"a"`, `"shift"`).
    Key { key: String, pressed: bool },
}

impl InputEvent {
    /// Returns the [`MessageType`] discriminant for this event.
    pub fn message_type(&self) -> MessageType {
        match self {
            InputEvent::MouseMove { .. } => MessageType::MouseMove,
            InputEvent::MouseClick { .. } => MessageType::MouseClick,
            InputEvent::MouseScroll { .. } => MessageType::MouseScroll,
            InputEvent::Key { .. } => MessageType::Key,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

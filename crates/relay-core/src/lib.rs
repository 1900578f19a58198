//! # relay-core
//!
//! Shared library for Input Relay containing the wire protocol codec and the
//! screen-geometry coordinate mapping used by both the capture agent and the
//! relay server.
//!
//! This crate has zero dependencies on OS APIs or network sockets.  It
//! defines:
//!
//! - **`protocol`** – How events travel over the network.  Each event is
//!   encoded into a compact binary frame (4-byte header + payload) and
//!   decoded back into a typed [`InputEvent`] on the other end.  The header
//!   carries an explicit payload length, so readers never have to assume
//!   that one socket write corresponds to one read.
//!
//! - **`domain`** – Pure coordinate math.  Mouse positions cross the wire as
//!   fractions in `[0, 1]` of the sender's screen; [`ScreenGeometry`]
//!   converts between pixel space and that normalized space on each side.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `relay_core::InputEvent` instead of `relay_core::protocol::messages::InputEvent`.
pub use domain::geometry::ScreenGeometry;
pub use protocol::codec::{decode_event, encode_event, ProtocolError};
pub use protocol::messages::{InputEvent, MouseButton};

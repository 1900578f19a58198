//! Protocol module containing event types and the binary codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_event, encode_event, ProtocolError};
pub use messages::*;

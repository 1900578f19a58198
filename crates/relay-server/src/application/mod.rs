//! Application-layer use cases for the relay server.

pub mod replay_input;

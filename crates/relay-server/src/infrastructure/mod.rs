//! Infrastructure implementations for the relay server.

pub mod config;
pub mod injection;
pub mod network;

//! Infrastructure implementations for the capture agent.

pub mod capture;
pub mod config;
pub mod network;
pub mod screen_info;

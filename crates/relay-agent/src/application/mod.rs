//! Application-layer use cases for the capture agent.

pub mod forward_input;

//! Platform-specific input injection implementations.
//!
//! The [`InputInjector`](crate::application::replay_input::InputInjector)
//! trait lives in the application layer; this module holds its
//! implementations.  The recording implementation is always compiled so
//! tests on any platform can run without synthesising real OS input.

pub mod mock;

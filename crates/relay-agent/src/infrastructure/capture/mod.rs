//! Input capture infrastructure for the agent.
//!
//! A platform backend observes global keyboard and mouse activity and places
//! raw events into a channel; the Tokio side drains the channel and hands
//! each event to the forward-input use case. Capture is observational only:
//! events are never suppressed and continue to act on the agent machine.
//!
//! # Testability
//!
//! The `InputSource` trait allows unit and integration tests to inject
//! synthetic events without requiring OS hooks.

use std::sync::mpsc;

pub mod mock;

/// A raw input event produced by the capture infrastructure.
///
/// Mouse positions are absolute pixel coordinates on the agent's screen;
/// normalization to the wire's `[0, 1]` space happens in the application
/// layer.
#[derive(Debug, Clone, PartialEq)]
pub enum CapturedEvent {
    /// The cursor moved to an absolute screen position.
    MouseMove { x: i32, y: i32 },
    /// A mouse button changed state.
    MouseButton { button: MouseButton, pressed: bool },
    /// The mouse wheel was scrolled. Positive `dy` is away from the user,
    /// positive `dx` is to the right.
    MouseWheel { dx: i32, dy: i32 },
    /// A key changed state. `key` is a human-readable key name: a single
    /// character for printable keys ("a", "7"), a lowercase word for
    /// special keys ("shift", "enter", "f5").
    Key { key: String, pressed: bool },
}

/// Mouse button identifier used in [`CapturedEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Error type for capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to install input listener: {0}")]
    ListenerInstallFailed(String),
    #[error("capture service has already been stopped")]
    AlreadyStopped,
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Trait abstracting input event production.
///
/// Production implementations wrap an OS hook; tests use
/// [`mock::MockInputSource`].
pub trait InputSource: Send {
    /// Starts the input source and returns a receiver for captured events.
    fn start(&self) -> Result<mpsc::Receiver<CapturedEvent>, CaptureError>;
    /// Stops the input source and releases OS resources.
    fn stop(&self);
}

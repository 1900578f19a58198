//! ForwardInputUseCase: bridges captured OS input events to the wire.
//!
//! This use case receives raw events from the capture service, normalizes
//! mouse positions by the agent's own screen geometry, and sends the
//! resulting [`InputEvent`]s through an [`EventTransport`] trait object.
//! The network implementation lives in the infrastructure layer; tests use
//! a recording transport.
//!
//! Forwarding is strictly sequential: each captured event is translated and
//! sent before the next one is looked at, so wire order always equals
//! capture order.  There is no batching and no reordering.

use async_trait::async_trait;
use relay_core::{InputEvent, MouseButton as WireButton, ScreenGeometry};
use thiserror::Error;
use tracing::{debug, warn};

use crate::infrastructure::capture::{CapturedEvent, MouseButton as RawButton};

/// Error type for the forward-input use case.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("transport error: {0}")]
    Transport(String),
}

/// Trait for sending events to the relay server.
///
/// The infrastructure implementation writes framed bytes to a TCP stream;
/// test implementations record calls.
#[async_trait]
pub trait EventTransport: Send {
    /// Sends one event.  A returned error means the connection is broken.
    async fn send_event(&mut self, event: &InputEvent) -> Result<(), String>;
}

/// Link state of the agent's single connection.
///
/// `Closed` is terminal: a write failure or local shutdown ends forwarding
/// for the lifetime of the process.  There is no reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Active,
    Closed,
}

/// The Forward Input use case.
pub struct ForwardInputUseCase {
    transport: Box<dyn EventTransport>,
    screen: ScreenGeometry,
    state: LinkState,
    /// Events discarded after the link closed (capture callbacks keep
    /// firing until the source is stopped).
    dropped: u64,
}

impl ForwardInputUseCase {
    /// Creates a new use case over an already-connected transport.
    pub fn new(transport: Box<dyn EventTransport>, screen: ScreenGeometry) -> Self {
        Self {
            transport,
            screen,
            state: LinkState::Active,
            dropped: 0,
        }
    }

    /// Returns `true` while the link is [`LinkState::Active`].
    pub fn is_active(&self) -> bool {
        self.state == LinkState::Active
    }

    /// Number of events dropped after the link closed.
    pub fn dropped_events(&self) -> u64 {
        self.dropped
    }

    /// Marks the link closed (local shutdown).
    pub fn close(&mut self) {
        self.state = LinkState::Closed;
    }

    /// Handles one captured event.
    ///
    /// While the link is active, translates the event to its wire form and
    /// sends it.  After the link has closed, events are silently dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Transport`] on the send failure that closes
    /// the link; subsequent calls return `Ok(())`.
    pub async fn handle_event(&mut self, event: CapturedEvent) -> Result<(), ForwardError> {
        if self.state == LinkState::Closed {
            self.dropped += 1;
            debug!("dropping captured event on closed link (total {})", self.dropped);
            return Ok(());
        }

        let wire_event = self.translate(event);
        if let Err(e) = self.transport.send_event(&wire_event).await {
            self.state = LinkState::Closed;
            warn!("send failed; link closed: {e}");
            return Err(ForwardError::Transport(e));
        }
        Ok(())
    }

    /// Translates a captured (pixel-space) event to its wire form.
    fn translate(&self, event: CapturedEvent) -> InputEvent {
        match event {
            CapturedEvent::MouseMove { x, y } => {
                let (nx, ny) = self.screen.normalize(x, y);
                InputEvent::MouseMove { x: nx, y: ny }
            }
            CapturedEvent::MouseButton { button, pressed } => InputEvent::MouseClick {
                button: map_button(button),
                pressed,
            },
            CapturedEvent::MouseWheel { dx, dy } => InputEvent::MouseScroll { dx, dy },
            CapturedEvent::Key { key, pressed } => InputEvent::Key { key, pressed },
        }
    }
}

fn map_button(button: RawButton) -> WireButton {
    match button {
        RawButton::Left => WireButton::Left,
        RawButton::Right => WireButton::Right,
        RawButton::Middle => WireButton::Middle,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

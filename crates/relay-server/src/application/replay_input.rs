//! ReplayInputUseCase: translates received wire events to OS input injection.
//!
//! This use case sits at the application layer and delegates to an
//! [`InputInjector`] trait object for OS-level event synthesis.  Mouse
//! positions arrive as `[0, 1]` fractions of the *sender's* screen and are
//! scaled to this machine's screen before injection, so pointer positions
//! stay proportional even when the two screens differ in size.
//!
//! Every received event produces exactly one injector call.  There is no
//! deduplication or coalescing: a sender that emits the same position twice
//! meant to, and dropping the second call would make replay diverge from
//! capture.

use relay_core::{InputEvent, MouseButton, ScreenGeometry};
use std::sync::Arc;
use thiserror::Error;

/// Error type for input injection operations.
#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("platform error: {0}")]
    Platform(String),
    #[error("unsupported key: {0:?}")]
    UnsupportedKey(String),
}

/// Platform-agnostic input injection trait.
///
/// Production implementations call OS synthesis APIs; tests use
/// `RecordingInjector` from the infrastructure layer.
pub trait InputInjector: Send + Sync {
    /// Moves the cursor to an absolute pixel position on this screen.
    fn inject_mouse_move(&self, x: i32, y: i32) -> Result<(), InjectionError>;

    /// Presses or releases a mouse button at the current cursor position.
    fn inject_mouse_button(&self, button: MouseButton, pressed: bool)
        -> Result<(), InjectionError>;

    /// Scrolls the mouse wheel.
    fn inject_mouse_scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError>;

    /// Presses or releases the named key.
    fn inject_key(&self, key: &str, pressed: bool) -> Result<(), InjectionError>;
}

/// The Replay Input use case.
///
/// Receives decoded wire events and dispatches them to the injector.
pub struct ReplayInputUseCase {
    injector: Arc<dyn InputInjector>,
    screen: ScreenGeometry,
    replayed: u64,
}

impl ReplayInputUseCase {
    /// Creates a new use case injecting onto a screen of the given geometry.
    pub fn new(injector: Arc<dyn InputInjector>, screen: ScreenGeometry) -> Self {
        Self {
            injector,
            screen,
            replayed: 0,
        }
    }

    /// Total number of events successfully replayed.
    pub fn replayed_events(&self) -> u64 {
        self.replayed
    }

    /// Handles one received event: scales mouse positions to this screen and
    /// makes exactly one injector call.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if the OS event synthesis fails.  The event
    /// counter is not advanced on failure.
    pub fn handle_event(&mut self, event: &InputEvent) -> Result<(), InjectionError> {
        match event {
            InputEvent::MouseMove { x, y } => {
                let (px, py) = self.screen.denormalize(*x, *y);
                self.injector.inject_mouse_move(px, py)?;
            }
            InputEvent::MouseClick { button, pressed } => {
                self.injector.inject_mouse_button(*button, *pressed)?;
            }
            InputEvent::MouseScroll { dx, dy } => {
                self.injector.inject_mouse_scroll(*dx, *dy)?;
            }
            InputEvent::Key { key, pressed } => {
                self.injector.inject_key(key, *pressed)?;
            }
        }
        self.replayed += 1;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::injection::mock::{InjectedCall, RecordingInjector};

    fn make_use_case(width: u32, height: u32) -> (ReplayInputUseCase, Arc<RecordingInjector>) {
        let injector = Arc::new(RecordingInjector::new());
        let uc = ReplayInputUseCase::new(
            Arc::clone(&injector) as Arc<dyn InputInjector>,
            ScreenGeometry::new(width, height),
        );
        (uc, injector)
    }

    // ── Coordinate scaling ────────────────────────────────────────────────────

    #[test]
    fn test_mouse_move_is_scaled_to_local_screen() {
        // Arrange: a 2560x1440 replay screen.
        let (mut uc, injector) = make_use_case(2560, 1440);

        // Act: the sender's screen center.
        uc.handle_event(&InputEvent::MouseMove { x: 0.5, y: 0.5 })
            .expect("replay");

        // Assert
        assert_eq!(
            injector.calls(),
            vec![InjectedCall::MouseMove { x: 1280, y: 720 }]
        );
    }

    #[test]
    fn test_mouse_move_out_of_range_fraction_is_clamped() {
        let (mut uc, injector) = make_use_case(1920, 1080);

        uc.handle_event(&InputEvent::MouseMove { x: -0.5, y: 3.0 })
            .expect("replay");

        assert_eq!(
            injector.calls(),
            vec![InjectedCall::MouseMove { x: 0, y: 1080 }]
        );
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    #[test]
    fn test_click_scroll_and_key_dispatch_to_matching_injector_calls() {
        // Arrange
        let (mut uc, injector) = make_use_case(1920, 1080);

        // Act
        uc.handle_event(&InputEvent::MouseClick {
            button: MouseButton::Right,
            pressed: true,
        })
        .expect("replay");
        uc.handle_event(&InputEvent::MouseScroll { dx: 2, dy: -1 })
            .expect("replay");
        uc.handle_event(&InputEvent::Key {
            key: "escape".to_string(),
            pressed: false,
        })
        .expect("replay");

        // Assert
        assert_eq!(
            injector.calls(),
            vec![
                InjectedCall::MouseButton {
                    button: MouseButton::Right,
                    pressed: true
                },
                InjectedCall::MouseScroll { dx: 2, dy: -1 },
                InjectedCall::Key {
                    key: "escape".to_string(),
                    pressed: false
                },
            ]
        );
    }

    #[test]
    fn test_each_event_produces_exactly_one_injector_call() {
        // Arrange: identical consecutive moves must NOT be coalesced.
        let (mut uc, injector) = make_use_case(1920, 1080);
        let event = InputEvent::MouseMove { x: 0.25, y: 0.25 };

        // Act
        for _ in 0..4 {
            uc.handle_event(&event).expect("replay");
        }

        // Assert
        assert_eq!(injector.calls().len(), 4);
        assert_eq!(uc.replayed_events(), 4);
    }

    // ── Failure handling ──────────────────────────────────────────────────────

    #[test]
    fn test_injection_failure_propagates_and_skips_counter() {
        // Arrange
        let injector = Arc::new(RecordingInjector::failing("synthetic fault"));
        let mut uc = ReplayInputUseCase::new(
            Arc::clone(&injector) as Arc<dyn InputInjector>,
            ScreenGeometry::default(),
        );

        // Act
        let result = uc.handle_event(&InputEvent::MouseScroll { dx: 0, dy: 1 });

        // Assert
        assert!(matches!(result, Err(InjectionError::Platform(_))));
        assert_eq!(uc.replayed_events(), 0);
    }
}

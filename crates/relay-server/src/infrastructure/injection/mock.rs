//! Recording input injector for testing.
//!
//! Records every injection call instead of synthesising OS input, so tests
//! can assert on exactly what would have been replayed.  In a production
//! build it is replaced by a platform implementation (SendInput on Windows,
//! XTest on Linux, CoreGraphics on macOS).

use std::sync::Mutex;

use relay_core::MouseButton;

use crate::application::replay_input::{InjectionError, InputInjector};

/// One recorded injection call.
#[derive(Debug, Clone, PartialEq)]
pub enum InjectedCall {
    MouseMove { x: i32, y: i32 },
    MouseButton { button: MouseButton, pressed: bool },
    MouseScroll { dx: i32, dy: i32 },
    Key { key: String, pressed: bool },
}

/// An [`InputInjector`] that records calls instead of performing them.
pub struct RecordingInjector {
    calls: Mutex<Vec<InjectedCall>>,
    fail_with: Option<String>,
}

impl RecordingInjector {
    /// Creates an injector that records and succeeds.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    /// Creates an injector whose every call fails with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    /// Returns a copy of all recorded calls, in order.
    pub fn calls(&self) -> Vec<InjectedCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    fn record(&self, call: InjectedCall) -> Result<(), InjectionError> {
        if let Some(ref message) = self.fail_with {
            return Err(InjectionError::Platform(message.clone()));
        }
        self.calls.lock().expect("lock poisoned").push(call);
        Ok(())
    }
}

impl Default for RecordingInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputInjector for RecordingInjector {
    fn inject_mouse_move(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        self.record(InjectedCall::MouseMove { x, y })
    }

    fn inject_mouse_button(
        &self,
        button: MouseButton,
        pressed: bool,
    ) -> Result<(), InjectionError> {
        self.record(InjectedCall::MouseButton { button, pressed })
    }

    fn inject_mouse_scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        self.record(InjectedCall::MouseScroll { dx, dy })
    }

    fn inject_key(&self, key: &str, pressed: bool) -> Result<(), InjectionError> {
        self.record(InjectedCall::Key {
            key: key.to_string(),
            pressed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_injector_records_calls_in_order() {
        // Arrange
        let injector = RecordingInjector::new();

        // Act
        injector.inject_mouse_move(10, 20).expect("inject");
        injector
            .inject_mouse_button(MouseButton::Left, true)
            .expect("inject");
        injector.inject_key("a", true).expect("inject");

        // Assert
        let calls = injector.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], InjectedCall::MouseMove { x: 10, y: 20 });
        assert!(matches!(calls[2], InjectedCall::Key { pressed: true, .. }));
    }

    #[test]
    fn test_failing_injector_returns_platform_error_and_records_nothing() {
        // Arrange
        let injector = RecordingInjector::failing("no display");

        // Act
        let result = injector.inject_mouse_scroll(0, 1);

        // Assert
        assert!(matches!(result, Err(InjectionError::Platform(_))));
        assert!(injector.calls().is_empty());
    }
}

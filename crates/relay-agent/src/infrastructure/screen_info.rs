//! Screen geometry detection for the agent.
//!
//! The agent needs its own screen dimensions to normalize captured pixel
//! positions into the wire's `[0, 1]` coordinate space.  The relay at the
//! other end scales those fractions by *its* screen, so an accurate local
//! geometry is what keeps pointer positions proportional across machines.
//!
//! Geometry comes from the config file (`[screen]` section); headless and
//! containerized hosts have no display to query, and a wrong guess there
//! would silently skew every forwarded position.  The [`ScreenProbe`] trait
//! keeps the seam so a platform-query implementation can slot in later.

use relay_core::ScreenGeometry;
use thiserror::Error;

/// Error type for screen geometry detection.
#[derive(Debug, Error)]
pub enum ScreenInfoError {
    /// The configured dimensions are unusable (zero width or height).
    #[error("invalid screen dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Trait for resolving the local screen geometry.
pub trait ScreenProbe: Send + Sync {
    /// Returns the dimensions of the screen input is captured on.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenInfoError`] if no usable geometry can be determined.
    fn probe(&self) -> Result<ScreenGeometry, ScreenInfoError>;
}

/// A probe that returns dimensions fixed at construction time.
///
/// The production agent builds one from the config file; tests construct
/// one directly.
pub struct ConfiguredScreenProbe {
    geometry: ScreenGeometry,
}

impl ConfiguredScreenProbe {
    /// Creates a probe for the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            geometry: ScreenGeometry::new(width, height),
        }
    }
}

impl ScreenProbe for ConfiguredScreenProbe {
    fn probe(&self) -> Result<ScreenGeometry, ScreenInfoError> {
        if self.geometry.width == 0 || self.geometry.height == 0 {
            return Err(ScreenInfoError::InvalidDimensions {
                width: self.geometry.width,
                height: self.geometry.height,
            });
        }
        Ok(self.geometry)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

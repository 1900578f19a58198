//! Screen geometry and coordinate-space conversion.
//!
//! Mouse positions cross the wire as fractions in `[0, 1]` of the *sender's*
//! screen.  The agent divides captured pixel positions by its own screen
//! dimensions; the relay multiplies the received fractions by *its* own
//! dimensions before injecting.  The two screens need not be the same size.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenGeometry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ScreenGeometry {
    /// Creates a geometry from pixel dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Converts a pixel position on this screen to normalized `[0, 1]`
    /// fractions.
    ///
    /// Out-of-range pixel positions (possible with multi-monitor virtual
    /// coordinates) are clamped so the wire invariant holds.  A degenerate
    /// zero-size geometry normalizes to `0.0`.
    pub fn normalize(&self, x_px: i32, y_px: i32) -> (f64, f64) {
        let norm = |v: i32, extent: u32| -> f64 {
            if extent == 0 {
                return 0.0;
            }
            (f64::from(v) / f64::from(extent)).clamp(0.0, 1.0)
        };
        (norm(x_px, self.width), norm(y_px, self.height))
    }

    /// Converts normalized `[0, 1]` fractions to a pixel position on this
    /// screen.
    ///
    /// Inputs are clamped before scaling, so a malicious or buggy sender
    /// cannot produce positions outside the screen.
    pub fn denormalize(&self, x: f64, y: f64) -> (i32, i32) {
        let denorm = |v: f64, extent: u32| -> i32 {
            let clamped = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
            (clamped * f64::from(extent)).round() as i32
        };
        (denorm(x, self.width), denorm(y, self.height))
    }
}

impl Default for ScreenGeometry {
    /// 1920×1080, the most common single-monitor setup.
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_center_of_screen_is_half() {
        let geo = ScreenGeometry::new(1920, 1080);
        let (x, y) = geo.normalize(960, 540);
        assert!((x - 0.5).abs() < 1e-9);
        assert!((y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_origin_is_zero() {
        let geo = ScreenGeometry::new(1920, 1080);
        assert_eq!(geo.normalize(0, 0), (0.0, 0.0));
    }

    #[test]
    fn test_normalize_clamps_out_of_range_positions() {
        // Virtual-desktop coordinates can be negative or beyond the primary
        // monitor; the wire invariant requires [0, 1].
        let geo = ScreenGeometry::new(1920, 1080);
        assert_eq!(geo.normalize(-50, -50), (0.0, 0.0));
        assert_eq!(geo.normalize(4000, 3000), (1.0, 1.0));
    }

    #[test]
    fn test_normalize_zero_size_screen_yields_zero() {
        let geo = ScreenGeometry::new(0, 0);
        assert_eq!(geo.normalize(100, 100), (0.0, 0.0));
    }

    #[test]
    fn test_denormalize_half_is_center_of_screen() {
        let geo = ScreenGeometry::new(1920, 1080);
        assert_eq!(geo.denormalize(0.5, 0.5), (960, 540));
    }

    #[test]
    fn test_denormalize_clamps_out_of_range_fractions() {
        let geo = ScreenGeometry::new(1920, 1080);
        assert_eq!(geo.denormalize(-0.5, 2.0), (0, 1080));
    }

    #[test]
    fn test_denormalize_non_finite_fraction_maps_to_origin() {
        let geo = ScreenGeometry::new(1920, 1080);
        assert_eq!(geo.denormalize(f64::NAN, f64::INFINITY), (0, 0));
    }

    #[test]
    fn test_normalize_then_denormalize_on_different_screens_rescales() {
        // A position on a 1920x1080 sender lands proportionally on a
        // 2560x1440 receiver.
        let sender = ScreenGeometry::new(1920, 1080);
        let receiver = ScreenGeometry::new(2560, 1440);
        let (x, y) = sender.normalize(960, 540);
        assert_eq!(receiver.denormalize(x, y), (1280, 720));
    }

    #[test]
    fn test_round_trip_on_same_screen_is_near_identity() {
        let geo = ScreenGeometry::new(1920, 1080);
        let (x, y) = geo.normalize(731, 443);
        let (px, py) = geo.denormalize(x, y);
        assert_eq!((px, py), (731, 443));
    }
}

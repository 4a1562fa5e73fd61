//! Time/pixel mapping for the timeline.
//!
//! Every horizontal coordinate on the timeline (ruler ticks, clip rectangles,
//! trim deltas, the playhead) is derived from one `TimeScale`, so seconds and
//! pixels can never drift apart between the pieces that draw them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixels covered by one second at zoom 1.0.
pub const BASE_PIXELS_PER_SECOND: f64 = 50.0;

/// Frame rate used for keyboard frame stepping and timecode display.
pub const FRAME_RATE: f64 = 30.0;

/// Duration of a single frame at [`FRAME_RATE`].
pub const FRAME_DURATION: f64 = 1.0 / FRAME_RATE;

/// Horizontal zoom factor, always on the 0.25 grid inside `[0.25, 3.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Zoom(f64);

impl Zoom {
    pub const MIN: f64 = 0.25;
    pub const MAX: f64 = 3.0;
    pub const STEP: f64 = 0.25;

    /// Zoom 1.0: one second spans [`BASE_PIXELS_PER_SECOND`] pixels.
    pub const ONE: Self = Self(1.0);

    /// Create a zoom level, snapping to the nearest step and clamping to range.
    /// Non-finite input yields zoom 1.0.
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ONE;
        }
        let snapped = (value / Self::STEP).round() * Self::STEP;
        Self(snapped.clamp(Self::MIN, Self::MAX))
    }

    /// The raw factor.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// One step closer (larger factor), saturating at the maximum.
    pub fn step_in(self) -> Self {
        Self::new(self.0 + Self::STEP)
    }

    /// One step further out (smaller factor), saturating at the minimum.
    pub fn step_out(self) -> Self {
        Self::new(self.0 - Self::STEP)
    }

    pub fn is_min(self) -> bool {
        self.0 <= Self::MIN
    }

    pub fn is_max(self) -> bool {
        self.0 >= Self::MAX
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<f64> for Zoom {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Zoom> for f64 {
    fn from(zoom: Zoom) -> Self {
        zoom.0
    }
}

impl fmt::Display for Zoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}

/// Conversion between seconds and horizontal pixel offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    base_pixels_per_second: f64,
    zoom: Zoom,
}

impl TimeScale {
    /// Scale using [`BASE_PIXELS_PER_SECOND`].
    pub fn new(zoom: Zoom) -> Self {
        Self::with_base(BASE_PIXELS_PER_SECOND, zoom)
    }

    /// Scale with a custom base density. Non-positive bases fall back to the default.
    pub fn with_base(base_pixels_per_second: f64, zoom: Zoom) -> Self {
        let base = if base_pixels_per_second.is_finite() && base_pixels_per_second > 0.0 {
            base_pixels_per_second
        } else {
            BASE_PIXELS_PER_SECOND
        };
        Self {
            base_pixels_per_second: base,
            zoom,
        }
    }

    #[inline]
    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: Zoom) {
        self.zoom = zoom;
    }

    #[inline]
    pub fn pixels_per_second(&self) -> f64 {
        self.base_pixels_per_second * self.zoom.value()
    }

    /// Seconds to a pixel offset from the timeline origin.
    #[inline]
    pub fn time_to_pixels(&self, seconds: f64) -> f64 {
        seconds * self.pixels_per_second()
    }

    /// Pixel offset to seconds, clamped to `[0, limit]`.
    pub fn pixels_to_time(&self, pixels: f64, limit: f64) -> f64 {
        (pixels / self.pixels_per_second()).clamp(0.0, limit.max(0.0))
    }

    /// Pixel distance to a signed duration. Unclamped; used for gesture deltas.
    #[inline]
    pub fn pixels_to_delta(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_second()
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new(Zoom::ONE)
    }
}

/// Format seconds as `MM:SS:FF` at [`FRAME_RATE`].
pub fn format_timecode(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let total_frames = (seconds * FRAME_RATE).round() as u64;
    let fps = FRAME_RATE as u64;
    let frames = total_frames % fps;
    let secs = (total_frames / fps) % 60;
    let mins = total_frames / fps / 60;
    format!("{mins:02}:{secs:02}:{frames:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zoom_snaps_to_grid() {
        assert_eq!(Zoom::new(1.1).value(), 1.0);
        assert_eq!(Zoom::new(1.13).value(), 1.25);
        assert_eq!(Zoom::new(0.01).value(), Zoom::MIN);
        assert_eq!(Zoom::new(12.0).value(), Zoom::MAX);
        assert_eq!(Zoom::new(f64::NAN), Zoom::ONE);
    }

    #[test]
    fn test_zoom_steps_saturate() {
        let mut zoom = Zoom::new(2.75);
        zoom = zoom.step_in();
        assert!(zoom.is_max());
        zoom = zoom.step_in();
        assert_eq!(zoom.value(), 3.0);

        let zoom = Zoom::new(0.25).step_out();
        assert!(zoom.is_min());
    }

    #[test]
    fn test_pixels_per_second() {
        let scale = TimeScale::new(Zoom::new(2.0));
        assert_eq!(scale.pixels_per_second(), 100.0);
        assert_eq!(scale.time_to_pixels(5.0), 500.0);
    }

    #[test]
    fn test_pixels_to_time_clamps() {
        let scale = TimeScale::default();
        assert_eq!(scale.pixels_to_time(-40.0, 10.0), 0.0);
        assert_eq!(scale.pixels_to_time(5000.0, 10.0), 10.0);
        assert_eq!(scale.pixels_to_time(100.0, 10.0), 2.0);
    }

    #[test]
    fn test_pixels_to_delta_is_signed() {
        let scale = TimeScale::default();
        assert_eq!(scale.pixels_to_delta(-25.0), -0.5);
    }

    #[test]
    fn test_zoom_out_and_back_restores_width() {
        let mut scale = TimeScale::default();
        scale.set_zoom(Zoom::new(0.25));
        scale.set_zoom(Zoom::new(3.0));
        scale.set_zoom(Zoom::new(1.0));
        assert_eq!(scale.time_to_pixels(5.0), 5.0 * BASE_PIXELS_PER_SECOND);
    }

    #[test]
    fn test_invalid_base_falls_back() {
        let scale = TimeScale::with_base(0.0, Zoom::ONE);
        assert_eq!(scale.pixels_per_second(), BASE_PIXELS_PER_SECOND);
    }

    #[test]
    fn test_zoom_serde_snaps() {
        let zoom: Zoom = serde_json::from_str("1.3").unwrap();
        assert_eq!(zoom.value(), 1.25);
        assert_eq!(serde_json::to_string(&Zoom::new(2.0)).unwrap(), "2.0");
    }

    #[test]
    fn test_format_timecode() {
        assert_eq!(format_timecode(0.0), "00:00:00");
        assert_eq!(format_timecode(61.5), "01:01:15");
        assert_eq!(format_timecode(-3.0), "00:00:00");
    }

    proptest! {
        #[test]
        fn roundtrip_time_pixels(t in 0.0f64..7200.0, steps in 1u32..=12) {
            let scale = TimeScale::new(Zoom::new(steps as f64 * Zoom::STEP));
            let back = scale.pixels_to_time(scale.time_to_pixels(t), 7200.0);
            prop_assert!((back - t).abs() < 1e-9);
        }

        #[test]
        fn zoom_always_in_range(v in -10.0f64..10.0) {
            let zoom = Zoom::new(v);
            prop_assert!(zoom.value() >= Zoom::MIN && zoom.value() <= Zoom::MAX);
            let steps = zoom.value() / Zoom::STEP;
            prop_assert!((steps - steps.round()).abs() < 1e-12);
        }
    }
}

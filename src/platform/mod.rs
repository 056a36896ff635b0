//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall-clock milliseconds, frame deltas)
//! - Input (thrust held from several sources)
//! - Playfield sizing from the viewport

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Smallest delta handed to the simulation (ms)
pub const MIN_FRAME_MS: f32 = 1.0;
/// Largest delta handed to the simulation (ms); longer stalls are clipped
pub const MAX_FRAME_MS: f32 = 250.0;

/// Wall-clock milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Wall-clock milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Turns timestamps into per-frame deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous call, within `[MIN_FRAME_MS, MAX_FRAME_MS]`.
    /// The first call after a reset only sets the anchor.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => (now_ms - last) as f32,
            None => MIN_FRAME_MS,
        };
        self.last_ms = Some(now_ms);
        dt.clamp(MIN_FRAME_MS, MAX_FRAME_MS)
    }

    /// Forget the anchor (restart, tab resume)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Where a thrust press came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    Pointer,
    Touch,
}

impl InputSource {
    fn bit(self) -> u8 {
        match self {
            InputSource::Keyboard => 1,
            InputSource::Pointer => 2,
            InputSource::Touch => 4,
        }
    }
}

/// Thrust is held while any source is down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThrustInput {
    held: u8,
}

impl ThrustInput {
    pub fn press(&mut self, source: InputSource) {
        self.held |= source.bit();
    }

    pub fn release(&mut self, source: InputSource) {
        self.held &= !source.bit();
    }

    pub fn is_held(&self) -> bool {
        self.held != 0
    }

    pub fn clear(&mut self) {
        self.held = 0;
    }
}

/// Playfield size for a viewport width (responsive breakpoints)
pub fn playfield_for_viewport(viewport_width: f32) -> (f32, f32) {
    if viewport_width <= 480.0 {
        (320.0, 240.0)
    } else if viewport_width <= 768.0 {
        (400.0, 300.0)
    } else {
        (DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1000.0), MIN_FRAME_MS);
        assert_eq!(clock.delta(1016.0), 16.0);
        // Same timestamp still advances by the floor
        assert_eq!(clock.delta(1016.0), MIN_FRAME_MS);
        assert_eq!(clock.delta(5000.0), MAX_FRAME_MS);
        clock.reset();
        assert_eq!(clock.delta(9000.0), MIN_FRAME_MS);
    }

    #[test]
    fn test_thrust_sources_merge() {
        let mut input = ThrustInput::default();
        input.press(InputSource::Keyboard);
        input.press(InputSource::Touch);
        input.release(InputSource::Keyboard);
        assert!(input.is_held());
        input.release(InputSource::Touch);
        assert!(!input.is_held());

        input.press(InputSource::Pointer);
        input.clear();
        assert!(!input.is_held());
    }

    #[test]
    fn test_breakpoints() {
        assert_eq!(playfield_for_viewport(1280.0), (800.0, 400.0));
        assert_eq!(playfield_for_viewport(768.0), (400.0, 300.0));
        assert_eq!(playfield_for_viewport(480.0), (320.0, 240.0));
    }
}

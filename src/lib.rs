//! Desert Flight - A side-scrolling desert obstacle dodger
//!
//! Core modules:
//! - `sim`: Time-based simulation (player, obstacles, clouds, items, particles)
//! - `renderer`: 2D canvas render contract
//! - `audio`: Procedural sound effects
//! - `session`: Session controller (game-over reporting, restart, stale results)
//! - `services`: Score reporting / leaderboard interfaces
//! - `platform`: Clock, input and playfield sizing
//! - `persistence`: Flat key/value client storage
//! - `tuning`: Data-driven game balance
//! - `settings` / `highscores`: Player preferences and local records

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod services;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{BestScore, Leaderboard};
pub use session::Session;
pub use settings::{PlayerColor, QualityPreset, Settings};
pub use tuning::Tuning;

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Desktop playfield size
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 400.0;

    /// Player box (x never changes)
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 200.0;
    pub const PLAYER_SIZE: f32 = 20.0;
    /// Vertical speeds in pixels/second (negative is up)
    pub const PLAYER_ASCEND_SPEED: f32 = -3600.0;
    pub const PLAYER_DESCEND_SPEED: f32 = 3600.0;

    /// Scroll speed of ground obstacles, items and the trail (pixels/second)
    pub const OBSTACLE_SPEED: f32 = 300.0;
    /// Base cloud speed (pixels/second), randomized 0.8x - 1.2x per cloud
    pub const CLOUD_SPEED: f32 = 200.0;
    /// Bird speed multipliers relative to OBSTACLE_SPEED
    pub const BIRD_SPEED_FACTOR: f32 = 1.5;
    pub const BLACK_BIRD_SPEED_FACTOR: f32 = 1.8;

    /// Normal obstacle gap bounds
    pub const MIN_GAP: f32 = 140.0;
    pub const MAX_GAP: f32 = 200.0;

    /// Invincibility star size
    pub const ITEM_SIZE: f32 = 15.0;

    /// Particle / trail caps
    pub const MAX_PARTICLES: usize = 50;
    pub const MAX_TRAIL_LENGTH: usize = 30;
    /// Trail point lifetime (ms)
    pub const TRAIL_LIFE_MS: f32 = 3000.0;

    /// Reference frame length per-frame rates are expressed in (ms)
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;

    /// Day/night cycle length in points and where the crossfade starts
    pub const DAY_CYCLE_POINTS: u64 = 150;
    pub const DAY_TRANSITION_START: f32 = 0.867;
}

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Build from a 0xRRGGBB literal
    pub const fn hex(v: u32) -> Self {
        Self(
            ((v >> 16) & 0xff) as u8,
            ((v >> 8) & 0xff) as u8,
            (v & 0xff) as u8,
        )
    }

    /// CSS hex form (`#rrggbb`)
    pub fn css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// CSS `rgba()` form with the given alpha
    pub fn rgba(&self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.0,
            self.1,
            self.2,
            alpha.clamp(0.0, 1.0)
        )
    }

    /// Scale every channel by `brightness`, saturating at 0..=255
    pub fn scaled(&self, brightness: f32) -> Self {
        let ch = |c: u8| (c as f32 * brightness).floor().clamp(0.0, 255.0) as u8;
        Self(ch(self.0), ch(self.1), ch(self.2))
    }

    /// Shade used for spines, outlines and inner patterns
    pub fn darker(&self) -> Self {
        self.scaled(0.7)
    }
}

/// Scale factor turning a per-reference-frame rate into one for `dt_ms`
#[inline]
pub fn frame_scale(dt_ms: f32) -> f32 {
    dt_ms / consts::REFERENCE_FRAME_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_css() {
        assert_eq!(Rgb::hex(0x4CAF50).css(), "#4caf50");
        assert_eq!(Rgb(255, 215, 0).rgba(0.5), "rgba(255, 215, 0, 0.5)");
    }

    #[test]
    fn test_rgb_scaled_saturates() {
        assert_eq!(Rgb(200, 100, 0).scaled(2.0), Rgb(255, 200, 0));
        assert_eq!(Rgb(100, 50, 10).scaled(0.5), Rgb(50, 25, 5));
    }

    #[test]
    fn test_frame_scale() {
        assert!((frame_scale(consts::REFERENCE_FRAME_MS) - 1.0).abs() < 1e-6);
        assert!((frame_scale(consts::REFERENCE_FRAME_MS * 2.0) - 2.0).abs() < 1e-6);
    }
}

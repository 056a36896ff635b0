//! Game settings and preferences
//!
//! Persisted as JSON under its own key. The player color is also mirrored
//! to the plain `selectedCharacter` key the character picker reads.

use serde::{Deserialize, Serialize};

use crate::Rgb;
use crate::consts::{MAX_PARTICLES, MAX_TRAIL_LENGTH};
use crate::persistence::{self, KEY_CHARACTER, KEY_SETTINGS, Storage};
use crate::tuning::Tuning;

/// Cosmetic player color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    #[default]
    Green,
    Blue,
    Yellow,
    White,
}

impl PlayerColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerColor::Green => "green",
            PlayerColor::Blue => "blue",
            PlayerColor::Yellow => "yellow",
            PlayerColor::White => "white",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "green" => Some(PlayerColor::Green),
            "blue" => Some(PlayerColor::Blue),
            "yellow" => Some(PlayerColor::Yellow),
            "white" => Some(PlayerColor::White),
            _ => None,
        }
    }

    pub fn rgb(&self) -> Rgb {
        match self {
            PlayerColor::Green => Rgb::hex(0x4CAF50),
            PlayerColor::Blue => Rgb::hex(0x2196F3),
            PlayerColor::Yellow => Rgb::hex(0xFFEB3B),
            PlayerColor::White => Rgb::hex(0xFFFFFF),
        }
    }
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 20,
            QualityPreset::Medium => 35,
            QualityPreset::High => MAX_PARTICLES,
        }
    }

    /// Maximum trail points for this preset
    pub fn trail_length(&self) -> usize {
        match self {
            QualityPreset::Low => 10,
            QualityPreset::Medium => 20,
            QualityPreset::High => MAX_TRAIL_LENGTH,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player_color: PlayerColor,
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Player trail
    pub trails: bool,
    /// Particle effects (gas, explosion, sparkles)
    pub particles: bool,
    /// Cloud fog overlay
    pub fog_overlay: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Freeze parallax hills and the propeller spin
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_color: PlayerColor::Green,
            quality: QualityPreset::High,

            trails: true,
            particles: true,
            fog_overlay: true,

            master_volume: 0.7,
            sfx_volume: 0.8,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if self.particles {
            self.quality.max_particles()
        } else {
            0
        }
    }

    /// Narrow the caps in `tuning` to what this preset allows
    pub fn apply_to(&self, tuning: &mut Tuning) {
        tuning.max_particles = tuning.max_particles.min(self.max_particles());
        tuning.max_trail_length = tuning.max_trail_length.min(self.quality.trail_length());
    }

    /// Load from storage, falling back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        let mut settings = match persistence::load_json::<Settings>(storage, KEY_SETTINGS) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        };

        if let Some(color) = storage
            .get(KEY_CHARACTER)
            .and_then(|name| PlayerColor::from_name(&name))
        {
            settings.player_color = color;
        }
        settings
    }

    pub fn save(&self, storage: &dyn Storage) {
        persistence::save_json(storage, KEY_SETTINGS, self);
        storage.set(KEY_CHARACTER, self.player_color.as_str());
        log::info!("Settings saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_player_colors() {
        assert_eq!(PlayerColor::default().rgb(), Rgb::hex(0x4CAF50));
        assert_eq!(PlayerColor::from_name("Blue"), Some(PlayerColor::Blue));
        assert_eq!(PlayerColor::from_name("purple"), None);
    }

    #[test]
    fn test_apply_narrows_caps() {
        let mut tuning = Tuning::default();
        Settings::from_preset(QualityPreset::Low).apply_to(&mut tuning);
        assert_eq!(tuning.max_particles, 20);
        assert_eq!(tuning.max_trail_length, 10);

        let mut tuning = Tuning::default();
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        settings.apply_to(&mut tuning);
        assert_eq!(tuning.max_particles, 0);
        assert_eq!(tuning.max_trail_length, MAX_TRAIL_LENGTH);
    }

    #[test]
    fn test_save_load_with_character_key() {
        let storage = MemoryStorage::new();
        let settings = Settings {
            player_color: PlayerColor::Yellow,
            muted: true,
            ..Settings::default()
        };
        settings.save(&storage);
        assert_eq!(storage.get(KEY_CHARACTER).as_deref(), Some("yellow"));
        assert_eq!(Settings::load(&storage), settings);

        // The character picker may write the key on its own
        storage.set(KEY_CHARACTER, "white");
        assert_eq!(Settings::load(&storage).player_color, PlayerColor::White);
    }
}

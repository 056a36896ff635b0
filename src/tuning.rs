//! Data-driven game balance
//!
//! `Tuning::default()` reproduces the stock desert flight feel. A JSON
//! document can override any subset of fields; missing fields keep their
//! defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::spawn::PatternMix;

/// Errors raised while loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning file unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game balance knobs. Durations and intervals are in milliseconds, speeds in
/// pixels/second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub ascend_speed: f32,
    pub descend_speed: f32,
    pub obstacle_speed: f32,
    pub cloud_speed: f32,

    /// Spawn intervals; 0 disables that spawner
    pub obstacle_interval_ms: f32,
    pub cloud_interval_ms: f32,
    pub item_interval_ms: f32,
    /// Probability an item interval actually produces a star
    pub item_chance: f32,

    pub invincible_ms: f32,
    /// How long fog stays at full intensity after leaving a cloud
    pub fog_hold_ms: f32,
    /// Fog decay per 60 Hz frame once the hold expires
    pub fog_decay_per_frame: f32,
    /// Continuous cloud contact that ends the run
    pub cloud_hazard_ms: f32,

    pub max_particles: usize,
    pub max_trail_length: usize,

    pub pattern_mix: PatternMix,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ascend_speed: PLAYER_ASCEND_SPEED,
            descend_speed: PLAYER_DESCEND_SPEED,
            obstacle_speed: OBSTACLE_SPEED,
            cloud_speed: CLOUD_SPEED,

            obstacle_interval_ms: 1000.0,
            cloud_interval_ms: 1000.0,
            item_interval_ms: 2000.0,
            item_chance: 0.3,

            invincible_ms: 3000.0,
            fog_hold_ms: 3000.0,
            fog_decay_per_frame: 0.06,
            cloud_hazard_ms: 1500.0,

            max_particles: MAX_PARTICLES,
            max_trail_length: MAX_TRAIL_LENGTH,

            pattern_mix: PatternMix::Classic,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a tuning document from disk
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values that would break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let speeds = [
            ("ascend_speed", self.ascend_speed),
            ("descend_speed", self.descend_speed),
            ("obstacle_speed", self.obstacle_speed),
            ("cloud_speed", self.cloud_speed),
        ];
        for (field, value) in speeds {
            if !value.is_finite() {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }

        let intervals = [
            ("obstacle_interval_ms", self.obstacle_interval_ms),
            ("cloud_interval_ms", self.cloud_interval_ms),
            ("item_interval_ms", self.item_interval_ms),
        ];
        for (field, value) in intervals {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be zero (disabled) or positive",
                });
            }
        }

        if !(0.0..=1.0).contains(&self.item_chance) {
            return Err(TuningError::Invalid {
                field: "item_chance",
                reason: "must be within 0..=1",
            });
        }

        let durations = [
            ("invincible_ms", self.invincible_ms),
            ("fog_hold_ms", self.fog_hold_ms),
            ("cloud_hazard_ms", self.cloud_hazard_ms),
        ];
        for (field, value) in durations {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }

        if !(0.0..=1.0).contains(&self.fog_decay_per_frame) || self.fog_decay_per_frame == 0.0 {
            return Err(TuningError::Invalid {
                field: "fog_decay_per_frame",
                reason: "must be within (0, 1]",
            });
        }

        if self.max_trail_length < 2 {
            return Err(TuningError::Invalid {
                field: "max_trail_length",
                reason: "must keep at least two points",
            });
        }

        Ok(())
    }

    /// Tuning with every spawner disabled (hand-placed scenarios)
    pub fn without_spawners() -> Self {
        Self {
            obstacle_interval_ms: 0.0,
            cloud_interval_ms: 0.0,
            item_interval_ms: 0.0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
        assert!(Tuning::without_spawners().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "obstacle_speed": 250.0, "pattern_mix": "Extended" }"#)
            .expect("valid tuning");
        assert_eq!(tuning.obstacle_speed, 250.0);
        assert_eq!(tuning.pattern_mix, PatternMix::Extended);
        assert_eq!(tuning.cloud_hazard_ms, 1500.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "item_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "item_chance",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "cloud_hazard_ms": 0.0 }"#).unwrap_err();
        assert!(err.to_string().contains("cloud_hazard_ms"));

        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_from_path() {
        let path = std::env::temp_dir().join(format!("desert-flight-tuning-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "item_interval_ms": 1500.0 }"#).expect("write tuning");
        let tuning = Tuning::from_path(&path).expect("valid tuning");
        assert_eq!(tuning.item_interval_ms, 1500.0);
        std::fs::remove_file(&path).ok();

        let err = Tuning::from_path(path.with_extension("missing")).unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }
}

//! Day/night cycle derived from the score

use crate::consts::{DAY_CYCLE_POINTS, DAY_TRANSITION_START};

/// Position in the day/night cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCycle {
    /// Completed cycles (even = day, odd = night)
    pub cycle: u64,
    /// Progress through the current cycle (0-1)
    pub progress: f32,
    /// Crossfade toward the other palette (0 outside the transition window)
    pub transition: f32,
}

impl DayCycle {
    pub fn from_score(score: u64) -> Self {
        let cycle = score / DAY_CYCLE_POINTS;
        let progress = (score % DAY_CYCLE_POINTS) as f32 / DAY_CYCLE_POINTS as f32;
        let transition = if progress >= DAY_TRANSITION_START {
            ((progress - DAY_TRANSITION_START) / (1.0 - DAY_TRANSITION_START)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            cycle,
            progress,
            transition,
        }
    }

    /// Whether the current cycle is a night cycle (ignores the crossfade)
    pub fn is_night(&self) -> bool {
        self.cycle % 2 == 1
    }

    /// 0 = full day palette, 1 = full night palette
    pub fn night_weight(&self) -> f32 {
        if self.is_night() {
            1.0 - self.transition
        } else {
            self.transition
        }
    }
}

//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform dependencies:
//! - Time-based motion only (`dt` in milliseconds)
//! - Seeded RNG only
//! - Entity collections owned by `GameState`

pub mod collision;
pub mod cycle;
pub mod particles;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Bounds, check_collision, obstacle_hits};
pub use cycle::DayCycle;
pub use particles::{Particle, ParticleKind, advance_particles};
pub use spawn::{Pattern, PatternMix, Spawner, overlaps_any};
pub use state::{
    BirdMotion, Cloud, GameEvent, GameOverReason, GamePhase, GameState, Geometry, Item, Obstacle,
    ObstacleKind, Player, TrailPoint,
};
pub use tick::{TickInput, tick};

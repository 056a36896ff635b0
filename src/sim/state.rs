//! Game state and core simulation types
//!
//! Every entity collection is owned here; the renderer only reads them.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Bounds;
use super::cycle::DayCycle;
use super::particles::Particle;
use super::spawn::Spawner;
use crate::Rgb;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first thrust
    Ready,
    /// Active gameplay
    Running,
    /// Run ended, waiting for restart
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Touched an obstacle while not invincible
    Collision,
    /// Stayed inside clouds for too long
    LostInCloud,
}

/// Notable things that happened during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Started,
    Scored { score: u64 },
    ItemCollected,
    GameOver { score: u64, reason: GameOverReason },
}

/// The player's flyer
#[derive(Debug, Clone)]
pub struct Player {
    /// Fixed horizontal position
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity (pixels/second, negative is up)
    pub velocity_y: f32,
    pub color: Rgb,
}

impl Player {
    pub fn new(color: Rgb) -> Self {
        Self {
            x: PLAYER_X,
            y: PLAYER_START_Y,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            velocity_y: 0.0,
            color,
        }
    }

    /// Put the player back at its start position
    pub fn reset(&mut self) {
        self.x = PLAYER_X;
        self.y = PLAYER_START_Y;
        self.velocity_y = 0.0;
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Radius used against round obstacles
    pub fn radius(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }

    /// Keep the player inside `[0, playfield_height - height]`
    pub fn clamp_to(&mut self, playfield_height: f32) {
        let floor = (playfield_height - self.height).max(0.0);
        if self.y > floor {
            self.y = floor;
            self.velocity_y = 0.0;
        }
        if self.y < 0.0 {
            self.y = 0.0;
            if self.velocity_y < 0.0 {
                self.velocity_y = 0.0;
            }
        }
    }
}

/// Obstacle shape variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Column pair with a gap between
    Normal,
    TopOnly,
    BottomOnly,
    /// Airborne rock
    Circle,
    /// Airborne rock slab
    Floating,
    Cactus,
    MiniCactus,
    /// Thin ground cactus
    Spike,
    /// Round ground cactus
    GroundBlock,
    GroundCircle,
    CeilingSpike,
    CeilingBlock,
    CeilingCircle,
    MiniSpike,
    MiniBlock,
    MiniGroundCircle,
    MiniCeilingSpike,
    MiniCeilingBlock,
    MiniCeilingCircle,
    Bird { black: bool },
}

impl ObstacleKind {
    /// Stable lowercase name (used in logs)
    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::Normal => "normal",
            ObstacleKind::TopOnly => "top",
            ObstacleKind::BottomOnly => "bottom",
            ObstacleKind::Circle => "circle",
            ObstacleKind::Floating => "floating",
            ObstacleKind::Cactus => "cactus",
            ObstacleKind::MiniCactus => "mini_cactus",
            ObstacleKind::Spike => "spike",
            ObstacleKind::GroundBlock => "ground_block",
            ObstacleKind::GroundCircle => "ground_circle",
            ObstacleKind::CeilingSpike => "ceiling_spike",
            ObstacleKind::CeilingBlock => "ceiling_block",
            ObstacleKind::CeilingCircle => "ceiling_circle",
            ObstacleKind::MiniSpike => "mini_spike",
            ObstacleKind::MiniBlock => "mini_block",
            ObstacleKind::MiniGroundCircle => "mini_ground_circle",
            ObstacleKind::MiniCeilingSpike => "mini_ceiling_spike",
            ObstacleKind::MiniCeilingBlock => "mini_ceiling_block",
            ObstacleKind::MiniCeilingCircle => "mini_ceiling_circle",
            ObstacleKind::Bird { .. } => "bird",
        }
    }
}

/// Obstacle hit geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Full-height columns; a zero height means that column is absent
    Columns {
        width: f32,
        top_height: f32,
        bottom_y: f32,
        bottom_height: f32,
    },
    /// Axis-aligned box
    Rect { y: f32, width: f32, height: f32 },
    /// Circle whose bounding box starts at `(x, y)`
    Circle { y: f32, radius: f32 },
}

/// Wing flap and vertical bob for birds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirdMotion {
    pub wing_phase: f32,
    pub float_phase: f32,
    /// Bob amplitude (only black birds bob)
    pub float_amplitude: f32,
    /// Phase advance per 60 Hz frame
    pub float_speed: f32,
}

/// An obstacle entity
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f32,
    pub geometry: Geometry,
    /// Already counted toward the score
    pub passed: bool,
    pub color: Rgb,
    /// Leftward speed (pixels/second)
    pub speed: f32,
    pub bird: Option<BirdMotion>,
}

impl Obstacle {
    #[allow(clippy::too_many_arguments)]
    pub fn columns(
        id: u32,
        kind: ObstacleKind,
        x: f32,
        width: f32,
        top_height: f32,
        bottom_y: f32,
        bottom_height: f32,
        color: Rgb,
        speed: f32,
    ) -> Self {
        Self {
            id,
            kind,
            x,
            geometry: Geometry::Columns {
                width,
                top_height: top_height.max(0.0),
                bottom_y,
                bottom_height: bottom_height.max(0.0),
            },
            passed: false,
            color,
            speed,
            bird: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rect(
        id: u32,
        kind: ObstacleKind,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
        speed: f32,
    ) -> Self {
        Self {
            id,
            kind,
            x,
            geometry: Geometry::Rect { y, width, height },
            passed: false,
            color,
            speed,
            bird: None,
        }
    }

    pub fn circle(
        id: u32,
        kind: ObstacleKind,
        x: f32,
        y: f32,
        radius: f32,
        color: Rgb,
        speed: f32,
    ) -> Self {
        Self {
            id,
            kind,
            x,
            geometry: Geometry::Circle { y, radius },
            passed: false,
            color,
            speed,
            bird: None,
        }
    }

    /// Bird with its own speed and animation phases
    pub fn bird(id: u32, x: f32, y: f32, black: bool, base_speed: f32, motion: BirdMotion) -> Self {
        let factor = if black {
            BLACK_BIRD_SPEED_FACTOR
        } else {
            BIRD_SPEED_FACTOR
        };
        let color = if black {
            Rgb::hex(0x2C2C2C)
        } else {
            Rgb::hex(0x8B4513)
        };
        Self {
            id,
            kind: ObstacleKind::Bird { black },
            x,
            geometry: Geometry::Rect {
                y,
                width: 25.0,
                height: 15.0,
            },
            passed: false,
            color,
            speed: base_speed * factor,
            bird: Some(motion),
        }
    }

    /// Horizontal extent
    pub fn width(&self) -> f32 {
        match self.geometry {
            Geometry::Columns { width, .. } | Geometry::Rect { width, .. } => width,
            Geometry::Circle { radius, .. } => radius * 2.0,
        }
    }

    /// Right edge x coordinate
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width()
    }

    /// Top-left y of the hit shape (0 for columns)
    pub fn y(&self) -> f32 {
        match self.geometry {
            Geometry::Columns { .. } => 0.0,
            Geometry::Rect { y, .. } | Geometry::Circle { y, .. } => y,
        }
    }

    /// Center point used by the spacing heuristic
    pub fn anchor(&self) -> Vec2 {
        Vec2::new(self.x, self.y())
    }

    /// Move left by `speed * dt` and run the bird bob
    pub fn advance(&mut self, dt_ms: f32) {
        self.x -= self.speed * dt_ms / 1000.0;

        if let Some(motion) = self.bird.as_mut() {
            let scale = crate::frame_scale(dt_ms);
            motion.wing_phase += 0.3 * scale;
            if motion.float_amplitude > 0.0 {
                motion.float_phase += motion.float_speed * scale;
                let offset = motion.float_phase.sin() * motion.float_amplitude;
                if let Geometry::Rect { y, .. } = &mut self.geometry {
                    *y += offset * dt_ms / 1000.0 * 60.0;
                }
            }
        }
    }
}

/// A drifting cloud near the ceiling
#[derive(Debug, Clone)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
    pub speed: f32,
}

impl Cloud {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

/// An invincibility star
#[derive(Debug, Clone)]
pub struct Item {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub collected: bool,
    /// Bob/rotation phase
    pub animation: f32,
}

impl Item {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: ITEM_SIZE,
            height: ITEM_SIZE,
            collected: false,
            animation: 0.0,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

/// Trail point behind the player
#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub life_ms: f32,
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG started from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Playfield size
    pub width: f32,
    pub height: f32,
    pub tuning: Tuning,

    pub phase: GamePhase,
    pub score: u64,
    /// Ticks simulated while running
    pub frame_count: u64,
    /// Simulated time since start/restart (ms)
    pub elapsed_ms: f64,

    /// Spawn accumulators (ms since last spawn)
    pub obstacle_timer_ms: f32,
    pub cloud_timer_ms: f32,
    pub item_timer_ms: f32,
    /// Thrust exhaust accumulator and puffs emitted so far
    pub gas_timer_ms: f32,
    pub gas_puffs: u64,

    pub invincible: bool,
    pub invincible_ms: f32,
    /// Fog overlay intensity (0-1)
    pub fog: f32,
    pub fog_timer_ms: f32,
    /// Continuous time spent inside clouds
    pub cloud_contact_ms: f32,

    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub clouds: Vec<Cloud>,
    pub items: Vec<Item>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Oldest first
    pub trail: Vec<TrailPoint>,

    pub game_over_reason: Option<GameOverReason>,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,

    next_id: u32,
}

impl GameState {
    /// Create a new state in `Ready`
    pub fn new(seed: u64, width: f32, height: f32, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            width,
            height,
            tuning,
            phase: GamePhase::Ready,
            score: 0,
            frame_count: 0,
            elapsed_ms: 0.0,
            obstacle_timer_ms: 0.0,
            cloud_timer_ms: 0.0,
            item_timer_ms: 0.0,
            gas_timer_ms: 0.0,
            gas_puffs: 0,
            invincible: false,
            invincible_ms: 0.0,
            fog: 0.0,
            fog_timer_ms: 0.0,
            cloud_contact_ms: 0.0,
            player: Player::new(crate::settings::PlayerColor::default().rgb()),
            obstacles: Vec::new(),
            clouds: Vec::new(),
            items: Vec::new(),
            particles: Vec::new(),
            trail: Vec::new(),
            game_over_reason: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Leave `Ready` and start simulating
    pub fn start(&mut self) {
        if self.phase == GamePhase::Ready {
            self.phase = GamePhase::Running;
            self.events.push(GameEvent::Started);
        }
    }

    /// Back to a fresh running state: empty collections, zeroed timers,
    /// player at its start position. The RNG stream continues.
    pub fn restart(&mut self) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.frame_count = 0;
        self.elapsed_ms = 0.0;
        self.obstacle_timer_ms = 0.0;
        self.cloud_timer_ms = 0.0;
        self.item_timer_ms = 0.0;
        self.gas_timer_ms = 0.0;
        self.gas_puffs = 0;
        self.invincible = false;
        self.invincible_ms = 0.0;
        self.fog = 0.0;
        self.fog_timer_ms = 0.0;
        self.cloud_contact_ms = 0.0;
        self.player.reset();
        self.obstacles.clear();
        self.clouds.clear();
        self.items.clear();
        self.particles.clear();
        self.trail.clear();
        self.game_over_reason = None;
        self.events.clear();
        self.events.push(GameEvent::Started);
    }

    /// Change the playfield size (callers restart afterwards)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Day/night position derived from the score
    pub fn day_cycle(&self) -> DayCycle {
        DayCycle::from_score(self.score)
    }

    /// Obstacle factory bound to this state's RNG and collection
    pub fn spawner(&mut self) -> Spawner<'_> {
        Spawner::new(
            &mut self.rng,
            &mut self.next_id,
            &mut self.obstacles,
            self.width,
            self.height,
            self.tuning.obstacle_speed,
        )
    }

    /// Take every pending event
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

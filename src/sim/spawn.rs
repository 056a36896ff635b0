//! Procedural obstacle, cloud and item generation
//!
//! Factories only ever append. Every randomized range goes through
//! [`Spawner::uniform`] or a clamp with a guarded upper bound, so small
//! playfields produce squashed patterns instead of panics.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::state::{BirdMotion, Cloud, Item, Obstacle, ObstacleKind};
use crate::Rgb;
use crate::consts::{MAX_GAP, MIN_GAP};

/// Cactus greens
pub const CACTUS_COLORS: [Rgb; 8] = [
    Rgb::hex(0x1B5E20),
    Rgb::hex(0x2E7D32),
    Rgb::hex(0x388E3C),
    Rgb::hex(0x43A047),
    Rgb::hex(0x4CAF50),
    Rgb::hex(0x2D5016),
    Rgb::hex(0x33691E),
    Rgb::hex(0x689F38),
];

/// Rock greys
pub const ROCK_COLORS: [Rgb; 7] = [
    Rgb::hex(0x8E8E8E),
    Rgb::hex(0xA0A0A0),
    Rgb::hex(0x909090),
    Rgb::hex(0x7A7A7A),
    Rgb::hex(0x696969),
    Rgb::hex(0xBABABA),
    Rgb::hex(0xC0C0C0),
];

/// Share of birds that are black
pub const BLACK_BIRD_CHANCE: f32 = 0.1;

/// Which obstacle patterns the timed spawner draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatternMix {
    /// Ground cacti, cacti with birds, or birds
    #[default]
    Classic,
    /// Every pattern family, weighted
    Extended,
}

/// One obstacle wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Ground,
    GroundAndBirds,
    Birds,
    Complex,
    ContinuousCactus,
    Ceiling,
    GroundMiniLine,
    CeilingMiniLine,
    BothMiniLines,
    GroundPlusCeiling,
    CactusAndNormal,
    CactusAndTop,
    CactusAndBottom,
}

const CLASSIC_WEIGHTS: &[(Pattern, f32)] = &[
    (Pattern::Ground, 0.4),
    (Pattern::GroundAndBirds, 0.3),
    (Pattern::Birds, 0.3),
];

const EXTENDED_WEIGHTS: &[(Pattern, f32)] = &[
    (Pattern::Ground, 0.2),
    (Pattern::GroundAndBirds, 0.15),
    (Pattern::Birds, 0.15),
    (Pattern::Complex, 0.1),
    (Pattern::ContinuousCactus, 0.08),
    (Pattern::Ceiling, 0.05),
    (Pattern::GroundMiniLine, 0.05),
    (Pattern::CeilingMiniLine, 0.05),
    (Pattern::BothMiniLines, 0.05),
    (Pattern::GroundPlusCeiling, 0.05),
    (Pattern::CactusAndNormal, 0.03),
    (Pattern::CactusAndTop, 0.02),
    (Pattern::CactusAndBottom, 0.02),
];

impl PatternMix {
    pub fn weights(&self) -> &'static [(Pattern, f32)] {
        match self {
            PatternMix::Classic => CLASSIC_WEIGHTS,
            PatternMix::Extended => EXTENDED_WEIGHTS,
        }
    }

    /// Map a roll in `[0, 1)` onto the weight table
    pub fn pick(&self, roll: f32) -> Pattern {
        let table = self.weights();
        let mut acc = 0.0;
        for &(pattern, weight) in table {
            acc += weight;
            if roll < acc {
                return pattern;
            }
        }
        // Rounding can leave the last sliver uncovered
        table[table.len() - 1].0
    }
}

/// True when `candidate` sits too close to anything in `placed`
pub fn overlaps_any(candidate: &Obstacle, placed: &[Obstacle]) -> bool {
    placed.iter().any(|existing| {
        let distance = candidate.anchor().distance(existing.anchor());
        let min_distance = (candidate.width() + existing.width()).max(30.0) / 2.0;
        distance < min_distance
    })
}

/// Obstacle factory over split borrows of the game state
pub struct Spawner<'a> {
    rng: &'a mut Pcg32,
    next_id: &'a mut u32,
    out: &'a mut Vec<Obstacle>,
    width: f32,
    height: f32,
    speed: f32,
}

impl<'a> Spawner<'a> {
    pub fn new(
        rng: &'a mut Pcg32,
        next_id: &'a mut u32,
        out: &'a mut Vec<Obstacle>,
        width: f32,
        height: f32,
        speed: f32,
    ) -> Self {
        Self {
            rng,
            next_id,
            out,
            width,
            height,
            speed,
        }
    }

    fn id(&mut self) -> u32 {
        let id = *self.next_id;
        *self.next_id += 1;
        id
    }

    /// Uniform in `[lo, hi)`, or `lo` when the range is empty
    fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            lo
        } else {
            lo + self.rng.random::<f32>() * (hi - lo)
        }
    }

    /// `base + [0, extra)`
    fn count(&mut self, base: usize, extra: usize) -> usize {
        base + self.rng.random_range(0..extra)
    }

    fn chance(&mut self, p: f32) -> bool {
        self.rng.random::<f32>() < p
    }

    /// `(rand - 0.5) * spread`
    fn jitter(&mut self, spread: f32) -> f32 {
        (self.rng.random::<f32>() - 0.5) * spread
    }

    /// Clamp a y so it keeps at least `bottom_margin` above the floor
    fn clamp_y(&self, y: f32, top: f32, bottom_margin: f32) -> f32 {
        let hi = (self.height - bottom_margin).max(top);
        y.clamp(top, hi)
    }

    fn cactus_color(&mut self) -> Rgb {
        CACTUS_COLORS[self.rng.random_range(0..CACTUS_COLORS.len())]
    }

    fn rock_color(&mut self) -> Rgb {
        ROCK_COLORS[self.rng.random_range(0..ROCK_COLORS.len())]
    }

    fn push_rect(&mut self, kind: ObstacleKind, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        let id = self.id();
        self.out
            .push(Obstacle::rect(id, kind, x, y, w, h, color, self.speed));
    }

    fn push_circle(&mut self, kind: ObstacleKind, x: f32, y: f32, r: f32, color: Rgb) {
        let id = self.id();
        self.out
            .push(Obstacle::circle(id, kind, x, y, r, color, self.speed));
    }

    fn push_top_column(&mut self, x: f32, w: f32, h: f32, color: Rgb) {
        let id = self.id();
        let bottom_y = self.height + 10.0;
        self.out.push(Obstacle::columns(
            id,
            ObstacleKind::TopOnly,
            x,
            w,
            h,
            bottom_y,
            0.0,
            color,
            self.speed,
        ));
    }

    /// Draw a pattern from `mix` and spawn it
    pub fn spawn(&mut self, mix: PatternMix) -> Pattern {
        let roll = self.rng.random::<f32>();
        let pattern = mix.pick(roll);
        self.spawn_pattern(pattern);
        pattern
    }

    pub fn spawn_pattern(&mut self, pattern: Pattern) {
        let before = self.out.len();
        match pattern {
            Pattern::Ground => self.ground(),
            Pattern::GroundAndBirds => {
                self.ground();
                self.birds();
            }
            Pattern::Birds => self.birds(),
            Pattern::Complex => self.complex(),
            Pattern::ContinuousCactus => self.continuous_cactus(),
            Pattern::Ceiling => self.ceiling(),
            Pattern::GroundMiniLine => self.ground_mini_line(),
            Pattern::CeilingMiniLine => self.ceiling_mini_line(),
            Pattern::BothMiniLines => self.both_mini_lines(),
            Pattern::GroundPlusCeiling => self.ground_plus_ceiling(),
            Pattern::CactusAndNormal => {
                self.ground();
                self.normal();
            }
            Pattern::CactusAndTop => {
                self.ground();
                self.top_only();
            }
            Pattern::CactusAndBottom => {
                self.ground();
                self.bottom_only();
            }
        }
        log::debug!(
            "Spawned {:?}: {} obstacles",
            pattern,
            self.out.len() - before
        );
    }

    /// Column pair with a passable gap
    pub fn normal(&mut self) {
        let gap = self.uniform(MIN_GAP, MAX_GAP);
        let width = self.uniform(15.0, 30.0);
        let min_height = 50.0;
        let max_height = self.height - gap - min_height;
        let top_height = self.uniform(min_height, max_height);
        let bottom_y = top_height + gap;
        let bottom_height = self.height - bottom_y;
        let color = self.cactus_color();
        let id = self.id();
        self.out.push(Obstacle::columns(
            id,
            ObstacleKind::Normal,
            self.width,
            width,
            top_height,
            bottom_y,
            bottom_height,
            color,
            self.speed,
        ));
    }

    pub fn top_only(&mut self) {
        let width = self.uniform(12.0, 30.0);
        let height = self.uniform(80.0, 200.0).min(self.height * 0.5);
        let color = self.cactus_color();
        self.push_top_column(self.width, width, height, color);
    }

    pub fn bottom_only(&mut self) {
        let width = self.uniform(12.0, 30.0);
        let height = self.uniform(80.0, 200.0).min(self.height * 0.5);
        let color = self.cactus_color();
        let id = self.id();
        self.out.push(Obstacle::columns(
            id,
            ObstacleKind::BottomOnly,
            self.width,
            width,
            0.0,
            self.height - height,
            height,
            color,
            self.speed,
        ));
    }

    /// Airborne rocks spread across three bands
    pub fn circles(&mut self) {
        let n = self.count(4, 5);
        let zone_height = ((self.height - 120.0) / 3.0).max(0.0);
        for i in 0..n {
            let radius = self.uniform(12.0, 27.0).clamp(12.0, 25.0);
            let x = self.width + i as f32 * self.uniform(65.0, 115.0);
            let base = 60.0 + (i % 3) as f32 * zone_height;
            let y = base + self.jitter(zone_height * 0.6);
            let y = self.clamp_y(y, 40.0, 80.0);
            let color = self.rock_color();
            self.push_circle(ObstacleKind::Circle, x, y, radius, color);
        }
    }

    /// Airborne rock slabs spread across four bands
    pub fn floating(&mut self) {
        let n = self.count(4, 5);
        let zone_height = ((self.height - 140.0) / 4.0).max(0.0);
        for i in 0..n {
            let w = self.uniform(12.0, 30.0);
            let h = self.uniform(10.0, 25.0);
            let x = self.width + i as f32 * self.uniform(60.0, 105.0);
            let base = 70.0 + (i % 4) as f32 * zone_height;
            let y = base + self.jitter(zone_height * 0.7);
            let y = self.clamp_y(y, 40.0, 80.0);
            let color = self.rock_color();
            self.push_rect(ObstacleKind::Floating, x, y, w, h, color);
        }
    }

    /// A row of tall cacti on the ground
    pub fn ground(&mut self) {
        let n = self.count(8, 10);
        for i in 0..n {
            let x = self.width + i as f32 * self.uniform(30.0, 55.0);
            let w = self.uniform(15.0, 35.0);
            let h = self.uniform(30.0, 80.0).min(self.height * 0.4);
            let color = self.cactus_color();
            self.push_rect(ObstacleKind::Cactus, x, self.height - h, w, h, color);
        }
    }

    /// Hanging spikes, blocks and rocks
    pub fn ceiling(&mut self) {
        let n = self.count(7, 8);
        for i in 0..n {
            let roll = self.rng.random::<f32>();
            let x = self.width + i as f32 * self.uniform(25.0, 55.0);
            let color = self.cactus_color();
            if roll < 0.4 {
                let w = self.uniform(12.0, 30.0);
                let h = self.uniform(15.0, 50.0);
                self.push_rect(ObstacleKind::CeilingSpike, x, 0.0, w, h, color);
            } else if roll < 0.7 {
                let w = self.uniform(15.0, 40.0);
                let h = self.uniform(12.0, 37.0);
                self.push_rect(ObstacleKind::CeilingBlock, x, 0.0, w, h, color);
            } else {
                let r = self.uniform(8.0, 23.0);
                self.push_circle(ObstacleKind::CeilingCircle, x, 0.0, r, color);
            }
        }
    }

    /// A flock of birds; black birds are rare, faster and bob
    pub fn birds(&mut self) {
        let n = self.count(3, 4);
        for i in 0..n {
            let x = self.width + i as f32 * self.uniform(50.0, 90.0);
            let y = self.uniform(60.0, self.height - 60.0);
            let black = self.chance(BLACK_BIRD_CHANCE);
            let motion = BirdMotion {
                wing_phase: self.rng.random::<f32>() * TAU,
                float_phase: self.rng.random::<f32>() * TAU,
                float_amplitude: if black { 2.0 } else { 0.0 },
                float_speed: if black { 0.02 } else { 0.0 },
            };
            let id = self.id();
            self.out
                .push(Obstacle::bird(id, x, y, black, self.speed, motion));
        }
    }

    pub fn complex(&mut self) {
        let roll = self.rng.random::<f32>();
        if roll < 0.25 {
            self.ground_plus_top();
        } else if roll < 0.5 {
            self.ground_plus_floating();
        } else if roll < 0.75 {
            self.ground_plus_circle();
        } else {
            self.ground();
            self.circles();
            self.floating();
        }
    }

    pub fn continuous_cactus(&mut self) {
        let roll = self.rng.random::<f32>();
        if roll < 0.4 {
            self.ground();
            self.ground_mini_line();
        } else if roll < 0.7 {
            self.ground();
            self.ground();
        } else {
            self.ground_mini_line();
            self.ground_mini_line();
        }
    }

    /// Short spikes, most with a hanging column above
    pub fn ground_plus_top(&mut self) {
        let n = self.count(3, 5);
        for i in 0..n {
            let x = self.width + i as f32 * self.uniform(30.0, 55.0);
            let w = self.uniform(15.0, 35.0);
            let h = self.uniform(20.0, 55.0);
            let color = self.cactus_color();
            self.push_rect(ObstacleKind::Spike, x, self.height - h, w, h, color);

            if self.chance(0.7) {
                let top_w = self.uniform(12.0, 30.0);
                let top_h = self.uniform(60.0, 140.0).min(self.height * 0.4);
                let top_x = x + self.uniform(-10.0, 10.0);
                let color = self.cactus_color();
                self.push_top_column(top_x, top_w, top_h, color);
            }
        }
    }

    pub fn ground_plus_floating(&mut self) {
        const ZONES: [f32; 3] = [80.0, 160.0, 240.0];
        let n = self.count(3, 4);
        for i in 0..n {
            let x = self.width + i as f32 * self.uniform(35.0, 65.0);
            let gw = self.uniform(15.0, 35.0);
            let gh = self.uniform(12.0, 37.0);
            let color = self.cactus_color();
            self.push_rect(ObstacleKind::GroundBlock, x, self.height - gh, gw, gh, color);

            let fw = self.uniform(12.0, 32.0);
            let fh = self.uniform(10.0, 25.0);
            let fy = ZONES[i % ZONES.len()] + self.jitter(60.0);
            let fy = self.clamp_y(fy, 40.0, 80.0);
            let fx = x + self.uniform(-20.0, 20.0);
            let color = self.rock_color();
            self.push_rect(ObstacleKind::Floating, fx, fy, fw, fh, color);
        }
    }

    pub fn ground_plus_circle(&mut self) {
        const ZONES: [f32; 3] = [70.0, 150.0, 230.0];
        let n = self.count(3, 4);
        for i in 0..n {
            let x = self.width + i as f32 * self.uniform(40.0, 70.0);
            let r = self.uniform(8.0, 20.0);
            let color = self.cactus_color();
            self.push_circle(ObstacleKind::GroundCircle, x, self.height - r * 2.0, r, color);

            let air_r = self.uniform(10.0, 25.0);
            let air_y = ZONES[i % ZONES.len()] + self.jitter(50.0);
            let air_y = self.clamp_y(air_y, 30.0, 60.0);
            let air_x = x + self.uniform(-15.0, 15.0);
            let color = self.rock_color();
            self.push_circle(ObstacleKind::Circle, air_x, air_y, air_r, color);
        }
    }

    /// Dense line of small floor hazards plus a middle fill
    pub fn ground_mini_line(&mut self) {
        let n = self.count(10, 12);
        let offset = self.uniform(0.0, 30.0);
        for i in 0..n {
            let roll = self.rng.random::<f32>();
            let x = self.width + offset + i as f32 * self.uniform(20.0, 45.0);
            let color = self.cactus_color();
            if roll < 0.4 {
                let w = self.uniform(6.0, 14.0);
                let h = self.uniform(8.0, 20.0);
                self.push_rect(ObstacleKind::MiniSpike, x, self.height - h, w, h, color);
            } else if roll < 0.7 {
                let w = self.uniform(8.0, 18.0);
                let h = self.uniform(6.0, 16.0);
                self.push_rect(ObstacleKind::MiniBlock, x, self.height - h, w, h, color);
            } else {
                let r = self.uniform(3.0, 9.0);
                self.push_circle(
                    ObstacleKind::MiniGroundCircle,
                    x,
                    self.height - r * 2.0,
                    r,
                    color,
                );
            }
        }
        self.middle_fill();
    }

    fn mini_ceiling_piece(&mut self, x: f32, color: Rgb) {
        let roll = self.rng.random::<f32>();
        if roll < 0.4 {
            let w = self.uniform(6.0, 14.0);
            let h = self.uniform(8.0, 20.0);
            self.push_rect(ObstacleKind::MiniCeilingSpike, x, 0.0, w, h, color);
        } else if roll < 0.7 {
            let w = self.uniform(8.0, 18.0);
            let h = self.uniform(6.0, 16.0);
            self.push_rect(ObstacleKind::MiniCeilingBlock, x, 0.0, w, h, color);
        } else {
            let r = self.uniform(3.0, 9.0);
            self.push_circle(ObstacleKind::MiniCeilingCircle, x, 0.0, r, color);
        }
    }

    pub fn ceiling_mini_line(&mut self) {
        let n = self.count(6, 8);
        let offset = self.uniform(0.0, 30.0);
        for i in 0..n {
            let x = self.width + offset + i as f32 * self.uniform(25.0, 60.0);
            let color = self.cactus_color();
            self.mini_ceiling_piece(x, color);
        }
        self.middle_fill();
    }

    pub fn both_mini_lines(&mut self) {
        let n = self.count(8, 10);
        let offset = self.uniform(0.0, 30.0);
        for i in 0..n {
            let x = self.width + offset + i as f32 * self.uniform(20.0, 45.0);
            let w = self.uniform(6.0, 14.0);
            let h = self.uniform(12.0, 30.0);
            let color = self.cactus_color();
            self.push_rect(ObstacleKind::MiniCactus, x, self.height - h, w, h, color);
        }

        let n = self.count(6, 8);
        let offset = self.uniform(0.0, 40.0);
        for i in 0..n {
            let x = self.width + offset + i as f32 * self.uniform(25.0, 60.0);
            let color = self.rock_color();
            self.mini_ceiling_piece(x, color);
        }
        self.middle_fill();
    }

    /// Floor pieces, almost always mirrored by a ceiling piece
    pub fn ground_plus_ceiling(&mut self) {
        let n = self.count(6, 8);
        for i in 0..n {
            let x = self.width + i as f32 * self.uniform(25.0, 45.0);
            let color = self.cactus_color();
            if self.chance(0.5) {
                let w = self.uniform(15.0, 35.0);
                let h = self.uniform(20.0, 55.0);
                self.push_rect(ObstacleKind::Spike, x, self.height - h, w, h, color);
            } else {
                let r = self.uniform(10.0, 25.0);
                self.push_circle(ObstacleKind::GroundCircle, x, self.height - r * 2.0, r, color);
            }

            if self.chance(0.95) {
                let cx = x + self.uniform(-15.0, 15.0);
                let color = self.cactus_color();
                if self.chance(0.5) {
                    let w = self.uniform(12.0, 30.0);
                    let h = self.uniform(15.0, 50.0);
                    self.push_rect(ObstacleKind::CeilingSpike, cx, 0.0, w, h, color);
                } else {
                    let r = self.uniform(8.0, 23.0);
                    self.push_circle(ObstacleKind::CeilingCircle, cx, 0.0, r, color);
                }
            }
        }
    }

    /// Airborne rocks between floor and ceiling lines
    pub fn middle_fill(&mut self) {
        let roll = self.rng.random::<f32>();
        if roll < 0.3 {
            self.middle_circles();
        } else if roll < 0.6 {
            self.middle_boxes();
        } else if roll < 0.8 {
            self.middle_mixed();
        } else {
            self.middle_circles();
            self.middle_boxes();
        }
    }

    fn middle_circles(&mut self) {
        const ZONES: [f32; 3] = [100.0, 200.0, 300.0];
        let n = self.count(4, 5);
        let mut placed: Vec<Obstacle> = Vec::new();
        for i in 0..n {
            for _ in 0..5 {
                let r = self.uniform(12.0, 30.0);
                let x = self.width + i as f32 * self.uniform(80.0, 130.0);
                let y = ZONES[i % ZONES.len()] + self.jitter(60.0);
                let y = self.clamp_y(y, 50.0, 100.0);
                let color = self.rock_color();
                let candidate =
                    Obstacle::circle(0, ObstacleKind::Circle, x, y, r, color, self.speed);
                if !overlaps_any(&candidate, &placed) {
                    let id = self.id();
                    let obstacle = Obstacle { id, ..candidate };
                    placed.push(obstacle.clone());
                    self.out.push(obstacle);
                    break;
                }
            }
        }
    }

    fn middle_boxes(&mut self) {
        const ZONES: [f32; 4] = [80.0, 160.0, 240.0, 320.0];
        let n = self.count(4, 6);
        for i in 0..n {
            let w = self.uniform(12.0, 32.0);
            let h = self.uniform(10.0, 25.0);
            let x = self.width + i as f32 * self.uniform(70.0, 110.0);
            let y = ZONES[i % ZONES.len()] + self.jitter(50.0);
            let y = self.clamp_y(y, 40.0, 80.0);
            let color = self.rock_color();
            self.push_rect(ObstacleKind::Floating, x, y, w, h, color);
        }
    }

    fn middle_mixed(&mut self) {
        const ZONES: [f32; 3] = [90.0, 180.0, 270.0];
        let n = self.count(5, 6);
        for i in 0..n {
            let x = self.width + i as f32 * self.uniform(75.0, 110.0);
            let y = ZONES[i % ZONES.len()] + self.jitter(70.0);
            let y = self.clamp_y(y, 40.0, 80.0);
            let color = self.rock_color();
            if self.chance(0.5) {
                let r = self.uniform(10.0, 25.0);
                self.push_circle(ObstacleKind::Circle, x, y, r, color);
            } else {
                let w = self.uniform(10.0, 28.0);
                let h = self.uniform(8.0, 20.0);
                self.push_rect(ObstacleKind::Floating, x, y, w, h, color);
            }
        }
    }
}

/// Spawn a bank of 8-19 clouds hugging the ceiling
pub fn spawn_clouds(rng: &mut Pcg32, clouds: &mut Vec<Cloud>, width: f32, base_speed: f32) {
    let n = 8 + rng.random_range(0..12);
    for i in 0..n {
        let w = 30.0 + rng.random::<f32>() * 40.0;
        let h = 15.0 + rng.random::<f32>() * 20.0;
        let x = width + i as f32 * (15.0 + rng.random::<f32>() * 25.0);
        let y = rng.random::<f32>() * 30.0;
        clouds.push(Cloud {
            x,
            y,
            width: w,
            height: h,
            opacity: 0.6 + rng.random::<f32>() * 0.4,
            speed: base_speed * (0.8 + rng.random::<f32>() * 0.4),
        });
    }
}

/// Maybe spawn an invincibility star in the middle band. Returns whether one
/// was created.
pub fn spawn_item(
    rng: &mut Pcg32,
    items: &mut Vec<Item>,
    width: f32,
    height: f32,
    chance: f32,
) -> bool {
    if rng.random::<f32>() >= chance {
        return false;
    }
    let x = width + rng.random::<f32>() * 200.0;
    let lo = 100.0f32.min(height * 0.25);
    let hi = (height - 100.0).max(lo);
    let y = lo + rng.random::<f32>() * (hi - lo);
    items.push(Item::new(x, y));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Geometry;
    use rand::SeedableRng;

    struct Fixture {
        rng: Pcg32,
        next_id: u32,
        out: Vec<Obstacle>,
    }

    impl Fixture {
        fn new(seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed),
                next_id: 1,
                out: Vec::new(),
            }
        }

        fn spawner(&mut self, width: f32, height: f32) -> Spawner<'_> {
            Spawner::new(
                &mut self.rng,
                &mut self.next_id,
                &mut self.out,
                width,
                height,
                300.0,
            )
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        for mix in [PatternMix::Classic, PatternMix::Extended] {
            let total: f32 = mix.weights().iter().map(|(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-4, "{mix:?} sums to {total}");
        }
    }

    #[test]
    fn test_classic_pick() {
        assert_eq!(PatternMix::Classic.pick(0.0), Pattern::Ground);
        assert_eq!(PatternMix::Classic.pick(0.39), Pattern::Ground);
        assert_eq!(PatternMix::Classic.pick(0.5), Pattern::GroundAndBirds);
        assert_eq!(PatternMix::Classic.pick(0.99), Pattern::Birds);
        assert_eq!(PatternMix::Classic.pick(1.0), Pattern::Birds);
    }

    #[test]
    fn test_ground_counts_and_placement() {
        let mut f = Fixture::new(11);
        f.spawner(800.0, 400.0).ground();
        assert!((8..=17).contains(&f.out.len()));
        for o in &f.out {
            assert_eq!(o.kind, ObstacleKind::Cactus);
            assert!(o.x >= 800.0);
            assert!(CACTUS_COLORS.contains(&o.color));
            // Sits on the floor
            assert!((o.y() + rect_height(o) - 400.0).abs() < 1e-3);
        }
    }

    fn rect_height(o: &Obstacle) -> f32 {
        match o.geometry {
            Geometry::Rect { height, .. } => height,
            _ => panic!("expected rect"),
        }
    }

    #[test]
    fn test_normal_gap_bounds() {
        for seed in 0..50 {
            let mut f = Fixture::new(seed);
            f.spawner(800.0, 400.0).normal();
            let o = &f.out[0];
            if let Geometry::Columns {
                top_height,
                bottom_y,
                ..
            } = o.geometry
            {
                let gap = bottom_y - top_height;
                assert!((MIN_GAP..=MAX_GAP).contains(&gap));
                assert!(top_height >= 50.0);
            } else {
                panic!("normal obstacle must be columns");
            }
        }
    }

    #[test]
    fn test_birds_have_motion_and_speed() {
        let mut f = Fixture::new(5);
        f.spawner(800.0, 400.0).birds();
        assert!((3..=6).contains(&f.out.len()));
        for o in &f.out {
            let motion = o.bird.expect("birds carry motion");
            match o.kind {
                ObstacleKind::Bird { black: true } => {
                    assert_eq!(motion.float_amplitude, 2.0);
                    assert!((o.speed - 540.0).abs() < 1e-3);
                }
                ObstacleKind::Bird { black: false } => {
                    assert_eq!(motion.float_amplitude, 0.0);
                    assert!((o.speed - 450.0).abs() < 1e-3);
                }
                _ => panic!("unexpected kind"),
            }
        }
    }

    #[test]
    fn test_every_pattern_survives_tiny_playfield() {
        let patterns = EXTENDED_WEIGHTS.iter().map(|(p, _)| *p);
        for (seed, pattern) in patterns.enumerate() {
            let mut f = Fixture::new(seed as u64);
            f.spawner(120.0, 60.0).spawn_pattern(pattern);
            for o in &f.out {
                assert!(o.x.is_finite() && o.y().is_finite());
                assert!(o.width() > 0.0);
            }
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut f = Fixture::new(9);
        let mut s = f.spawner(800.0, 400.0);
        s.spawn_pattern(Pattern::Complex);
        s.spawn_pattern(Pattern::BothMiniLines);
        let mut ids: Vec<u32> = f.out.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), f.out.len());
    }

    #[test]
    fn test_middle_circles_do_not_overlap() {
        for seed in 0..20 {
            let mut f = Fixture::new(seed);
            f.spawner(800.0, 400.0).middle_circles();
            for (i, a) in f.out.iter().enumerate() {
                assert!(!overlaps_any(a, &f.out[i + 1..]));
            }
        }
    }

    #[test]
    fn test_overlap_rule() {
        let a = Obstacle::circle(1, ObstacleKind::Circle, 0.0, 0.0, 10.0, Rgb(0, 0, 0), 300.0);
        let near = Obstacle::circle(2, ObstacleKind::Circle, 15.0, 0.0, 10.0, Rgb(0, 0, 0), 300.0);
        let far = Obstacle::circle(3, ObstacleKind::Circle, 25.0, 0.0, 10.0, Rgb(0, 0, 0), 300.0);
        // min distance = max(20 + 20, 30) / 2 = 20
        assert!(overlaps_any(&near, std::slice::from_ref(&a)));
        assert!(!overlaps_any(&far, std::slice::from_ref(&a)));
    }

    #[test]
    fn test_clouds_and_items() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut clouds = Vec::new();
        spawn_clouds(&mut rng, &mut clouds, 800.0, 200.0);
        assert!((8..=19).contains(&clouds.len()));
        for c in &clouds {
            assert!(c.y >= 0.0 && c.y < 30.0);
            assert!((160.0..=240.0).contains(&c.speed));
        }

        let mut items = Vec::new();
        assert!(!spawn_item(&mut rng, &mut items, 800.0, 400.0, 0.0));
        assert!(spawn_item(&mut rng, &mut items, 800.0, 400.0, 1.0));
        let item = &items[0];
        assert!(item.x >= 800.0 && item.x < 1000.0);
        assert!(item.y >= 100.0 && item.y <= 300.0);
    }
}

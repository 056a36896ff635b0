//! 2D canvas rendering
//!
//! The scene is drawn through the [`Painter`] trait: a thin set of
//! canvas-style primitives. The browser build paints onto a
//! `CanvasRenderingContext2d`; tests paint into a [`Recorder`].
//! Rendering only reads `GameState`.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod obstacles;
pub mod record;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use record::{DrawOp, Recorder};

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::GameState;

/// A gradient color stop: offset in 0-1 and a CSS color
pub type ColorStop<'a> = (f32, &'a str);

/// Canvas-style drawing primitives
///
/// Fill and stroke styles are sticky until changed, and `save`/`restore`
/// bracket alpha, style and glow changes, as on a 2D canvas.
pub trait Painter {
    fn save(&mut self);
    fn restore(&mut self);

    /// Global alpha for everything drawn afterwards
    fn set_alpha(&mut self, alpha: f32);
    fn set_fill(&mut self, color: &str);
    fn set_stroke(&mut self, color: &str, width: f32);
    /// Vertical linear gradient fill from `y0` to `y1`
    fn set_fill_linear(&mut self, y0: f32, y1: f32, stops: &[ColorStop<'_>]);
    /// Radial gradient fill around `center`
    fn set_fill_radial(&mut self, center: Vec2, radius: f32, stops: &[ColorStop<'_>]);
    /// Soft colored shadow behind subsequent shapes
    fn set_glow(&mut self, color: &str, blur: f32);

    fn clear(&mut self, width: f32, height: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32);
    fn stroke_circle(&mut self, center: Vec2, radius: f32);
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2);
    fn fill_polygon(&mut self, points: &[Vec2]);
    fn stroke_polygon(&mut self, points: &[Vec2]);
    /// Single round-capped segment
    fn stroke_line(&mut self, from: Vec2, to: Vec2);
}

/// Per-frame switches taken from the player's settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub trails: bool,
    pub particles: bool,
    pub fog_overlay: bool,
    pub reduced_motion: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            trails: true,
            particles: true,
            fog_overlay: true,
            reduced_motion: false,
        }
    }
}

impl From<&Settings> for RenderOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            trails: settings.trails,
            particles: settings.particles,
            fog_overlay: settings.fog_overlay,
            reduced_motion: settings.reduced_motion,
        }
    }
}

/// Draw one full frame, back to front
pub fn render(state: &GameState, painter: &mut impl Painter, options: &RenderOptions) {
    let cycle = state.day_cycle();
    let night = cycle.night_weight();

    painter.clear(state.width, state.height);
    scene::draw_sky(painter, state.width, state.height, night);
    scene::draw_celestial(painter, state.width, night);

    // Frozen hills and propeller under reduced motion
    let motion_ms = if options.reduced_motion {
        0.0
    } else {
        state.elapsed_ms
    };
    scene::draw_hills(painter, state.width, state.height, night, motion_ms);

    if options.trails {
        scene::draw_trail(painter, &state.trail, state.player.color);
    }
    scene::draw_player(
        painter,
        &state.player,
        state.invincible,
        state.frame_count,
        motion_ms,
    );
    for obstacle in &state.obstacles {
        obstacles::draw_obstacle(painter, obstacle, state.height);
    }
    scene::draw_clouds(painter, &state.clouds);
    scene::draw_items(painter, &state.items);
    if options.particles {
        scene::draw_particles(painter, &state.particles);
    }
    if options.fog_overlay {
        scene::draw_fog(painter, state.width, state.height, state.fog);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Item, Obstacle, ObstacleKind, TrailPoint};
    use crate::tuning::Tuning;
    use crate::Rgb;

    fn busy_state() -> GameState {
        let mut state = GameState::new(3, 800.0, 400.0, Tuning::without_spawners());
        state.start();
        state.obstacles.push(Obstacle::rect(
            1,
            ObstacleKind::Cactus,
            400.0,
            340.0,
            30.0,
            60.0,
            Rgb::hex(0x2E7D32),
            300.0,
        ));
        state.items.push(Item::new(500.0, 120.0));
        state.trail.push(TrailPoint {
            pos: Vec2::new(90.0, 210.0),
            life_ms: 1000.0,
        });
        state.trail.push(TrailPoint {
            pos: Vec2::new(100.0, 210.0),
            life_ms: 2000.0,
        });
        state.fog = 0.5;
        state
    }

    #[test]
    fn test_render_starts_with_clear() {
        let state = busy_state();
        let mut rec = Recorder::new();
        render(&state, &mut rec, &RenderOptions::default());
        assert_eq!(rec.ops.first(), Some(&DrawOp::Clear(800.0, 400.0)));
        assert!(rec.is_balanced());
    }

    #[test]
    fn test_options_skip_layers() {
        let state = busy_state();

        let mut full = Recorder::new();
        render(&state, &mut full, &RenderOptions::default());

        let mut lean = Recorder::new();
        let options = RenderOptions {
            trails: false,
            fog_overlay: false,
            ..RenderOptions::default()
        };
        render(&state, &mut lean, &options);

        assert!(lean.ops.len() < full.ops.len());
        assert_eq!(lean.count(|op| matches!(op, DrawOp::Line(..))), 0);
    }

    #[test]
    fn test_options_from_settings() {
        let settings = Settings {
            particles: false,
            reduced_motion: true,
            ..Settings::default()
        };
        let options = RenderOptions::from(&settings);
        assert!(!options.particles);
        assert!(options.reduced_motion);
        assert!(options.trails);
    }
}

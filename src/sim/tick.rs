//! Variable timestep simulation tick
//!
//! One call per display frame. Every motion is `speed * dt / 1000` and every
//! per-frame rate is rescaled with [`frame_scale`], so the outcome of a
//! second of play does not depend on the refresh rate.

use glam::Vec2;

use super::collision::{check_collision, in_cloud, touched_item};
use super::particles::{advance_particles, emit_explosion, emit_gas, emit_sparkles};
use super::spawn::{spawn_clouds, spawn_item};
use super::state::{GameEvent, GameOverReason, GamePhase, GameState, TrailPoint};
use crate::consts::{REFERENCE_FRAME_MS, TRAIL_LIFE_MS};
use crate::frame_scale;

/// Trail points left of this x are dropped
const TRAIL_CULL_X: f32 = -50.0;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Thrust held (space, pointer or touch)
    pub thrust: bool,
}

/// Advance the game by `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    let dt_ms = dt_ms.max(1.0);

    if state.phase == GamePhase::Ready && input.thrust {
        state.start();
        log::info!("Run started (seed {})", state.seed);
    }

    if state.phase != GamePhase::Running {
        // Explosion keeps animating over the frozen scene
        advance_particles(&mut state.particles, dt_ms, state.tuning.max_particles);
        return;
    }

    state.frame_count += 1;
    state.elapsed_ms += dt_ms as f64;

    update_player(state, input, dt_ms);
    state.player.clamp_to(state.height);

    run_spawners(state, dt_ms);

    advance_obstacles(state, dt_ms);
    advance_clouds_and_items(state, dt_ms);

    if state.invincible {
        state.invincible_ms -= dt_ms;
        if state.invincible_ms <= 0.0 {
            state.invincible = false;
            state.invincible_ms = 0.0;
        }
    }

    let mut reason = update_fog(state, dt_ms);

    if reason.is_none() {
        collect_items(state);
        if check_collision(state) {
            reason = Some(GameOverReason::Collision);
        }
    }

    advance_particles(&mut state.particles, dt_ms, state.tuning.max_particles);

    if let Some(reason) = reason {
        game_over(state, reason);
    }
}

fn update_player(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    let player = &mut state.player;
    player.velocity_y = if input.thrust {
        state.tuning.ascend_speed
    } else {
        state.tuning.descend_speed
    };

    if input.thrust {
        // One puff per reference frame of thrust, whatever the refresh rate
        let exhaust = Vec2::new(player.x + player.width / 2.0, player.y + player.height);
        let due = accumulate(&mut state.gas_timer_ms, REFERENCE_FRAME_MS, dt_ms);
        for _ in 0..due {
            emit_gas(&mut state.rng, &mut state.particles, exhaust, state.gas_puffs);
            state.gas_puffs += 1;
        }
    }

    player.y += player.velocity_y * dt_ms / 1000.0;

    let center = player.center();
    update_trail(state, center, dt_ms);
}

fn update_trail(state: &mut GameState, center: Vec2, dt_ms: f32) {
    state.trail.push(TrailPoint {
        pos: center,
        life_ms: TRAIL_LIFE_MS,
    });

    let cap = state.tuning.max_trail_length;
    if state.trail.len() > cap {
        let excess = state.trail.len() - cap;
        state.trail.drain(..excess);
    }

    let shift = state.tuning.obstacle_speed * dt_ms / 1000.0;
    for point in state.trail.iter_mut() {
        point.pos.x -= shift;
        point.life_ms -= dt_ms;
    }
    state
        .trail
        .retain(|p| p.life_ms > 0.0 && p.pos.x > TRAIL_CULL_X);
}

/// Fire every spawner whose interval elapsed. Large `dt` fires several times.
fn run_spawners(state: &mut GameState, dt_ms: f32) {
    let obstacle_due = accumulate(
        &mut state.obstacle_timer_ms,
        state.tuning.obstacle_interval_ms,
        dt_ms,
    );
    let mix = state.tuning.pattern_mix;
    for _ in 0..obstacle_due {
        state.spawner().spawn(mix);
    }

    let cloud_due = accumulate(
        &mut state.cloud_timer_ms,
        state.tuning.cloud_interval_ms,
        dt_ms,
    );
    for _ in 0..cloud_due {
        spawn_clouds(
            &mut state.rng,
            &mut state.clouds,
            state.width,
            state.tuning.cloud_speed,
        );
    }

    let item_due = accumulate(
        &mut state.item_timer_ms,
        state.tuning.item_interval_ms,
        dt_ms,
    );
    for _ in 0..item_due {
        spawn_item(
            &mut state.rng,
            &mut state.items,
            state.width,
            state.height,
            state.tuning.item_chance,
        );
    }
}

/// Add `dt` to `timer` and return how many whole intervals elapsed.
/// A zero interval disables the spawner.
fn accumulate(timer: &mut f32, interval: f32, dt_ms: f32) -> u32 {
    if interval <= 0.0 {
        return 0;
    }
    *timer += dt_ms;
    let mut due = 0;
    while *timer >= interval {
        *timer -= interval;
        due += 1;
    }
    due
}

fn advance_obstacles(state: &mut GameState, dt_ms: f32) {
    let player_x = state.player.x;
    let mut scored = 0;
    for obstacle in state.obstacles.iter_mut() {
        obstacle.advance(dt_ms);
        if !obstacle.passed && obstacle.trailing_edge() < player_x {
            obstacle.passed = true;
            scored += 1;
        }
    }
    state.obstacles.retain(|o| o.trailing_edge() >= 0.0);

    for _ in 0..scored {
        state.score += 1;
        state.events.push(GameEvent::Scored { score: state.score });
    }
}

fn advance_clouds_and_items(state: &mut GameState, dt_ms: f32) {
    let dt = dt_ms / 1000.0;
    for cloud in state.clouds.iter_mut() {
        cloud.x -= cloud.speed * dt;
    }
    state.clouds.retain(|c| c.x + c.width >= 0.0);

    let shift = state.tuning.obstacle_speed * dt;
    let spin = 0.1 * frame_scale(dt_ms);
    state.items.retain(|item| !item.collected);
    for item in state.items.iter_mut() {
        item.x -= shift;
        item.animation += spin;
    }
    state.items.retain(|item| item.x + item.width >= 0.0);
}

/// Cloud contact drives the fog and the lost-in-cloud timeout
fn update_fog(state: &mut GameState, dt_ms: f32) -> Option<GameOverReason> {
    if in_cloud(&state.player, &state.clouds) {
        state.fog = 1.0;
        state.fog_timer_ms = state.tuning.fog_hold_ms;
        state.cloud_contact_ms += dt_ms;
        if state.cloud_contact_ms >= state.tuning.cloud_hazard_ms {
            return Some(GameOverReason::LostInCloud);
        }
    } else {
        state.cloud_contact_ms = 0.0;
        if state.fog_timer_ms > 0.0 {
            state.fog_timer_ms = (state.fog_timer_ms - dt_ms).max(0.0);
            state.fog = 1.0;
        } else {
            let decay = state.tuning.fog_decay_per_frame * frame_scale(dt_ms);
            state.fog = (state.fog - decay).max(0.0);
        }
    }
    None
}

fn collect_items(state: &mut GameState) {
    while let Some(index) = touched_item(&state.player, &state.items) {
        state.items[index].collected = true;
        state.invincible = true;
        state.invincible_ms = state.tuning.invincible_ms;
        let center = state.player.center();
        emit_sparkles(&mut state.rng, &mut state.particles, center);
        state.events.push(GameEvent::ItemCollected);
        log::info!("Invincibility for {} ms", state.invincible_ms);
    }
}

fn game_over(state: &mut GameState, reason: GameOverReason) {
    state.phase = GamePhase::GameOver;
    state.game_over_reason = Some(reason);
    let center = state.player.center();
    emit_explosion(&mut state.rng, &mut state.particles, center);
    state.events.push(GameEvent::GameOver {
        score: state.score,
        reason,
    });
    log::info!("Game over ({:?}) with score {}", reason, state.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rgb;
    use crate::sim::state::{Cloud, Item, Obstacle, ObstacleKind};
    use crate::tuning::Tuning;

    fn quiet_state() -> GameState {
        let mut state = GameState::new(1, 800.0, 400.0, Tuning::without_spawners());
        state.start();
        state
    }

    #[test]
    fn test_ready_waits_for_thrust() {
        let mut state = GameState::new(1, 800.0, 400.0, Tuning::default());
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.player.y, crate::consts::PLAYER_START_Y);

        tick(&mut state, &TickInput { thrust: true }, 16.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.player.y < crate::consts::PLAYER_START_Y);
    }

    #[test]
    fn test_thrust_direction_and_gas() {
        let mut state = quiet_state();
        tick(&mut state, &TickInput { thrust: true }, 20.0);
        assert!((state.player.y - 128.0).abs() < 1e-3);
        assert!(!state.particles.is_empty());

        tick(&mut state, &TickInput::default(), 20.0);
        assert!((state.player.y - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_gas_rate_ignores_refresh_rate() {
        let puffs_at = |frame_ms: f32, frames: usize| {
            let mut state = quiet_state();
            state.player.y = 10_000.0;
            state.height = 20_000.0;
            for _ in 0..frames {
                tick(&mut state, &TickInput { thrust: true }, frame_ms);
            }
            state.gas_puffs
        };
        // Two seconds of thrust at 144 Hz, 60 Hz and 30 Hz
        let fast = puffs_at(1000.0 / 144.0, 288);
        let normal = puffs_at(1000.0 / 60.0, 120);
        let slow = puffs_at(1000.0 / 30.0, 60);
        for puffs in [fast, normal, slow] {
            assert!((119..=120).contains(&puffs), "{puffs} puffs");
        }
    }

    #[test]
    fn test_accumulate() {
        let mut timer = 0.0;
        assert_eq!(accumulate(&mut timer, 1000.0, 600.0), 0);
        assert_eq!(accumulate(&mut timer, 1000.0, 600.0), 1);
        assert!((timer - 200.0).abs() < 1e-3);
        assert_eq!(accumulate(&mut timer, 1000.0, 2000.0), 2);
        assert_eq!(accumulate(&mut timer, 0.0, 5000.0), 0);
    }

    #[test]
    fn test_obstacles_spawn_each_second() {
        let mut state = GameState::new(3, 800.0, 400.0, Tuning::default());
        state.start();
        for _ in 0..59 {
            tick(&mut state, &TickInput::default(), 16.0);
        }
        assert!(state.obstacles.is_empty());
        tick(&mut state, &TickInput::default(), 60.0);
        assert!(!state.obstacles.is_empty());
        assert!(!state.clouds.is_empty());
    }

    #[test]
    fn test_item_grants_invincibility() {
        let mut state = quiet_state();
        state.items.push(Item::new(102.0, 205.0));
        tick(&mut state, &TickInput::default(), 1.0);
        assert!(state.invincible);
        assert!(state.items[0].collected);
        assert_eq!(
            state
                .particles
                .iter()
                .filter(|p| p.kind == crate::sim::particles::ParticleKind::InvincibleSparkle)
                .count(),
            15
        );
        assert!(state.events.contains(&GameEvent::ItemCollected));

        // Collected items are removed on the next tick
        tick(&mut state, &TickInput::default(), 1.0);
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_invincibility_expires() {
        let mut state = quiet_state();
        state.invincible = true;
        state.invincible_ms = 50.0;
        for _ in 0..3 {
            tick(&mut state, &TickInput { thrust: true }, 20.0);
            tick(&mut state, &TickInput::default(), 20.0);
        }
        assert!(!state.invincible);
    }

    #[test]
    fn test_collision_ends_run_with_explosion() {
        let mut state = quiet_state();
        state.obstacles.push(Obstacle::rect(
            1,
            ObstacleKind::Cactus,
            95.0,
            190.0,
            30.0,
            40.0,
            Rgb(0, 0, 0),
            300.0,
        ));
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.game_over_reason, Some(GameOverReason::Collision));
        assert_eq!(state.particles.len(), 15);

        // Frozen except for particles
        let y = state.player.y;
        tick(&mut state, &TickInput { thrust: true }, 16.0);
        assert_eq!(state.player.y, y);
    }

    #[test]
    fn test_fog_hold_then_decay() {
        let mut state = quiet_state();
        state.clouds.push(Cloud {
            x: 90.0,
            y: 190.0,
            width: 40.0,
            height: 40.0,
            opacity: 1.0,
            speed: 0.0,
        });
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.fog, 1.0);
        assert!(state.cloud_contact_ms > 0.0);

        state.clouds.clear();
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.cloud_contact_ms, 0.0);
        assert_eq!(state.fog, 1.0);

        state.fog_timer_ms = 0.0;
        tick(&mut state, &TickInput::default(), crate::consts::REFERENCE_FRAME_MS);
        assert!((state.fog - 0.94).abs() < 1e-4);
    }
}

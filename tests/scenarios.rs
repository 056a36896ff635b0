//! End-to-end gameplay scenarios

use std::rc::Rc;

use desert_flight::Rgb;
use desert_flight::persistence::{MemoryStorage, Storage};
use desert_flight::renderer::{Recorder, RenderOptions, render};
use desert_flight::services::{LocalScoreService, SubmitOutcome};
use desert_flight::sim::{
    Cloud, GameEvent, GameOverReason, GamePhase, GameState, Item, Obstacle, ObstacleKind,
    TickInput, check_collision, tick,
};
use desert_flight::{Session, Settings, Tuning};

const STEP: f32 = 16.0;

fn running(tuning: Tuning) -> GameState {
    let mut state = GameState::new(11, 800.0, 400.0, tuning);
    state.start();
    state.drain_events();
    state
}

fn input(thrust: bool) -> TickInput {
    TickInput { thrust }
}

#[test]
fn gap_obstacle_is_flown_through() {
    let mut state = running(Tuning::without_spawners());
    state.player.y = 150.0;
    state.obstacles.push(Obstacle::columns(
        1,
        ObstacleKind::Normal,
        800.0,
        30.0,
        100.0,
        240.0,
        160.0,
        Rgb::hex(0x8D6E63),
        300.0,
    ));

    // Bob between 150 and 207.6, well inside the 100..240 gap
    for frame in 0..200 {
        tick(&mut state, &input(frame % 2 == 1), STEP);
        assert_eq!(state.phase, GamePhase::Running, "crashed on frame {frame}");
    }

    assert_eq!(state.score, 1);
    assert!(state.obstacles.iter().all(|o| o.passed));
    let scored: Vec<_> = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::Scored { .. }))
        .collect();
    assert_eq!(scored, [GameEvent::Scored { score: 1 }]);
}

#[test]
fn overlapping_obstacle_ends_the_run() {
    let mut state = running(Tuning::without_spawners());
    state.obstacles.push(Obstacle::rect(
        1,
        ObstacleKind::Floating,
        95.0,
        190.0,
        40.0,
        40.0,
        Rgb::hex(0x795548),
        300.0,
    ));
    assert!(!state.invincible);
    assert!(check_collision(&state));

    tick(&mut state, &input(false), 1.0);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.game_over_reason, Some(GameOverReason::Collision));
    assert!(!state.particles.is_empty());
}

fn fog_bank() -> Cloud {
    Cloud {
        x: 0.0,
        y: 0.0,
        width: 400.0,
        height: 400.0,
        opacity: 0.8,
        speed: 0.0,
    }
}

#[test]
fn lingering_in_cloud_is_fatal() {
    let mut state = running(Tuning::without_spawners());
    state.clouds.push(fog_bank());
    let limit = state.tuning.cloud_hazard_ms;

    let mut elapsed = 0.0;
    while elapsed + STEP < limit {
        tick(&mut state, &input(false), STEP);
        elapsed += STEP;
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.fog, 1.0);
    }

    tick(&mut state, &input(false), STEP);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.game_over_reason, Some(GameOverReason::LostInCloud));
}

#[test]
fn leaving_the_cloud_resets_the_hazard() {
    let mut state = running(Tuning::without_spawners());
    let limit = state.tuning.cloud_hazard_ms;
    let half = (limit / STEP / 2.0).ceil() as usize + 5;

    state.clouds.push(fog_bank());
    for _ in 0..half {
        tick(&mut state, &input(false), STEP);
    }
    assert!(state.cloud_contact_ms > 0.0);

    let bank = state.clouds.pop().unwrap();
    tick(&mut state, &input(false), STEP);
    assert_eq!(state.cloud_contact_ms, 0.0);
    // Fog lingers after leaving
    assert_eq!(state.fog, 1.0);

    state.clouds.push(bank);
    for _ in 0..half {
        tick(&mut state, &input(false), STEP);
    }
    assert_eq!(state.phase, GamePhase::Running);
}

#[test]
fn restart_resets_the_run() {
    let mut state = running(Tuning::default());
    state.score = 12;
    state.items.push(Item::new(600.0, 100.0));
    state.obstacles.push(Obstacle::rect(
        1,
        ObstacleKind::Floating,
        90.0,
        0.0,
        40.0,
        400.0,
        Rgb::hex(0x795548),
        300.0,
    ));
    tick(&mut state, &input(true), STEP);
    assert_eq!(state.phase, GamePhase::GameOver);

    state.restart();
    assert_eq!(state.phase, GamePhase::Running);
    assert_eq!(state.score, 0);
    assert!(state.obstacles.is_empty());
    assert!(state.items.is_empty());
    assert!(state.particles.is_empty());
    assert!(state.trail.is_empty());
    assert_eq!(state.player.y, desert_flight::consts::PLAYER_START_Y);
    assert_eq!(state.elapsed_ms, 0.0);
}

/// Count obstacle spawns over `total_ms` at a fixed frame length
fn spawns_at(frame_ms: f32, total_ms: f32) -> u32 {
    let tuning = Tuning {
        cloud_interval_ms: 0.0,
        item_interval_ms: 0.0,
        ..Tuning::default()
    };
    let mut state = running(tuning);
    state.invincible = true;
    state.invincible_ms = f32::MAX;

    let mut spawns = 0;
    let mut elapsed = 0.0;
    let mut previous = state.obstacle_timer_ms;
    while elapsed < total_ms {
        tick(&mut state, &input(false), frame_ms);
        elapsed += frame_ms;
        if state.obstacle_timer_ms < previous {
            spawns += 1;
        }
        previous = state.obstacle_timer_ms;
    }
    assert_eq!(state.phase, GamePhase::Running);
    spawns
}

#[test]
fn arrival_rate_ignores_refresh_rate() {
    let slow = spawns_at(1000.0 / 30.0, 10_050.0);
    let fast = spawns_at(1000.0 / 144.0, 10_050.0);
    assert_eq!(slow, 10);
    assert_eq!(fast, 10);
}

#[test]
fn rendering_leaves_state_untouched() {
    let mut state = running(Tuning::default());
    for frame in 0..120 {
        tick(&mut state, &input(frame % 3 == 0), STEP);
    }
    state.fog = 0.6;
    let before = format!("{state:?}");

    let mut rec = Recorder::new();
    render(&state, &mut rec, &RenderOptions::default());
    render(&state, &mut rec, &RenderOptions::default());

    assert_eq!(format!("{state:?}"), before);
    assert!(rec.is_balanced());
}

#[test]
fn finished_run_updates_the_local_record() {
    let storage: Rc<dyn Storage> = Rc::new(MemoryStorage::new());
    let service = LocalScoreService::new(storage.clone());
    let mut session = Session::new(
        3,
        800.0,
        400.0,
        Tuning::without_spawners(),
        Settings::default(),
    );

    for score in [8, 5] {
        session.state.start();
        session.state.score = score;
        session.state.obstacles.push(Obstacle::rect(
            1,
            ObstacleKind::Cactus,
            95.0,
            190.0,
            40.0,
            40.0,
            Rgb::hex(0x2E7D32),
            300.0,
        ));
        session.step(1.0);
        let ticket = session.take_report().expect("game over owes a report");
        let run = session
            .complete_report(ticket, Ok(service.record(ticket.score)))
            .expect("current generation");
        assert_eq!(run.best_score, 8);
        session.restart();
    }

    let best = service.best();
    assert_eq!(best.best_score, 8);
    assert_eq!(best.total_games, 2);
    assert_eq!(session.best(), best);
}

#[test]
fn account_record_stays_out_of_guest_cache() {
    let storage: Rc<dyn Storage> = Rc::new(MemoryStorage::new());
    let guest = LocalScoreService::new(storage.clone());
    guest.record(8);

    let mut session = Session::new(
        4,
        800.0,
        400.0,
        Tuning::without_spawners(),
        Settings::default(),
    );
    session.set_best(guest.best());
    session.state.start();
    session.state.score = 500;
    session.state.obstacles.push(Obstacle::rect(
        1,
        ObstacleKind::Floating,
        95.0,
        190.0,
        40.0,
        40.0,
        Rgb::hex(0x795548),
        300.0,
    ));
    session.step(1.0);

    // Signed-in runs are settled by the server only
    let ticket = session.take_report().expect("game over owes a report");
    let run = session
        .complete_report(
            ticket,
            Ok(SubmitOutcome {
                is_new_record: true,
                best_score: 500,
            }),
        )
        .expect("current generation");
    assert_eq!(run.best_score, 500);

    let cached = guest.best();
    assert_eq!(cached.best_score, 8);
    assert_eq!(cached.total_games, 1);
}

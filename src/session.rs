//! Session controller
//!
//! Owns one `GameState` plus everything around a run: frame timing, held
//! input, the score report for a finished run and the leaderboard shown on
//! the game-over panel. Async service calls are issued with a ticket that
//! carries the session generation; results for an older generation (the
//! player restarted meanwhile) are dropped.

use crate::highscores::{BestScore, LeaderboardEntry};
use crate::platform::{FrameClock, ThrustInput, playfield_for_viewport};
use crate::services::{ServiceError, SubmitOutcome};
use crate::settings::{PlayerColor, Settings};
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Score report owed for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreTicket {
    pub generation: u64,
    pub score: u64,
}

/// Pending leaderboard fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardTicket {
    pub generation: u64,
}

/// What the game-over panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub score: u64,
    pub is_new_record: bool,
    pub best_score: u64,
}

pub struct Session {
    pub state: GameState,
    pub input: ThrustInput,
    clock: FrameClock,
    tuning: Tuning,
    settings: Settings,
    generation: u64,
    best: BestScore,
    pending_report: Option<ScoreTicket>,
    last_result: Option<RunResult>,
    leaderboard: Vec<LeaderboardEntry>,
}

impl Session {
    pub fn new(seed: u64, width: f32, height: f32, tuning: Tuning, settings: Settings) -> Self {
        let mut effective = tuning.clone();
        settings.apply_to(&mut effective);
        let mut state = GameState::new(seed, width, height, effective);
        state.player.color = settings.player_color.rgb();

        Self {
            state,
            input: ThrustInput::default(),
            clock: FrameClock::new(),
            tuning,
            settings,
            generation: 0,
            best: BestScore::default(),
            pending_report: None,
            last_result: None,
            leaderboard: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap settings; caps apply immediately
    pub fn set_settings(&mut self, settings: Settings) {
        let mut effective = self.tuning.clone();
        settings.apply_to(&mut effective);
        self.state.tuning = effective;
        self.state.player.color = settings.player_color.rgb();
        self.settings = settings;
    }

    /// Switch the player color by name. Unknown names leave it unchanged.
    pub fn change_character(&mut self, name: &str) -> Option<PlayerColor> {
        let Some(color) = PlayerColor::from_name(name) else {
            log::warn!("Unknown character '{}'", name);
            return None;
        };
        let settings = Settings {
            player_color: color,
            ..self.settings.clone()
        };
        self.set_settings(settings);
        log::info!("Character changed to {}", color.as_str());
        Some(color)
    }

    /// Seed the cached record shown before any report completes
    pub fn set_best(&mut self, best: BestScore) {
        self.best = best;
    }

    pub fn best(&self) -> BestScore {
        self.best
    }

    pub fn last_result(&self) -> Option<RunResult> {
        self.last_result
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    /// Display rank of `username` on the fetched board
    pub fn rank_label(&self, username: &str) -> String {
        self.leaderboard
            .iter()
            .find(|e| e.username == username)
            .map(|e| format!("#{}", e.rank))
            .unwrap_or_else(|| "Unranked".to_string())
    }

    /// Advance by wall-clock time
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let dt = self.clock.delta(now_ms);
        self.step(dt)
    }

    /// Advance by an explicit delta
    pub fn step(&mut self, dt_ms: f32) -> Vec<GameEvent> {
        let input = TickInput {
            thrust: self.input.is_held(),
        };
        tick(&mut self.state, &input, dt_ms);

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::GameOver { score, .. } = *event {
                self.pending_report = Some(ScoreTicket {
                    generation: self.generation,
                    score,
                });
            }
        }
        events
    }

    /// Report owed for the run that just ended
    pub fn take_report(&mut self) -> Option<ScoreTicket> {
        self.pending_report.take()
    }

    /// Apply a score report result. Stale tickets are ignored; failures
    /// degrade to the cached best.
    pub fn complete_report(
        &mut self,
        ticket: ScoreTicket,
        result: Result<SubmitOutcome, ServiceError>,
    ) -> Option<RunResult> {
        if ticket.generation != self.generation {
            log::debug!(
                "Dropping score report from generation {} (now {})",
                ticket.generation,
                self.generation
            );
            return None;
        }

        let run = match result {
            Ok(outcome) => {
                self.best.total_games = self.best.total_games.saturating_add(1);
                self.best.best_score = self.best.best_score.max(outcome.best_score);
                if outcome.is_new_record {
                    self.best.best_score = self.best.best_score.max(ticket.score);
                    log::info!("New record: {}", ticket.score);
                }
                RunResult {
                    score: ticket.score,
                    is_new_record: outcome.is_new_record,
                    best_score: self.best.best_score,
                }
            }
            Err(e) => {
                log::warn!("Score report failed: {}", e);
                RunResult {
                    score: ticket.score,
                    is_new_record: false,
                    best_score: self.best.best_score,
                }
            }
        };
        self.last_result = Some(run);
        Some(run)
    }

    pub fn request_leaderboard(&self) -> LeaderboardTicket {
        LeaderboardTicket {
            generation: self.generation,
        }
    }

    /// Apply a leaderboard fetch. Returns whether the board changed.
    pub fn complete_leaderboard(
        &mut self,
        ticket: LeaderboardTicket,
        result: Result<Vec<LeaderboardEntry>, ServiceError>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!("Dropping stale leaderboard");
            return false;
        }
        match result {
            Ok(rows) => self.leaderboard = rows,
            Err(e) => {
                log::warn!("Leaderboard fetch failed: {}", e);
                self.leaderboard.clear();
            }
        }
        true
    }

    /// Fresh run: new generation, cleared input and time anchor
    pub fn restart(&mut self) {
        self.generation += 1;
        self.state.restart();
        self.input.clear();
        self.clock.reset();
        self.pending_report = None;
        self.last_result = None;
        log::info!("Restarted (generation {})", self.generation);
    }

    /// Restart only from the game-over screen
    pub fn restart_if_over(&mut self) -> bool {
        if self.state.phase == GamePhase::GameOver {
            self.restart();
            true
        } else {
            false
        }
    }

    /// Recompute the playfield for a viewport width and force a restart
    pub fn resize(&mut self, viewport_width: f32) -> (f32, f32) {
        let (width, height) = playfield_for_viewport(viewport_width);
        self.state.resize(width, height);
        self.restart();
        (width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::InputSource;
    use crate::sim::{GameOverReason, Obstacle, ObstacleKind};
    use crate::Rgb;

    fn session() -> Session {
        Session::new(
            5,
            800.0,
            400.0,
            Tuning::without_spawners(),
            Settings::default(),
        )
    }

    fn crash(session: &mut Session) -> ScoreTicket {
        session.state.start();
        session.state.score = 7;
        session.state.obstacles.push(Obstacle::rect(
            1,
            ObstacleKind::Cactus,
            90.0,
            180.0,
            40.0,
            60.0,
            Rgb(0, 0, 0),
            300.0,
        ));
        let events = session.step(1.0);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver {
                reason: GameOverReason::Collision,
                ..
            }
        )));
        session.take_report().expect("report owed")
    }

    #[test]
    fn test_game_over_issues_single_report() {
        let mut s = session();
        let ticket = crash(&mut s);
        assert_eq!(ticket.score, 7);
        assert_eq!(ticket.generation, 0);
        assert!(s.take_report().is_none());
    }

    #[test]
    fn test_report_updates_best() {
        let mut s = session();
        s.set_best(BestScore {
            best_score: 3,
            total_games: 1,
        });
        let ticket = crash(&mut s);
        let run = s
            .complete_report(
                ticket,
                Ok(SubmitOutcome {
                    is_new_record: true,
                    best_score: 7,
                }),
            )
            .unwrap();
        assert!(run.is_new_record);
        assert_eq!(s.best().best_score, 7);
        assert_eq!(s.best().total_games, 2);
    }

    #[test]
    fn test_failed_report_falls_back() {
        let mut s = session();
        s.set_best(BestScore {
            best_score: 20,
            total_games: 4,
        });
        let ticket = crash(&mut s);
        let run = s
            .complete_report(ticket, Err(ServiceError::Network("offline".into())))
            .unwrap();
        assert!(!run.is_new_record);
        assert_eq!(run.best_score, 20);
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut s = session();
        let ticket = crash(&mut s);
        let board = s.request_leaderboard();
        assert!(s.restart_if_over());

        let outcome = Ok(SubmitOutcome {
            is_new_record: true,
            best_score: 7,
        });
        assert!(s.complete_report(ticket, outcome).is_none());
        assert_eq!(s.best(), BestScore::default());

        let rows = vec![LeaderboardEntry {
            rank: 1,
            username: "amy".into(),
            score: 9,
        }];
        assert!(!s.complete_leaderboard(board, Ok(rows)));
        assert!(s.leaderboard().is_empty());
    }

    #[test]
    fn test_restart_only_when_over() {
        let mut s = session();
        s.state.start();
        assert!(!s.restart_if_over());
        assert_eq!(s.generation(), 0);
    }

    #[test]
    fn test_restart_clears_input() {
        let mut s = session();
        s.input.press(InputSource::Keyboard);
        crash(&mut s);
        s.restart();
        assert!(!s.input.is_held());
        assert_eq!(s.state.score, 0);
        assert!(s.state.obstacles.is_empty());
    }

    #[test]
    fn test_resize_restarts_on_new_playfield() {
        let mut s = session();
        assert_eq!(s.resize(600.0), (400.0, 300.0));
        assert_eq!(s.state.width, 400.0);
        assert_eq!(s.state.phase, GamePhase::Running);
        assert_eq!(s.generation(), 1);
    }

    #[test]
    fn test_rank_label() {
        let mut s = session();
        let ticket = s.request_leaderboard();
        let rows = vec![LeaderboardEntry {
            rank: 3,
            username: "amy".into(),
            score: 9,
        }];
        assert!(s.complete_leaderboard(ticket, Ok(rows)));
        assert_eq!(s.rank_label("amy"), "#3");
        assert_eq!(s.rank_label("bo"), "Unranked");
    }

    #[test]
    fn test_change_character() {
        let mut s = session();
        s.state.start();
        assert_eq!(s.change_character("Blue"), Some(PlayerColor::Blue));
        assert_eq!(s.settings().player_color, PlayerColor::Blue);
        assert_eq!(s.state.player.color, PlayerColor::Blue.rgb());
        // Mid-run change keeps the run going
        assert_eq!(s.state.phase, GamePhase::Running);

        assert_eq!(s.change_character("purple"), None);
        assert_eq!(s.settings().player_color, PlayerColor::Blue);
    }
}

//! Best score and leaderboard ranking
//!
//! `BestScore` is the client-side cache of the player's record and games
//! played. `Leaderboard` ranks submitted scores the same way the server does.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KEY_BEST, Storage};

/// Number of leaderboard rows shown
pub const LEADERBOARD_SIZE: usize = 10;

/// Cached personal record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BestScore {
    pub best_score: u64,
    pub total_games: u32,
}

impl BestScore {
    /// Count a finished game. The games counter always advances; the best
    /// score only moves on improvement. Returns whether this is a new record.
    pub fn record_game(&mut self, score: u64) -> bool {
        self.total_games = self.total_games.saturating_add(1);
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    pub fn load(storage: &dyn Storage) -> Self {
        persistence::load_json(storage, KEY_BEST).unwrap_or_default()
    }

    pub fn save(&self, storage: &dyn Storage) {
        persistence::save_json(storage, KEY_BEST, self);
    }
}

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-indexed
    pub rank: u32,
    pub username: String,
    pub score: u64,
}

/// Each user's best score, ranked descending; ties keep arrival order
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    rows: Vec<(String, u64)>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `score` for `username`. Only an improvement moves an existing
    /// user; the new position goes after every equal score already present.
    /// Returns whether the user's best changed.
    pub fn submit(&mut self, username: &str, score: u64) -> bool {
        if let Some(pos) = self.rows.iter().position(|(name, _)| name == username) {
            if score <= self.rows[pos].1 {
                return false;
            }
            self.rows.remove(pos);
        }
        let at = self
            .rows
            .iter()
            .position(|(_, s)| score > *s)
            .unwrap_or(self.rows.len());
        self.rows.insert(at, (username.to_string(), score));
        true
    }

    /// Top `n` rows with ranks
    pub fn top(&self, n: usize) -> Vec<LeaderboardEntry> {
        self.rows
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, (username, score))| LeaderboardEntry {
                rank: i as u32 + 1,
                username: username.clone(),
                score: *score,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_games_always_counted_best_only_on_improvement() {
        let mut best = BestScore::default();
        assert!(best.record_game(10));
        assert!(!best.record_game(5));
        assert!(!best.record_game(10));
        assert!(best.record_game(11));
        assert_eq!(best.total_games, 4);
        assert_eq!(best.best_score, 11);
    }

    #[test]
    fn test_best_persists() {
        let storage = MemoryStorage::new();
        assert_eq!(BestScore::load(&storage), BestScore::default());
        let best = BestScore {
            best_score: 42,
            total_games: 3,
        };
        best.save(&storage);
        assert_eq!(BestScore::load(&storage), best);
        assert!(storage.get(KEY_BEST).unwrap().contains("bestScore"));
    }

    #[test]
    fn test_leaderboard_order_and_ties() {
        let mut board = Leaderboard::new();
        board.submit("amy", 30);
        board.submit("bo", 50);
        board.submit("cy", 30);
        board.submit("di", 10);

        let top = board.top(LEADERBOARD_SIZE);
        let names: Vec<&str> = top.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["bo", "amy", "cy", "di"]);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[3].rank, 4);
    }

    #[test]
    fn test_leaderboard_keeps_user_best() {
        let mut board = Leaderboard::new();
        assert!(board.submit("amy", 30));
        assert!(!board.submit("amy", 20));
        assert!(board.submit("amy", 40));
        assert_eq!(board.len(), 1);
        assert_eq!(board.top(1)[0].score, 40);
    }

    #[test]
    fn test_top_truncates() {
        let mut board = Leaderboard::new();
        for i in 0..15u64 {
            board.submit(&format!("p{i}"), i);
        }
        let top = board.top(LEADERBOARD_SIZE);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].score, 14);
        assert_eq!(top[9].score, 5);
        assert_eq!(board.len(), 15);
    }
}

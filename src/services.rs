//! Score reporting and leaderboard services
//!
//! The game only needs two calls: submit a finished score and fetch the top
//! scores. Both have a local implementation backed by client storage and,
//! on wasm, an HTTP implementation talking to the score server.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::highscores::LeaderboardEntry;
use crate::highscores::{BestScore, Leaderboard};
use crate::persistence::Storage;

/// Failures at the service boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("not signed in")]
    Unauthenticated,
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("invalid score {0}: must be a non-negative integer")]
    InvalidScore(i64),
}

/// Result of reporting a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub is_new_record: bool,
    pub best_score: u64,
}

/// Reject scores the server would refuse
pub fn validate_score(raw: i64) -> Result<u64, ServiceError> {
    u64::try_from(raw).map_err(|_| ServiceError::InvalidScore(raw))
}

/// Where finished games are reported
#[allow(async_fn_in_trait)]
pub trait ScoreService {
    async fn submit_score(&self, score: u64) -> Result<SubmitOutcome, ServiceError>;
}

/// Where the top scores come from
#[allow(async_fn_in_trait)]
pub trait LeaderboardService {
    async fn top_scores(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ServiceError>;
}

/// Best score and games played kept in client storage
pub struct LocalScoreService {
    storage: Rc<dyn Storage>,
}

impl LocalScoreService {
    pub fn new(storage: Rc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Synchronous form of [`ScoreService::submit_score`]
    pub fn record(&self, score: u64) -> SubmitOutcome {
        let mut best = BestScore::load(self.storage.as_ref());
        let is_new_record = best.record_game(score);
        best.save(self.storage.as_ref());
        if is_new_record {
            log::info!("New local record: {}", score);
        }
        SubmitOutcome {
            is_new_record,
            best_score: best.best_score,
        }
    }

    pub fn best(&self) -> BestScore {
        BestScore::load(self.storage.as_ref())
    }
}

impl ScoreService for LocalScoreService {
    async fn submit_score(&self, score: u64) -> Result<SubmitOutcome, ServiceError> {
        Ok(self.record(score))
    }
}

/// In-process leaderboard with the server's ranking rule
#[derive(Default)]
pub struct LocalLeaderboard {
    board: RefCell<Leaderboard>,
}

impl LocalLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&self, username: &str, score: u64) -> bool {
        self.board.borrow_mut().submit(username, score)
    }

    pub fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.board.borrow().top(limit)
    }
}

impl LeaderboardService for LocalLeaderboard {
    async fn top_scores(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        Ok(self.top(limit))
    }
}

// === Wire format ===

#[derive(Debug, Serialize)]
struct SubmitRequest {
    score: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    is_new_record: bool,
    #[serde(default)]
    best_score: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct LeaderboardResponse {
    leaderboard: Vec<LeaderboardEntry>,
}

/// Request body for `POST /api/scores`
pub fn encode_submit(score: u64) -> String {
    // Serializing a single integer field cannot fail
    serde_json::to_string(&SubmitRequest { score }).unwrap_or_else(|_| format!("{{\"score\":{score}}}"))
}

/// Decode a submit response. Servers that omit `bestScore` imply it from
/// the record flag; 0 means "unknown" and the caller keeps its cached best.
pub fn decode_submit(body: &str, score: u64) -> Result<SubmitOutcome, ServiceError> {
    let resp: SubmitResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;
    let best_score = match resp.best_score {
        Some(raw) => validate_score(raw)?,
        None if resp.is_new_record => score,
        None => 0,
    };
    Ok(SubmitOutcome {
        is_new_record: resp.is_new_record,
        best_score,
    })
}

/// Decode a leaderboard response, ordered by rank
pub fn decode_leaderboard(body: &str) -> Result<Vec<LeaderboardEntry>, ServiceError> {
    let resp: LeaderboardResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;
    let mut rows = resp.leaderboard;
    rows.sort_by_key(|e| e.rank);
    Ok(rows)
}

#[cfg(target_arch = "wasm32")]
pub use http::HttpScoreClient;

#[cfg(target_arch = "wasm32")]
mod http {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::*;
    use crate::persistence::KEY_AUTH_TOKEN;

    fn js_error(e: JsValue) -> ServiceError {
        ServiceError::Network(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
    }

    /// Score server client using `fetch`
    pub struct HttpScoreClient {
        base_url: String,
        token: Option<String>,
    }

    impl HttpScoreClient {
        pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
            Self {
                base_url: base_url.into(),
                token,
            }
        }

        /// Pick up the cached bearer credential
        pub fn from_storage(base_url: impl Into<String>, storage: &dyn Storage) -> Self {
            Self::new(base_url, storage.get(KEY_AUTH_TOKEN))
        }

        pub fn is_authenticated(&self) -> bool {
            self.token.is_some()
        }

        async fn send(&self, request: Request) -> Result<String, ServiceError> {
            let window = web_sys::window()
                .ok_or_else(|| ServiceError::Network("no window".to_string()))?;
            let value = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(js_error)?;
            let response: Response = value
                .dyn_into()
                .map_err(|_| ServiceError::Decode("fetch did not return a Response".to_string()))?;

            match response.status() {
                401 | 403 => return Err(ServiceError::Unauthenticated),
                s if !response.ok() => return Err(ServiceError::Status(s)),
                _ => {}
            }

            let text = JsFuture::from(response.text().map_err(js_error)?)
                .await
                .map_err(js_error)?;
            text.as_string()
                .ok_or_else(|| ServiceError::Decode("body is not text".to_string()))
        }
    }

    impl ScoreService for HttpScoreClient {
        async fn submit_score(&self, score: u64) -> Result<SubmitOutcome, ServiceError> {
            let token = self.token.as_ref().ok_or(ServiceError::Unauthenticated)?;

            let opts = RequestInit::new();
            opts.set_method("POST");
            opts.set_mode(RequestMode::Cors);
            opts.set_body(&JsValue::from_str(&encode_submit(score)));

            let url = format!("{}/api/scores", self.base_url);
            let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
            let headers = request.headers();
            headers
                .set("Content-Type", "application/json")
                .map_err(js_error)?;
            headers
                .set("Authorization", &format!("Bearer {}", token))
                .map_err(js_error)?;

            let body = self.send(request).await?;
            decode_submit(&body, score)
        }
    }

    impl LeaderboardService for HttpScoreClient {
        async fn top_scores(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ServiceError> {
            let opts = RequestInit::new();
            opts.set_method("GET");
            opts.set_mode(RequestMode::Cors);

            let url = format!("{}/api/scores/leaderboard?limit={}", self.base_url, limit);
            let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
            let body = self.send(request).await?;
            decode_leaderboard(&body)
        }
    }
}

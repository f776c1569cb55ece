//! Manager module - owned home of the oracle connection handles.
//!
//! One manager owns the suggest channel, the move channel, and the training
//! stream factory. No other component holds a connection reference, so there
//! can never be a duplicate connection or a use-after-close. Requests are
//! fire-and-forget: a spawned task carries the call and completes a oneshot
//! slot, so no caller ever stays borrowed across the oracle await. Every
//! failure mode (connect error, timeout, malformed payload, closed channel)
//! collapses to a no-answer outcome here and never escapes as a fault.

use std::time::Duration;

use tokio::sync::oneshot;

use crate::core::snapshot::GameSnapshot;
use crate::oracle::channel::RequestChannel;
use crate::oracle::protocol::{
    MoveRequest, MoveResponse, OracleMove, OracleSuggestion, SuggestionResponse, TrainingRequest,
};
use crate::oracle::training::TrainingStream;

/// Oracle endpoints and timing knobs.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub suggest_addr: String,
    pub move_addr: String,
    pub training_addr: String,
    /// Bound on every request/response call (milliseconds).
    pub request_timeout_ms: u64,
    /// Minimum visible delay before each autonomous placement (milliseconds).
    pub think_time_ms: u64,
    /// When set, every oracle call resolves to no-answer without connecting.
    pub disabled: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            suggest_addr: "127.0.0.1:8765".to_string(),
            move_addr: "127.0.0.1:8766".to_string(),
            training_addr: "127.0.0.1:8767".to_string(),
            request_timeout_ms: 5000,
            think_time_ms: 120,
            disabled: false,
        }
    }
}

impl OracleConfig {
    /// Create from environment variables, falling back to the defaults.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let suggest_addr = env::var("ORACLE_SUGGEST_ADDR").unwrap_or(defaults.suggest_addr);
        let move_addr = env::var("ORACLE_MOVE_ADDR").unwrap_or(defaults.move_addr);
        let training_addr = env::var("ORACLE_TRAINING_ADDR").unwrap_or(defaults.training_addr);
        let request_timeout_ms = env::var("ORACLE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.request_timeout_ms);
        let think_time_ms = env::var("ORACLE_THINK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.think_time_ms);
        let disabled = env::var("ORACLE_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            suggest_addr,
            move_addr,
            training_addr,
            request_timeout_ms,
            think_time_ms,
            disabled,
        }
    }
}

/// Owns both request/response channels; open/send/close go through here only.
pub struct OracleManager {
    config: OracleConfig,
    suggest: RequestChannel,
    mover: RequestChannel,
}

impl OracleManager {
    pub fn new(config: OracleConfig) -> Self {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let suggest = RequestChannel::new("suggest", config.suggest_addr.clone(), timeout);
        let mover = RequestChannel::new("move", config.move_addr.clone(), timeout);
        Self {
            config,
            suggest,
            mover,
        }
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Minimum delay before each autonomous placement, so moves are visibly
    /// paced rather than instantaneous.
    pub fn think_time(&self) -> Duration {
        Duration::from_millis(self.config.think_time_ms)
    }

    pub fn suggest_open(&self) -> bool {
        self.suggest.is_open()
    }

    pub fn move_open(&self) -> bool {
        self.mover.is_open()
    }

    /// Fire an advisory-placement request for the snapshot's active piece;
    /// the answer lands on the returned slot. Returns None with no active
    /// piece. The slot resolves to no-answer for a disabled oracle or any
    /// channel failure.
    pub fn spawn_suggestion_request(
        &mut self,
        snapshot: &GameSnapshot,
    ) -> Option<oneshot::Receiver<Option<OracleSuggestion>>> {
        let line = encode_request(snapshot)?;
        let (tx, rx) = oneshot::channel();
        if self.config.disabled {
            let _ = tx.send(None);
            return Some(rx);
        }
        let requester = self.suggest.requester();
        tokio::spawn(async move {
            let answer = requester.request(line).await;
            let parsed = answer
                .and_then(|a| serde_json::from_str::<SuggestionResponse>(&a).ok())
                .map(OracleSuggestion::from);
            let _ = tx.send(parsed);
        });
        Some(rx)
    }

    /// Fire an imposed-placement request, after a visible think delay.
    pub fn spawn_move_request(
        &mut self,
        snapshot: &GameSnapshot,
        delay: Duration,
    ) -> Option<oneshot::Receiver<Option<OracleMove>>> {
        let line = encode_request(snapshot)?;
        let (tx, rx) = oneshot::channel();
        if self.config.disabled {
            let _ = tx.send(None);
            return Some(rx);
        }
        let requester = self.mover.requester();
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let answer = requester.request(line).await;
            let parsed = answer
                .and_then(|a| serde_json::from_str::<MoveResponse>(&a).ok())
                .map(OracleMove::from);
            let _ = tx.send(parsed);
        });
        Some(rx)
    }

    /// Awaitable form of [`Self::spawn_suggestion_request`].
    pub async fn request_suggestion(&mut self, snapshot: &GameSnapshot) -> Option<OracleSuggestion> {
        self.spawn_suggestion_request(snapshot)?.await.ok().flatten()
    }

    /// Awaitable form of [`Self::spawn_move_request`], with no think delay.
    pub async fn request_move(&mut self, snapshot: &GameSnapshot) -> Option<OracleMove> {
        self.spawn_move_request(snapshot, Duration::ZERO)?
            .await
            .ok()
            .flatten()
    }

    /// Open the one-way retraining progress stream. Independent of the game
    /// round; the stream closes itself on its terminal event.
    pub fn open_training_stream(&self, request: TrainingRequest) -> TrainingStream {
        TrainingStream::open(&self.config.training_addr, request)
    }

    /// Close both request/response channels, releasing all pending waiters.
    /// Called on every mode exit, pause, and round end.
    pub fn close_all(&mut self) {
        self.suggest.close();
        self.mover.close();
    }
}

fn encode_request(snapshot: &GameSnapshot) -> Option<String> {
    let request = MoveRequest::from_snapshot(snapshot)?;
    serde_json::to_string(&request).ok()
}

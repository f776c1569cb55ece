//! Session module - the orchestrator tying modes, game, scheduler, oracle
//! and high scores together.
//!
//! The host owns one [`GameSession`] and drives it with player actions and a
//! fixed-cadence `tick`. Oracle calls are fire-and-forget: a request leaves a
//! tagged pending slot behind and the tick collects the answer when it lands,
//! so gravity and player input never wait on oracle latency. The session
//! enforces every mode gate (who may place pieces, when gravity runs, when
//! the oracle is consulted) so the layers below stay policy-free.

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::core::scoring::drop_interval_ms;
use crate::core::snapshot::PieceTag;
use crate::core::{Game, GameSnapshot};
use crate::modes::Mode;
use crate::oracle::{
    OracleConfig, OracleManager, OracleMove, OracleSuggestion, TrainingRequest, TrainingStream,
};
use crate::scores::{HighScores, ScoreCategory, ScoreStore};
use crate::scheduler::DropScheduler;
use crate::types::{Difficulty, PlayerAction};

/// One player-facing session across mode changes and rounds.
pub struct GameSession<S: ScoreStore> {
    mode: Mode,
    difficulty: Difficulty,
    paused: bool,
    show_suggestion: bool,
    game: Option<Game>,
    scheduler: DropScheduler,
    oracle: OracleManager,
    scores: HighScores<S>,
    /// Latest advisory placement, tagged with the piece it was computed for.
    suggestion: Option<(PieceTag, OracleSuggestion)>,
    /// In-flight advisory request; resolved by `tick`.
    pending_suggestion: Option<(PieceTag, oneshot::Receiver<Option<OracleSuggestion>>)>,
    /// In-flight imposed-move request; resolved by `tick`.
    pending_move: Option<(PieceTag, oneshot::Receiver<Option<OracleMove>>)>,
    score_recorded: bool,
}

impl<S: ScoreStore> GameSession<S> {
    pub fn new(config: OracleConfig, store: S) -> Self {
        Self {
            mode: Mode::Menu,
            difficulty: Difficulty::Medium,
            paused: false,
            show_suggestion: true,
            game: None,
            scheduler: DropScheduler::new(Difficulty::Medium.base_drop_ms(), 0),
            oracle: OracleManager::new(config),
            scores: HighScores::new(store),
            suggestion: None,
            pending_suggestion: None,
            pending_move: None,
            score_recorded: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn show_suggestion(&self) -> bool {
        self.show_suggestion
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn game_over(&self) -> bool {
        self.game.as_ref().is_some_and(Game::game_over)
    }

    pub fn high_scores(&self) -> &HighScores<S> {
        &self.scores
    }

    pub fn high_scores_mut(&mut self) -> &mut HighScores<S> {
        &mut self.scores
    }

    pub fn oracle(&self) -> &OracleManager {
        &self.oracle
    }

    pub fn snapshot(&self) -> Option<GameSnapshot> {
        self.game.as_ref().map(Game::snapshot)
    }

    /// Latest advisory placement, but only while it still applies to the
    /// active piece.
    pub fn suggestion(&self) -> Option<&OracleSuggestion> {
        let game = self.game.as_ref()?;
        self.suggestion
            .as_ref()
            .filter(|(tag, _)| game.matches_tag(tag))
            .map(|(_, suggestion)| suggestion)
    }

    /// Switch mode, starting a fresh round for play modes. Rejected (no state
    /// change) for transitions not passing through the menu. Autonomous play
    /// always runs at the hardest pace.
    pub fn enter_mode(&mut self, mode: Mode, difficulty: Difficulty, seed: u32, now_ms: u64) -> bool {
        if !self.mode.can_transition_to(mode) {
            return false;
        }
        self.abandon_oracle_calls();
        self.paused = false;
        self.score_recorded = false;
        self.mode = mode;

        if mode.is_play() {
            self.difficulty = if mode == Mode::Autonomous {
                Difficulty::Hard
            } else {
                difficulty
            };
            let game = Game::new(seed);
            self.scheduler = DropScheduler::new(
                drop_interval_ms(self.difficulty, game.level()),
                now_ms,
            );
            self.game = Some(game);
            println!("[Session] entered {mode:?} at {:?}", self.difficulty);
        } else {
            self.game = None;
            println!("[Session] returned to menu");
        }
        true
    }

    /// Apply one player action, honoring the mode gates: placement actions
    /// are accepted only in modes that allow player placement and only while
    /// unpaused; pause works in any play mode; everything is ignored once the
    /// round is over.
    pub fn handle_action(&mut self, action: PlayerAction, now_ms: u64) {
        if !self.mode.is_play() || self.game_over() {
            return;
        }
        match action {
            PlayerAction::Pause => {
                self.toggle_pause(now_ms);
                return;
            }
            PlayerAction::ToggleSuggestion => {
                if self.mode.uses_suggestions() {
                    self.show_suggestion = !self.show_suggestion;
                }
                return;
            }
            _ => {}
        }
        if self.paused || !self.mode.allows_player_placement() {
            return;
        }
        let Some(game) = self.game.as_mut() else {
            return;
        };
        match action {
            PlayerAction::MoveLeft => {
                game.try_move(-1, 0);
            }
            PlayerAction::MoveRight => {
                game.try_move(1, 0);
            }
            PlayerAction::SoftDrop => {
                game.try_move(0, 1);
            }
            PlayerAction::HardDrop => {
                game.hard_drop();
            }
            PlayerAction::Rotate => {
                game.rotate();
            }
            PlayerAction::Pause | PlayerAction::ToggleSuggestion => {}
        }
        self.after_mutation(now_ms);
    }

    /// Fixed-cadence driver: collects landed oracle answers, advances the
    /// autonomous round, and runs gravity in the modes that use it.
    pub fn tick(&mut self, now_ms: u64) {
        self.poll_suggestion();
        self.drive_autonomous(now_ms);
        if !self.mode.uses_gravity() || self.paused || self.game_over() {
            return;
        }
        if !self.scheduler.tick(now_ms) {
            return;
        }
        if let Some(game) = self.game.as_mut() {
            game.try_move(0, 1);
        }
        self.after_mutation(now_ms);
    }

    /// Ask the oracle for an advisory placement for the current piece. The
    /// request runs in the background; the answer is kept only if the piece
    /// is still the same one when `tick` collects it.
    pub fn refresh_suggestion(&mut self) {
        if !self.mode.uses_suggestions() || self.paused || !self.show_suggestion {
            return;
        }
        let Some((tag, snapshot)) = self.tagged_snapshot() else {
            return;
        };
        if let Some(rx) = self.oracle.spawn_suggestion_request(&snapshot) {
            // Replaces any earlier in-flight request; its answer is dropped.
            self.pending_suggestion = Some((tag, rx));
        }
    }

    /// Open the one-way retraining progress stream; independent of any round.
    pub fn open_training_stream(&self, request: TrainingRequest) -> TrainingStream {
        self.oracle.open_training_stream(request)
    }

    fn poll_suggestion(&mut self) {
        let Some((tag, rx)) = self.pending_suggestion.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(answer) => {
                let tag = *tag;
                self.pending_suggestion = None;
                let Some(answer) = answer else {
                    return;
                };
                // The answer belongs to the piece it was computed for.
                if self
                    .game
                    .as_ref()
                    .is_some_and(|game| game.matches_tag(&tag))
                {
                    self.suggestion = Some((tag, answer));
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                self.pending_suggestion = None;
            }
        }
    }

    /// One imposed placement per piece: issue the request (paced by the think
    /// delay) when none is in flight, and apply the answer when it lands.
    /// Falling back to dropping the piece in place keeps the round moving
    /// when the oracle yields nothing usable.
    fn drive_autonomous(&mut self, now_ms: u64) {
        if !self.mode.uses_oracle_moves() || self.paused || self.game_over() {
            return;
        }
        if self.pending_move.is_none() {
            let Some((tag, snapshot)) = self.tagged_snapshot() else {
                return;
            };
            let think = self.oracle.think_time();
            if let Some(rx) = self.oracle.spawn_move_request(&snapshot, think) {
                self.pending_move = Some((tag, rx));
            }
            return;
        }
        let Some((tag, rx)) = self.pending_move.as_mut() else {
            return;
        };
        let tag = *tag;
        match rx.try_recv() {
            Ok(answer) => {
                self.pending_move = None;
                self.apply_move_or_drop(tag, answer, now_ms);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                self.pending_move = None;
                self.apply_move_or_drop(tag, None, now_ms);
            }
        }
    }

    fn apply_move_or_drop(&mut self, tag: PieceTag, answer: Option<OracleMove>, now_ms: u64) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if !game.matches_tag(&tag) {
            return;
        }
        let applied = answer
            .and_then(|mv| game.apply_placement(mv.rotation, mv.column))
            .is_some();
        if !applied {
            // No usable answer: lock the piece where it would rest.
            game.hard_drop();
        }
        self.after_mutation(now_ms);
    }

    fn tagged_snapshot(&self) -> Option<(PieceTag, GameSnapshot)> {
        let game = self.game.as_ref()?;
        Some((game.tag()?, game.snapshot()))
    }

    fn toggle_pause(&mut self, now_ms: u64) {
        self.paused = !self.paused;
        if self.paused {
            // No oracle traffic while paused; in-flight calls are abandoned.
            self.abandon_oracle_calls();
        } else {
            self.scheduler.reset(now_ms);
        }
    }

    fn abandon_oracle_calls(&mut self) {
        self.oracle.close_all();
        self.suggestion = None;
        self.pending_suggestion = None;
        self.pending_move = None;
    }

    /// Post-mutation bookkeeping: track the level-driven drop interval and,
    /// exactly once per round, record the final score when the round ends.
    fn after_mutation(&mut self, _now_ms: u64) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        self.scheduler
            .set_interval(drop_interval_ms(self.difficulty, game.level()));
        if game.game_over() && !self.score_recorded {
            self.score_recorded = true;
            let score = game.score();
            let category = ScoreCategory::for_mode(self.mode);
            self.abandon_oracle_calls();
            println!("[Session] round over, score {score}");
            if score > 0 {
                if let Some(category) = category {
                    self.scores.record(category, score, wall_clock_ms());
                    println!("[Session] recorded {score} under {}", category.as_str());
                }
            }
        }
    }
}

fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

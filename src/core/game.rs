//! Game module - the active piece and every mutation of the round.
//!
//! Movement, rotation with wall kicks, locking, line clears and spawning all
//! live here. Every mutation is synchronous and atomic with respect to the
//! host's tick; there is no deferred sequencing anywhere (a hard drop locks
//! before it returns).

use crate::core::board::Board;
use crate::core::pieces::{rotation_states, spawn_x, Shape};
use crate::core::rng::SimpleRng;
use crate::core::scoring::{level_for_lines, line_points};
use crate::core::snapshot::{GameSnapshot, PieceTag, PieceView};
use crate::types::PieceKind;

/// Kick offsets tried, in order, when a naive rotation collides:
/// shift right one, shift left one, shift up one. The first valid offset
/// wins; the fixed order keeps rotation deterministic.
const ROTATION_KICKS: [(i8, i8); 3] = [(1, 0), (-1, 0), (0, -1)];

/// The active falling piece: kind, rotation state index, anchor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: usize,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// New piece at the top of the board, horizontally floor-centered.
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            x: spawn_x(kind),
            y: 0,
        }
    }

    /// Shape matrix of the current rotation state.
    pub fn shape(&self) -> Shape {
        rotation_states(self.kind)[self.rotation]
    }

    /// The piece advanced to its next rotation state (cyclic), not validated.
    pub fn rotated(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % rotation_states(self.kind).len(),
            ..*self
        }
    }

    /// Whether the piece fits the board at its own position.
    pub fn is_valid_on(&self, board: &Board) -> bool {
        board.is_valid_placement(self.shape(), self.x, self.y)
    }
}

/// Result of a lock-and-clear cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockResult {
    pub lines_cleared: usize,
    pub points: u32,
}

/// One round of play: board, active piece, queued next kind, totals.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    active: Option<Piece>,
    next: PieceKind,
    rng: SimpleRng,
    /// Increments on every successful spawn; exported in piece tags.
    piece_seq: u64,
    score: u32,
    lines: u32,
    game_over: bool,
}

impl Game {
    /// Start a round: empty board, first piece spawned, next kind queued.
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let first = rng.draw_kind();
        let next = rng.draw_kind();
        let mut game = Self {
            board: Board::new(),
            active: None,
            next,
            rng,
            piece_seq: 0,
            score: 0,
            lines: 0,
            game_over: false,
        };
        game.activate(first);
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next(&self) -> PieceKind {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Derived from the cleared-line total, never stored.
    pub fn level(&self) -> u32 {
        level_for_lines(self.lines)
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn piece_seq(&self) -> u64 {
        self.piece_seq
    }

    /// Identity tag of the active piece, if any.
    pub fn tag(&self) -> Option<PieceTag> {
        self.active.map(|piece| PieceTag {
            piece_seq: self.piece_seq,
            kind: piece.kind,
            rotation: piece.rotation,
        })
    }

    /// Whether an oracle response tagged at request time still applies to the
    /// active piece. False once the piece locked, was replaced, or rotated.
    pub fn matches_tag(&self, tag: &PieceTag) -> bool {
        self.active.is_some_and(|piece| {
            self.piece_seq == tag.piece_seq
                && piece.kind == tag.kind
                && piece.rotation == tag.rotation
        })
    }

    /// Deep, independent copy of the visible state for the oracle layer.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.to_bit_grid(),
            current: self.active.map(|piece| PieceView {
                kind: piece.kind,
                rotation: piece.rotation,
                x: piece.x,
                y: piece.y,
            }),
            next: self.next,
            score: self.score,
            lines: self.lines,
            level: self.level(),
            tag: self.tag(),
        }
    }

    /// Try to translate the active piece. Commits when the target position is
    /// valid. A blocked downward move triggers lock-and-clear (the lock
    /// trigger, not an error); blocked horizontal moves are silently rejected.
    /// Returns whether the piece moved.
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let candidate = Piece {
            x: piece.x + dx,
            y: piece.y + dy,
            ..piece
        };
        if candidate.is_valid_on(&self.board) {
            self.active = Some(candidate);
            return true;
        }
        if dy > 0 {
            self.lock_and_clear();
        }
        false
    }

    /// Advance to the next rotation state, trying the fixed kick sequence
    /// when the naive rotation collides. Rejected (no state change) when no
    /// candidate fits. Returns whether the rotation was applied.
    pub fn rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let rotated = piece.rotated();
        if rotated.is_valid_on(&self.board) {
            self.active = Some(rotated);
            return true;
        }
        for (dx, dy) in ROTATION_KICKS {
            let kicked = Piece {
                x: rotated.x + dx,
                y: rotated.y + dy,
                ..rotated
            };
            if kicked.is_valid_on(&self.board) {
                self.active = Some(kicked);
                return true;
            }
        }
        false
    }

    /// Drop the active piece to its lowest valid row in one atomic update,
    /// then lock immediately.
    pub fn hard_drop(&mut self) -> LockResult {
        if self.game_over {
            return LockResult::default();
        }
        let Some(mut piece) = self.active else {
            return LockResult::default();
        };
        while self
            .board
            .is_valid_placement(piece.shape(), piece.x, piece.y + 1)
        {
            piece.y += 1;
        }
        self.active = Some(piece);
        self.lock_and_clear()
    }

    /// Apply an imposed placement (rotation state index plus target column),
    /// then drop and lock it. Returns None with no state change when the
    /// rotation index is out of range or the placement collides; the caller
    /// decides the fallback.
    pub fn apply_placement(&mut self, rotation: usize, column: i8) -> Option<LockResult> {
        if self.game_over {
            return None;
        }
        let piece = self.active?;
        if rotation >= rotation_states(piece.kind).len() {
            return None;
        }
        let target = Piece {
            rotation,
            x: column,
            ..piece
        };
        if !target.is_valid_on(&self.board) {
            return None;
        }
        self.active = Some(target);
        Some(self.hard_drop())
    }

    /// Stamp the active piece into the board, clear full rows, score them
    /// with the level in effect at lock time, then spawn the queued kind.
    ///
    /// # Panics
    ///
    /// Panics when there is no active piece; that is a programming error,
    /// not a recoverable condition.
    pub fn lock_and_clear(&mut self) -> LockResult {
        let piece = self.active.take().expect("lock with no active piece");
        self.board.lock(piece.shape(), piece.x, piece.y, piece.kind);
        let cleared = self.board.clear_full_rows();
        // Points use the level before the new lines raise it.
        let points = line_points(cleared, self.level());
        self.score += points;
        self.lines += cleared as u32;
        let kind = self.next;
        self.next = self.rng.draw_kind();
        self.activate(kind);
        LockResult {
            lines_cleared: cleared,
            points,
        }
    }

    /// Spawn a kind as the active piece; a blocked spawn position ends the
    /// round (terminal, no further mutation accepted).
    fn activate(&mut self, kind: PieceKind) {
        let piece = Piece::spawn(kind);
        if piece.is_valid_on(&self.board) {
            self.piece_seq += 1;
            self.active = Some(piece);
        } else {
            self.active = None;
            self.game_over = true;
        }
    }
}

//! Core types shared across the engine.
//! This module contains pure data types with no external dependencies.

use serde::{Deserialize, Serialize};

/// Board dimensions
pub const BOARD_WIDTH: u8 = 10;
pub const BOARD_HEIGHT: u8 = 20;

/// Fixed cadence of the host-driven game loop tick (milliseconds).
pub const TICK_MS: u32 = 50;

/// Forced descent never gets faster than this (milliseconds).
pub const DROP_INTERVAL_FLOOR_MS: u32 = 100;

/// Speed-up of the drop interval per level above 1 (milliseconds).
pub const LEVEL_SPEEDUP_MS: u32 = 50;

/// Cleared lines needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per lines-cleared-in-one-lock, multiplied by the current level.
pub const LINE_POINTS: [u32; 5] = [0, 100, 300, 500, 800];

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All seven kinds, in drawing order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Wire name of the kind (single uppercase letter).
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Cell on the board (None = empty, Some = filled with piece kind)
pub type Cell = Option<PieceKind>;

/// Per-difficulty base drop interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Base interval between forced downward moves at level 1 (milliseconds).
    pub fn base_drop_ms(self) -> u32 {
        match self {
            Difficulty::Easy => 700,
            Difficulty::Medium => 400,
            Difficulty::Hard => 200,
        }
    }
}

/// Player input, already mapped from whatever input device the host uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    Pause,
    ToggleSuggestion,
}

//! Snapshot module - deep, immutable views handed to the oracle layer.
//!
//! A snapshot is an independent copy: later mutation of the live game is
//! never observable through it, no matter how long an oracle call stays in
//! flight. The tag identifies the piece instance the snapshot was taken for,
//! so late responses can be detected and discarded.

use crate::types::PieceKind;

/// Identity of an active piece instance at request time.
///
/// `piece_seq` increments on every successful spawn, so a tag can never match
/// a piece that has been locked or replaced; the rotation field additionally
/// invalidates answers computed for an orientation the player has since left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceTag {
    pub piece_seq: u64,
    pub kind: PieceKind,
    pub rotation: usize,
}

/// Active piece fields as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceView {
    pub kind: PieceKind,
    pub rotation: usize,
    pub x: i8,
    pub y: i8,
}

/// Deep copy of the visible game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Occupancy as 0/1 rows, top to bottom.
    pub board: Vec<Vec<u8>>,
    pub current: Option<PieceView>,
    pub next: PieceKind,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    /// Identity of `current`, when present.
    pub tag: Option<PieceTag>,
}

//! Protocol module - JSON message types for the oracle channels.
//!
//! Every message is one JSON object per line. Outbound requests carry the
//! full visible game state; responses carry a suggested or imposed placement.
//! Unknown fields on inbound messages are ignored, and any malformed payload
//! collapses to a no-answer outcome at the manager boundary.

use serde::{Deserialize, Serialize};

use crate::core::snapshot::GameSnapshot;
use crate::types::PieceKind;

/// Active piece fields as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePiece {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub rotation: usize,
    pub x: i8,
    pub y: i8,
}

/// Outbound request, identical on the suggest and move channels.
#[derive(Debug, Clone, Serialize)]
pub struct MoveRequest<'a> {
    /// Occupancy grid of 0/1 rows, top to bottom.
    pub board: &'a [Vec<u8>],
    pub current_piece: WirePiece,
    pub next_piece_type: PieceKind,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
}

impl<'a> MoveRequest<'a> {
    /// Build the wire request from a snapshot; None without an active piece.
    pub fn from_snapshot(snapshot: &'a GameSnapshot) -> Option<Self> {
        let current = snapshot.current?;
        Some(Self {
            board: &snapshot.board,
            current_piece: WirePiece {
                kind: current.kind,
                rotation: current.rotation,
                x: current.x,
                y: current.y,
            },
            next_piece_type: snapshot.next,
            score: snapshot.score,
            lines: snapshot.lines,
            level: snapshot.level,
        })
    }
}

/// Inbound suggestion payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub confidence: String,
    pub best_move: BestMove,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BestMove {
    pub rotation: usize,
    pub column: i8,
    pub final_y: i8,
}

/// Inbound autonomous-move payload (extra fields are ignored).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveResponse {
    pub rotation: usize,
    pub column: i8,
}

/// Advisory placement shown in assisted play; never mutates state directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleSuggestion {
    /// Opaque confidence label from the oracle ("high", "medium", ...).
    pub confidence: String,
    pub rotation: usize,
    pub column: i8,
    pub final_y: i8,
}

impl From<SuggestionResponse> for OracleSuggestion {
    fn from(resp: SuggestionResponse) -> Self {
        Self {
            confidence: resp.confidence,
            rotation: resp.best_move.rotation,
            column: resp.best_move.column,
            final_y: resp.best_move.final_y,
        }
    }
}

/// Imposed placement applied and committed in autonomous play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleMove {
    pub rotation: usize,
    pub column: i8,
}

impl From<MoveResponse> for OracleMove {
    fn from(resp: MoveResponse) -> Self {
        Self {
            rotation: resp.rotation,
            column: resp.column,
        }
    }
}

/// First line sent when opening a training stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRequest {
    pub generations: u32,
    pub population_size: u32,
}

impl Default for TrainingRequest {
    fn default() -> Self {
        Self {
            generations: 3,
            population_size: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompleteStatus {
    #[serde(rename = "complete")]
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorStatus {
    #[serde(rename = "error")]
    Error,
}

/// Inbound training stream event. Terminal variants close the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrainingEvent {
    Complete {
        status: CompleteStatus,
        generation: u32,
        best_score: f64,
    },
    Error {
        status: ErrorStatus,
        message: String,
    },
    Progress {
        generation: u32,
        /// Fractional progress, 0-100.
        progress: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        individual: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        population_size: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        overall_best: Option<f64>,
    },
}

impl TrainingEvent {
    /// Terminal events end the stream; at most one is ever delivered.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TrainingEvent::Progress { .. })
    }

    /// Error event raised locally for transport failures.
    pub fn error(message: impl Into<String>) -> Self {
        TrainingEvent::Error {
            status: ErrorStatus::Error,
            message: message.into(),
        }
    }
}

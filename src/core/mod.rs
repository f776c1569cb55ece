//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules and state management. It has zero
//! dependencies on networking or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Comprehensive unit tests for all game rules
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 game board with collision detection and line clearing
//! - [`game`]: active piece, movement, rotation kicks, locking, spawning
//! - [`pieces`]: tetromino rotation-state matrices
//! - [`rng`]: uniform random piece drawing
//! - [`scoring`]: line points, derived level, drop speed
//! - [`snapshot`]: deep state copies and piece identity tags for the oracle

pub mod board;
pub mod game;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use board::Board;
pub use game::{Game, LockResult, Piece};
pub use rng::SimpleRng;
pub use snapshot::{GameSnapshot, PieceTag, PieceView};

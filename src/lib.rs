//! Embedded falling-block puzzle engine with an external decision oracle.
//!
//! The crate pairs a deterministic, synchronous game core with an async
//! channel layer for a remote oracle that can suggest placements (assisted
//! play) or impose them (autonomous play), plus a one-way progress stream
//! observed while the oracle retrains.
//!
//! # Module Structure
//!
//! - [`core`]: board, pieces, movement, locking, line clears, scoring
//! - [`modes`]: the menu/manual/assisted/autonomous state machine
//! - [`scheduler`]: fixed-tick gravity scheduler with a variable drop threshold
//! - [`oracle`]: request/response channels, wire protocol, training stream
//! - [`scores`]: per-mode top-five high-score store over a key-value collaborator
//! - [`session`]: the orchestrator tying all of the above together
//!
//! There is no binary and no rendering here; a host embeds [`session::GameSession`],
//! drives its tick on a fixed cadence, and forwards player input.

pub mod core;
pub mod modes;
pub mod oracle;
pub mod scheduler;
pub mod scores;
pub mod session;
pub mod types;

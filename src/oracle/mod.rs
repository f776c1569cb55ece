//! Oracle integration module
//!
//! Everything that talks to the external decision oracle: the wire protocol,
//! the two persistent request/response channels (suggest and move), and the
//! one-way retraining progress stream. The [`OracleManager`] is the sole
//! owner of the connection handles.

pub mod channel;
pub mod manager;
pub mod protocol;
pub mod training;

pub use channel::{ChannelRequester, RequestChannel};
pub use manager::{OracleConfig, OracleManager};
pub use protocol::{OracleMove, OracleSuggestion, TrainingEvent, TrainingRequest};
pub use training::TrainingStream;

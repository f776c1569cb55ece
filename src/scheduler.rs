//! Game-loop scheduler - fast fixed tick, variable drop threshold.
//!
//! The host drives `tick` on a fixed short cadence (see
//! [`crate::types::TICK_MS`]); a forced descent fires whenever the elapsed
//! time since the last forced drop exceeds the current interval. Decoupling
//! the tick from the interval means a level change only updates a threshold,
//! never reschedules a timer, and pause/resume reacts within one tick.

/// Tracks when the next forced downward move is due.
#[derive(Debug, Clone, Copy)]
pub struct DropScheduler {
    last_drop_ms: u64,
    interval_ms: u32,
}

impl DropScheduler {
    pub fn new(interval_ms: u32, now_ms: u64) -> Self {
        Self {
            last_drop_ms: now_ms,
            interval_ms,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Update the drop threshold. Takes effect on the next tick.
    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms;
    }

    /// Returns true when a forced descent is due, resetting the elapsed-time
    /// marker in the same call.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_drop_ms) > u64::from(self.interval_ms) {
            self.last_drop_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Re-anchor the elapsed-time marker without firing.
    pub fn reset(&mut self, now_ms: u64) {
        self.last_drop_ms = now_ms;
    }
}

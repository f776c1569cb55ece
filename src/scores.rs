//! High-score store - top five entries per play mode category.
//!
//! Persistence goes through a plain get/set key-value collaborator; the whole
//! table lives as one JSON document under a single key, so a missing or
//! corrupt document simply reads as empty. Every write broadcasts a change
//! notification that any number of observers can watch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::modes::Mode;

/// Key the whole table is stored under.
pub const HIGH_SCORES_KEY: &str = "tetris_high_scores";

/// Entries kept per category, descending by score.
pub const MAX_ENTRIES_PER_CATEGORY: usize = 5;

/// The persistence collaborator: a minimal get/set key-value interface.
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory store, also the test double.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// Score bucket per play mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreCategory {
    Manual,
    AiAssist,
    AiAuto,
}

impl ScoreCategory {
    /// Category a finished round is recorded under; None in the menu.
    pub fn for_mode(mode: Mode) -> Option<Self> {
        match mode {
            Mode::Manual => Some(ScoreCategory::Manual),
            Mode::Assisted => Some(ScoreCategory::AiAssist),
            Mode::Autonomous => Some(ScoreCategory::AiAuto),
            Mode::Menu => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreCategory::Manual => "manual",
            ScoreCategory::AiAssist => "ai_assist",
            ScoreCategory::AiAuto => "ai_auto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u32,
    pub timestamp_ms: u64,
}

/// All three category lists, as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    #[serde(default)]
    pub manual: Vec<ScoreEntry>,
    #[serde(default)]
    pub ai_assist: Vec<ScoreEntry>,
    #[serde(default)]
    pub ai_auto: Vec<ScoreEntry>,
}

impl ScoreTable {
    pub fn entries(&self, category: ScoreCategory) -> &[ScoreEntry] {
        match category {
            ScoreCategory::Manual => &self.manual,
            ScoreCategory::AiAssist => &self.ai_assist,
            ScoreCategory::AiAuto => &self.ai_auto,
        }
    }

    fn entries_mut(&mut self, category: ScoreCategory) -> &mut Vec<ScoreEntry> {
        match category {
            ScoreCategory::Manual => &mut self.manual,
            ScoreCategory::AiAssist => &mut self.ai_assist,
            ScoreCategory::AiAuto => &mut self.ai_auto,
        }
    }
}

/// Top-five tracker over a [`ScoreStore`], with change broadcasting.
pub struct HighScores<S: ScoreStore> {
    store: S,
    changed: watch::Sender<u64>,
}

impl<S: ScoreStore> HighScores<S> {
    pub fn new(store: S) -> Self {
        let (changed, _) = watch::channel(0);
        Self { store, changed }
    }

    /// Current table; missing or corrupt documents read as empty.
    pub fn table(&self) -> ScoreTable {
        self.store
            .get(HIGH_SCORES_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Top entries for one category, descending by score.
    pub fn top(&self, category: ScoreCategory) -> Vec<ScoreEntry> {
        self.table().entries(category).to_vec()
    }

    /// Insert a finished round's score, keep the best five, persist, and
    /// notify observers.
    pub fn record(&mut self, category: ScoreCategory, score: u32, timestamp_ms: u64) {
        let mut table = self.table();
        let entries = table.entries_mut(category);
        entries.push(ScoreEntry {
            score,
            timestamp_ms,
        });
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES_PER_CATEGORY);

        if let Ok(json) = serde_json::to_string(&table) {
            self.store.set(HIGH_SCORES_KEY, json);
        }
        self.changed.send_modify(|revision| *revision += 1);
    }

    /// Observers see a revision bump after every write.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

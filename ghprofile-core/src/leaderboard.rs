//! In-memory ranking of users by impact score

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::constants::DEFAULT_TOP_LIMIT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u64,
}

/// One score per username, last write wins.
///
/// Not synchronised; share it behind [`SharedLeaderboard`] when several
/// tasks write to it.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardService {
    entries: Vec<LeaderboardEntry>,
    index: HashMap<String, usize>,
}

/// Leaderboard shared between concurrent request handlers
pub type SharedLeaderboard = Arc<RwLock<LeaderboardService>>;

impl LeaderboardService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedLeaderboard {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Insert `username` or replace its score
    pub fn add_or_update(&mut self, username: &str, score: u64) -> LeaderboardEntry {
        match self.index.get(username) {
            Some(&pos) => self.entries[pos].score = score,
            None => {
                self.index.insert(username.to_string(), self.entries.len());
                self.entries.push(LeaderboardEntry {
                    username: username.to_string(),
                    score,
                });
            }
        }
        LeaderboardEntry {
            username: username.to_string(),
            score,
        }
    }

    /// Stored score, 0 for unknown users
    pub fn get_score(&self, username: &str) -> u64 {
        self.index
            .get(username)
            .map(|&pos| self.entries[pos].score)
            .unwrap_or(0)
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Up to `limit` entries by descending score (default 10). Equal scores
    /// keep insertion order.
    pub fn get_top(&self, limit: impl Into<Option<usize>>) -> Vec<LeaderboardEntry> {
        let limit = limit.into().unwrap_or(DEFAULT_TOP_LIMIT);
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(limit);
        ranked
    }

    pub fn get_top_default(&self) -> Vec<LeaderboardEntry> {
        self.get_top(DEFAULT_TOP_LIMIT)
    }

    /// All entries, ranked
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        self.get_top(self.size())
    }
}

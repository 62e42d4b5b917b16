//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::entities::LeaderboardExportItem;
use crate::domain::ports::LeaderboardStore;
use crate::error::DomainError;

// ============================================================================
// In-Memory Leaderboard Store
// ============================================================================

#[derive(Default)]
pub struct InMemoryLeaderboardStore {
    boards: Arc<RwLock<HashMap<String, Vec<LeaderboardExportItem>>>>,
    saves: Arc<RwLock<HashMap<String, usize>>>,
}

impl InMemoryLeaderboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a previously saved leaderboard
    pub fn with_leaderboard(self, name: &str, items: Vec<LeaderboardExportItem>) -> Self {
        self.boards
            .write()
            .unwrap()
            .insert(name.to_string(), items);
        self
    }

    /// Items written by the last `save`, `None` if the leaderboard was never saved
    pub fn saved(&self, name: &str) -> Option<Vec<LeaderboardExportItem>> {
        if self.save_count(name) == 0 {
            return None;
        }
        self.boards.read().unwrap().get(name).cloned()
    }

    pub fn save_count(&self, name: &str) -> usize {
        self.saves.read().unwrap().get(name).copied().unwrap_or(0)
    }
}

#[async_trait]
impl LeaderboardStore for InMemoryLeaderboardStore {
    async fn load(&self, name: &str) -> Result<Option<Vec<LeaderboardExportItem>>, DomainError> {
        let boards = self.boards.read().unwrap();
        Ok(boards.get(name).cloned())
    }

    async fn save(&self, name: &str, items: &[LeaderboardExportItem]) -> Result<(), DomainError> {
        self.boards
            .write()
            .unwrap()
            .insert(name.to_string(), items.to_vec());
        *self
            .saves
            .write()
            .unwrap()
            .entry(name.to_string())
            .or_insert(0) += 1;
        Ok(())
    }
}

// ============================================================================
// Failing Leaderboard Store
// ============================================================================

/// Store whose every call fails
pub struct FailingLeaderboardStore;

#[async_trait]
impl LeaderboardStore for FailingLeaderboardStore {
    async fn load(&self, name: &str) -> Result<Option<Vec<LeaderboardExportItem>>, DomainError> {
        Err(DomainError::Storage(format!("cannot read {}", name)))
    }

    async fn save(&self, name: &str, _items: &[LeaderboardExportItem]) -> Result<(), DomainError> {
        Err(DomainError::Storage(format!("cannot write {}", name)))
    }
}

//! Leaderboard persistence port
//!
//! The store is keyed by leaderboard name. Saving replaces the whole
//! leaderboard atomically; the engine never manages locking or versioning.

use async_trait::async_trait;

use crate::domain::entities::LeaderboardExportItem;
use crate::error::DomainError;

/// Persistence for exported leaderboards
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Read the last saved leaderboard, `None` on first run
    async fn load(&self, name: &str) -> Result<Option<Vec<LeaderboardExportItem>>, DomainError>;

    /// Replace the saved leaderboard with `items`
    async fn save(&self, name: &str, items: &[LeaderboardExportItem]) -> Result<(), DomainError>;
}

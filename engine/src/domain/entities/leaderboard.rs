//! Leaderboard domain entities
//!
//! `LeaderboardEntry` is the engine's working state for one user on one
//! leaderboard. `LeaderboardExportItem` is the public snapshot that gets
//! persisted and is the only thing visible outside the engine.

use serde::{Deserialize, Serialize};

use super::comment::UserId;
use super::performance::BadgeInformation;

/// Rating every new entry starts from
pub const DEFAULT_RATING: f64 = 1200.0;

/// Working state of one user on a leaderboard
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub id: UserId,
    pub username: String,
    pub avatar: String,
    pub badges: Vec<BadgeInformation>,
    /// Rank from the last save, if any
    pub previous_rank: Option<u32>,
    pub elo: f64,
    /// Raw score from the current run
    pub score: f64,
}

impl LeaderboardEntry {
    pub fn new(id: UserId, username: String, avatar: String, initial_rating: f64) -> Self {
        Self {
            id,
            username,
            avatar,
            badges: Vec::new(),
            previous_rank: None,
            elo: initial_rating,
            score: 0.0,
        }
    }

    /// Rank delta for a new rank. Positive means the user climbed.
    pub fn rank_delta(&self, new_rank: u32) -> i64 {
        match self.previous_rank {
            Some(previous) if previous > 0 => previous as i64 - new_rank as i64,
            _ => 0,
        }
    }
}

impl From<LeaderboardExportItem> for LeaderboardEntry {
    fn from(item: LeaderboardExportItem) -> Self {
        Self {
            id: item.id,
            username: item.username,
            avatar: item.avatar,
            badges: item.badges.unwrap_or_default(),
            previous_rank: Some(item.rank),
            elo: item.elo,
            score: 0.0,
        }
    }
}

/// Public leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardExportItem {
    pub id: UserId,
    pub rank: u32,
    pub elo: f64,
    pub username: String,
    pub delta: i64,
    pub avatar: String,
    #[serde(default)]
    pub badges: Option<Vec<BadgeInformation>>,
}

/// Rank entries by rating, highest first.
///
/// Equal ratings share a rank and the next distinct rating takes the next
/// rank number, so there are no gaps. Equal ratings are ordered by id.
pub fn rank_entries<'a, I>(entries: I) -> Vec<LeaderboardExportItem>
where
    I: IntoIterator<Item = &'a LeaderboardEntry>,
{
    let mut sorted: Vec<&LeaderboardEntry> = entries.into_iter().collect();
    sorted.sort_by(|a, b| b.elo.total_cmp(&a.elo).then_with(|| a.id.cmp(&b.id)));

    let mut ranked: Vec<LeaderboardExportItem> = Vec::with_capacity(sorted.len());
    let mut previous: Option<(f64, u32)> = None;

    for entry in sorted {
        let rank = match previous {
            None => 1,
            Some((elo, rank)) if elo == entry.elo => rank,
            Some((_, rank)) => rank + 1,
        };
        previous = Some((entry.elo, rank));

        ranked.push(LeaderboardExportItem {
            id: entry.id.clone(),
            rank,
            elo: entry.elo,
            username: entry.username.clone(),
            delta: entry.rank_delta(rank),
            avatar: entry.avatar.clone(),
            badges: Some(entry.badges.clone()),
        });
    }

    ranked
}

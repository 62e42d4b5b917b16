//! Domain entities
//!
//! Pure domain models representing the transcript, the per-user
//! performance built from it, and the leaderboard state rated from that.

pub mod comment;
pub mod leaderboard;
pub mod performance;

pub use comment::{Badge, ChatLog, ChatMessage, Comment, Commenter, Emoticon, Fragment, UserId};
pub use leaderboard::{rank_entries, LeaderboardEntry, LeaderboardExportItem, DEFAULT_RATING};
pub use performance::{
    BadgeInformation, MetadataUpdate, MetadataValue, MetricUpdate, UserPerformance,
};

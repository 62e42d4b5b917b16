//! Domain ports (traits)
//!
//! Port traits define the collaborators the engine requires.
//! Adapters provide concrete implementations of these traits.

pub mod badge_catalog;
pub mod leaderboard_store;

pub use badge_catalog::BadgeCatalog;
pub use leaderboard_store::LeaderboardStore;

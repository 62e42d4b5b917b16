//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod badge_catalog;
pub mod json_file_store;

pub use badge_catalog::StaticBadgeCatalog;
pub use json_file_store::JsonFileLeaderboardStore;

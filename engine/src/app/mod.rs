//! Application layer
//!
//! Contains the evaluators, the ingestion pass and the rating services.
//! Services coordinate between domain entities, ports, and adapters.

pub mod chat_log_processor;
pub mod export_service;
pub mod leaderboard_service;
pub mod leaderboards;
pub mod metadata;
pub mod metrics;
pub mod rating;

pub use chat_log_processor::ChatLogProcessor;
pub use export_service::{ExportService, LeaderboardReport};
pub use leaderboard_service::LeaderboardService;
pub use leaderboards::{
    default_leaderboards, Leaderboard, NonVips, Overall, PartnersOnly, SingleMetric,
};
pub use metadata::{default_metadata, Metadata};
pub use metrics::{default_metrics, Metric};
pub use rating::{
    expected_score, strategy_from_config, PairwiseRoundRobin, RatingStrategy, SampledComparison,
};

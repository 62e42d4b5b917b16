//! Chat engagement scoring and leaderboard rating engine.
//!
//! Ingestion turns an ordered chat transcript into one `UserPerformance` per
//! user. Each leaderboard variant then rates those performances against its
//! persisted history and exports a ranked snapshot.

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;

#[cfg(test)]
mod test_utils;


pub use config::EngineConfig;
pub use error::{AppError, DomainError, EvaluationError};

//! Unified error types for the chat rating engine
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core scoring and rating errors
//! - `EvaluationError`: A single evaluator failing on a single comment
//! - `AppError`: Application layer errors (wraps domain errors for callers)

use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Leaderboard {leaderboard} needs at least 2 entries to be rated, found {found}")]
    NotEnoughEntries { leaderboard: String, found: usize },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of one evaluator on one comment.
///
/// The orchestrator treats this as a zero contribution; it never aborts the pass.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Invalid number in message: {0}")]
    InvalidNumber(#[from] std::num::ParseIntError),

    #[error("Gifted sub count overflowed")]
    CountOverflow,

    #[error("{evaluator} could not evaluate comment: {message}")]
    Unsupported { evaluator: String, message: String },
}

/// Application layer errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Parse(e.to_string())
    }
}

impl AppError {
    /// True when the failure is the "fewer than two entries" precondition
    pub fn is_not_enough_entries(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::NotEnoughEntries { .. }))
    }
}

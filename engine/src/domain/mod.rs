//! Domain layer
//!
//! Contains pure scoring and rating data with no external dependencies.
//! - `entities`: Domain models for transcripts, performances and leaderboards
//! - `ports`: Trait definitions for external collaborators

pub mod entities;
pub mod ports;

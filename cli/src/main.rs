//! Chatelo command line runner
//!
//! Scores one chat transcript and folds it into every leaderboard stored in
//! the configured directory.
//!
//! Usage: `chatelo <transcript.json>`

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chatelo_engine::adapters::{JsonFileLeaderboardStore, StaticBadgeCatalog};
use chatelo_engine::app::{default_leaderboards, ChatLogProcessor, ExportService};
use chatelo_engine::domain::entities::{ChatLog, UserPerformance};
use chatelo_engine::EngineConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (stderr, stdout stays free for piping)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chatelo_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(transcript_path) = std::env::args().nth(1) else {
        bail!("usage: chatelo <transcript.json>");
    };

    let config = EngineConfig::from_env()?;
    tracing::info!(
        transcript = %transcript_path,
        leaderboard_dir = %config.paths.leaderboard_dir.display(),
        "Starting chatelo"
    );

    let raw = tokio::fs::read_to_string(&transcript_path)
        .await
        .with_context(|| format!("failed to read transcript {}", transcript_path))?;
    let chat_log = ChatLog::from_json(&raw)
        .with_context(|| format!("failed to parse transcript {}", transcript_path))?;

    let catalog = match &config.paths.badge_catalog {
        Some(path) => load_badge_catalog(path).await?,
        None => StaticBadgeCatalog::new(),
    };
    let emotes = match &config.paths.emote_list {
        Some(path) => load_emote_list(path).await?,
        None => HashSet::new(),
    };
    tracing::info!(badges = catalog.len(), emotes = emotes.len(), "External metadata resolved");

    let performances: Arc<[UserPerformance]> =
        ChatLogProcessor::with_defaults(&config, Arc::new(catalog), emotes)
            .process(&chat_log)
            .into();

    let store = Arc::new(JsonFileLeaderboardStore::new(&config.paths.leaderboard_dir));
    let reports = ExportService::new(store, config.rating.clone())
        .export_all(default_leaderboards(), performances)
        .await;

    for report in &reports {
        match &report.result {
            Ok(items) => tracing::info!(
                leaderboard = %report.leaderboard,
                entries = items.len(),
                "Leaderboard exported"
            ),
            Err(e) if e.is_not_enough_entries() => tracing::warn!(
                leaderboard = %report.leaderboard,
                "Skipped, not enough entries"
            ),
            Err(e) => tracing::error!(
                leaderboard = %report.leaderboard,
                error = %e,
                "Leaderboard export failed"
            ),
        }
    }

    Ok(())
}

async fn load_badge_catalog(path: &Path) -> Result<StaticBadgeCatalog> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read badge catalog {}", path.display()))?;
    Ok(StaticBadgeCatalog::from_json(&raw)?)
}

/// JSON array of emote names
async fn load_emote_list(path: &Path) -> Result<HashSet<String>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read emote list {}", path.display()))?;
    let names: Vec<String> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse emote list {}", path.display()))?;
    Ok(names.into_iter().collect())
}

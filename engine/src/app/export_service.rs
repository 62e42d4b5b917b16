//! Export service
//!
//! Rates every leaderboard variant from one set of performances. Variants
//! share no mutable state, so each runs as its own task.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;

use crate::app::leaderboard_service::LeaderboardService;
use crate::app::leaderboards::Leaderboard;
use crate::config::RatingConfig;
use crate::domain::entities::{LeaderboardExportItem, UserPerformance};
use crate::domain::ports::LeaderboardStore;
use crate::error::{AppError, DomainError};

/// Outcome of exporting one leaderboard
#[derive(Debug)]
pub struct LeaderboardReport {
    pub leaderboard: String,
    pub result: Result<Vec<LeaderboardExportItem>, AppError>,
}

impl LeaderboardReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct ExportService<S>
where
    S: LeaderboardStore + 'static,
{
    store: Arc<S>,
    config: RatingConfig,
}

impl<S> ExportService<S>
where
    S: LeaderboardStore + 'static,
{
    pub fn new(store: Arc<S>, config: RatingConfig) -> Self {
        Self { store, config }
    }

    /// Load, update, rate and save every leaderboard concurrently.
    ///
    /// Reports come back in the order `leaderboards` was given. A failure on
    /// one leaderboard never affects the others.
    pub async fn export_all(
        &self,
        leaderboards: Vec<Box<dyn Leaderboard>>,
        performances: Arc<[UserPerformance]>,
    ) -> Vec<LeaderboardReport> {
        let start_time = Instant::now();
        let names: Vec<String> = leaderboards.iter().map(|l| l.name().to_string()).collect();
        let mut tasks = JoinSet::new();

        for (index, leaderboard) in leaderboards.into_iter().enumerate() {
            let service =
                LeaderboardService::new(self.store.clone(), leaderboard, self.config.clone());
            let performances = performances.clone();
            tasks.spawn(async move { (index, export_one(service, &performances).await) });
        }

        let mut results: Vec<Option<Result<Vec<LeaderboardExportItem>, AppError>>> =
            names.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => tracing::error!(error = %e, "Leaderboard export task failed"),
            }
        }

        let reports: Vec<LeaderboardReport> = names
            .into_iter()
            .zip(results)
            .map(|(leaderboard, result)| LeaderboardReport {
                result: result.unwrap_or_else(|| {
                    Err(DomainError::Internal(format!(
                        "export task for {} did not complete",
                        leaderboard
                    ))
                    .into())
                }),
                leaderboard,
            })
            .collect();

        tracing::info!(
            leaderboards = reports.len(),
            saved = reports.iter().filter(|r| r.is_ok()).count(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Leaderboard export finished"
        );

        reports
    }
}

async fn export_one<S>(
    mut service: LeaderboardService<S>,
    performances: &[UserPerformance],
) -> Result<Vec<LeaderboardExportItem>, AppError>
where
    S: LeaderboardStore,
{
    service.load().await?;

    let eligible = performances
        .iter()
        .filter(|performance| service.update(performance))
        .count();
    tracing::debug!(
        leaderboard = %service.name(),
        eligible,
        entries = service.entries().len(),
        "Performances applied"
    );

    match service.save().await {
        Ok(items) => Ok(items),
        Err(e) => {
            tracing::warn!(leaderboard = %service.name(), error = %e, "Leaderboard not saved");
            Err(e)
        }
    }
}

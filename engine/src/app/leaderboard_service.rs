//! Leaderboard service
//!
//! Owns the working state of one leaderboard: loads the last export, folds in
//! this run's performances, runs the rating update and persists the ranked
//! result. All rating changes for a leaderboard flow through here.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::app::leaderboards::Leaderboard;
use crate::app::rating::{strategy_from_config, RatingStrategy};
use crate::config::RatingConfig;
use crate::domain::entities::{
    rank_entries, LeaderboardEntry, LeaderboardExportItem, UserId, UserPerformance,
};
use crate::domain::ports::LeaderboardStore;
use crate::error::{AppError, DomainError};

/// Metadata key the badge list is read from
const BADGES_KEY: &str = "badges";

/// Rating engine for a single leaderboard variant
pub struct LeaderboardService<S>
where
    S: LeaderboardStore,
{
    store: Arc<S>,
    leaderboard: Box<dyn Leaderboard>,
    strategy: Box<dyn RatingStrategy>,
    config: RatingConfig,
    state: BTreeMap<UserId, LeaderboardEntry>,
}

impl<S> LeaderboardService<S>
where
    S: LeaderboardStore,
{
    pub fn new(store: Arc<S>, leaderboard: Box<dyn Leaderboard>, config: RatingConfig) -> Self {
        let strategy = strategy_from_config(&config);
        Self::with_strategy(store, leaderboard, strategy, config)
    }

    pub fn with_strategy(
        store: Arc<S>,
        leaderboard: Box<dyn Leaderboard>,
        strategy: Box<dyn RatingStrategy>,
        config: RatingConfig,
    ) -> Self {
        Self {
            store,
            leaderboard,
            strategy,
            config,
            state: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.leaderboard.name()
    }

    pub fn entries(&self) -> &BTreeMap<UserId, LeaderboardEntry> {
        &self.state
    }

    /// Replace the working state with the last saved export.
    ///
    /// Loaded users start this run with a raw score of zero and remember
    /// their saved rank. Returns the number of entries loaded.
    pub async fn load(&mut self) -> Result<usize, AppError> {
        let items = self.store.load(self.leaderboard.name()).await?;

        self.state = items
            .unwrap_or_default()
            .into_iter()
            .map(|item| (item.id.clone(), LeaderboardEntry::from(item)))
            .collect();

        tracing::info!(
            leaderboard = %self.leaderboard.name(),
            entries = self.state.len(),
            "Leaderboard loaded"
        );

        Ok(self.state.len())
    }

    /// Fold one performance into the state. Returns whether the user was eligible.
    pub fn update(&mut self, performance: &UserPerformance) -> bool {
        let Some(score) = self.leaderboard.calculate_score(performance) else {
            return false;
        };

        let initial_rating = self.config.initial_rating;
        let entry = self
            .state
            .entry(performance.id.clone())
            .or_insert_with(|| {
                LeaderboardEntry::new(
                    performance.id.clone(),
                    performance.username.clone(),
                    performance.avatar.clone(),
                    initial_rating,
                )
            });

        entry.username = performance.username.clone();
        entry.avatar = performance.avatar.clone();
        entry.badges = performance.badges(BADGES_KEY);
        entry.score = score;
        true
    }

    /// Run the rating update and apply every delta at once
    pub fn rate(&mut self) -> Result<(), DomainError> {
        self.state = self.rated_state()?;
        Ok(())
    }

    /// Copy of the state with this run's rating deltas applied
    fn rated_state(&mut self) -> Result<BTreeMap<UserId, LeaderboardEntry>, DomainError> {
        let deltas = self.strategy.rating_deltas(
            self.leaderboard.name(),
            &self.state,
            self.config.k_factor,
        )?;

        let mut rated = self.state.clone();
        for (id, delta) in deltas {
            if let Some(entry) = rated.get_mut(&id) {
                entry.elo += delta;
            }
        }

        tracing::debug!(
            leaderboard = %self.leaderboard.name(),
            strategy = self.strategy.name(),
            entries = rated.len(),
            "Ratings updated"
        );

        Ok(rated)
    }

    /// Current ranking without rating or persisting
    pub fn rankings(&self) -> Vec<LeaderboardExportItem> {
        rank_entries(self.state.values())
    }

    /// Rate, rank and persist.
    ///
    /// Refuses to run with fewer than two entries. The new ratings replace
    /// the working state only once the store accepted them; on success every
    /// entry's previous rank becomes its new rank.
    pub async fn save(&mut self) -> Result<Vec<LeaderboardExportItem>, AppError> {
        if self.state.len() < 2 {
            return Err(DomainError::NotEnoughEntries {
                leaderboard: self.leaderboard.name().to_string(),
                found: self.state.len(),
            }
            .into());
        }

        let mut rated = self.rated_state()?;
        let items = rank_entries(rated.values());
        self.store.save(self.leaderboard.name(), &items).await?;

        for item in &items {
            if let Some(entry) = rated.get_mut(&item.id) {
                entry.previous_rank = Some(item.rank);
            }
        }
        self.state = rated;

        tracing::info!(
            leaderboard = %self.leaderboard.name(),
            entries = items.len(),
            top = items.first().map(|i| i.username.as_str()).unwrap_or_default(),
            "Leaderboard saved"
        );

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::leaderboards::{NonVips, Overall};
    use crate::app::rating::PairwiseRoundRobin;
    use crate::config::RatingStrategyKind;
    use crate::domain::entities::{BadgeInformation, MetadataValue};
    use crate::test_utils::{
        test_export_item, test_performance, FailingLeaderboardStore, InMemoryLeaderboardStore,
    };

    fn pairwise_config() -> RatingConfig {
        RatingConfig {
            strategy: RatingStrategyKind::Pairwise,
            ..RatingConfig::default()
        }
    }

    fn service(store: Arc<InMemoryLeaderboardStore>) -> LeaderboardService<InMemoryLeaderboardStore> {
        LeaderboardService::new(store, Box::new(Overall), pairwise_config())
    }

    #[tokio::test]
    async fn load_of_unknown_board_is_empty() {
        let mut svc = service(Arc::new(InMemoryLeaderboardStore::new()));
        assert_eq!(svc.load().await.unwrap(), 0);
        assert!(svc.entries().is_empty());
    }

    #[tokio::test]
    async fn loaded_entries_keep_rating_and_rank() {
        let store = Arc::new(InMemoryLeaderboardStore::new().with_leaderboard(
            "overall",
            vec![test_export_item("a", 1, 1250.0), test_export_item("b", 2, 1150.0)],
        ));
        let mut svc = service(store);
        svc.load().await.unwrap();

        let a = &svc.entries()[&UserId::from("a")];
        assert_eq!(a.elo, 1250.0);
        assert_eq!(a.previous_rank, Some(1));
        assert_eq!(a.score, 0.0);
    }

    #[tokio::test]
    async fn update_creates_then_refreshes() {
        let mut svc = service(Arc::new(InMemoryLeaderboardStore::new()));
        let mut p = test_performance("a", &[("text", 1.0)]);
        assert!(svc.update(&p));

        p.username = "Renamed".to_string();
        p.metrics.insert("text".to_string(), 3.0);
        p.metadata.insert(
            "badges".to_string(),
            MetadataValue::Badges(vec![BadgeInformation {
                description: "Subscriber".to_string(),
                image_url: "https://img/sub".to_string(),
            }]),
        );
        svc.update(&p);

        let entry = &svc.entries()[&UserId::from("a")];
        assert_eq!(entry.username, "Renamed");
        assert_eq!(entry.score, 3.0);
        assert_eq!(entry.elo, 1200.0);
        assert_eq!(entry.badges.len(), 1);
    }

    #[tokio::test]
    async fn ineligible_users_are_skipped() {
        let mut svc = LeaderboardService::new(
            Arc::new(InMemoryLeaderboardStore::new()),
            Box::new(NonVips::default()),
            pairwise_config(),
        );
        let mut vip = test_performance("vip", &[("bits", 10.0)]);
        vip.metadata
            .insert("special_role".to_string(), MetadataValue::Flag(true));

        assert!(!svc.update(&vip));
        assert!(svc.entries().is_empty());
    }

    #[tokio::test]
    async fn save_requires_two_entries() {
        let store = Arc::new(InMemoryLeaderboardStore::new());
        let mut svc = service(store.clone());
        svc.update(&test_performance("a", &[("text", 1.0)]));

        let err = svc.save().await.unwrap_err();
        assert!(err.is_not_enough_entries());
        assert!(store.saved("overall").is_none());
    }

    #[tokio::test]
    async fn save_rates_ranks_and_persists() {
        let store = Arc::new(InMemoryLeaderboardStore::new());
        let mut svc = service(store.clone());
        svc.update(&test_performance("a", &[("text", 5.0)]));
        svc.update(&test_performance("b", &[("text", 1.0)]));

        let items = svc.save().await.unwrap();
        assert_eq!(items[0].id, UserId::from("a"));
        assert_eq!(items[0].rank, 1);
        assert!((items[0].elo - 1201.0).abs() < 1e-9);
        assert!((items[1].elo - 1199.0).abs() < 1e-9);

        assert_eq!(store.saved("overall").unwrap(), items);
        assert_eq!(svc.entries()[&UserId::from("b")].previous_rank, Some(2));
    }

    #[tokio::test]
    async fn absent_users_compete_with_zero() {
        let store = Arc::new(InMemoryLeaderboardStore::new().with_leaderboard(
            "overall",
            vec![test_export_item("gone", 1, 1300.0), test_export_item("b", 2, 1200.0)],
        ));
        let mut svc = service(store);
        svc.load().await.unwrap();
        svc.update(&test_performance("b", &[("text", 2.0)]));

        let items = svc.save().await.unwrap();
        let gone = items.iter().find(|i| i.id == UserId::from("gone")).unwrap();
        assert!(gone.elo < 1300.0);
    }

    #[tokio::test]
    async fn second_save_reports_rank_deltas() {
        let store = Arc::new(InMemoryLeaderboardStore::new());
        let mut svc = service(store);
        svc.update(&test_performance("a", &[("text", 5.0)]));
        svc.update(&test_performance("b", &[("text", 1.0)]));
        svc.save().await.unwrap();

        // b overtakes a by a wide margin
        svc.update(&test_performance("a", &[("text", 0.0)]));
        svc.update(&test_performance("b", &[("text", 9.0)]));
        for _ in 0..2 {
            svc.rate().unwrap();
        }
        let items = svc.save().await.unwrap();

        let b = items.iter().find(|i| i.id == UserId::from("b")).unwrap();
        assert_eq!(b.rank, 1);
        assert_eq!(b.delta, 1);
        let a = items.iter().find(|i| i.id == UserId::from("a")).unwrap();
        assert_eq!(a.delta, -1);
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let mut svc = LeaderboardService::with_strategy(
            Arc::new(FailingLeaderboardStore),
            Box::new(Overall),
            Box::new(PairwiseRoundRobin),
            pairwise_config(),
        );
        assert!(svc.load().await.is_err());

        svc.update(&test_performance("a", &[("text", 5.0)]));
        svc.update(&test_performance("b", &[("text", 1.0)]));
        let err = svc.save().await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Storage(_))));
        assert_eq!(svc.entries()[&UserId::from("a")].previous_rank, None);
    }

    #[tokio::test]
    async fn failed_saves_leave_ratings_untouched() {
        let mut svc = LeaderboardService::with_strategy(
            Arc::new(FailingLeaderboardStore),
            Box::new(Overall),
            Box::new(PairwiseRoundRobin),
            pairwise_config(),
        );
        svc.update(&test_performance("a", &[("text", 5.0)]));
        svc.update(&test_performance("b", &[("text", 1.0)]));

        for _ in 0..2 {
            assert!(svc.save().await.is_err());
        }

        assert_eq!(svc.entries()[&UserId::from("a")].elo, 1200.0);
        assert_eq!(svc.entries()[&UserId::from("b")].elo, 1200.0);
    }
}

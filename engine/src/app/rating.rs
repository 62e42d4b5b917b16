//! Rating update strategies
//!
//! A strategy looks at the raw scores and current ratings of every entry on a
//! leaderboard and returns the rating delta each entry should receive. All
//! deltas are computed from pre-update ratings and applied by the caller in
//! one step, so the iteration order never biases the outcome.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::config::{RatingConfig, RatingStrategyKind};
use crate::domain::entities::{LeaderboardEntry, UserId};
use crate::error::DomainError;

pub type RatingDeltas = BTreeMap<UserId, f64>;

/// Expected score of a player rated `rating` against one rated `opponent`
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

pub trait RatingStrategy: Send {
    fn name(&self) -> &'static str;

    /// Rating delta per entry. `leaderboard` only labels errors.
    fn rating_deltas(
        &mut self,
        leaderboard: &str,
        entries: &BTreeMap<UserId, LeaderboardEntry>,
        k_factor: f64,
    ) -> Result<RatingDeltas, DomainError>;
}

/// Build the strategy selected in `config`
pub fn strategy_from_config(config: &RatingConfig) -> Box<dyn RatingStrategy> {
    match config.strategy {
        RatingStrategyKind::Pairwise => Box::new(PairwiseRoundRobin),
        RatingStrategyKind::Sampled { samples } => match config.seed {
            Some(seed) => Box::new(SampledComparison::seeded(samples, seed)),
            None => Box::new(SampledComparison::new(samples)),
        },
    }
}

fn check_entries(
    leaderboard: &str,
    entries: &BTreeMap<UserId, LeaderboardEntry>,
) -> Result<(), DomainError> {
    if entries.len() < 2 {
        return Err(DomainError::NotEnoughEntries {
            leaderboard: leaderboard.to_string(),
            found: entries.len(),
        });
    }
    if let Some(entry) = entries.values().find(|e| !e.score.is_finite()) {
        return Err(DomainError::Validation(format!(
            "non-finite score {} for user {} on leaderboard {}",
            entry.score, entry.id, leaderboard
        )));
    }
    Ok(())
}

/// Every unordered pair of entries plays once. Equal scores count as a win
/// for both sides.
#[derive(Debug, Default, Clone, Copy)]
pub struct PairwiseRoundRobin;

impl RatingStrategy for PairwiseRoundRobin {
    fn name(&self) -> &'static str {
        "pairwise"
    }

    fn rating_deltas(
        &mut self,
        leaderboard: &str,
        entries: &BTreeMap<UserId, LeaderboardEntry>,
        k_factor: f64,
    ) -> Result<RatingDeltas, DomainError> {
        check_entries(leaderboard, entries)?;

        let players: Vec<&LeaderboardEntry> = entries.values().collect();
        let mut deltas: RatingDeltas = entries.keys().map(|id| (id.clone(), 0.0)).collect();

        for (i, a) in players.iter().enumerate() {
            for b in &players[i + 1..] {
                let a_won = if a.score >= b.score { 1.0 } else { 0.0 };
                let b_won = if b.score >= a.score { 1.0 } else { 0.0 };

                if let Some(delta) = deltas.get_mut(&a.id) {
                    *delta += k_factor * (a_won - expected_score(a.elo, b.elo));
                }
                if let Some(delta) = deltas.get_mut(&b.id) {
                    *delta += k_factor * (b_won - expected_score(b.elo, a.elo));
                }
            }
        }

        Ok(deltas)
    }
}

/// Every entry plays the same set of synthetic opponents drawn from a normal
/// distribution fitted to the population's raw scores. Each synthetic
/// opponent borrows the rating of the real entry with the closest score.
pub struct SampledComparison {
    samples: usize,
    rng: StdRng,
}

impl SampledComparison {
    pub fn new(samples: usize) -> Self {
        Self {
            samples,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(samples: usize, seed: u64) -> Self {
        Self {
            samples,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

/// Rating of the entry whose score is closest to `score`. Earlier ids win ties.
fn nearest_rating(players: &[&LeaderboardEntry], score: f64) -> f64 {
    let mut best: Option<(f64, f64)> = None;
    for player in players {
        let distance = (player.score - score).abs();
        if best.map_or(true, |(top, _)| distance < top) {
            best = Some((distance, player.elo));
        }
    }
    best.map(|(_, elo)| elo).unwrap_or_default()
}

impl RatingStrategy for SampledComparison {
    fn name(&self) -> &'static str {
        "sampled"
    }

    fn rating_deltas(
        &mut self,
        leaderboard: &str,
        entries: &BTreeMap<UserId, LeaderboardEntry>,
        k_factor: f64,
    ) -> Result<RatingDeltas, DomainError> {
        check_entries(leaderboard, entries)?;

        let players: Vec<&LeaderboardEntry> = entries.values().collect();
        let n = players.len() as f64;
        let mean = players.iter().map(|p| p.score).sum::<f64>() / n;
        let variance = players
            .iter()
            .map(|p| (p.score - mean).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();
        let normal = Normal::new(mean, std_dev).map_err(|e| {
            DomainError::Validation(format!(
                "cannot fit score distribution for leaderboard {} (mean {}, std {}): {}",
                leaderboard, mean, std_dev, e
            ))
        })?;

        let opponents: Vec<(f64, f64)> = (0..self.samples)
            .map(|_| {
                let score = normal.sample(&mut self.rng);
                (score, nearest_rating(&players, score))
            })
            .collect();

        debug!(
            leaderboard,
            mean,
            std_dev,
            samples = opponents.len(),
            "Drew synthetic opponents"
        );

        let deltas = players
            .iter()
            .map(|player| {
                let delta: f64 = opponents
                    .iter()
                    .map(|&(score, elo)| {
                        let won = if player.score > score { 1.0 } else { 0.0 };
                        k_factor * (won - expected_score(player.elo, elo))
                    })
                    .sum();
                (player.id.clone(), delta)
            })
            .collect();

        Ok(deltas)
    }
}

//! Leaderboard variants
//!
//! A variant decides who is eligible and which raw score they compete on.
//! Variants share nothing, so each can be rated independently.

use crate::domain::entities::UserPerformance;

pub trait Leaderboard: Send + Sync {
    /// Name used for persistence
    fn name(&self) -> &str;

    /// Raw score for `performance`, `None` when the user is not eligible
    fn calculate_score(&self, performance: &UserPerformance) -> Option<f64>;
}

/// Sum of every metric
#[derive(Debug, Default, Clone, Copy)]
pub struct Overall;

impl Leaderboard for Overall {
    fn name(&self) -> &str {
        "overall"
    }

    fn calculate_score(&self, performance: &UserPerformance) -> Option<f64> {
        Some(performance.total_score())
    }
}

/// Sum of every metric, excluding users holding a privileged role
#[derive(Debug, Clone)]
pub struct NonVips {
    role_key: String,
}

impl NonVips {
    pub fn new(role_key: impl Into<String>) -> Self {
        Self {
            role_key: role_key.into(),
        }
    }
}

impl Default for NonVips {
    fn default() -> Self {
        Self::new("special_role")
    }
}

impl Leaderboard for NonVips {
    fn name(&self) -> &str {
        "nonvips"
    }

    fn calculate_score(&self, performance: &UserPerformance) -> Option<f64> {
        if performance.flag(&self.role_key) {
            return None;
        }
        Some(performance.total_score())
    }
}

/// One metric's score. Everyone is eligible.
#[derive(Debug, Clone)]
pub struct SingleMetric {
    name: &'static str,
    metric: &'static str,
}

impl SingleMetric {
    pub fn new(name: &'static str, metric: &'static str) -> Self {
        Self { name, metric }
    }

    pub fn bits_only() -> Self {
        Self::new("bits-only", "bits")
    }

    pub fn subs_only() -> Self {
        Self::new("subs-only", "subs")
    }

    pub fn chat_only() -> Self {
        Self::new("chat-only", "text")
    }

    pub fn copypasta_leaders() -> Self {
        Self::new("copypasta", "copypasta")
    }
}

impl Leaderboard for SingleMetric {
    fn name(&self) -> &str {
        self.name
    }

    fn calculate_score(&self, performance: &UserPerformance) -> Option<f64> {
        Some(performance.metric(self.metric))
    }
}

/// Users wearing a partner badge. Every partner scores the same, so ratings
/// only separate partners through history.
#[derive(Debug, Clone)]
pub struct PartnersOnly {
    badges_key: String,
}

impl PartnersOnly {
    const PARTNER_DESCRIPTION: &'static str = "partner";
    const PARTNER_SCORE: f64 = 2.0;

    pub fn new(badges_key: impl Into<String>) -> Self {
        Self {
            badges_key: badges_key.into(),
        }
    }
}

impl Default for PartnersOnly {
    fn default() -> Self {
        Self::new("badges")
    }
}

impl Leaderboard for PartnersOnly {
    fn name(&self) -> &str {
        "partners-only"
    }

    fn calculate_score(&self, performance: &UserPerformance) -> Option<f64> {
        performance
            .badges(&self.badges_key)
            .iter()
            .any(|badge| badge.description == Self::PARTNER_DESCRIPTION)
            .then_some(Self::PARTNER_SCORE)
    }
}

/// Every standard variant
pub fn default_leaderboards() -> Vec<Box<dyn Leaderboard>> {
    vec![
        Box::new(Overall),
        Box::new(NonVips::default()),
        Box::new(SingleMetric::bits_only()),
        Box::new(SingleMetric::subs_only()),
        Box::new(SingleMetric::chat_only()),
        Box::new(SingleMetric::copypasta_leaders()),
        Box::new(PartnersOnly::default()),
    ]
}

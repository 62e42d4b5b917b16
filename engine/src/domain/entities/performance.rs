//! Per-user performance accumulated over one pass of a transcript

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::comment::UserId;

/// Displayable badge metadata resolved by the badge catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeInformation {
    pub description: String,
    pub image_url: String,
}

/// Classification value produced by a metadata evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataValue {
    Flag(bool),
    Badges(Vec<BadgeInformation>),
}

impl MetadataValue {
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            MetadataValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_badges(&self) -> Option<&[BadgeInformation]> {
        match self {
            MetadataValue::Badges(badges) => Some(badges),
            _ => None,
        }
    }
}

/// Partial update from a metric: user id -> score delta
pub type MetricUpdate = HashMap<UserId, f64>;

/// Partial update from a metadata evaluator: user id -> new value
pub type MetadataUpdate = HashMap<UserId, MetadataValue>;

/// Accumulated performance of one user.
///
/// Every registered metric and metadata key is present, defaulted when the
/// user never triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPerformance {
    pub id: UserId,
    pub username: String,
    pub avatar: String,
    pub metrics: BTreeMap<String, f64>,
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl UserPerformance {
    /// Score for one metric, 0.0 when the metric is unknown
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }

    /// Sum of every metric
    pub fn total_score(&self) -> f64 {
        self.metrics.values().sum()
    }

    /// Boolean metadata, false when absent or not a flag
    pub fn flag(&self, name: &str) -> bool {
        self.metadata
            .get(name)
            .and_then(MetadataValue::as_flag)
            .unwrap_or(false)
    }

    /// Badge metadata, empty when absent
    pub fn badges(&self, name: &str) -> Vec<BadgeInformation> {
        self.metadata
            .get(name)
            .and_then(MetadataValue::as_badges)
            .map(<[BadgeInformation]>::to_vec)
            .unwrap_or_default()
    }
}

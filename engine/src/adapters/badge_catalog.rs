//! In-memory badge catalog
//!
//! Built once before ingestion, either in code or from a JSON document of the
//! form `{"<set id>": {"<version>": {"description": .., "image_url": ..}}}`.

use std::collections::HashMap;

use crate::domain::entities::{Badge, BadgeInformation};
use crate::domain::ports::BadgeCatalog;
use crate::error::AppError;

pub type BadgeSets = HashMap<String, HashMap<String, BadgeInformation>>;

#[derive(Debug, Clone, Default)]
pub struct StaticBadgeCatalog {
    sets: BadgeSets,
}

impl StaticBadgeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(sets: BadgeSets) -> Self {
        Self { sets }
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(Self::from_map(serde_json::from_str(raw)?))
    }

    /// Add one badge version
    pub fn with_badge(mut self, set_id: &str, version: &str, info: BadgeInformation) -> Self {
        self.sets
            .entry(set_id.to_string())
            .or_default()
            .insert(version.to_string(), info);
        self
    }

    pub fn len(&self) -> usize {
        self.sets.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BadgeCatalog for StaticBadgeCatalog {
    fn resolve(&self, badge: &Badge) -> Option<BadgeInformation> {
        self.sets.get(&badge.id)?.get(&badge.version).cloned()
    }
}

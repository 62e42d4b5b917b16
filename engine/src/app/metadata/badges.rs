//! Resolves a user's badges to displayable metadata via the badge catalog

use std::sync::Arc;

use tracing::warn;

use crate::domain::entities::{Comment, MetadataUpdate, MetadataValue};
use crate::domain::ports::BadgeCatalog;
use crate::error::EvaluationError;

use super::Metadata;

pub struct Badges {
    catalog: Arc<dyn BadgeCatalog>,
}

impl Badges {
    pub fn new(catalog: Arc<dyn BadgeCatalog>) -> Self {
        Self { catalog }
    }
}

impl Metadata for Badges {
    fn name(&self) -> &'static str {
        "badges"
    }

    fn default_value(&self) -> MetadataValue {
        MetadataValue::Badges(Vec::new())
    }

    fn evaluate(
        &mut self,
        comment: &Comment,
        _sequence_no: u64,
    ) -> Result<MetadataUpdate, EvaluationError> {
        let resolved = comment
            .message
            .badges()
            .iter()
            .filter_map(|badge| {
                let info = self.catalog.resolve(badge);
                if info.is_none() {
                    warn!(badge = %badge.id, version = %badge.version, "Badge not found in catalog");
                }
                info
            })
            .collect();

        Ok(MetadataUpdate::from([(
            comment.user_id().clone(),
            MetadataValue::Badges(resolved),
        )]))
    }
}

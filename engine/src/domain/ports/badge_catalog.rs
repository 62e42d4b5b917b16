//! Badge lookup port
//!
//! Badge metadata is resolved before ingestion starts, so lookups are
//! synchronous from the engine's point of view.

use crate::domain::entities::{Badge, BadgeInformation};

/// Resolves a user's badge to displayable metadata
pub trait BadgeCatalog: Send + Sync {
    /// Look up a badge by set id and version
    fn resolve(&self, badge: &Badge) -> Option<BadgeInformation>;
}

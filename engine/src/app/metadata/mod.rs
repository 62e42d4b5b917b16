//! Metadata evaluators
//!
//! Metadata classifies users rather than scoring them. The latest value seen
//! for a user wins.

pub mod badges;
pub mod special_role;

use std::sync::Arc;

pub use badges::Badges;
pub use special_role::SpecialRole;

use crate::config::EngineConfig;
use crate::domain::entities::{Comment, MetadataUpdate, MetadataValue};
use crate::domain::ports::BadgeCatalog;
use crate::error::EvaluationError;

/// A classification over one comment
pub trait Metadata: Send {
    /// Key this metadata is stored under
    fn name(&self) -> &'static str;

    /// Value for users this metadata never classified
    fn default_value(&self) -> MetadataValue;

    /// Classification caused by `comment`
    fn evaluate(
        &mut self,
        comment: &Comment,
        sequence_no: u64,
    ) -> Result<MetadataUpdate, EvaluationError>;
}

/// The standard metadata set
pub fn default_metadata(
    config: &EngineConfig,
    catalog: Arc<dyn BadgeCatalog>,
) -> Vec<Box<dyn Metadata>> {
    vec![
        Box::new(SpecialRole::new(config.privileged_roles.clone())),
        Box::new(Badges::new(catalog)),
    ]
}

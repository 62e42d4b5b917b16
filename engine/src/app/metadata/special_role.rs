//! Flags users wearing a privileged role badge (moderator, VIP, broadcaster)

use std::collections::HashSet;

use crate::domain::entities::{Comment, MetadataUpdate, MetadataValue};
use crate::error::EvaluationError;

use super::Metadata;

#[derive(Debug, Clone)]
pub struct SpecialRole {
    roles: HashSet<String>,
}

impl SpecialRole {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_privileged(&self, comment: &Comment) -> bool {
        comment
            .message
            .badges()
            .iter()
            .any(|badge| self.roles.contains(&badge.id))
    }
}

impl Metadata for SpecialRole {
    fn name(&self) -> &'static str {
        "special_role"
    }

    fn default_value(&self) -> MetadataValue {
        MetadataValue::Flag(false)
    }

    fn evaluate(
        &mut self,
        comment: &Comment,
        _sequence_no: u64,
    ) -> Result<MetadataUpdate, EvaluationError> {
        Ok(MetadataUpdate::from([(
            comment.user_id().clone(),
            MetadataValue::Flag(self.is_privileged(comment)),
        )]))
    }
}

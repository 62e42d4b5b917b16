//! Metric evaluators
//!
//! A metric turns one comment into score deltas for the users involved.
//! Metrics that buffer state across comments flush it in `finish`.

pub mod bits;
pub mod copypasta;
pub mod emote;
pub mod subs;
pub mod text;

use std::collections::HashSet;

pub use bits::Bits;
pub use copypasta::{ChainTracker, CopypastaLeader};
pub use emote::Emote;
pub use subs::Subs;
pub use text::Text;

use crate::config::EngineConfig;
use crate::domain::entities::{Comment, MetricUpdate};
use crate::error::EvaluationError;

/// A scoring strategy over one comment
pub trait Metric: Send {
    /// Key this metric accumulates under
    fn name(&self) -> &'static str;

    /// Whether comments can be fed to this metric out of order
    fn can_parallelize(&self) -> bool;

    /// Score deltas caused by `comment`
    fn evaluate(
        &mut self,
        comment: &Comment,
        sequence_no: u64,
    ) -> Result<MetricUpdate, EvaluationError>;

    /// Residual score deltas after the last comment
    fn finish(&mut self) -> MetricUpdate {
        MetricUpdate::new()
    }
}

/// Update crediting `score` to the comment's author
pub(crate) fn credit_author(comment: &Comment, score: f64) -> MetricUpdate {
    MetricUpdate::from([(comment.user_id().clone(), score)])
}

/// The standard metric set.
///
/// `third_party_emotes` are emote names recognised inside plain text, resolved
/// before ingestion starts.
pub fn default_metrics(
    config: &EngineConfig,
    third_party_emotes: HashSet<String>,
) -> Vec<Box<dyn Metric>> {
    vec![
        Box::new(Bits::new(config.weights.bits)),
        Box::new(Subs::new(config.weights.subs)),
        Box::new(Text::new(
            config.weights.text,
            config.weights.text_target_length,
        )),
        Box::new(Emote::new(config.weights.emotes).with_third_party_emotes(third_party_emotes)),
        Box::new(CopypastaLeader::new(config.copypasta.clone())),
    ]
}

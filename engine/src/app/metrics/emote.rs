//! Emote metric: a fixed multiple per emote used
//!
//! Counts fragments that carry an emote marker, plus words that match a
//! pre-resolved set of third-party emote names.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::entities::{Comment, Fragment, MetricUpdate};
use crate::error::EvaluationError;

use super::{credit_author, Metric};

#[derive(Debug, Clone, Default)]
pub struct Emote {
    weight: f64,
    third_party: HashSet<String>,
}

impl Emote {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            third_party: HashSet::new(),
        }
    }

    pub fn with_third_party_emotes(mut self, emotes: HashSet<String>) -> Self {
        self.third_party = emotes;
        self
    }

    /// Emotes found in one fragment
    pub fn count_in_fragment(&self, fragment: &Fragment) -> usize {
        let marked = usize::from(fragment.is_emote());
        if self.third_party.is_empty() {
            return marked;
        }
        let words = fragment
            .text
            .split(' ')
            .filter(|word| self.third_party.contains(*word))
            .count();
        if words > 0 {
            debug!(count = words, text = %fragment.text, "Found third-party emotes");
        }
        marked + words
    }
}

impl Metric for Emote {
    fn name(&self) -> &'static str {
        "emote"
    }

    fn can_parallelize(&self) -> bool {
        true
    }

    fn evaluate(
        &mut self,
        comment: &Comment,
        _sequence_no: u64,
    ) -> Result<MetricUpdate, EvaluationError> {
        let count: usize = comment
            .message
            .fragments
            .iter()
            .map(|fragment| self.count_in_fragment(fragment))
            .sum();
        Ok(credit_author(comment, count as f64 * self.weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Emoticon, UserId};
    use crate::test_utils::{test_comment, test_comment_with_fragments};

    fn emote(text: &str) -> Fragment {
        Fragment {
            text: text.to_string(),
            emoticon: Some(Emoticon {
                emoticon_id: "25".to_string(),
            }),
        }
    }

    fn plain(text: &str) -> Fragment {
        Fragment {
            text: text.to_string(),
            emoticon: None,
        }
    }

    #[test]
    fn counts_marked_fragments_only() {
        let mut metric = Emote::new(0.02);
        let comment =
            test_comment_with_fragments("u1", vec![plain("hi "), emote("Kappa"), emote("PogChamp")]);
        let update = metric.evaluate(&comment, 0).unwrap();
        assert!((update[&UserId::from("u1")] - 0.04).abs() < 1e-9);
    }

    #[test]
    fn plain_text_scores_zero() {
        let mut metric = Emote::new(0.02);
        let update = metric.evaluate(&test_comment("u1", "no emotes here"), 0).unwrap();
        assert_eq!(update[&UserId::from("u1")], 0.0);
    }

    #[test]
    fn third_party_names_count_per_word() {
        let metric = Emote::new(0.02)
            .with_third_party_emotes(HashSet::from(["catJAM".to_string(), "OMEGALUL".to_string()]));
        assert_eq!(metric.count_in_fragment(&plain("catJAM catJAM OMEGALUL lol")), 3);
        assert_eq!(metric.count_in_fragment(&emote("catJAM")), 2);
    }
}

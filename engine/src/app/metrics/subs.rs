//! Subs metric: a fixed multiple per gifted subscription
//!
//! Gifts show up as system text in the chat, either as a single gift or as a
//! bulk "is gifting N ..." announcement.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::entities::{Comment, Fragment, MetricUpdate};
use crate::error::EvaluationError;

use super::{credit_author, Metric};

static SINGLE_GIFT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<gifter>[a-zA-Z0-9_]+) gifted a Tier (?P<tier>[0-9]) Sub to (?P<receiver>[a-zA-Z0-9_]+)!",
    )
    .expect("single gift pattern is valid")
});

static BULK_GIFT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<gifter>[a-zA-Z0-9_]+) is gifting (?P<no_of_subs>[0-9]+) Tier (?P<tier>[0-9]) Subs to (?P<streamer>[a-zA-Z0-9_]+)'s community!",
    )
    .expect("bulk gift pattern is valid")
});

#[derive(Debug, Clone)]
pub struct Subs {
    weight: f64,
}

impl Subs {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

/// Number of subs gifted by one fragment
pub fn gifted_subs(fragment: &Fragment) -> Result<u64, EvaluationError> {
    let mut total: u64 = 0;

    if SINGLE_GIFT.is_match(&fragment.text) {
        total = 1;
    }

    if let Some(caps) = BULK_GIFT.captures(&fragment.text) {
        let bulk = caps["no_of_subs"].parse::<u64>()?;
        total = total
            .checked_add(bulk)
            .ok_or(EvaluationError::CountOverflow)?;
    }

    Ok(total)
}

impl Metric for Subs {
    fn name(&self) -> &'static str {
        "subs"
    }

    fn can_parallelize(&self) -> bool {
        true
    }

    fn evaluate(
        &mut self,
        comment: &Comment,
        _sequence_no: u64,
    ) -> Result<MetricUpdate, EvaluationError> {
        let mut total = 0u64;
        for fragment in &comment.message.fragments {
            total = total
                .checked_add(gifted_subs(fragment)?)
                .ok_or(EvaluationError::CountOverflow)?;
        }
        Ok(credit_author(comment, total as f64 * self.weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserId;
    use crate::test_utils::test_comment;

    fn fragment(text: &str) -> Fragment {
        Fragment {
            text: text.to_string(),
            emoticon: None,
        }
    }

    #[test]
    fn single_gift_counts_one() {
        let n = gifted_subs(&fragment("alice gifted a Tier 1 Sub to bob!")).unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn bulk_gift_parses_count() {
        let n = gifted_subs(&fragment(
            "alice is gifting 25 Tier 1 Subs to streamer's community!",
        ))
        .unwrap();
        assert_eq!(n, 25);
    }

    #[test]
    fn ordinary_chat_counts_nothing() {
        assert_eq!(gifted_subs(&fragment("gift me a sub pls")).unwrap(), 0);
    }

    #[test]
    fn overflowing_count_is_an_evaluation_error() {
        let err = gifted_subs(&fragment(
            "alice is gifting 99999999999999999999999 Tier 1 Subs to streamer's community!",
        ))
        .unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidNumber(_)));
    }

    #[test]
    fn gift_total_overflow_across_fragments_is_an_evaluation_error() {
        let bulk = format!(
            "alice is gifting {} Tier 1 Subs to streamer's community!",
            u64::MAX
        );
        let mut comment = test_comment("alice", &bulk);
        comment.message.fragments.push(fragment(&bulk));

        let err = Subs::new(0.1).evaluate(&comment, 0).unwrap_err();
        assert!(matches!(err, EvaluationError::CountOverflow));
    }

    #[test]
    fn single_and_bulk_in_one_fragment_overflow_is_an_evaluation_error() {
        let text = format!(
            "bob gifted a Tier 1 Sub to carl! alice is gifting {} Tier 1 Subs to streamer's community!",
            u64::MAX
        );
        let err = gifted_subs(&fragment(&text)).unwrap_err();
        assert!(matches!(err, EvaluationError::CountOverflow));
    }

    #[test]
    fn evaluate_credits_gifter() {
        let mut subs = Subs::new(0.1);
        let comment = test_comment("u1", "alice is gifting 5 Tier 1 Subs to streamer's community!");
        let update = subs.evaluate(&comment, 0).unwrap();
        assert!((update[&UserId::from("u1")] - 0.5).abs() < 1e-9);
    }
}

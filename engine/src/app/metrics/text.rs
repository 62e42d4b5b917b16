//! Text metric: rewards messages near a target length
//!
//! `score = max(0, -w * x * (x - target))` where `x` is the body length in
//! characters. Very short and very long messages earn nothing.

use crate::domain::entities::{Comment, MetricUpdate};
use crate::error::EvaluationError;

use super::{credit_author, Metric};

#[derive(Debug, Clone)]
pub struct Text {
    weight: f64,
    target_length: usize,
}

impl Text {
    pub fn new(weight: f64, target_length: usize) -> Self {
        Self {
            weight,
            target_length,
        }
    }

    /// Length reward for a message of `length` characters
    pub fn score_for_length(&self, length: usize) -> f64 {
        let x = length as f64;
        let raw = -self.weight * x * (x - self.target_length as f64);
        raw.max(0.0)
    }
}

impl Metric for Text {
    fn name(&self) -> &'static str {
        "text"
    }

    fn can_parallelize(&self) -> bool {
        true
    }

    fn evaluate(
        &mut self,
        comment: &Comment,
        _sequence_no: u64,
    ) -> Result<MetricUpdate, EvaluationError> {
        let length = comment.message.body.chars().count();
        Ok(credit_author(comment, self.score_for_length(length)))
    }
}

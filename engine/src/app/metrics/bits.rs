//! Bits metric: a fixed multiple of the bits attached to a comment

use crate::domain::entities::{Comment, MetricUpdate};
use crate::error::EvaluationError;

use super::{credit_author, Metric};

#[derive(Debug, Clone)]
pub struct Bits {
    weight: f64,
}

impl Bits {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl Metric for Bits {
    fn name(&self) -> &'static str {
        "bits"
    }

    fn can_parallelize(&self) -> bool {
        true
    }

    fn evaluate(
        &mut self,
        comment: &Comment,
        _sequence_no: u64,
    ) -> Result<MetricUpdate, EvaluationError> {
        let bits = comment.message.bits_spent.unwrap_or(0);
        Ok(credit_author(comment, bits as f64 * self.weight))
    }
}

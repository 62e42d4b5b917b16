//! Copypasta leader metric
//!
//! Tracks chains of near-duplicate messages as they stream past. A chain is
//! owned by whoever posted the first message in it; later repeats, whoever
//! posts them, only extend its life. When a chain goes quiet for longer than
//! the grace window it is evicted and its owner is credited in proportion to
//! how many sequence numbers it stayed alive.
//!
//! State depends on comment order, so this metric must never be fed
//! comments out of order or from several threads.

use tracing::{debug, warn};

use crate::config::CopypastaConfig;
use crate::domain::entities::{Comment, MetricUpdate, UserId};
use crate::error::EvaluationError;

use super::Metric;

/// One active streak of a repeated message
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    /// Sequence number of the latest message that joined the chain
    pub last_seen: u64,
    /// Text of the message that opened the chain
    pub text: String,
    pub owner: UserId,
    /// Sequence number of the message that opened the chain
    pub start: u64,
    chars: Vec<char>,
}

impl Chain {
    fn open(text: &str, owner: &UserId, sequence_no: u64) -> Self {
        Self {
            last_seen: sequence_no,
            text: text.to_string(),
            owner: owner.clone(),
            start: sequence_no,
            chars: text.chars().collect(),
        }
    }

    /// Number of sequence numbers the chain stayed alive
    pub fn lifespan(&self) -> u64 {
        self.last_seen.saturating_sub(self.start)
    }
}

/// Length of the longest common subsequence of `a` and `b`
pub fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Similarity of `text` to a chain's representative text, in `[0, 1]`.
///
/// The representative is repeated (or cut) to the length of `text`, then the
/// LCS length is divided by the length of `text`.
pub fn similarity(text: &[char], representative: &[char]) -> f64 {
    if text.is_empty() || representative.is_empty() {
        return 0.0;
    }
    let padded: Vec<char> = representative
        .iter()
        .cycle()
        .take(text.len())
        .copied()
        .collect();
    lcs_len(&padded, text) as f64 / text.len() as f64
}

/// Active chains ordered by `last_seen`, oldest first.
///
/// Supports opening a chain, finding the best match, touching a chain and
/// expiring the oldest ones. Scans are linear; the active set is capped.
#[derive(Debug, Clone)]
pub struct ChainTracker {
    chains: Vec<Chain>,
    config: CopypastaConfig,
}

impl ChainTracker {
    pub fn new(config: CopypastaConfig) -> Self {
        Self {
            chains: Vec::new(),
            config,
        }
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Feed one message and return the credit of any chains it retired
    pub fn observe(&mut self, text: &str, user: &UserId, sequence_no: u64) -> MetricUpdate {
        let mut credits = MetricUpdate::new();
        self.expire(sequence_no, &mut credits);

        let chars: Vec<char> = text.chars().collect();
        match self.best_match(&chars) {
            Some((index, score)) if score >= self.config.matching_threshold => {
                debug!(
                    sequence_no,
                    owner = %self.chains[index].owner,
                    similarity = score,
                    "Message joined copypasta chain"
                );
                self.touch(index, sequence_no);
            }
            _ => self.insert(Chain::open(text, user, sequence_no)),
        }

        self.enforce_cap(&mut credits);
        credits
    }

    /// Retire every active chain
    pub fn flush(&mut self) -> MetricUpdate {
        let mut credits = MetricUpdate::new();
        for chain in std::mem::take(&mut self.chains) {
            self.credit(chain, &mut credits);
        }
        credits
    }

    fn best_match(&self, chars: &[char]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, chain) in self.chains.iter().enumerate() {
            let score = similarity(chars, &chain.chars);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
            }
        }
        best
    }

    fn insert(&mut self, chain: Chain) {
        let at = self
            .chains
            .partition_point(|existing| existing.last_seen <= chain.last_seen);
        self.chains.insert(at, chain);
    }

    fn touch(&mut self, index: usize, sequence_no: u64) {
        let mut chain = self.chains.remove(index);
        chain.last_seen = chain.last_seen.max(sequence_no);
        self.insert(chain);
    }

    fn expire(&mut self, sequence_no: u64, credits: &mut MetricUpdate) {
        let grace = self.config.chain_grace;
        let expired = self
            .chains
            .partition_point(|chain| sequence_no.saturating_sub(chain.last_seen) > grace);
        let retired: Vec<Chain> = self.chains.drain(..expired).collect();
        for chain in retired {
            self.credit(chain, credits);
        }
    }

    fn enforce_cap(&mut self, credits: &mut MetricUpdate) {
        while self.chains.len() > self.config.max_active_chains {
            let chain = self.chains.remove(0);
            warn!(
                active = self.chains.len() + 1,
                cap = self.config.max_active_chains,
                owner = %chain.owner,
                "Too many active copypasta chains, retiring the oldest early"
            );
            self.credit(chain, credits);
        }
    }

    fn credit(&self, chain: Chain, credits: &mut MetricUpdate) {
        let score = chain.lifespan() as f64 * self.config.weight;
        debug!(
            owner = %chain.owner,
            start = chain.start,
            last_seen = chain.last_seen,
            score,
            "Copypasta chain retired"
        );
        *credits.entry(chain.owner).or_insert(0.0) += score;
    }
}

/// Metric crediting the originators of copypasta chains
#[derive(Debug, Clone)]
pub struct CopypastaLeader {
    tracker: ChainTracker,
}

impl CopypastaLeader {
    pub fn new(config: CopypastaConfig) -> Self {
        Self {
            tracker: ChainTracker::new(config),
        }
    }

    pub fn active_chains(&self) -> usize {
        self.tracker.len()
    }
}

impl Metric for CopypastaLeader {
    fn name(&self) -> &'static str {
        "copypasta"
    }

    fn can_parallelize(&self) -> bool {
        false
    }

    fn evaluate(
        &mut self,
        comment: &Comment,
        sequence_no: u64,
    ) -> Result<MetricUpdate, EvaluationError> {
        let text = comment.text();
        if text.is_empty() {
            return Ok(MetricUpdate::new());
        }
        Ok(self.tracker.observe(&text, comment.user_id(), sequence_no))
    }

    fn finish(&mut self) -> MetricUpdate {
        self.tracker.flush()
    }
}

//! Chat log processor
//!
//! Drives every metric and metadata evaluator over a transcript in a single,
//! strictly ordered pass and folds their partial updates into one
//! `UserPerformance` per user.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::app::metadata::{default_metadata, Metadata};
use crate::app::metrics::{default_metrics, Metric};
use crate::config::EngineConfig;
use crate::domain::entities::{
    ChatLog, Comment, MetadataUpdate, MetadataValue, MetricUpdate, UserId, UserPerformance,
};
use crate::domain::ports::BadgeCatalog;

/// Single-pass aggregator of evaluator output
pub struct ChatLogProcessor {
    metrics: Vec<Box<dyn Metric>>,
    metadata: Vec<Box<dyn Metadata>>,
    metric_defaults: BTreeMap<String, f64>,
    metadata_defaults: BTreeMap<String, MetadataValue>,
    performances: HashMap<UserId, UserPerformance>,
}

impl ChatLogProcessor {
    pub fn new(metrics: Vec<Box<dyn Metric>>, metadata: Vec<Box<dyn Metadata>>) -> Self {
        let metric_defaults = metrics
            .iter()
            .map(|metric| (metric.name().to_string(), 0.0))
            .collect();
        let metadata_defaults = metadata
            .iter()
            .map(|meta| (meta.name().to_string(), meta.default_value()))
            .collect();

        Self {
            metrics,
            metadata,
            metric_defaults,
            metadata_defaults,
            performances: HashMap::new(),
        }
    }

    /// Processor with the standard evaluators
    pub fn with_defaults(
        config: &EngineConfig,
        catalog: Arc<dyn BadgeCatalog>,
        third_party_emotes: HashSet<String>,
    ) -> Self {
        Self::new(
            default_metrics(config, third_party_emotes),
            default_metadata(config, catalog),
        )
    }

    pub fn metric_names(&self) -> Vec<&'static str> {
        self.metrics.iter().map(|metric| metric.name()).collect()
    }

    pub fn metadata_names(&self) -> Vec<&'static str> {
        self.metadata.iter().map(|meta| meta.name()).collect()
    }

    /// Run the full pass and return one performance per user, ordered by id
    pub fn process(mut self, chat_log: &ChatLog) -> Vec<UserPerformance> {
        let start_time = Instant::now();
        info!(comments = chat_log.len(), "Processing chat log");

        let parallel_safe: Vec<&str> = self
            .metrics
            .iter()
            .filter(|metric| metric.can_parallelize())
            .map(|metric| metric.name())
            .collect();
        debug!(?parallel_safe, "Metrics that tolerate reordering");

        for (sequence_no, comment) in chat_log.comments.iter().enumerate() {
            self.process_comment(comment, sequence_no as u64);
        }

        let mut residuals = Vec::with_capacity(self.metrics.len());
        for metric in self.metrics.iter_mut() {
            residuals.push((metric.name(), metric.finish()));
        }
        for (name, update) in residuals {
            self.apply_metric(name, update);
        }

        let mut performances: Vec<UserPerformance> = self.performances.into_values().collect();
        performances.sort_by(|a, b| a.id.cmp(&b.id));

        info!(
            users = performances.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Chat log processed"
        );
        performances
    }

    fn process_comment(&mut self, comment: &Comment, sequence_no: u64) {
        let performance = self.performance_or_default(comment.user_id());
        performance.username = comment.commenter.display_name.clone();
        performance.avatar = comment.commenter.logo.clone();

        let mut metric_updates = Vec::with_capacity(self.metrics.len());
        for metric in self.metrics.iter_mut() {
            match metric.evaluate(comment, sequence_no) {
                Ok(update) => metric_updates.push((metric.name(), update)),
                Err(e) => warn!(
                    metric = metric.name(),
                    sequence_no,
                    comment_id = %comment.id,
                    error = %e,
                    "Metric failed on comment, contributing zero"
                ),
            }
        }

        let mut metadata_updates = Vec::with_capacity(self.metadata.len());
        for meta in self.metadata.iter_mut() {
            match meta.evaluate(comment, sequence_no) {
                Ok(update) => metadata_updates.push((meta.name(), update)),
                Err(e) => warn!(
                    metadata = meta.name(),
                    sequence_no,
                    comment_id = %comment.id,
                    error = %e,
                    "Metadata failed on comment, leaving value unchanged"
                ),
            }
        }

        for (name, update) in metric_updates {
            self.apply_metric(name, update);
        }
        for (name, update) in metadata_updates {
            self.apply_metadata(name, update);
        }
    }

    fn apply_metric(&mut self, name: &str, update: MetricUpdate) {
        for (user_id, delta) in update {
            let performance = self.performance_or_default(&user_id);
            *performance.metrics.entry(name.to_string()).or_insert(0.0) += delta;
        }
    }

    fn apply_metadata(&mut self, name: &str, update: MetadataUpdate) {
        for (user_id, value) in update {
            let performance = self.performance_or_default(&user_id);
            performance.metadata.insert(name.to_string(), value);
        }
    }

    fn performance_or_default(&mut self, user_id: &UserId) -> &mut UserPerformance {
        let metric_defaults = &self.metric_defaults;
        let metadata_defaults = &self.metadata_defaults;
        self.performances
            .entry(user_id.clone())
            .or_insert_with(|| UserPerformance {
                id: user_id.clone(),
                username: String::new(),
                avatar: String::new(),
                metrics: metric_defaults.clone(),
                metadata: metadata_defaults.clone(),
            })
    }
}

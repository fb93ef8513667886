use serde::{Deserialize, Serialize};

/// Default number of hits returned by a ranking call.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;
/// Relevance values closer than this are ordered by rating.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// Upper bound on shards per available core.
pub const MAX_SHARDS_PER_CORE: usize = 4;

/// Tunables for ranking and parallel execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_results: usize,
    pub relevance_epsilon: f64,
    /// Shards in the inverted postings and in each parallel score accumulator.
    pub shard_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULT_DOCUMENT_COUNT,
            relevance_epsilon: RELEVANCE_EPSILON,
            shard_count: default_shards(),
        }
    }
}

impl SearchConfig {
    /// `shard_count` clamped to `1..=MAX_SHARDS_PER_CORE * cores`.
    pub fn effective_shard_count(&self) -> usize {
        self.shard_count.clamp(1, MAX_SHARDS_PER_CORE * default_shards())
    }
}

fn default_shards() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

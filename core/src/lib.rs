//! In-memory full-text index with TF-IDF ranking.
//!
//! [`SearchIndex`] keeps a forward (document → terms) and an inverted
//! (term → documents) posting structure in sync. Ranking and matching run
//! either on the calling thread or fanned out over rayon workers, selected by
//! [`ExecutionMode`].

pub mod accumulator;
pub mod config;
pub mod document;
pub mod duplicates;
pub mod error;
pub mod index;
pub mod log_duration;
pub mod matching;
pub mod process_queries;
pub mod query;
pub mod ranking;
pub mod request_queue;
mod terms;
pub mod tokenizer;

pub use accumulator::ShardedAccumulator;
pub use config::SearchConfig;
pub use document::{Document, DocumentRecord, DocumentStatus};
pub use duplicates::remove_duplicates;
pub use error::{Error, Result};
pub use index::{DocId, SearchIndex, TermId};
pub use log_duration::LogDuration;
pub use process_queries::{process_queries, process_queries_joined};
pub use query::{ParseMode, Query};
pub use ranking::DocumentPredicate;
pub use request_queue::RequestQueue;
pub use tokenizer::StopWords;

/// Whether an operation runs on the calling thread or fans out over the
/// rayon thread pool before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

//! TF-IDF ranking over a [`SearchIndex`].
//!
//! Relevance of a document is the sum over matching plus words of
//! `tf * ln(N / df)`. Documents containing any minus word are dropped after
//! scoring. Hits are ordered by relevance, with near-equal relevance
//! (within [`SearchConfig::relevance_epsilon`](crate::SearchConfig)) ordered
//! by rating, and truncated to `max_results`.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;

use crate::accumulator::ShardedAccumulator;
use crate::document::{Document, DocumentRecord, DocumentStatus};
use crate::error::Result;
use crate::index::{DocId, Postings, SearchIndex};
use crate::query::{ParseMode, Query};
use crate::ExecutionMode;

type CustomPredicate = dyn Fn(DocId, DocumentStatus, i32) -> bool + Send + Sync;

/// Selects which documents may be scored.
pub enum DocumentPredicate {
    ByStatus(DocumentStatus),
    Custom(Box<CustomPredicate>),
}

impl DocumentPredicate {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(DocId, DocumentStatus, i32) -> bool + Send + Sync + 'static,
    {
        DocumentPredicate::Custom(Box::new(f))
    }

    pub fn matches(&self, id: DocId, record: &DocumentRecord) -> bool {
        match self {
            DocumentPredicate::ByStatus(status) => record.status == *status,
            DocumentPredicate::Custom(f) => f(id, record.status, record.rating),
        }
    }
}

impl Default for DocumentPredicate {
    fn default() -> Self {
        DocumentPredicate::ByStatus(DocumentStatus::Actual)
    }
}

impl From<DocumentStatus> for DocumentPredicate {
    fn from(status: DocumentStatus) -> Self {
        DocumentPredicate::ByStatus(status)
    }
}

impl fmt::Debug for DocumentPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentPredicate::ByStatus(status) => f.debug_tuple("ByStatus").field(status).finish(),
            DocumentPredicate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl SearchIndex {
    /// Rank `Actual` documents sequentially.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with(ExecutionMode::Sequential, raw_query, &DocumentPredicate::default())
    }

    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_with(ExecutionMode::Sequential, raw_query, &status.into())
    }

    pub fn find_top_documents_with(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        predicate: &DocumentPredicate,
    ) -> Result<Vec<Document>> {
        let query = Query::parse(raw_query, self.stop_words(), ParseMode::Normalized)?;
        let mut relevance = match mode {
            ExecutionMode::Sequential => self.score_sequential(&query, predicate),
            ExecutionMode::Parallel => self.score_parallel(&query, predicate),
        };
        self.exclude_minus_words(&query, &mut relevance);

        let mut matched: Vec<Document> = relevance
            .into_iter()
            .filter_map(|(id, relevance)| {
                self.document(id).map(|record| Document { id, relevance, rating: record.rating })
            })
            .collect();
        let total = matched.len();
        sort_by_relevance(&mut matched, self.config().relevance_epsilon);
        matched.truncate(self.config().max_results);

        tracing::debug!(?mode, total, returned = matched.len(), "ranked query");
        Ok(matched)
    }

    fn inverse_document_freq(&self, postings: &Postings) -> f64 {
        (self.document_count() as f64 / postings.len() as f64).ln()
    }

    fn passes(&self, predicate: &DocumentPredicate, id: DocId) -> bool {
        self.document(id).is_some_and(|record| predicate.matches(id, record))
    }

    fn score_sequential(&self, query: &Query<'_>, predicate: &DocumentPredicate) -> BTreeMap<DocId, f64> {
        let mut relevance = BTreeMap::new();
        for word in &query.plus_words {
            let Some((_, postings)) = self.lookup_term(word) else {
                continue;
            };
            let idf = self.inverse_document_freq(postings);
            for (&id, &tf) in postings {
                if self.passes(predicate, id) {
                    *relevance.entry(id).or_default() += tf * idf;
                }
            }
        }
        relevance
    }

    fn score_parallel(&self, query: &Query<'_>, predicate: &DocumentPredicate) -> BTreeMap<DocId, f64> {
        let scores: ShardedAccumulator<DocId, f64> =
            ShardedAccumulator::new(self.config().effective_shard_count());
        query.plus_words.par_iter().for_each(|word| {
            let Some((_, postings)) = self.lookup_term(word) else {
                return;
            };
            let idf = self.inverse_document_freq(postings);
            for (&id, &tf) in postings {
                if self.passes(predicate, id) {
                    *scores.access(id) += tf * idf;
                }
            }
        });
        scores.into_ordinary_map()
    }

    /// Drop every document containing a minus word, whether or not it was scored.
    fn exclude_minus_words(&self, query: &Query<'_>, relevance: &mut BTreeMap<DocId, f64>) {
        for word in &query.minus_words {
            if let Some((_, postings)) = self.lookup_term(word) {
                for id in postings.keys() {
                    relevance.remove(id);
                }
            }
        }
    }
}

/// Order by relevance descending. Runs of hits within `epsilon` of the run's
/// first hit are reordered by rating descending, then id ascending.
pub(crate) fn sort_by_relevance(docs: &mut [Document], epsilon: f64) {
    docs.sort_by(|a, b| b.relevance.total_cmp(&a.relevance).then(a.id.cmp(&b.id)));
    let mut start = 0;
    while start < docs.len() {
        let head = docs[start].relevance;
        // The head always opens its own run, even for a zero or NaN epsilon.
        let len = 1 + docs[start + 1..].iter().take_while(|d| head - d.relevance < epsilon).count();
        docs[start..start + len].sort_by(|a, b| b.rating.cmp(&a.rating).then(a.id.cmp(&b.id)));
        start += len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::StopWords;

    fn pets() -> SearchIndex {
        let mut idx = SearchIndex::from_stop_words_text("and in at").unwrap();
        idx.add_document(1, "curly cat curly tail", DocumentStatus::Actual, &[7, 2, 7]).unwrap();
        idx.add_document(2, "curly dog and fancy collar", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
        idx.add_document(3, "big cat fancy collar", DocumentStatus::Banned, &[1, 2, 8]).unwrap();
        idx
    }

    #[test]
    fn scores_tf_idf() {
        let idx = pets();
        let hits = idx.find_top_documents("curly dog").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 2);
        let expected = 0.25 * (3.0f64 / 2.0).ln() + 0.25 * 3.0f64.ln();
        assert!((hits[0].relevance - expected).abs() < 1e-12);
        assert_eq!(hits[1].id, 1);
        assert!((hits[1].relevance - 0.5 * (3.0f64 / 2.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn status_and_custom_predicates() {
        let idx = pets();
        let banned = idx.find_top_documents_by_status("cat", DocumentStatus::Banned).unwrap();
        assert_eq!(banned.iter().map(|d| d.id).collect::<Vec<_>>(), vec![3]);

        let high = DocumentPredicate::custom(|_, _, rating| rating >= 3);
        let hits = idx.find_top_documents_with(ExecutionMode::Sequential, "cat collar", &high).unwrap();
        let mut ids: Vec<DocId> = hits.iter().map(|d| d.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn minus_word_excludes_unscored_documents() {
        let idx = pets();
        let hits = idx.find_top_documents("cat -dog").unwrap();
        assert_eq!(hits.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1]);
        let hits = idx.find_top_documents("fancy -tail").unwrap();
        assert_eq!(hits.iter().map(|d| d.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn unknown_and_stop_words_give_nothing() {
        let idx = pets();
        assert!(idx.find_top_documents("and in").unwrap().is_empty());
        assert!(idx.find_top_documents("parrot").unwrap().is_empty());
        assert!(idx.find_top_documents("").unwrap().is_empty());
    }

    #[test]
    fn malformed_query_is_rejected() {
        let idx = pets();
        assert!(idx.find_top_documents("cat --dog").is_err());
        assert!(idx.find_top_documents_with(ExecutionMode::Parallel, "cat -", &DocumentPredicate::default()).is_err());
    }

    #[test]
    fn truncates_and_breaks_ties_by_rating() {
        let mut idx = SearchIndex::new(StopWords::default());
        for id in 0..8 {
            idx.add_document(id, "same words here", DocumentStatus::Actual, &[id * 10]).unwrap();
        }
        idx.add_document(8, "other", DocumentStatus::Actual, &[]).unwrap();
        let hits = idx.find_top_documents("words").unwrap();
        assert_eq!(hits.len(), 5);
        let ratings: Vec<i32> = hits.iter().map(|d| d.rating).collect();
        assert_eq!(ratings, vec![70, 60, 50, 40, 30]);
    }

    #[test]
    fn sort_terminates_for_degenerate_epsilon() {
        let doc = |id, relevance, rating| Document { id, relevance, rating };
        for epsilon in [0.0, -1.0, f64::NAN] {
            let mut docs = vec![doc(1, 0.5, 1), doc(2, 0.5, 9), doc(3, 0.7, 0)];
            sort_by_relevance(&mut docs, epsilon);
            assert_eq!(docs.iter().map(|d| d.id).collect::<Vec<_>>(), vec![3, 1, 2], "epsilon {epsilon}");
        }
    }

    #[test]
    fn parallel_agrees_with_sequential() {
        let idx = pets();
        let pred = DocumentPredicate::custom(|_, _, _| true);
        for q in ["curly dog", "cat collar -tail", "fancy big curly cat"] {
            let seq = idx.find_top_documents_with(ExecutionMode::Sequential, q, &pred).unwrap();
            let par = idx.find_top_documents_with(ExecutionMode::Parallel, q, &pred).unwrap();
            assert_eq!(seq.len(), par.len());
            for (a, b) in seq.iter().zip(&par) {
                assert_eq!(a.id, b.id);
                assert!((a.relevance - b.relevance).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn sort_is_tolerance_based() {
        let mut docs = vec![
            Document { id: 1, relevance: 0.5, rating: 1 },
            Document { id: 2, relevance: 0.5 + 1e-9, rating: 9 },
            Document { id: 3, relevance: 0.9, rating: 0 },
            Document { id: 4, relevance: 0.5 - 1e-9, rating: 5 },
        ];
        sort_by_relevance(&mut docs, 1e-6);
        assert_eq!(docs.iter().map(|d| d.id).collect::<Vec<_>>(), vec![3, 2, 4, 1]);
    }
}

use rayon::prelude::*;
use std::collections::{btree_map, BTreeMap, HashMap};

use crate::config::SearchConfig;
use crate::document::{average_rating, DocumentRecord, DocumentStatus};
use crate::error::{Error, Result};
use crate::terms::TermPool;
use crate::tokenizer::{tokenize, StopWords};
use crate::ExecutionMode;

pub type TermId = u32;
pub type DocId = i32;

/// Document id → term frequency, ordered by id.
pub type Postings = BTreeMap<DocId, f64>;

type PostingShard = HashMap<TermId, Postings>;

/// In-memory forward and inverted index over a mutable document collection.
///
/// The inverted postings are split into a fixed number of shards keyed by
/// `term_id % shard_count`, so removal can erase terms from several shards in
/// parallel with each worker owning its shard exclusively.
#[derive(Debug)]
pub struct SearchIndex {
    config: SearchConfig,
    stop_words: StopWords,
    terms: TermPool,
    word_to_docs: Vec<PostingShard>,
    doc_to_words: BTreeMap<DocId, BTreeMap<TermId, f64>>,
    documents: BTreeMap<DocId, DocumentRecord>,
}

impl SearchIndex {
    pub fn new(stop_words: StopWords) -> Self {
        Self::with_config(stop_words, SearchConfig::default())
    }

    pub fn with_config(stop_words: StopWords, config: SearchConfig) -> Self {
        let shards = config.effective_shard_count();
        Self {
            config,
            stop_words,
            terms: TermPool::default(),
            word_to_docs: (0..shards).map(|_| PostingShard::new()).collect(),
            doc_to_words: BTreeMap::new(),
            documents: BTreeMap::new(),
        }
    }

    /// Build from space-separated stop words, e.g. `"and in at"`.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Ok(Self::new(StopWords::from_text(text)?))
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    pub fn add_document(
        &mut self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if id < 0 {
            return Err(Error::invalid(format!("document id {id} is negative")));
        }
        if self.documents.contains_key(&id) {
            return Err(Error::invalid(format!("document id {id} already exists")));
        }
        let words = tokenize(text, &self.stop_words)?;

        let mut freqs: BTreeMap<TermId, f64> = BTreeMap::new();
        if !words.is_empty() {
            let inv_word_count = 1.0 / words.len() as f64;
            for word in &words {
                let term = self.terms.intern(word);
                *freqs.entry(term).or_default() += inv_word_count;
            }
        }
        let shards = self.word_to_docs.len();
        for (&term, &tf) in &freqs {
            self.word_to_docs[term as usize % shards]
                .entry(term)
                .or_default()
                .insert(id, tf);
        }

        tracing::debug!(
            id,
            words = words.len(),
            terms = freqs.len(),
            pool = self.terms.len(),
            %status,
            "added document"
        );
        self.doc_to_words.insert(id, freqs);
        self.documents.insert(
            id,
            DocumentRecord { rating: average_rating(ratings), status, text: text.to_string() },
        );
        Ok(())
    }

    /// Remove a document and every posting that references it. Absent ids
    /// are ignored.
    pub fn remove_document(&mut self, id: DocId) {
        self.remove_document_with(ExecutionMode::Sequential, id);
    }

    pub fn remove_document_with(&mut self, mode: ExecutionMode, id: DocId) {
        let Some(freqs) = self.doc_to_words.remove(&id) else {
            return;
        };
        self.documents.remove(&id);

        let shards = self.word_to_docs.len();
        match mode {
            ExecutionMode::Sequential => {
                for &term in freqs.keys() {
                    erase_posting(&mut self.word_to_docs[term as usize % shards], term, id);
                }
            }
            ExecutionMode::Parallel => {
                let mut by_shard: Vec<Vec<TermId>> = vec![Vec::new(); shards];
                for &term in freqs.keys() {
                    by_shard[term as usize % shards].push(term);
                }
                self.word_to_docs
                    .par_iter_mut()
                    .zip(by_shard.par_iter())
                    .filter(|(_, terms)| !terms.is_empty())
                    .for_each(|(shard, terms)| {
                        for &term in terms {
                            erase_posting(shard, term, id);
                        }
                    });
            }
        }
        tracing::debug!(id, terms = freqs.len(), ?mode, "removed document");
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn document(&self, id: DocId) -> Option<&DocumentRecord> {
        self.documents.get(&id)
    }

    /// Term frequencies of one document; empty when the id is not live.
    pub fn word_frequencies(&self, id: DocId) -> BTreeMap<&str, f64> {
        self.doc_to_words
            .get(&id)
            .map(|freqs| {
                freqs.iter().map(|(&term, &tf)| (self.terms.resolve(term), tf)).collect()
            })
            .unwrap_or_default()
    }

    /// Postings of a term, `None` when no live document contains it.
    pub fn term_postings(&self, word: &str) -> Option<&Postings> {
        self.lookup_term(word).map(|(_, postings)| postings)
    }

    /// Every term with at least one live posting, in no particular order.
    pub fn indexed_terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.word_to_docs
            .iter()
            .flat_map(|shard| shard.keys())
            .map(|&term| self.terms.resolve(term))
    }

    /// Live ids in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        self.documents.keys().copied()
    }

    /// Resolve a word to its pooled text and postings.
    pub(crate) fn lookup_term(&self, word: &str) -> Option<(&str, &Postings)> {
        let term = self.terms.get(word)?;
        let postings = self.word_to_docs[term as usize % self.word_to_docs.len()].get(&term)?;
        Some((self.terms.resolve(term), postings))
    }

    /// Set of term ids a document contains.
    pub(crate) fn document_terms(&self, id: DocId) -> Option<impl Iterator<Item = TermId> + '_> {
        self.doc_to_words.get(&id).map(|freqs| freqs.keys().copied())
    }
}

pub type Iter<'a> = std::iter::Copied<btree_map::Keys<'a, DocId, DocumentRecord>>;

impl<'a> IntoIterator for &'a SearchIndex {
    type Item = DocId;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn erase_posting(shard: &mut PostingShard, term: TermId, id: DocId) {
    if let Some(postings) = shard.get_mut(&term) {
        postings.remove(&id);
        if postings.is_empty() {
            shard.remove(&term);
        }
    }
}

use rayon::prelude::*;

use crate::document::DocumentStatus;
use crate::error::{Error, Result};
use crate::index::{DocId, SearchIndex};
use crate::query::{ParseMode, Query};
use crate::ExecutionMode;

impl SearchIndex {
    pub fn match_document(&self, raw_query: &str, id: DocId) -> Result<(Vec<&str>, DocumentStatus)> {
        self.match_document_with(ExecutionMode::Sequential, raw_query, id)
    }

    /// Plus words of the query that occur in document `id`, or nothing if any
    /// minus word occurs in it.
    ///
    /// Sequential mode reports words in query order. Parallel mode reports
    /// them sorted; both contain the same words. A plus word repeated in the
    /// query is reported once, at its first position.
    pub fn match_document_with(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<&str>, DocumentStatus)> {
        let status = self.document(id).ok_or(Error::NotFound(id))?.status;
        let query = Query::parse(raw_query, self.stop_words(), ParseMode::PreserveOrder)?;
        let word_checker = |word: &str| self.term_in_document(word, id);

        let matched = match mode {
            ExecutionMode::Sequential => {
                if query.minus_words.iter().any(|w| word_checker(*w).is_some()) {
                    return Ok((Vec::new(), status));
                }
                let mut matched: Vec<&str> = Vec::new();
                for word in query.plus_words.iter().filter_map(|w| word_checker(*w)) {
                    if !matched.contains(&word) {
                        matched.push(word);
                    }
                }
                matched
            }
            ExecutionMode::Parallel => {
                if query.minus_words.par_iter().any(|w| word_checker(*w).is_some()) {
                    return Ok((Vec::new(), status));
                }
                let mut matched: Vec<&str> =
                    query.plus_words.par_iter().filter_map(|w| word_checker(*w)).collect();
                matched.sort_unstable();
                matched.dedup();
                matched
            }
        };
        Ok((matched, status))
    }

    fn term_in_document(&self, word: &str, id: DocId) -> Option<&str> {
        self.lookup_term(word)
            .filter(|(_, postings)| postings.contains_key(&id))
            .map(|(term, _)| term)
    }
}

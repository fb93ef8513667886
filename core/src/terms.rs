use std::collections::HashMap;
use std::sync::Arc;

use crate::TermId;

/// Append-only pool of interned terms.
///
/// Each distinct term is stored once and keeps its id for the lifetime of the
/// index, including after every document using it has been removed.
#[derive(Debug, Default)]
pub(crate) struct TermPool {
    ids: HashMap<Arc<str>, TermId>,
    terms: Vec<Arc<str>>,
}

impl TermPool {
    pub(crate) fn intern(&mut self, word: &str) -> TermId {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        let id = self.terms.len() as TermId;
        let term: Arc<str> = Arc::from(word);
        self.terms.push(Arc::clone(&term));
        self.ids.insert(term, id);
        id
    }

    pub(crate) fn get(&self, word: &str) -> Option<TermId> {
        self.ids.get(word).copied()
    }

    pub(crate) fn resolve(&self, id: TermId) -> &str {
        &self.terms[id as usize]
    }

    pub(crate) fn len(&self) -> usize {
        self.terms.len()
    }
}

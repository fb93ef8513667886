use std::collections::{BTreeSet, HashSet};

use crate::index::{DocId, SearchIndex, TermId};

/// Remove every document whose set of terms equals that of a document with a
/// lower id. Frequencies, ratings and status are ignored.
///
/// Returns the removed ids in ascending order.
pub fn remove_duplicates(index: &mut SearchIndex) -> Vec<DocId> {
    let mut seen: HashSet<BTreeSet<TermId>> = HashSet::new();
    let mut duplicates = Vec::new();

    for id in index.iter() {
        let terms: BTreeSet<TermId> = index.document_terms(id).into_iter().flatten().collect();
        if !seen.insert(terms) {
            duplicates.push(id);
        }
    }

    for &id in &duplicates {
        index.remove_document(id);
        tracing::info!(id, "found duplicate document");
    }
    duplicates
}

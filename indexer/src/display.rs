use search_core::{DocId, DocumentStatus};
use std::fmt;

/// Split `items` into consecutive pages of `page_size`; the last page may be
/// shorter. A page size of 0 yields no pages.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<&[T]> {
    if page_size == 0 {
        return Vec::new();
    }
    items.chunks(page_size).collect()
}

pub struct MatchResult<'a> {
    pub id: DocId,
    pub status: DocumentStatus,
    pub words: &'a [&'a str],
}

impl fmt::Display for MatchResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ document_id = {}, status = {}, words =", self.id, self.status)?;
        for word in self.words {
            write!(f, " {word}")?;
        }
        f.write_str("}")
    }
}

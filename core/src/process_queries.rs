use rayon::prelude::*;

use crate::document::Document;
use crate::error::Result;
use crate::index::SearchIndex;

/// Rank a batch of queries in parallel. Results keep the order of `queries`.
pub fn process_queries<Q>(index: &SearchIndex, queries: &[Q]) -> Result<Vec<Vec<Document>>>
where
    Q: AsRef<str> + Sync,
{
    queries.par_iter().map(|q| index.find_top_documents(q.as_ref())).collect()
}

/// Like [`process_queries`], with all hits flattened in query order.
pub fn process_queries_joined<Q>(index: &SearchIndex, queries: &[Q]) -> Result<Vec<Document>>
where
    Q: AsRef<str> + Sync,
{
    Ok(process_queries(index, queries)?.into_iter().flatten().collect())
}

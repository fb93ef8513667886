use thiserror::Error;

use crate::DocId;

/// Errors returned by index, ranking and matching operations.
///
/// Every failing operation is rejected before the index is mutated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bad or duplicate document id, malformed query word, invalid stop word.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The document id is not live.
    #[error("document {0} not found")]
    NotFound(DocId),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Rank index error types.

use thiserror::Error;

/// Errors raised by rank queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    /// more entries were requested than the index holds
    #[error("requested {requested} file(s) but only {available} exist")]
    KExceedsSize { requested: usize, available: usize },
}

/// result type alias for rank operations
pub type RankResult<T> = Result<T, RankError>;

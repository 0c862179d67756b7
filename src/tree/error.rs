//! Version tree error types.

use thiserror::Error;

use crate::tree::node::VersionId;

/// Errors raised by operations on a single version tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// the active version is frozen and cannot be snapshotted again
    #[error("version {id} is already a snapshot")]
    AlreadySnapshotted { id: VersionId },

    /// rollback without a target was attempted at the root
    #[error("no parent version to roll back to")]
    NoParent,

    /// rollback target outside `[0, total)`
    #[error("invalid version id {id}: file has {total} version(s)")]
    InvalidId { id: VersionId, total: usize },
}

/// result type alias for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

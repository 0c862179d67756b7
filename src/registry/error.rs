//! Registry error types.

use thiserror::Error;

use crate::rank::RankError;
use crate::tree::TreeError;

/// Errors raised by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// file names must be non-empty
    #[error("file name cannot be empty")]
    EmptyName,

    /// a file with this name is already registered
    #[error("file already exists: {0}")]
    AlreadyExists(String),

    /// no file with this name is registered
    #[error("file not found: {0}")]
    NotFound(String),

    /// the file's version tree rejected the operation
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// a ranking query was out of range
    #[error(transparent)]
    Rank(#[from] RankError),
}

impl RegistryError {
    /// check if this error means the file doesn't exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound(_))
    }

    /// check if this error is about bad input rather than store state
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RegistryError::EmptyName | RegistryError::Rank(RankError::KExceedsSize { .. })
        )
    }

    /// check if this error comes from the current state of a file
    pub fn is_state(&self) -> bool {
        matches!(
            self,
            RegistryError::AlreadyExists(_) | RegistryError::NotFound(_) | RegistryError::Tree(_)
        )
    }
}

/// result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

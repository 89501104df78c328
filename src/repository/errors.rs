//! Repository error types

use std::io;

use thiserror::Error;

use crate::pie::PieId;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures reported by a [`PieRepository`](super::PieRepository)
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No record exists for the id
    #[error("pie '{0}' does not exist")]
    NotFound(PieId),

    /// Backing store could not be read or written
    #[error("repository I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Backing store holds data that is not a pie collection
    #[error("repository data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backing store holds two records with the same id
    #[error("repository data repeats pie id '{0}'")]
    DuplicateId(PieId),

    /// Repository refused the operation
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// Whether the failure is the expected "no such record" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(RepositoryError::NotFound(PieId::new(3)).is_not_found());
        assert!(!RepositoryError::Unavailable("down".to_string()).is_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: RepositoryError = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        assert!(err.to_string().contains("nope"));
    }
}

//! Application error types for core storage and paste policy.
use thiserror::Error;

/// Top-level application error type.
///
/// The first five variants are expected outcomes a caller can act on. The
/// rest are opaque internal failures.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Already exists")]
    Exists,

    #[error("Too big")]
    TooBig,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

impl AppError {
    /// Whether this error is one of the caller-facing policy outcomes rather
    /// than an internal failure.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NotFound
                | Self::Exists
                | Self::TooBig
                | Self::Unauthorized
                | Self::InvalidRequest(_)
        )
    }
}

impl From<redb::DatabaseError> for AppError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TableError> for AppError {
    fn from(value: redb::TableError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::StorageError> for AppError {
    fn from(value: redb::StorageError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(value: redb::CommitError) -> Self {
        Self::Database(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn policy_outcomes_are_expected_and_storage_failures_are_not() {
        for err in [
            AppError::NotFound,
            AppError::Exists,
            AppError::TooBig,
            AppError::Unauthorized,
            AppError::InvalidRequest("empty".to_string()),
        ] {
            assert!(err.is_expected(), "{err} should be expected");
        }
        assert!(!AppError::StorageMessage("disk on fire".to_string()).is_expected());
    }
}

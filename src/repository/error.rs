//! Repository Errors
//!
//! Error types for persistence operations. Every failure carries the
//! operation and entity type it happened in, plus the underlying cause.

use crate::domain::ParseEnumError;

/// Result alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur in a repository
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The database rejected or failed the operation
    #[error("Failed to {operation} {entity_type}: {source}")]
    OperationFailed {
        operation: &'static str,
        entity_type: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A stored row could not be mapped back to a domain entity
    #[error("Failed to {operation} {entity_type}: invalid stored data: {detail}")]
    InvalidStoredData {
        operation: &'static str,
        entity_type: &'static str,
        detail: String,
    },
}

impl RepositoryError {
    pub fn operation_failed(
        operation: &'static str,
        entity_type: &'static str,
        source: sqlx::Error,
    ) -> Self {
        Self::OperationFailed {
            operation,
            entity_type,
            source,
        }
    }

    pub fn invalid_stored_data(
        operation: &'static str,
        entity_type: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self::InvalidStoredData {
            operation,
            entity_type,
            detail: detail.into(),
        }
    }

    /// Map a row decoding failure for an enum column
    pub(crate) fn from_parse(
        operation: &'static str,
        entity_type: &'static str,
        err: ParseEnumError,
    ) -> Self {
        Self::invalid_stored_data(operation, entity_type, err.to_string())
    }

    /// Check if the store rejected a write because of a UNIQUE constraint
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::OperationFailed {
                source: sqlx::Error::Database(db_err),
                ..
            } => db_err.is_unique_violation(),
            _ => false,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::OperationFailed { operation, .. } | Self::InvalidStoredData { operation, .. } => {
                *operation
            }
        }
    }

    pub fn entity_type(&self) -> &'static str {
        match self {
            Self::OperationFailed { entity_type, .. }
            | Self::InvalidStoredData { entity_type, .. } => *entity_type,
        }
    }
}

//! Store error types

use thiserror::Error;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{field} already exists")]
    Duplicate { field: &'static str },

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        StoreError::NotFound(format!("{} not found with id: {}", resource, id))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

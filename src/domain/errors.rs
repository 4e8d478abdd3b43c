//! Domain errors for the tutorhub platform.

use thiserror::Error;

/// Domain-level errors surfaced by services and store adapters.
///
/// Reads distinguish a confirmed miss (`Ok(None)`) from a store that could not
/// answer (`Err(StoreUnavailable)`). `NotFound` is reserved for operations whose
/// precondition requires the document to exist (updates, lifecycle transitions).
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("validation failed: {0}")]
    Validation(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

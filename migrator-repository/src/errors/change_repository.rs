//! Error types for the change repository.
//! Defines specific errors that can occur while querying or persisting
//! change records.
use thiserror::Error;

/// Represents errors that can occur within the change repository.
///
/// This enum consolidates various error conditions specific to the change
/// tracking store, such as SQLx errors during database operations.
#[derive(Debug, Error)]
pub enum ChangeRepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

//! Error types for the migrator core.
use migrator_repository::ChangeRepositoryError;
use thiserror::Error;

use crate::guard::LockNotHeldError;
use crate::store::DocumentStoreError;

/// Represents errors that can occur while coordinating migrations.
///
/// `Configuration` and `LockNotHeld` always propagate to the caller;
/// the remaining kinds are subject to the legacy import's fail-fast policy.
#[derive(Debug, Error)]
pub enum MigratorError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Expectation [{expected} changes migrated], but actual [{actual} changes migrated]")]
    CountMismatch { expected: u64, actual: u64 },

    #[error("Invalid legacy record: {0}")]
    InvalidLegacyRecord(String),

    #[error(transparent)]
    LockNotHeld(#[from] LockNotHeldError),

    #[error("Change tracking error: {0}")]
    Repository(#[from] ChangeRepositoryError),

    #[error("Document store error: {0}")]
    Store(#[from] DocumentStoreError),
}

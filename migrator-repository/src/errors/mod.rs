//! Error types for the migrator repository.
//! Consolidates and re-exports error types related to change tracking operations.
mod change_repository;

pub use change_repository::ChangeRepositoryError;

//! PostgreSQL implementations of the migrator repository interfaces.
mod change_repository;

pub use change_repository::PostgresChangeRepository;

//! # Migrator Repository
//! This crate provides traits and implementations for the change tracking
//! store of the migrator. It includes definitions for errors, interfaces,
//! a concrete implementation for PostgreSQL and an in-memory backend for
//! testing and local development.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::ChangeRepositoryError;
pub use interfaces::ChangeRepository;
pub use memory::MemoryChangeRepository;
pub use postgres::PostgresChangeRepository;

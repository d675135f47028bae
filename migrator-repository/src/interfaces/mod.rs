//! This module defines and re-exports the interfaces for the change repository.
//! It serves as a central point for accessing traits related to change tracking.
mod change_repository;

pub use change_repository::ChangeRepository;

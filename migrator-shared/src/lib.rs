//! # Migrator Shared
//! This crate defines shared data structures and types used across the migrator ecosystem.
//! It includes common definitions for change records, change states, and execution ids.
pub mod types;

//! # Migrator
//! Coordinates one-time, ordered execution of migration units against a
//! shared document store across concurrently-running application instances.
//!
//! Two guarantees make up the core:
//! - no process mutates the store without a currently-valid distributed lock,
//!   enforced by wrapping every store handle in a [`GuardedCollection`] that
//!   re-checks validity on each guarded call;
//! - each migration unit, identified by `(change_id, author)`, executes at
//!   most once, durably recorded through the change repository and seeded
//!   from older tracking schemes by the [`LegacyService`].
pub mod error;
pub mod guard;
pub mod legacy;
pub mod lock;
pub mod store;

pub use error::MigratorError;
pub use guard::{GuardedCollection, LockNotHeldError};
pub use legacy::{LegacyMigration, LegacyMigrationMappingFields, LegacyService};
pub use lock::LockToken;

//! This module defines the `ChangeRepository` trait, the single source of
//! truth for "has migration unit (change_id, author) already executed?" and
//! "durably record that it has".
use migrator_shared::types::ChangeRecord;

use crate::errors::ChangeRepositoryError;

/// A trait that defines the interface for the change tracking store.
///
/// Implementors provide duplicate lookup and durable persistence of change
/// records. The repository does not deduplicate on its own: callers are
/// expected to consult `is_already_executed` before saving.
#[async_trait::async_trait]
pub trait ChangeRepository: Send + Sync {
    /// Returns whether a record for `(change_id, author)` has been committed.
    ///
    /// Pure query, no side effect. Reflects every previously committed
    /// `save`, including records written by a completed legacy import.
    async fn is_already_executed(
        &self,
        change_id: &str,
        author: &str,
    ) -> Result<bool, ChangeRepositoryError>;

    /// Durably persists a change record.
    ///
    /// Persistence failures propagate as-is; the caller decides between
    /// fail-fast and lenient handling.
    async fn save(&self, record: &ChangeRecord) -> Result<(), ChangeRepositoryError>;
}

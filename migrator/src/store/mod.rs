//! Document store surface wrapped by the lock guard.
//!
//! The real driver is external; the core only needs the collection-like
//! operation set defined here, expressed over loosely-typed JSON documents.
use std::time::Duration;

use thiserror::Error;

use crate::guard::LockNotHeldError;

pub mod memory;

pub use memory::MemoryCollection;

/// A loosely-typed record as stored in the document store.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Represents errors surfaced by a document store backend.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error(transparent)]
    LockNotHeld(#[from] LockNotHeldError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Collection-like handle into the document store.
///
/// Filters are equality documents: a stored document matches when it carries
/// every field of the filter with an equal value. An empty filter matches
/// everything.
#[async_trait::async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Name of the underlying collection.
    fn name(&self) -> &str;

    /// Opens a cursor over every document matching `filter`, in the store's
    /// native order.
    async fn find(
        &self,
        filter: Document,
    ) -> Result<Box<dyn DocumentCursor>, DocumentStoreError>;

    /// Inserts a single document.
    async fn insert_one(&self, document: Document) -> Result<(), DocumentStoreError>;

    /// Sets the fields of `update` on every document matching `filter`.
    /// Returns the number of documents modified.
    async fn update_many(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<u64, DocumentStoreError>;

    /// Deletes every document matching `filter`. Returns the number removed.
    async fn delete_many(&self, filter: Document) -> Result<u64, DocumentStoreError>;

    /// Counts the documents matching `filter`.
    async fn count_documents(&self, filter: Document) -> Result<u64, DocumentStoreError>;
}

/// Lazy iteration handle returned by [`DocumentCollection::find`].
///
/// Iteration can happen long after the cursor was opened, which is why the
/// guard wraps cursors and re-checks lock validity on every `try_next`.
#[async_trait::async_trait]
pub trait DocumentCursor: Send {
    /// Advances the cursor, returning `None` once exhausted.
    async fn try_next(&mut self) -> Result<Option<Document>, DocumentStoreError>;

    /// Request shaping: number of documents fetched per round trip.
    fn set_batch_size(&mut self, batch_size: u32);

    /// Request shaping: server-side time limit for the operation.
    fn set_max_time(&mut self, max_time: Duration);
}

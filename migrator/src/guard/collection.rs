//! Guarded decorators around the document store traits.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{CollectionOp, CursorOp, LockNotHeldError, OpClass};
use crate::lock::LockToken;
use crate::store::{Document, DocumentCollection, DocumentCursor, DocumentStoreError};

fn guard_collection_op(
    token: &dyn LockToken,
    op: CollectionOp,
) -> Result<(), LockNotHeldError> {
    match op.class() {
        OpClass::Exempt => Ok(()),
        OpClass::Guarded if token.is_valid() => Ok(()),
        OpClass::Guarded => Err(LockNotHeldError {
            operation: op.as_str(),
        }),
    }
}

fn guard_cursor_op(token: &dyn LockToken, op: CursorOp) -> Result<(), LockNotHeldError> {
    match op.class() {
        OpClass::Exempt => Ok(()),
        OpClass::Guarded if token.is_valid() => Ok(()),
        OpClass::Guarded => Err(LockNotHeldError {
            operation: op.as_str(),
        }),
    }
}

/// Decorator enforcing lock validity around a wrapped collection.
///
/// Guarded operations fail with [`LockNotHeldError`] before any delegation
/// when the token is invalid, so no partial side effect can occur. Cursors
/// returned by the wrapped collection come back wrapped in a
/// [`GuardedCursor`] holding the same token, so lazy iteration is
/// validity-checked at the point of iteration as well.
pub struct GuardedCollection<C> {
    inner: C,
    token: Arc<dyn LockToken>,
}

impl<C: DocumentCollection> GuardedCollection<C> {
    pub fn new(inner: C, token: Arc<dyn LockToken>) -> Self {
        Self { inner, token }
    }

    /// The wrapped collection.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: DocumentCollection> DocumentCollection for GuardedCollection<C> {
    fn name(&self) -> &str {
        // Exempt per the classification table.
        self.inner.name()
    }

    async fn find(
        &self,
        filter: Document,
    ) -> Result<Box<dyn DocumentCursor>, DocumentStoreError> {
        guard_collection_op(self.token.as_ref(), CollectionOp::Find)?;
        let cursor = self.inner.find(filter).await?;
        Ok(Box::new(GuardedCursor::new(cursor, Arc::clone(&self.token))))
    }

    async fn insert_one(&self, document: Document) -> Result<(), DocumentStoreError> {
        guard_collection_op(self.token.as_ref(), CollectionOp::InsertOne)?;
        self.inner.insert_one(document).await
    }

    async fn update_many(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<u64, DocumentStoreError> {
        guard_collection_op(self.token.as_ref(), CollectionOp::UpdateMany)?;
        self.inner.update_many(filter, update).await
    }

    async fn delete_many(&self, filter: Document) -> Result<u64, DocumentStoreError> {
        guard_collection_op(self.token.as_ref(), CollectionOp::DeleteMany)?;
        self.inner.delete_many(filter).await
    }

    async fn count_documents(&self, filter: Document) -> Result<u64, DocumentStoreError> {
        guard_collection_op(self.token.as_ref(), CollectionOp::CountDocuments)?;
        self.inner.count_documents(filter).await
    }
}

/// Decorator enforcing lock validity around a wrapped cursor.
///
/// The lock may expire between opening a cursor and draining it, so
/// iteration re-checks validity on every advance. Request-shaping calls are
/// exempt and delegate unconditionally.
pub struct GuardedCursor {
    inner: Box<dyn DocumentCursor>,
    token: Arc<dyn LockToken>,
}

impl GuardedCursor {
    pub fn new(inner: Box<dyn DocumentCursor>, token: Arc<dyn LockToken>) -> Self {
        Self { inner, token }
    }
}

#[async_trait]
impl DocumentCursor for GuardedCursor {
    async fn try_next(&mut self) -> Result<Option<Document>, DocumentStoreError> {
        guard_cursor_op(self.token.as_ref(), CursorOp::TryNext)?;
        self.inner.try_next().await
    }

    fn set_batch_size(&mut self, batch_size: u32) {
        // Exempt per the classification table.
        self.inner.set_batch_size(batch_size);
    }

    fn set_max_time(&mut self, max_time: Duration) {
        // Exempt per the classification table.
        self.inner.set_max_time(max_time);
    }
}

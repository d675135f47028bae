//! Lock-guard interception for document store handles.
//!
//! Every store operation is classified up front as guarded or exempt.
//! Guarded operations re-check lock validity at the moment they are invoked;
//! exempt operations delegate unconditionally. Classification is
//! per-operation, not per-object: a cursor returned by a guarded call still
//! has its own exempt request-shaping operations.
mod collection;

use thiserror::Error;

pub use collection::{GuardedCollection, GuardedCursor};

/// Raised when a guarded operation is attempted while the lock token is
/// invalid. Never retried internally; the caller decides whether to
/// re-acquire the lock and retry at a higher level.
#[derive(Debug, Error)]
#[error("Lock not held while attempting operation '{operation}'")]
pub struct LockNotHeldError {
    pub operation: &'static str,
}

/// Whether an operation must verify lock validity before delegating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    /// Must check lock validity before any delegation.
    Guarded,
    /// Delegates unconditionally.
    Exempt,
}

/// Operations of the collection surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionOp {
    Name,
    Find,
    InsertOne,
    UpdateMany,
    DeleteMany,
    CountDocuments,
}

impl CollectionOp {
    /// Static classification table for the collection surface.
    ///
    /// Reads are guarded too: a cursor opened without the lock could be
    /// drained long after another process acquired it.
    pub fn class(&self) -> OpClass {
        match self {
            CollectionOp::Name => OpClass::Exempt,
            CollectionOp::Find
            | CollectionOp::InsertOne
            | CollectionOp::UpdateMany
            | CollectionOp::DeleteMany
            | CollectionOp::CountDocuments => OpClass::Guarded,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionOp::Name => "name",
            CollectionOp::Find => "find",
            CollectionOp::InsertOne => "insert_one",
            CollectionOp::UpdateMany => "update_many",
            CollectionOp::DeleteMany => "delete_many",
            CollectionOp::CountDocuments => "count_documents",
        }
    }
}

/// Operations of the cursor surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorOp {
    TryNext,
    SetBatchSize,
    SetMaxTime,
}

impl CursorOp {
    /// Static classification table for the cursor surface.
    ///
    /// Iteration is guarded because it can happen long after the cursor was
    /// opened; batch size and max time only shape the request before it
    /// executes and are harmless without the lock.
    pub fn class(&self) -> OpClass {
        match self {
            CursorOp::TryNext => OpClass::Guarded,
            CursorOp::SetBatchSize | CursorOp::SetMaxTime => OpClass::Exempt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CursorOp::TryNext => "try_next",
            CursorOp::SetBatchSize => "set_batch_size",
            CursorOp::SetMaxTime => "set_max_time",
        }
    }
}

//! In-memory document collection for testing and local development.
//!
//! Matches the contract of a real driver closely enough for the core's
//! tests: equality filters, native insertion order and snapshot cursors.

use std::collections::VecDeque;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use super::{Document, DocumentCollection, DocumentCursor, DocumentStoreError};

/// In-memory collection backed by a vector in insertion order.
pub struct MemoryCollection {
    name: String,
    documents: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Creates a collection pre-populated with the given documents.
    pub fn with_documents(name: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(documents),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a snapshot of the stored documents, in insertion order.
    pub fn snapshot(&self) -> Vec<Document> {
        self.documents.read().unwrap().clone()
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(field, value)| document.get(field) == Some(value))
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find(
        &self,
        filter: Document,
    ) -> Result<Box<dyn DocumentCursor>, DocumentStoreError> {
        let documents = self.documents.read().unwrap();
        let selected: VecDeque<Document> = documents
            .iter()
            .filter(|document| matches(document, &filter))
            .cloned()
            .collect();

        Ok(Box::new(MemoryCursor {
            remaining: selected,
        }))
    }

    async fn insert_one(&self, document: Document) -> Result<(), DocumentStoreError> {
        self.documents.write().unwrap().push(document);
        Ok(())
    }

    async fn update_many(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<u64, DocumentStoreError> {
        let mut documents = self.documents.write().unwrap();
        let mut updated = 0;
        for document in documents.iter_mut() {
            if matches(document, &filter) {
                for (field, value) in &update {
                    document.insert(field.clone(), value.clone());
                }
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_many(&self, filter: Document) -> Result<u64, DocumentStoreError> {
        let mut documents = self.documents.write().unwrap();
        let before = documents.len();
        documents.retain(|document| !matches(document, &filter));
        Ok((before - documents.len()) as u64)
    }

    async fn count_documents(&self, filter: Document) -> Result<u64, DocumentStoreError> {
        let documents = self.documents.read().unwrap();
        Ok(documents
            .iter()
            .filter(|document| matches(document, &filter))
            .count() as u64)
    }
}

/// Cursor over a snapshot taken when `find` was called.
pub struct MemoryCursor {
    remaining: VecDeque<Document>,
}

#[async_trait]
impl DocumentCursor for MemoryCursor {
    async fn try_next(&mut self) -> Result<Option<Document>, DocumentStoreError> {
        Ok(self.remaining.pop_front())
    }

    // Request shaping has no effect on an in-memory snapshot.
    fn set_batch_size(&mut self, _batch_size: u32) {}

    fn set_max_time(&mut self, _max_time: Duration) {}
}

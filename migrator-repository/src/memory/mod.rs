//! In-memory implementation of the change repository.
//!
//! Backs tests and local development without a database, mirroring the
//! semantics of the PostgreSQL implementation: records are keyed on
//! `(change_id, author)` and a second save for the same key is rejected.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use migrator_shared::types::ChangeRecord;

use crate::ChangeRepository;
use crate::errors::ChangeRepositoryError;

/// In-memory change repository for testing and local development.
pub struct MemoryChangeRepository {
    records: RwLock<HashMap<(String, String), ChangeRecord>>,
    fail_saves: AtomicBool,
}

impl MemoryChangeRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent `save` fail, for exercising persistence
    /// failure handling in callers.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of records committed so far.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the record stored for `(change_id, author)`, if any.
    pub fn get(&self, change_id: &str, author: &str) -> Option<ChangeRecord> {
        self.records
            .read()
            .unwrap()
            .get(&(change_id.to_string(), author.to_string()))
            .cloned()
    }
}

impl Default for MemoryChangeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangeRepository for MemoryChangeRepository {
    async fn is_already_executed(
        &self,
        change_id: &str,
        author: &str,
    ) -> Result<bool, ChangeRepositoryError> {
        let records = self.records.read().unwrap();
        Ok(records.contains_key(&(change_id.to_string(), author.to_string())))
    }

    async fn save(&self, record: &ChangeRecord) -> Result<(), ChangeRepositoryError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ChangeRepositoryError::Backend(
                "injected save failure".to_string(),
            ));
        }

        let mut records = self.records.write().unwrap();
        let key = (record.change_id.clone(), record.author.clone());
        if records.contains_key(&key) {
            // Matches the unique (change_id, author) constraint in PostgreSQL.
            return Err(ChangeRepositoryError::Backend(format!(
                "duplicate change record for ({}, {})",
                record.change_id, record.author
            )));
        }

        records.insert(key, record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrator_shared::types::ChangeState;

    fn record(change_id: &str, author: &str) -> ChangeRecord {
        ChangeRecord::executed("run-1", change_id, author, 42)
    }

    #[tokio::test]
    async fn save_then_query_reports_executed() {
        let repository = MemoryChangeRepository::new();

        assert!(!repository.is_already_executed("c1", "a1").await.unwrap());

        repository.save(&record("c1", "a1")).await.unwrap();

        assert!(repository.is_already_executed("c1", "a1").await.unwrap());
        assert!(!repository.is_already_executed("c1", "a2").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_save_is_rejected() {
        let repository = MemoryChangeRepository::new();

        repository.save(&record("c1", "a1")).await.unwrap();
        let result = repository.save(&record("c1", "a1")).await;

        assert!(matches!(result, Err(ChangeRepositoryError::Backend(_))));
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn same_change_id_different_author_is_distinct() {
        let repository = MemoryChangeRepository::new();

        repository.save(&record("c1", "a1")).await.unwrap();
        repository.save(&record("c1", "a2")).await.unwrap();

        assert_eq!(repository.len(), 2);
    }

    #[tokio::test]
    async fn injected_failure_propagates() {
        let repository = MemoryChangeRepository::new();
        repository.set_fail_saves(true);

        let result = repository.save(&record("c1", "a1")).await;

        assert!(matches!(result, Err(ChangeRepositoryError::Backend(_))));
        assert!(repository.is_empty());

        repository.set_fail_saves(false);
        repository.save(&record("c1", "a1")).await.unwrap();
        assert_eq!(repository.get("c1", "a1").unwrap().state, ChangeState::Executed);
    }
}

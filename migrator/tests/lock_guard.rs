//! Integration tests for the lock-guard interception around collections and
//! cursors.

use std::sync::Arc;
use std::time::Duration;

use migrator::lock::{LockToken, MockLockToken};
use migrator::store::{Document, DocumentCollection, DocumentStoreError, MemoryCollection};
use migrator::GuardedCollection;
use serde_json::json;

fn doc(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!("tests build documents from json objects"),
    }
}

fn seeded_collection() -> MemoryCollection {
    MemoryCollection::with_documents(
        "old_changelog",
        vec![
            doc(json!({"changeId": "c1", "author": "a1"})),
            doc(json!({"changeId": "c2", "author": "a1"})),
        ],
    )
}

#[tokio::test]
async fn guarded_operations_fail_without_the_lock_and_leave_no_side_effect() {
    let token = Arc::new(MockLockToken::expired());
    let guarded = GuardedCollection::new(seeded_collection(), token);

    let insert = guarded.insert_one(doc(json!({"changeId": "c3"}))).await;
    assert!(matches!(
        insert,
        Err(DocumentStoreError::LockNotHeld(ref e)) if e.operation == "insert_one"
    ));

    let update = guarded
        .update_many(Document::new(), doc(json!({"state": "EXECUTED"})))
        .await;
    assert!(matches!(update, Err(DocumentStoreError::LockNotHeld(_))));

    let delete = guarded.delete_many(Document::new()).await;
    assert!(matches!(delete, Err(DocumentStoreError::LockNotHeld(_))));

    let find = guarded.find(Document::new()).await;
    assert!(matches!(find.err(), Some(DocumentStoreError::LockNotHeld(_))));

    let count = guarded.count_documents(Document::new()).await;
    assert!(matches!(count, Err(DocumentStoreError::LockNotHeld(_))));

    // No partial side effect reached the wrapped collection.
    assert_eq!(guarded.inner().len(), 2);
    let untouched = guarded.inner().snapshot();
    assert!(untouched.iter().all(|d| d.get("state").is_none()));
}

#[tokio::test]
async fn exempt_operations_succeed_regardless_of_token_validity() {
    let token = Arc::new(MockLockToken::expired());
    let guarded = GuardedCollection::new(seeded_collection(), token);

    assert_eq!(guarded.name(), "old_changelog");
}

#[tokio::test]
async fn guarded_operations_delegate_while_the_lock_is_valid() {
    let token = Arc::new(MockLockToken::valid());
    let guarded = GuardedCollection::new(MemoryCollection::new("units"), token);

    guarded
        .insert_one(doc(json!({"changeId": "c1", "author": "a1"})))
        .await
        .unwrap();

    assert_eq!(guarded.count_documents(Document::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn validity_is_rechecked_on_every_call() {
    let token = Arc::new(MockLockToken::valid());
    let guarded = GuardedCollection::new(MemoryCollection::new("units"), Arc::clone(&token) as Arc<dyn LockToken>);

    guarded
        .insert_one(doc(json!({"changeId": "c1"})))
        .await
        .unwrap();

    token.set_valid(false);
    let denied = guarded.insert_one(doc(json!({"changeId": "c2"}))).await;
    assert!(matches!(denied, Err(DocumentStoreError::LockNotHeld(_))));

    token.set_valid(true);
    guarded
        .insert_one(doc(json!({"changeId": "c2"})))
        .await
        .unwrap();

    assert_eq!(guarded.inner().len(), 2);
}

#[tokio::test]
async fn cursors_from_guarded_calls_are_guarded_at_iteration_time() {
    let token = Arc::new(MockLockToken::valid());
    let guarded = GuardedCollection::new(seeded_collection(), Arc::clone(&token) as Arc<dyn LockToken>);

    let mut cursor = guarded.find(Document::new()).await.unwrap();

    let first = cursor.try_next().await.unwrap().unwrap();
    assert_eq!(first.get("changeId"), Some(&json!("c1")));

    // The lock expires between two advances; the next advance must fail
    // even though the cursor was opened under a valid lock.
    token.set_valid(false);
    let denied = cursor.try_next().await;
    assert!(matches!(
        denied,
        Err(DocumentStoreError::LockNotHeld(ref e)) if e.operation == "try_next"
    ));

    // Request shaping stays exempt on the wrapped cursor.
    cursor.set_batch_size(10);
    cursor.set_max_time(Duration::from_secs(1));

    token.set_valid(true);
    let second = cursor.try_next().await.unwrap().unwrap();
    assert_eq!(second.get("changeId"), Some(&json!("c2")));
    assert!(cursor.try_next().await.unwrap().is_none());
}

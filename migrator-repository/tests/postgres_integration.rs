//! Integration tests for the PostgreSQL change repository implementation.
//!
//! These tests require a real PostgreSQL database reachable through
//! `DATABASE_URL` and are skipped when the variable is not set.
//!
//! Run with: `cargo test --test postgres_integration`

use std::env;

use dotenv::dotenv;
use migrator_repository::{ChangeRepository, PostgresChangeRepository};
use migrator_shared::types::{ChangeRecord, ChangeState, UNKNOWN_EXECUTION_MILLIS};
use serde_json::Value;

fn database_url() -> Option<String> {
    dotenv().ok();
    env::var("DATABASE_URL").ok()
}

#[tokio::test]
async fn save_and_query_round_trip() {
    let Some(url) = database_url() else {
        eprintln!("DATABASE_URL not set, skipping postgres integration test");
        return;
    };

    let repository = PostgresChangeRepository::new(&url).await.unwrap();
    repository.ensure_schema().await.unwrap();

    let change_id = format!("it-change-{}", std::process::id());
    let record = ChangeRecord::imported(
        "legacy_migration-it-0",
        &change_id,
        "integration",
        None,
        Some("OldChangeLog".to_string()),
        Some("seedIndexes".to_string()),
        Some(Value::from("kept")),
    );

    assert!(
        !repository
            .is_already_executed(&change_id, "integration")
            .await
            .unwrap()
    );

    repository.save(&record).await.unwrap();

    assert!(
        repository
            .is_already_executed(&change_id, "integration")
            .await
            .unwrap()
    );

    let stored = repository
        .find(&change_id, "integration")
        .await
        .unwrap()
        .expect("record was just saved");
    assert_eq!(stored.state, ChangeState::Executed);
    assert_eq!(stored.execution_millis, UNKNOWN_EXECUTION_MILLIS);
    assert_eq!(
        stored.metadata.get("original-metadata"),
        Some(&Value::from("kept"))
    );

    // Second insert for the same (change_id, author) must violate the
    // primary key.
    assert!(repository.save(&record).await.is_err());
}

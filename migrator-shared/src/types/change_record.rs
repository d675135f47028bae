use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key marking a record as produced by the legacy import.
pub const KEY_MIGRATION_TYPE: &str = "migration-type";

/// Metadata key under which the source record's own metadata is preserved.
pub const KEY_ORIGINAL_METADATA: &str = "original-metadata";

/// Sentinel duration for executions whose runtime was never measured.
pub const UNKNOWN_EXECUTION_MILLIS: i64 = -1;

/// Lifecycle state of a migration unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeState {
    Executed,
    Failed,
    RolledBack,
    RollbackFailed,
}

impl ChangeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeState::Executed => "EXECUTED",
            ChangeState::Failed => "FAILED",
            ChangeState::RolledBack => "ROLLED_BACK",
            ChangeState::RollbackFailed => "ROLLBACK_FAILED",
        }
    }
}

/// Durable proof that a migration unit executed.
///
/// `(change_id, author)` is the natural key: at most one record may represent
/// "already executed" per pair. `execution_id` is shared by every unit of a
/// single run and is never consulted for duplicate detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Identifies the run during which the unit executed.
    pub execution_id: String,
    /// Unique per logical migration unit, together with `author`.
    pub change_id: String,
    /// Declared owner of the unit.
    pub author: String,
    /// Time of original execution. Historical for imported records.
    pub timestamp: Option<DateTime<Utc>>,
    /// Lifecycle state. Imported records are always `Executed`.
    pub state: ChangeState,
    /// Defining module of the unit, free-form.
    pub origin_class: Option<String>,
    /// Defining function of the unit, free-form.
    pub origin_method: Option<String>,
    /// Measured execution duration; `-1` means unknown.
    pub execution_millis: i64,
    /// Open metadata mapping.
    pub metadata: Map<String, Value>,
}

impl ChangeRecord {
    /// Builds a record for a natively executed migration unit.
    pub fn executed(
        execution_id: impl Into<String>,
        change_id: impl Into<String>,
        author: impl Into<String>,
        execution_millis: i64,
    ) -> Self {
        ChangeRecord {
            execution_id: execution_id.into(),
            change_id: change_id.into(),
            author: author.into(),
            timestamp: Some(Utc::now()),
            state: ChangeState::Executed,
            origin_class: None,
            origin_method: None,
            execution_millis,
            metadata: Map::new(),
        }
    }

    /// Builds a record imported from a legacy tracking scheme.
    ///
    /// The state is forced to `Executed` and the duration to the unknown
    /// sentinel; legacy schemes never recorded either.
    pub fn imported(
        execution_id: impl Into<String>,
        change_id: impl Into<String>,
        author: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
        origin_class: Option<String>,
        origin_method: Option<String>,
        original_metadata: Option<Value>,
    ) -> Self {
        let mut metadata = Map::new();
        metadata.insert(KEY_MIGRATION_TYPE.to_string(), Value::from("legacy"));
        if let Some(original) = original_metadata {
            metadata.insert(KEY_ORIGINAL_METADATA.to_string(), original);
        }

        ChangeRecord {
            execution_id: execution_id.into(),
            change_id: change_id.into(),
            author: author.into(),
            timestamp,
            state: ChangeState::Executed,
            origin_class,
            origin_method,
            execution_millis: UNKNOWN_EXECUTION_MILLIS,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imported_record_forces_state_and_sentinel() {
        let record = ChangeRecord::imported(
            "legacy_migration-x-1",
            "c1",
            "a1",
            None,
            None,
            None,
            None,
        );

        assert_eq!(record.state, ChangeState::Executed);
        assert_eq!(record.execution_millis, UNKNOWN_EXECUTION_MILLIS);
    }

    #[test]
    fn imported_record_metadata_without_original() {
        let record = ChangeRecord::imported("e", "c1", "a1", None, None, None, None);

        assert_eq!(record.metadata.len(), 1);
        assert_eq!(
            record.metadata.get(KEY_MIGRATION_TYPE),
            Some(&Value::from("legacy"))
        );
    }

    #[test]
    fn imported_record_metadata_with_original() {
        let record = ChangeRecord::imported(
            "e",
            "c1",
            "a1",
            None,
            None,
            None,
            Some(Value::from("x")),
        );

        assert_eq!(record.metadata.len(), 2);
        assert_eq!(
            record.metadata.get(KEY_ORIGINAL_METADATA),
            Some(&Value::from("x"))
        );
    }

    #[test]
    fn state_round_trips_through_screaming_snake_case() {
        let json = serde_json::to_string(&ChangeState::RolledBack).unwrap();
        assert_eq!(json, "\"ROLLED_BACK\"");

        let state: ChangeState = serde_json::from_str("\"EXECUTED\"").unwrap();
        assert_eq!(state, ChangeState::Executed);
    }
}

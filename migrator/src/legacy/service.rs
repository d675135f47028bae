//! Legacy import service.
//!
//! Streams every record of the old tracking collection in native order,
//! maps the configured fields into change records and replays them through
//! the change repository, skipping pairs that are already tracked.

use chrono::{DateTime, Utc};
use migrator_repository::ChangeRepository;
use migrator_shared::types::{ChangeRecord, legacy_execution_id};
use serde_json::Value;
use tracing::{debug, warn};

use super::{LegacyMigration, LegacyMigrationMappingFields};
use crate::error::MigratorError;
use crate::store::{Document, DocumentCollection};

/// Executes one-time imports of legacy execution history.
#[derive(Debug, Default)]
pub struct LegacyService;

impl LegacyService {
    pub fn new() -> Self {
        Self
    }

    /// Runs the import described by `migration`, reading the legacy records
    /// from `collection` and recording them through `repository`.
    ///
    /// Returns the number of records processed. A misconfigured `migration`
    /// always fails; any other failure is propagated when `fail_fast` is set
    /// and otherwise logged as a warning, keeping whatever was migrated
    /// before the failure.
    pub async fn execute_migration(
        &self,
        migration: &LegacyMigration,
        collection: &dyn DocumentCollection,
        repository: &dyn ChangeRepository,
    ) -> Result<u64, MigratorError> {
        migration.validate()?;

        if migration.changes_count_expectation.is_none() {
            warn!("there is no changes count expectation for the legacy migration");
        }

        let mut migrated = 0;
        match self
            .run(migration, collection, repository, &mut migrated)
            .await
        {
            Ok(()) => Ok(migrated),
            Err(error) if migration.fail_fast => Err(error),
            Err(error) => {
                warn!(error = %error, "legacy migration failed, continuing with partial progress");
                Ok(migrated)
            }
        }
    }

    async fn run(
        &self,
        migration: &LegacyMigration,
        collection: &dyn DocumentCollection,
        repository: &dyn ChangeRepository,
        migrated: &mut u64,
    ) -> Result<(), MigratorError> {
        // One execution id is shared by every record of this run.
        let execution_id = legacy_execution_id();
        let fields = &migration.mapping_fields;

        let mut cursor = collection.find(Document::new()).await?;
        while let Some(document) = cursor.try_next().await? {
            let record = map_document(&execution_id, fields, &document)?;

            if repository
                .is_already_executed(&record.change_id, &record.author)
                .await?
            {
                debug!(
                    change_id = %record.change_id,
                    author = %record.author,
                    "change already tracked in the changelog"
                );
            } else {
                debug!(
                    change_id = %record.change_id,
                    author = %record.author,
                    "tracking change"
                );
                repository.save(&record).await?;
                debug!(
                    change_id = %record.change_id,
                    author = %record.author,
                    "change tracked successfully"
                );
            }
            *migrated += 1;
        }

        if let Some(expected) = migration.changes_count_expectation {
            if expected != *migrated {
                return Err(MigratorError::CountMismatch {
                    expected,
                    actual: *migrated,
                });
            }
        }

        debug!(changes_migrated = *migrated, "legacy migration finished");
        Ok(())
    }
}

fn map_document(
    execution_id: &str,
    fields: &LegacyMigrationMappingFields,
    document: &Document,
) -> Result<ChangeRecord, MigratorError> {
    let change_id = string_value(document, Some(fields.change_id.as_str())).ok_or_else(|| {
        MigratorError::InvalidLegacyRecord(format!(
            "missing change id field '{}'",
            fields.change_id
        ))
    })?;
    let author = string_value(document, Some(fields.author.as_str())).ok_or_else(|| {
        MigratorError::InvalidLegacyRecord(format!("missing author field '{}'", fields.author))
    })?;

    let timestamp = date_value(document, fields.timestamp.as_deref())?;
    let origin_class = string_value(document, fields.origin_class.as_deref());
    let origin_method = string_value(document, fields.origin_method.as_deref());

    let original_metadata = fields
        .metadata
        .as_deref()
        .and_then(|field| document.get(field))
        .filter(|value| !value.is_null())
        .cloned();

    Ok(ChangeRecord::imported(
        execution_id,
        change_id,
        author,
        timestamp,
        origin_class,
        origin_method,
        original_metadata,
    ))
}

/// Unset string fields map to `None`, never to an empty string.
fn string_value(document: &Document, field: Option<&str>) -> Option<String> {
    field
        .and_then(|field| document.get(field))
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

fn date_value(
    document: &Document,
    field: Option<&str>,
) -> Result<Option<DateTime<Utc>>, MigratorError> {
    let Some(value) = field.and_then(|field| document.get(field)) else {
        return Ok(None);
    };

    match value {
        Value::Null => Ok(None),
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|timestamp| Some(timestamp.with_timezone(&Utc)))
            .map_err(|error| {
                MigratorError::InvalidLegacyRecord(format!(
                    "unparseable timestamp '{raw}': {error}"
                ))
            }),
        other => Err(MigratorError::InvalidLegacyRecord(format!(
            "timestamp field holds a non-string value: {other}"
        ))),
    }
}

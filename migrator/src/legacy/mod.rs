//! One-time import of execution history from an older tracking scheme.
//!
//! Units already applied under the old scheme must not be re-applied, so the
//! import replays historical records through the change repository before
//! normal execution begins.
mod service;

use serde::Deserialize;

pub use service::LegacyService;

use crate::error::MigratorError;

/// Field-name bindings describing where change record values live in the
/// legacy record shape. `change_id` and `author` are mandatory; the rest are
/// optional bindings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyMigrationMappingFields {
    pub change_id: String,
    pub author: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub origin_class: Option<String>,
    #[serde(default)]
    pub origin_method: Option<String>,
    #[serde(default)]
    pub metadata: Option<String>,
}

/// Configuration of one legacy import run. Immutable for the duration of
/// the run.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyMigration {
    /// Source collection holding the old tracking records.
    pub collection_name: String,
    pub mapping_fields: LegacyMigrationMappingFields,
    /// Expected total of processed records, used for integrity verification.
    #[serde(default)]
    pub changes_count_expectation: Option<u64>,
    /// Whether an import failure aborts the run or is logged and swallowed.
    #[serde(default = "default_fail_fast")]
    pub fail_fast: bool,
}

fn default_fail_fast() -> bool {
    true
}

impl LegacyMigration {
    pub fn new(
        collection_name: impl Into<String>,
        mapping_fields: LegacyMigrationMappingFields,
    ) -> Self {
        Self {
            collection_name: collection_name.into(),
            mapping_fields,
            changes_count_expectation: None,
            fail_fast: default_fail_fast(),
        }
    }

    /// A misconfiguration is not a migration-data problem: it is surfaced
    /// regardless of the fail-fast flag.
    pub(crate) fn validate(&self) -> Result<(), MigratorError> {
        if self.collection_name.is_empty()
            || self.mapping_fields.change_id.is_empty()
            || self.mapping_fields.author.is_empty()
        {
            return Err(MigratorError::Configuration(
                "legacy migration is wrongly configured: collection name and the \
                 change_id/author mapping fields are mandatory"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

mod change_record;
mod execution_id;

pub use change_record::{ChangeRecord, ChangeState, KEY_MIGRATION_TYPE, KEY_ORIGINAL_METADATA, UNKNOWN_EXECUTION_MILLIS};
pub use execution_id::legacy_execution_id;

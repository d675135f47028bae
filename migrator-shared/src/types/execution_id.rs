use chrono::Utc;
use rand::Rng;

/// Prefix tagging execution ids minted by the legacy import.
const LEGACY_EXECUTION_PREFIX: &str = "legacy_migration";

/// Generates the execution id shared by every record of one import run.
///
/// Combines a fixed prefix, the current UTC timestamp and a random integer in
/// `0..=998` for intra-second disambiguation. Uniqueness is best-effort only;
/// the id is never part of the dedup key, so collisions across processes are
/// acceptable.
pub fn legacy_execution_id() -> String {
    let disambiguator = rand::thread_rng().gen_range(0..999);
    format!(
        "{}-{}-{}",
        LEGACY_EXECUTION_PREFIX,
        Utc::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        disambiguator
    )
}

//! Lock token contract consumed by the guard.
//!
//! Acquisition, renewal and release belong to an external lock manager; the
//! core only ever asks a held token whether it is still valid.
mod mock;

pub use mock::MockLockToken;

/// Handle to a currently-held distributed mutual-exclusion lock.
///
/// Validity may lapse at any moment through TTL expiry, explicit release or
/// external revocation, so callers must re-check before every mutating store
/// operation rather than once at acquisition time.
pub trait LockToken: Send + Sync {
    /// Returns whether the lock behind this token is still valid right now.
    fn is_valid(&self) -> bool;
}

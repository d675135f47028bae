//! Mock lock token for testing and local development.
//!
//! Validity is toggled by hand, which makes it easy to simulate a lock
//! expiring between a call and the lazy iteration of its cursor.

use std::sync::atomic::{AtomicBool, Ordering};

use super::LockToken;

/// Lock token whose validity is controlled by the test.
pub struct MockLockToken {
    valid: AtomicBool,
}

impl MockLockToken {
    /// Creates a token that currently reports valid.
    pub fn valid() -> Self {
        Self {
            valid: AtomicBool::new(true),
        }
    }

    /// Creates a token that currently reports expired.
    pub fn expired() -> Self {
        Self {
            valid: AtomicBool::new(false),
        }
    }

    /// Flips the token's validity, simulating expiry or re-acquisition.
    pub fn set_valid(&self, valid: bool) {
        self.valid.store(valid, Ordering::SeqCst);
    }
}

impl LockToken for MockLockToken {
    fn is_valid(&self) -> bool {
        self.valid.load(Ordering::SeqCst)
    }
}

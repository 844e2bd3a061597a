//! Permanent kill switch backed by a sentinel ledger key.
//!
//! The sentinel is re-read on every invocation; nothing is cached in the
//! process. Any stored value, including an empty one, counts as locked.
//! Only a wholly absent key means unlocked.

use ledgerkit_hostapi::{Ledger, LedgerError};

use crate::dispatcher::Phase;
use crate::error::{MaintError, MaintResult};

/// Reads and writes the lock sentinel.
#[derive(Debug, Clone, Copy)]
pub struct LockGuard<'a> {
    key: &'a str,
    marker: &'a [u8],
}

impl<'a> LockGuard<'a> {
    /// Guard using `key` as the sentinel and `marker` as the locked value.
    pub fn new(key: &'a str, marker: &'a [u8]) -> Self {
        Self { key, marker }
    }

    /// Returns true if the sentinel is present.
    pub fn is_locked(&self, ledger: &dyn Ledger) -> Result<bool, LedgerError> {
        Ok(ledger.get_state(self.key)?.is_some())
    }

    /// Fail with [`MaintError::Locked`] if the sentinel is present.
    pub fn check_unlocked(&self, ledger: &dyn Ledger) -> MaintResult<()> {
        let locked = self.is_locked(ledger).map_err(|source| MaintError::Ledger {
            phase: Phase::Idle,
            source,
        })?;
        if locked {
            return Err(MaintError::Locked);
        }
        Ok(())
    }

    /// Write the sentinel.
    pub fn commit_lock(&self, ledger: &mut dyn Ledger) -> MaintResult<()> {
        ledger
            .put_state(self.key, self.marker)
            .map_err(MaintError::Write)
    }
}

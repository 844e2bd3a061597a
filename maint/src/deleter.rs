//! Best-effort batch deletion.
//!
//! Keys are deleted strictly in order. A failed delete is logged and
//! recorded, and the batch moves on to the next key.

use ledgerkit_hostapi::{Ledger, LedgerError, Namespace};
use tracing::error;

/// A delete that failed inside a batch. Not fatal to the invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    pub key: String,
    pub error: LedgerError,
}

/// Outcome of one batch delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// Keys whose delete was accepted, in order.
    pub deleted: Vec<String>,
    /// Keys whose delete failed, in order.
    pub failed: Vec<DeleteFailure>,
}

impl DeleteReport {
    /// Number of keys attempted.
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    /// Returns true if every delete was accepted.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Delete `keys` from `target`, tolerating individual failures.
pub fn delete_keys(ledger: &mut dyn Ledger, target: &Namespace, keys: Vec<String>) -> DeleteReport {
    let mut report = DeleteReport::default();
    for key in keys {
        let result = match target {
            Namespace::Public => ledger.del_state(&key),
            Namespace::Private(collection) => ledger.del_private_data(collection, &key),
        };
        match result {
            Ok(()) => report.deleted.push(key),
            Err(err) => {
                error!(
                    key = %key,
                    collection = target.collection().unwrap_or_default(),
                    error = %err,
                    "failed to delete state"
                );
                report.failed.push(DeleteFailure { key, error: err });
            }
        }
    }
    report
}

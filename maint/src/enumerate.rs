//! Query key enumeration with scoped iterator release.

use ledgerkit_hostapi::{LedgerError, QueryIterator};
use tracing::warn;

use crate::error::IterError;

/// Owns a query iterator and closes it exactly once.
///
/// Call [`close`](IteratorGuard::close) to observe the close result. If the
/// guard is dropped instead (early return, error propagation), the iterator
/// is closed in `Drop` and a close failure is logged.
pub struct IteratorGuard {
    iter: Box<dyn QueryIterator>,
    closed: bool,
}

impl IteratorGuard {
    /// Take ownership of an open iterator.
    pub fn new(iter: Box<dyn QueryIterator>) -> Self {
        Self {
            iter,
            closed: false,
        }
    }

    /// Borrow the guarded iterator.
    pub fn iter_mut(&mut self) -> &mut dyn QueryIterator {
        &mut *self.iter
    }

    /// Close the iterator now and return the result.
    pub fn close(mut self) -> Result<(), LedgerError> {
        self.closed = true;
        self.iter.close()
    }
}

impl Drop for IteratorGuard {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.iter.close() {
            warn!(error = %err, "failed to close query iterator");
        }
    }
}

/// Collect the keys of up to `limit` query results, discarding values.
///
/// The first iteration error aborts enumeration; keys collected so far are
/// dropped. Closing the iterator is the caller's job.
pub fn enumerate_keys(
    iter: &mut dyn QueryIterator,
    limit: usize,
) -> Result<Vec<String>, IterError> {
    let mut keys = Vec::new();
    while keys.len() < limit && iter.has_next() {
        let result = iter.next_result().map_err(|source| IterError {
            collected: keys.len(),
            source,
        })?;
        keys.push(result.key);
    }
    Ok(keys)
}

/// Enumerate up to `limit` keys from `iter`, closing it on every path.
pub fn collect_query_keys(
    iter: Box<dyn QueryIterator>,
    limit: usize,
) -> Result<Vec<String>, IterError> {
    let mut guard = IteratorGuard::new(iter);
    let keys = enumerate_keys(guard.iter_mut(), limit)?;
    guard.close().map_err(|source| IterError {
        collected: keys.len(),
        source,
    })?;
    Ok(keys)
}

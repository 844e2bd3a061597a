//! Ledger interface traits.
//!
//! `Ledger` is the set of capabilities a contract runtime exposes to code
//! running inside one transaction. Implementations decide how writes are
//! buffered and committed; callers only see point operations, queries, and
//! the transient input channel.

use crate::error::LedgerError;
use crate::types::{QueryResult, TransientMap};

/// Lazy, forward-only, finite sequence of query results.
///
/// Callers must call [`close`](QueryIterator::close) exactly once when done,
/// whether iteration finished, stopped early, or failed.
pub trait QueryIterator {
    /// Returns true if another result is available.
    fn has_next(&self) -> bool;

    /// Returns the next result.
    ///
    /// Calling this when `has_next()` is false is an iterator error.
    fn next_result(&mut self) -> Result<QueryResult, LedgerError>;

    /// Release the iterator's resources.
    fn close(&mut self) -> Result<(), LedgerError>;
}

/// Transaction-scoped view of the ledger.
pub trait Ledger {
    // ── Public state ──

    /// Read a value from the public ledger. `Ok(None)` if the key is absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write a value to the public ledger.
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Delete a key from the public ledger.
    fn del_state(&mut self, key: &str) -> Result<(), LedgerError>;

    // ── Private collections ──

    /// Read a value from a private collection. `Ok(None)` if absent.
    fn get_private_data(&self, collection: &str, key: &str)
        -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write a value to a private collection.
    fn put_private_data(
        &mut self,
        collection: &str,
        key: &str,
        value: &[u8],
    ) -> Result<(), LedgerError>;

    /// Delete a key from a private collection.
    fn del_private_data(&mut self, collection: &str, key: &str) -> Result<(), LedgerError>;

    // ── Queries ──

    /// Iterate public keys in `[start, end)`. An empty bound is open.
    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn QueryIterator>, LedgerError>;

    /// Run a rich query against the public ledger.
    fn get_query_result(&self, query: &str) -> Result<Box<dyn QueryIterator>, LedgerError>;

    /// Run a rich query against a private collection.
    fn get_private_data_query_result(
        &self,
        collection: &str,
        query: &str,
    ) -> Result<Box<dyn QueryIterator>, LedgerError>;

    // ── Invocation context ──

    /// Returns the transient input map of the current invocation.
    fn get_transient(&self) -> Result<TransientMap, LedgerError>;
}

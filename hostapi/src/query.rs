//! Query iterators and rich-query matching for the in-memory ledger.
//!
//! Rich queries use the selector form `{"selector": {"field": value, ...}}`.
//! A stored value matches when it is a JSON object whose top-level fields
//! equal every selector field. An empty selector matches every stored JSON
//! object; values that are not JSON objects never match.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::LedgerError;
use crate::traits::QueryIterator;
use crate::types::QueryResult;

/// Iterator over a pre-computed list of results.
///
/// Entries may be errors, so tests can script an iterator that fails part
/// way through. The number of `close()` calls is observable through
/// [`close_counter`](MemQueryIterator::close_counter) after the iterator
/// has been boxed and handed out.
#[derive(Debug)]
pub struct MemQueryIterator {
    entries: VecDeque<Result<QueryResult, LedgerError>>,
    closes: Arc<AtomicUsize>,
    closed: bool,
}

impl MemQueryIterator {
    /// Create an iterator over successful results.
    pub fn new(results: Vec<QueryResult>) -> Self {
        Self::scripted(results.into_iter().map(Ok).collect())
    }

    /// Create an iterator that yields exactly the given entries.
    pub fn scripted(entries: Vec<Result<QueryResult, LedgerError>>) -> Self {
        Self {
            entries: entries.into(),
            closes: Arc::new(AtomicUsize::new(0)),
            closed: false,
        }
    }

    /// Shared counter incremented on every `close()` call.
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

impl QueryIterator for MemQueryIterator {
    fn has_next(&self) -> bool {
        !self.closed && !self.entries.is_empty()
    }

    fn next_result(&mut self) -> Result<QueryResult, LedgerError> {
        if self.closed {
            return Err(LedgerError::iterator("iterator already closed"));
        }
        self.entries
            .pop_front()
            .unwrap_or_else(|| Err(LedgerError::iterator("no more results")))
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.closed = true;
        self.entries.clear();
        Ok(())
    }
}

/// Parsed rich-query selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    fields: Map<String, Value>,
}

impl Selector {
    /// Parse a rich query string.
    pub fn parse(query: &str) -> Result<Self, LedgerError> {
        let doc: Value = serde_json::from_str(query)
            .map_err(|e| LedgerError::invalid_query(format!("malformed query: {e}")))?;
        match doc.get("selector") {
            Some(Value::Object(fields)) => Ok(Self {
                fields: fields.clone(),
            }),
            Some(_) => Err(LedgerError::invalid_query("selector must be an object")),
            None => Err(LedgerError::invalid_query("query has no selector")),
        }
    }

    /// Returns true if the stored value satisfies the selector.
    pub fn matches(&self, value: &[u8]) -> bool {
        let Ok(Value::Object(doc)) = serde_json::from_slice::<Value>(value) else {
            return false;
        };
        self.fields
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}

//! Transactional write buffer for the in-memory ledger.
//!
//! Writes made during one invocation are buffered here and become visible
//! to later reads in the same invocation. `MemLedger::commit` applies them;
//! `MemLedger::rollback` discards them.

use std::collections::BTreeMap;

use crate::types::Namespace;

/// Buffered write: `Some(value)` for a put, `None` for a delete.
pub type PendingWrite = Option<Vec<u8>>;

/// Write buffer keyed by `(namespace, key)`.
///
/// `BTreeMap` keeps commit order deterministic.
#[derive(Debug, Clone, Default)]
pub struct StateOverlay {
    writes: BTreeMap<(Namespace, String), PendingWrite>,
}

/// Result of looking up a key in the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayResult {
    /// Key was written in this overlay with this value.
    Found(Vec<u8>),
    /// Key was deleted in this overlay.
    Deleted,
    /// Key is untouched; the caller must read committed state.
    NotInOverlay,
}

impl StateOverlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a put, replacing any earlier write to the same key.
    pub fn set(&mut self, namespace: Namespace, key: String, value: Vec<u8>) {
        self.writes.insert((namespace, key), Some(value));
    }

    /// Buffer a delete. Later reads return `Deleted` instead of falling
    /// through to committed state.
    pub fn delete(&mut self, namespace: Namespace, key: String) {
        self.writes.insert((namespace, key), None);
    }

    /// Look up a key.
    pub fn get(&self, namespace: &Namespace, key: &str) -> OverlayResult {
        // The tuple key forces an owned lookup value.
        match self.writes.get(&(namespace.clone(), key.to_owned())) {
            Some(Some(value)) => OverlayResult::Found(value.clone()),
            Some(None) => OverlayResult::Deleted,
            None => OverlayResult::NotInOverlay,
        }
    }

    /// Buffered writes touching one namespace, in key order.
    pub fn namespace_writes<'a>(
        &'a self,
        namespace: &'a Namespace,
    ) -> impl Iterator<Item = (&'a str, &'a PendingWrite)> + 'a {
        self.writes
            .iter()
            .filter(move |((ns, _), _)| ns == namespace)
            .map(|((_, key), write)| (key.as_str(), write))
    }

    /// Consume the overlay and return all buffered writes in key order.
    pub fn drain(self) -> BTreeMap<(Namespace, String), PendingWrite> {
        self.writes
    }

    /// Discard all buffered writes.
    pub fn clear(&mut self) {
        self.writes.clear();
    }

    /// Number of keys touched.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns true if nothing has been buffered.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

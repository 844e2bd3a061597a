//! In-memory ledger for testing.
//!
//! `MemLedger` implements `Ledger` with `BTreeMap`s for deterministic key
//! ordering. Committed state lives per namespace; writes made through the
//! `Ledger` trait go to a `StateOverlay` until [`commit`](MemLedger::commit).
//! Fixture helpers write committed state directly.
//!
//! Fault injection hooks let tests make individual deletes, writes, or query
//! construction fail without a real ledger.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

use crate::error::LedgerError;
use crate::overlay::{OverlayResult, StateOverlay};
use crate::query::{MemQueryIterator, Selector};
use crate::traits::{Ledger, QueryIterator};
use crate::types::{LedgerLimits, Namespace, QueryResult, TransientMap};

/// Committed key-value pairs of one namespace.
pub type NamespaceState = BTreeMap<String, Vec<u8>>;

/// In-memory `Ledger` with a transactional write overlay.
#[derive(Debug, Clone, Default)]
pub struct MemLedger {
    committed: BTreeMap<Namespace, NamespaceState>,
    overlay: StateOverlay,
    transient: TransientMap,
    limits: LedgerLimits,
    failing_deletes: BTreeSet<(Namespace, String)>,
    put_failure: Option<LedgerError>,
    query_failure: Option<LedgerError>,
}

impl MemLedger {
    /// Create an empty ledger with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger with custom limits.
    pub fn with_limits(limits: LedgerLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    // ── Fixtures ──

    /// Insert committed state directly, bypassing the overlay.
    pub fn insert(&mut self, namespace: Namespace, key: impl Into<String>, value: Vec<u8>) {
        self.committed
            .entry(namespace)
            .or_default()
            .insert(key.into(), value);
    }

    /// Fill committed public state from `(key, value)` pairs.
    ///
    /// JSON strings are stored as their raw text; every other value is stored
    /// as its JSON encoding.
    pub fn fill_json<K, V, I>(&mut self, entries: I) -> Result<(), serde_json::Error>
    where
        K: Into<String>,
        V: Serialize,
        I: IntoIterator<Item = (K, V)>,
    {
        self.fill_namespace_json(Namespace::Public, entries)
    }

    /// Fill committed state of a private collection from `(key, value)` pairs.
    pub fn fill_private_json<K, V, I>(
        &mut self,
        collection: &str,
        entries: I,
    ) -> Result<(), serde_json::Error>
    where
        K: Into<String>,
        V: Serialize,
        I: IntoIterator<Item = (K, V)>,
    {
        self.fill_namespace_json(Namespace::Private(collection.to_owned()), entries)
    }

    fn fill_namespace_json<K, V, I>(
        &mut self,
        namespace: Namespace,
        entries: I,
    ) -> Result<(), serde_json::Error>
    where
        K: Into<String>,
        V: Serialize,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            let bytes = match serde_json::to_value(&value)? {
                Value::String(raw) => raw.into_bytes(),
                other => serde_json::to_vec(&other)?,
            };
            self.insert(namespace.clone(), key, bytes);
        }
        Ok(())
    }

    /// Set one entry of the transient map.
    pub fn set_transient(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.transient.insert(key.into(), value);
    }

    // ── Fault injection ──

    /// Make every delete of `key` in `namespace` fail.
    pub fn fail_delete(&mut self, namespace: Namespace, key: impl Into<String>) {
        self.failing_deletes.insert((namespace, key.into()));
    }

    /// Make every put (public or private) fail with `err`.
    pub fn fail_puts_with(&mut self, err: LedgerError) {
        self.put_failure = Some(err);
    }

    /// Make every query construction fail with `err`.
    pub fn fail_queries_with(&mut self, err: LedgerError) {
        self.query_failure = Some(err);
    }

    // ── Transaction control ──

    /// Apply buffered writes to committed state.
    pub fn commit(&mut self) {
        let writes = std::mem::take(&mut self.overlay).drain();
        for ((namespace, key), write) in writes {
            match write {
                Some(value) => {
                    self.committed.entry(namespace).or_default().insert(key, value);
                }
                None => {
                    if let Some(state) = self.committed.get_mut(&namespace) {
                        state.remove(&key);
                    }
                }
            }
        }
    }

    /// Discard buffered writes.
    pub fn rollback(&mut self) {
        self.overlay.clear();
    }

    // ── Inspection ──

    /// Committed state of one namespace.
    pub fn committed(&self, namespace: &Namespace) -> Option<&NamespaceState> {
        self.committed.get(namespace)
    }

    /// Committed public keys in key order.
    pub fn public_keys(&self) -> Vec<String> {
        self.committed(&Namespace::Public)
            .map(|state| state.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Committed keys of a private collection in key order.
    pub fn private_keys(&self, collection: &str) -> Vec<String> {
        self.committed(&Namespace::Private(collection.to_owned()))
            .map(|state| state.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of keys written or deleted since the last commit.
    pub fn pending_writes(&self) -> usize {
        self.overlay.len()
    }

    /// BLAKE3 digest over all committed state.
    ///
    /// Namespaces and keys are hashed in sorted order with length prefixes,
    /// so equal states always produce equal digests.
    pub fn state_digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        for (namespace, state) in &self.committed {
            if state.is_empty() {
                continue;
            }
            match namespace {
                Namespace::Public => {
                    hasher.update(&[0u8]);
                }
                Namespace::Private(name) => {
                    hasher.update(&[1u8]);
                    update_prefixed(&mut hasher, name.as_bytes());
                }
            }
            hasher.update(&(state.len() as u64).to_le_bytes());
            for (key, value) in state {
                update_prefixed(&mut hasher, key.as_bytes());
                update_prefixed(&mut hasher, value);
            }
        }
        *hasher.finalize().as_bytes()
    }

    // ── Internals ──

    fn validate_key(&self, key: &str) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::empty_key());
        }
        if key.len() > self.limits.max_key_len {
            return Err(LedgerError::key_too_large(key.len(), self.limits.max_key_len));
        }
        Ok(())
    }

    fn read(&self, namespace: &Namespace, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.validate_key(key)?;
        match self.overlay.get(namespace, key) {
            OverlayResult::Found(value) => Ok(Some(value)),
            OverlayResult::Deleted => Ok(None),
            OverlayResult::NotInOverlay => Ok(self
                .committed
                .get(namespace)
                .and_then(|state| state.get(key))
                .cloned()),
        }
    }

    fn write(&mut self, namespace: Namespace, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.validate_key(key)?;
        if value.len() > self.limits.max_value_len {
            return Err(LedgerError::value_too_large(value.len(), self.limits.max_value_len));
        }
        if let Some(err) = &self.put_failure {
            return Err(err.clone());
        }
        self.overlay.set(namespace, key.to_owned(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: Namespace, key: &str) -> Result<(), LedgerError> {
        self.validate_key(key)?;
        if self.failing_deletes.contains(&(namespace.clone(), key.to_owned())) {
            return Err(LedgerError::write_rejected(format!(
                "delete of {key:?} rejected"
            )));
        }
        self.overlay.delete(namespace, key.to_owned());
        Ok(())
    }

    /// Committed state with the overlay applied.
    fn visible(&self, namespace: &Namespace) -> NamespaceState {
        let mut state = self.committed.get(namespace).cloned().unwrap_or_default();
        for (key, write) in self.overlay.namespace_writes(namespace) {
            match write {
                Some(value) => {
                    state.insert(key.to_owned(), value.clone());
                }
                None => {
                    state.remove(key);
                }
            }
        }
        state
    }

    fn rich_query(
        &self,
        namespace: &Namespace,
        query: &str,
    ) -> Result<Box<dyn QueryIterator>, LedgerError> {
        if let Some(err) = &self.query_failure {
            return Err(err.clone());
        }
        let selector = Selector::parse(query)?;
        let label = namespace.collection().unwrap_or_default();
        let results = self
            .visible(namespace)
            .into_iter()
            .filter(|(_, value)| selector.matches(value))
            .map(|(key, value)| QueryResult::new(label, key, value))
            .collect();
        Ok(Box::new(MemQueryIterator::new(results)))
    }
}

fn update_prefixed(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

impl Ledger for MemLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.read(&Namespace::Public, key)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.write(Namespace::Public, key, value)
    }

    fn del_state(&mut self, key: &str) -> Result<(), LedgerError> {
        self.delete(Namespace::Public, key)
    }

    fn get_private_data(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, LedgerError> {
        self.read(&Namespace::Private(collection.to_owned()), key)
    }

    fn put_private_data(
        &mut self,
        collection: &str,
        key: &str,
        value: &[u8],
    ) -> Result<(), LedgerError> {
        self.write(Namespace::Private(collection.to_owned()), key, value)
    }

    fn del_private_data(&mut self, collection: &str, key: &str) -> Result<(), LedgerError> {
        self.delete(Namespace::Private(collection.to_owned()), key)
    }

    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn QueryIterator>, LedgerError> {
        if let Some(err) = &self.query_failure {
            return Err(err.clone());
        }
        let results = self
            .visible(&Namespace::Public)
            .into_iter()
            .filter(|(key, _)| start.is_empty() || key.as_str() >= start)
            .filter(|(key, _)| end.is_empty() || key.as_str() < end)
            .map(|(key, value)| QueryResult::new("", key, value))
            .collect();
        Ok(Box::new(MemQueryIterator::new(results)))
    }

    fn get_query_result(&self, query: &str) -> Result<Box<dyn QueryIterator>, LedgerError> {
        self.rich_query(&Namespace::Public, query)
    }

    fn get_private_data_query_result(
        &self,
        collection: &str,
        query: &str,
    ) -> Result<Box<dyn QueryIterator>, LedgerError> {
        self.rich_query(&Namespace::Private(collection.to_owned()), query)
    }

    fn get_transient(&self) -> Result<TransientMap, LedgerError> {
        Ok(self.transient.clone())
    }
}

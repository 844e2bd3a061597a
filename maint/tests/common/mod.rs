//! Shared test helpers for integration tests.
//!
//! Provides argument builders, seeded ledgers, a ledger wrapper with a
//! scripted query iterator, and a tracing layer that captures log events.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use ledgerkit_hostapi::{
    Ledger, LedgerError, MemLedger, MemQueryIterator, QueryIterator, TransientMap,
};
use serde_json::json;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

// ── Arguments ──

/// Build an owned argument list.
pub fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Owned key list, for comparing against ledger contents.
pub fn keys(items: &[&str]) -> Vec<String> {
    args(items)
}

// ── Ledgers ──

/// Public ledger with assets `a`..`e` and owners `o1`, `o2`.
pub fn asset_ledger() -> MemLedger {
    let mut ledger = MemLedger::new();
    ledger
        .fill_json([
            ("a", json!({"docType": "asset", "size": 1})),
            ("b", json!({"docType": "asset", "size": 2})),
            ("c", json!({"docType": "asset", "size": 3})),
            ("d", json!({"docType": "asset", "size": 4})),
            ("e", json!({"docType": "asset", "size": 5})),
            ("o1", json!({"docType": "owner"})),
            ("o2", json!({"docType": "owner"})),
        ])
        .expect("fixture should serialize");
    ledger
}

/// `asset_ledger` plus private collection `orgA` with keys `p1`..`p3`.
pub fn ledger_with_private() -> MemLedger {
    let mut ledger = asset_ledger();
    ledger
        .fill_private_json(
            "orgA",
            [
                ("p1", json!({"docType": "secret"})),
                ("p2", json!({"docType": "secret"})),
                ("p3", json!({"docType": "secret"})),
            ],
        )
        .expect("fixture should serialize");
    ledger
}

/// Ledger whose next rich query returns a pre-built iterator.
///
/// Every other operation goes to the wrapped `MemLedger`.
pub struct ScriptedQueryLedger {
    pub inner: MemLedger,
    next_query: RefCell<Option<MemQueryIterator>>,
}

impl ScriptedQueryLedger {
    pub fn new(inner: MemLedger, iter: MemQueryIterator) -> Self {
        Self {
            inner,
            next_query: RefCell::new(Some(iter)),
        }
    }
}

impl Ledger for ScriptedQueryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.inner.get_state(key)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.inner.put_state(key, value)
    }

    fn del_state(&mut self, key: &str) -> Result<(), LedgerError> {
        self.inner.del_state(key)
    }

    fn get_private_data(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, LedgerError> {
        self.inner.get_private_data(collection, key)
    }

    fn put_private_data(
        &mut self,
        collection: &str,
        key: &str,
        value: &[u8],
    ) -> Result<(), LedgerError> {
        self.inner.put_private_data(collection, key, value)
    }

    fn del_private_data(&mut self, collection: &str, key: &str) -> Result<(), LedgerError> {
        self.inner.del_private_data(collection, key)
    }

    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn QueryIterator>, LedgerError> {
        self.inner.get_state_by_range(start, end)
    }

    fn get_query_result(&self, query: &str) -> Result<Box<dyn QueryIterator>, LedgerError> {
        match self.next_query.borrow_mut().take() {
            Some(iter) => Ok(Box::new(iter)),
            None => self.inner.get_query_result(query),
        }
    }

    fn get_private_data_query_result(
        &self,
        collection: &str,
        query: &str,
    ) -> Result<Box<dyn QueryIterator>, LedgerError> {
        self.inner.get_private_data_query_result(collection, query)
    }

    fn get_transient(&self) -> Result<TransientMap, LedgerError> {
        self.inner.get_transient()
    }
}

// ── Log capture ──

/// One captured log event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn message(&self) -> &str {
        self.fields.get("message").map(String::as_str).unwrap_or_default()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Default)]
struct FieldVisitor(BTreeMap<String, String>);

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}

/// Tracing layer that records every event.
#[derive(Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCollector {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().expect("lock poisoned").clone()
    }

    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events().into_iter().filter(|e| e.level == level).collect()
    }
}

impl<S: Subscriber> Layer<S> for EventCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().expect("lock poisoned").push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0,
        });
    }
}

/// Run `f` with an `EventCollector` installed as the thread's subscriber.
pub fn capture_events<T>(f: impl FnOnce() -> T) -> (T, EventCollector) {
    let collector = EventCollector::default();
    let subscriber = tracing_subscriber::registry().with(collector.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, collector)
}

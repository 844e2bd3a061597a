//! Shared ledger types: limits, query results, and state addressing.

use std::collections::BTreeMap;

/// Maximum key length accepted by the in-memory ledger.
pub const MAX_KEY_LEN: usize = 256;

/// Maximum value length accepted by the in-memory ledger.
pub const MAX_VALUE_LEN: usize = 65_536; // 64 KiB

/// Per-invocation out-of-band input channel. Never recorded on the ledger.
///
/// `BTreeMap` keeps iteration deterministic.
pub type TransientMap = BTreeMap<String, Vec<u8>>;

/// Size limits enforced on ledger writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerLimits {
    /// Maximum length of a state key in bytes.
    pub max_key_len: usize,
    /// Maximum length of a state value in bytes.
    pub max_value_len: usize,
}

impl Default for LedgerLimits {
    fn default() -> Self {
        Self {
            max_key_len: MAX_KEY_LEN,
            max_value_len: MAX_VALUE_LEN,
        }
    }
}

/// One `(key, value)` pair produced by a query iterator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    /// Namespace the result was read from (the collection name for private data).
    pub namespace: String,
    /// Ledger key.
    pub key: String,
    /// Stored value.
    pub value: Vec<u8>,
}

impl QueryResult {
    /// Create a result in the given namespace.
    pub fn new(namespace: impl Into<String>, key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value,
        }
    }
}

/// Address of a state entry: the public ledger or a named private collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    /// The public, replicated ledger.
    Public,
    /// A named private data collection.
    Private(String),
}

impl Namespace {
    /// Returns the collection name for private namespaces.
    pub fn collection(&self) -> Option<&str> {
        match self {
            Self::Public => None,
            Self::Private(name) => Some(name.as_str()),
        }
    }
}

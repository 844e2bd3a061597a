//! `ledgerkit-hostapi`: ledger interface definitions for contract tooling.
//!
//! This crate defines the capabilities a contract runtime exposes to code
//! executing inside one ledger transaction. It provides:
//!
//! - `Ledger` trait: point reads/writes/deletes, private collections,
//!   range and rich queries, and the transient input channel
//! - `QueryIterator` trait: forward-only query results that must be closed
//! - `LedgerError`: ledger error type with an `ErrorKind` discriminant
//! - `MemLedger`: in-memory `Ledger` with a write overlay, JSON fixtures,
//!   fault injection, and a deterministic state digest for testing
//! - `LedgerLimits`: key/value size limits for the in-memory ledger

pub mod error;
pub mod types;
pub mod traits;
pub mod overlay;
pub mod query;
pub mod mem_ledger;

// Re-export commonly used types at the crate root.
pub use error::{ErrorKind, LedgerError};
pub use types::{LedgerLimits, Namespace, QueryResult, TransientMap};
pub use traits::{Ledger, QueryIterator};
pub use overlay::{OverlayResult, StateOverlay};
pub use query::{MemQueryIterator, Selector};
pub use mem_ledger::MemLedger;

//! `ledgerkit-maint`: self-disabling ledger maintenance interpreter.
//!
//! A privileged administrative interface that bulk-deletes ledger entries
//! from the public ledger or a private collection. It provides:
//!
//! - **Key normalization:** JSON strings, key descriptor objects, and arrays
//!   of either become one ordered key list
//! - **Query enumeration:** keys taken from a rich query, with the iterator
//!   released on every exit path
//! - **Batch bounding:** at most `batch_limit` keys per invocation
//! - **Best-effort deletion:** per-key failures are logged and reported,
//!   never fatal
//! - **Kill switch:** `Lock` writes a sentinel key that disables the
//!   interpreter for good
//!
//! The primary entry point is [`MaintenanceTool::invoke`].

pub mod error;
pub mod config;
pub mod keys;
pub mod enumerate;
pub mod transient;
pub mod lock;
pub mod command;
pub mod deleter;
pub mod response;
pub mod dispatcher;

pub use error::{DecodeError, IterError, MaintError, MaintResult};
pub use config::MaintConfig;
pub use command::{Command, CommandRequest, KeySource};
pub use deleter::{DeleteFailure, DeleteReport};
pub use dispatcher::{MaintenanceTool, Outcome, Phase};
pub use response::Response;

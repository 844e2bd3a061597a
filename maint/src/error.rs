//! Interpreter error types.
//!
//! Every `MaintError` is fatal: the invocation stops and the error message
//! becomes the transaction's failure result. Per-key delete failures are
//! not errors at this level; they are collected as
//! [`DeleteFailure`](crate::deleter::DeleteFailure)s in the delete report.

use ledgerkit_hostapi::LedgerError;

use crate::dispatcher::Phase;

/// Malformed JSON in the transient channel or in a key-bearing argument.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The transient `args` entry is not a JSON array.
    #[error("malformed transient args: {0}")]
    TransientArgs(#[source] serde_json::Error),

    /// A key-bearing argument is not a JSON string, object, or array.
    #[error("malformed key argument #{index}: {source}")]
    KeyArgument {
        /// Position of the argument among the key-bearing arguments.
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while draining a query iterator.
#[derive(Debug, thiserror::Error)]
#[error("query enumeration failed after {collected} keys: {source}")]
pub struct IterError {
    /// Keys collected before the failure. They are discarded.
    pub collected: usize,
    #[source]
    pub source: LedgerError,
}

/// Fatal interpreter error.
#[derive(Debug, thiserror::Error)]
pub enum MaintError {
    /// The lock sentinel is set; the interpreter is permanently disabled.
    #[error("unsupported function")]
    Locked,

    /// Malformed transient or key JSON.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Too few arguments for the selected command.
    #[error("not enough arguments: {command} requires at least {required}, got {got}")]
    NotEnoughArguments {
        command: String,
        required: usize,
        got: usize,
    },

    /// The first argument names no known command.
    #[error("unknown debug method: {0:?}")]
    UnknownCommand(String),

    /// A delete command asked to query a private collection.
    #[error("it is not allowed to query and update private collection {collection:?} in the same transaction")]
    PrivateQueryConflict { collection: String },

    /// Query enumeration failed.
    #[error(transparent)]
    Iter(#[from] IterError),

    /// Writing the lock sentinel failed.
    #[error("failed to write lock sentinel: {0}")]
    Write(#[source] LedgerError),

    /// A ledger read or query construction failed.
    #[error("ledger error (phase {phase}): {source}")]
    Ledger {
        phase: Phase,
        #[source]
        source: LedgerError,
    },
}

impl MaintError {
    /// The last phase the invocation completed before it was rejected.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Locked => Phase::Idle,
            Self::Decode(DecodeError::TransientArgs(_)) => Phase::LockChecked,
            Self::Decode(DecodeError::KeyArgument { .. })
            | Self::NotEnoughArguments { .. }
            | Self::UnknownCommand(_)
            | Self::PrivateQueryConflict { .. }
            | Self::Iter(_)
            | Self::Write(_) => Phase::ArgsResolved,
            Self::Ledger { phase, .. } => *phase,
        }
    }

    /// Returns true if the invocation was refused because of the lock sentinel.
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked)
    }
}

/// Convenience result type for the interpreter.
pub type MaintResult<T> = Result<T, MaintError>;

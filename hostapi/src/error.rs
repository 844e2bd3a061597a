//! Ledger-side error types.
//!
//! `LedgerError` is the error type returned by every `Ledger` and
//! `QueryIterator` method. The `kind()` discriminant lets callers branch
//! on the failure class without matching on messages.

use std::fmt;

/// Failure class of a ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The key is empty or longer than the configured maximum.
    InvalidKey,
    /// The value is longer than the configured maximum.
    ValueTooLarge,
    /// The query string could not be parsed by the ledger.
    InvalidQuery,
    /// A query iterator failed while producing results.
    Iterator,
    /// A write or delete was rejected by the ledger.
    WriteRejected,
    /// Any other ledger failure.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey => write!(f, "ERR_INVALID_KEY"),
            Self::ValueTooLarge => write!(f, "ERR_VALUE_TOO_LARGE"),
            Self::InvalidQuery => write!(f, "ERR_INVALID_QUERY"),
            Self::Iterator => write!(f, "ERR_ITERATOR"),
            Self::WriteRejected => write!(f, "ERR_WRITE_REJECTED"),
            Self::Internal => write!(f, "ERR_INTERNAL"),
        }
    }
}

/// Error returned by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerError {
    kind: ErrorKind,
    message: String,
}

impl LedgerError {
    /// Create an error of the given kind with a descriptive message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the failure class.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the descriptive message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create an empty-key error.
    pub fn empty_key() -> Self {
        Self::new(ErrorKind::InvalidKey, "key must not be empty")
    }

    /// Create a key-too-large error.
    pub fn key_too_large(len: usize, max: usize) -> Self {
        Self::new(
            ErrorKind::InvalidKey,
            format!("key length {len} exceeds maximum {max}"),
        )
    }

    /// Create a value-too-large error.
    pub fn value_too_large(len: usize, max: usize) -> Self {
        Self::new(
            ErrorKind::ValueTooLarge,
            format!("value length {len} exceeds maximum {max}"),
        )
    }

    /// Create an invalid-query error.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidQuery, message)
    }

    /// Create an iterator error.
    pub fn iterator(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Iterator, message)
    }

    /// Create a write-rejected error.
    pub fn write_rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WriteRejected, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ledger error {}: {}", self.kind, self.message)
    }
}

impl std::error::Error for LedgerError {}

//! Contract response mapping.

use crate::error::MaintError;

/// Status code of a successful invocation.
pub const OK: i32 = 200;

/// Status code of a failed invocation.
pub const ERROR: i32 = 500;

/// What the contract runtime returns to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: i32,
    /// Error description. Empty on success.
    pub message: String,
    pub payload: Vec<u8>,
}

impl Response {
    /// A successful response carrying `payload`.
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: OK,
            message: String::new(),
            payload,
        }
    }

    /// A failed response carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// Returns true for a successful response.
    pub fn is_ok(&self) -> bool {
        self.status == OK
    }
}

impl From<&MaintError> for Response {
    fn from(err: &MaintError) -> Self {
        Self::error(err.to_string())
    }
}

//! Interpreter configuration.

/// Default maximum number of keys processed by one invocation.
pub const DEFAULT_BATCH_LIMIT: usize = 2048;

/// Default ledger key of the lock sentinel.
pub const DEFAULT_LOCK_KEY: &str = "debuglock_";

/// Default transient map entry that overrides the visible arguments.
pub const DEFAULT_TRANSIENT_ARGS_KEY: &str = "args";

/// Configuration for the maintenance interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintConfig {
    /// Maximum keys enumerated per invocation, from arguments or a query.
    pub batch_limit: usize,

    /// Reserved ledger key whose presence disables the interpreter.
    pub lock_key: String,

    /// Value written to `lock_key` by the `Lock` command. Must be non-empty.
    pub lock_marker: Vec<u8>,

    /// Transient map entry carrying replacement arguments.
    pub transient_args_key: String,
}

impl Default for MaintConfig {
    fn default() -> Self {
        Self {
            batch_limit: DEFAULT_BATCH_LIMIT,
            lock_key: DEFAULT_LOCK_KEY.to_owned(),
            lock_marker: b"1".to_vec(),
            transient_args_key: DEFAULT_TRANSIENT_ARGS_KEY.to_owned(),
        }
    }
}

impl MaintConfig {
    /// Returns a copy with a different batch limit.
    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit;
        self
    }

    /// Returns a copy with a different lock sentinel key.
    pub fn with_lock_key(mut self, lock_key: impl Into<String>) -> Self {
        self.lock_key = lock_key.into();
        self
    }
}

//! Invocation driver, the entry point of the maintenance interpreter.
//!
//! `MaintenanceTool::invoke` runs one invocation through these phases:
//!
//! 1. `Idle → LockChecked`: refuse everything if the lock sentinel is set
//! 2. `LockChecked → ArgsResolved`: apply the transient argument override
//! 3. Decode the command; `Lock` writes the sentinel and completes
//! 4. `ArgsResolved → KeysEnumerated`: keys from a query or from arguments
//! 5. `KeysEnumerated → Completed`: best-effort delete of every key
//!
//! Every gate failure is fatal and leaves the remaining phases unexecuted.
//! Per-key delete failures are not gate failures; the invocation still
//! completes and reports them in the returned [`DeleteReport`].

use std::fmt;

use ledgerkit_hostapi::{Ledger, Namespace};
use tracing::{debug, info, info_span, warn};

use crate::command::{CommandRequest, DeleteRequest, KeySource};
use crate::config::MaintConfig;
use crate::deleter::{delete_keys, DeleteReport};
use crate::enumerate::collect_query_keys;
use crate::error::{MaintError, MaintResult};
use crate::keys::normalize_keys;
use crate::lock::LockGuard;
use crate::response::Response;
use crate::transient::resolve_args;

/// Invocation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    LockChecked,
    ArgsResolved,
    KeysEnumerated,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::LockChecked => "lock-checked",
            Self::ArgsResolved => "args-resolved",
            Self::KeysEnumerated => "keys-enumerated",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The lock sentinel was written.
    Locked,
    /// A delete batch ran. Individual deletes may have failed.
    Deleted(DeleteReport),
}

/// The maintenance command interpreter.
///
/// Holds only immutable configuration. All state lives in the ledger, so
/// one instance can serve any number of invocations.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceTool {
    config: MaintConfig,
}

impl MaintenanceTool {
    /// Create an interpreter with the given configuration.
    pub fn new(config: MaintConfig) -> Self {
        Self { config }
    }

    /// The interpreter's configuration.
    pub fn config(&self) -> &MaintConfig {
        &self.config
    }

    /// Run one invocation against `ledger`.
    pub fn invoke(&self, ledger: &mut dyn Ledger, args: Vec<String>) -> MaintResult<Outcome> {
        let span = info_span!("maint_invoke", argc = args.len());
        let _enter = span.enter();

        let result = self.run(ledger, args);
        if let Err(err) = &result {
            warn!(phase = %err.phase(), error = %err, "maintenance invocation rejected");
        }
        result
    }

    /// Run one invocation and map the result to a contract response.
    ///
    /// Success carries an empty payload, failure the error message.
    pub fn handle(&self, ledger: &mut dyn Ledger, args: Vec<String>) -> Response {
        match self.invoke(ledger, args) {
            Ok(_) => Response::success(Vec::new()),
            Err(err) => Response::from(&err),
        }
    }

    fn lock_guard(&self) -> LockGuard<'_> {
        LockGuard::new(&self.config.lock_key, &self.config.lock_marker)
    }

    fn run(&self, ledger: &mut dyn Ledger, args: Vec<String>) -> MaintResult<Outcome> {
        self.lock_guard().check_unlocked(ledger)?;
        debug!(phase = %Phase::LockChecked, "lock sentinel absent");

        let transient = ledger.get_transient().map_err(|source| MaintError::Ledger {
            phase: Phase::LockChecked,
            source,
        })?;
        let args = resolve_args(args, &transient, &self.config.transient_args_key)?;
        debug!(phase = %Phase::ArgsResolved, argc = args.len(), "arguments resolved");

        match CommandRequest::parse(args)? {
            CommandRequest::Lock => {
                self.lock_guard().commit_lock(ledger)?;
                info!(lock_key = %self.config.lock_key, "maintenance interface locked");
                Ok(Outcome::Locked)
            }
            CommandRequest::Delete(request) => {
                info!(command = %request.command, "maintenance delete requested");
                let keys = self.enumerate(ledger, &request)?;
                debug!(phase = %Phase::KeysEnumerated, keys = keys.len(), "keys enumerated");

                let report = delete_keys(ledger, &request.target, keys);
                info!(
                    phase = %Phase::Completed,
                    command = %request.command,
                    deleted = report.deleted.len(),
                    failed = report.failed.len(),
                    "maintenance delete completed"
                );
                Ok(Outcome::Deleted(report))
            }
        }
    }

    fn enumerate(&self, ledger: &dyn Ledger, request: &DeleteRequest) -> MaintResult<Vec<String>> {
        let limit = self.config.batch_limit;
        match (&request.target, &request.source) {
            // Checked before any query is issued against the collection.
            (Namespace::Private(collection), KeySource::Query(_)) => {
                Err(MaintError::PrivateQueryConflict {
                    collection: collection.clone(),
                })
            }
            (Namespace::Public, KeySource::Query(query)) => {
                let iter = ledger.get_query_result(query).map_err(|source| MaintError::Ledger {
                    phase: Phase::ArgsResolved,
                    source,
                })?;
                Ok(collect_query_keys(iter, limit)?)
            }
            (_, KeySource::Args(raw)) => Ok(normalize_keys(raw.as_slice(), limit)?),
        }
    }
}

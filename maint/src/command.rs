//! Command decoding.
//!
//! Arguments arrive as a command line:
//!
//! ```text
//! DelState      <selector> <key-arg>...
//! DelState      query      <query>
//! DelPrivState  <selector> <collection> <key-arg>...
//! DelPrivState  query      <collection> <query>      (always rejected)
//! Lock
//! ```
//!
//! `<selector>` is `query` to take keys from a rich query; any other value
//! means the remaining arguments carry keys (see [`crate::keys`]).

use std::fmt;
use std::str::FromStr;

use ledgerkit_hostapi::Namespace;

use crate::error::{MaintError, MaintResult};

/// Selector value that switches a delete command to query mode.
pub const QUERY_SELECTOR: &str = "query";

/// Maintenance command named by the first argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Delete public ledger keys.
    DelState,
    /// Delete keys of a private collection.
    DelPrivState,
    /// Permanently disable the interpreter.
    Lock,
}

impl Command {
    /// Wire name of the command.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DelState => "DelState",
            Self::DelPrivState => "DelPrivState",
            Self::Lock => "Lock",
        }
    }

    /// Index of the first key-bearing (or query) argument.
    fn key_offset(self) -> usize {
        match self {
            Self::DelState => 2,
            Self::DelPrivState => 3,
            Self::Lock => 1,
        }
    }
}

impl FromStr for Command {
    type Err = MaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DelState" => Ok(Self::DelState),
            "DelPrivState" => Ok(Self::DelPrivState),
            "Lock" => Ok(Self::Lock),
            other => Err(MaintError::UnknownCommand(other.to_owned())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the keys of a delete command come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// A rich query string; keys are the query's result keys.
    Query(String),
    /// Raw key-bearing arguments, in order.
    Args(Vec<String>),
}

/// A decoded delete command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub command: Command,
    pub target: Namespace,
    pub source: KeySource,
}

/// A decoded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    Delete(DeleteRequest),
    Lock,
}

impl CommandRequest {
    /// Decode a resolved argument list.
    pub fn parse(mut args: Vec<String>) -> MaintResult<Self> {
        let Some(name) = args.first() else {
            return Err(MaintError::NotEnoughArguments {
                command: String::new(),
                required: 1,
                got: 0,
            });
        };
        let command: Command = name.parse()?;
        if command == Command::Lock {
            return Ok(Self::Lock);
        }

        let offset = command.key_offset();
        if args.len() < offset + 1 {
            return Err(MaintError::NotEnoughArguments {
                command: command.as_str().to_owned(),
                required: offset + 1,
                got: args.len(),
            });
        }

        let target = match command {
            Command::DelPrivState => Namespace::Private(args[2].clone()),
            _ => Namespace::Public,
        };
        let source = if args[1] == QUERY_SELECTOR {
            KeySource::Query(args[offset].clone())
        } else {
            KeySource::Args(args.split_off(offset))
        };

        Ok(Self::Delete(DeleteRequest {
            command,
            target,
            source,
        }))
    }

    /// The command this request runs.
    pub fn command(&self) -> Command {
        match self {
            Self::Delete(request) => request.command,
            Self::Lock => Command::Lock,
        }
    }
}

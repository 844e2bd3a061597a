//! Argument override through the transient channel.
//!
//! Callers that do not want their arguments recorded in the transaction
//! proposal can pass them as a JSON array in the transient map instead.

use ledgerkit_hostapi::TransientMap;
use serde_json::Value;

use crate::error::DecodeError;

/// Resolve the effective argument list of an invocation.
///
/// If `transient[args_key]` is present and non-empty it must be a JSON array;
/// its elements replace `declared`. String elements are used verbatim, every
/// other element becomes its compact JSON text (object keys sorted).
/// Otherwise `declared` is returned unchanged.
pub fn resolve_args(
    declared: Vec<String>,
    transient: &TransientMap,
    args_key: &str,
) -> Result<Vec<String>, DecodeError> {
    let raw = match transient.get(args_key) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(declared),
    };

    let elements: Vec<Value> = serde_json::from_slice(raw).map_err(DecodeError::TransientArgs)?;
    Ok(elements.into_iter().map(encode_arg).collect())
}

fn encode_arg(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

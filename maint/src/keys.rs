//! Key normalization: turn loosely-typed key-bearing arguments into an
//! ordered, bounded key list.
//!
//! Each argument is classified by its first character:
//!
//! ```text
//! "..."   a JSON string, used as one key
//! [...]   a JSON array of key descriptors and/or JSON strings
//! other   a single JSON key descriptor object
//! ```
//!
//! A key descriptor is a JSON object carrying the key under `"id"` or
//! `"ID"`; `"id"` wins when both are present, and descriptors with neither
//! are skipped. Field names are matched case-insensitively, exact spellings
//! first. `null` stands for an empty descriptor. Anything else in a
//! descriptor position, arrays included, is a decode error.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// JSON object naming a ledger key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct KeyDescriptor {
    /// Lower-case id field. Preferred.
    pub id: Option<String>,
    /// Upper-case id field. Used when `id` is absent.
    pub big_id: Option<String>,
}

impl KeyDescriptor {
    /// The key this descriptor names, if any.
    pub fn into_key(self) -> Option<String> {
        self.id.or(self.big_id)
    }
}

impl TryFrom<Map<String, Value>> for KeyDescriptor {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut descriptor = Self::default();
        // Mixed-case spellings ("Id", "iD") fill `id` unless it is set exactly.
        let mut folded = None;
        for (name, value) in fields {
            let slot = match name.as_str() {
                "id" => &mut descriptor.id,
                "ID" => &mut descriptor.big_id,
                other if other.eq_ignore_ascii_case("id") => &mut folded,
                _ => continue,
            };
            *slot = id_value(&name, value)?;
        }
        if descriptor.id.is_none() {
            descriptor.id = folded;
        }
        Ok(descriptor)
    }
}

fn id_value(name: &str, value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(key) => Ok(Some(key)),
        other => Err(format!("key descriptor field {name:?} must be a string, got {other}")),
    }
}

/// One element of a JSON array argument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeyEntry {
    Bare(String),
    Descriptor(KeyDescriptor),
    /// `null`, an empty descriptor.
    Null,
}

impl KeyEntry {
    fn into_key(self) -> Option<String> {
        match self {
            Self::Bare(key) => Some(key),
            Self::Descriptor(descriptor) => descriptor.into_key(),
            Self::Null => None,
        }
    }
}

/// A classified key-bearing argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyArgument {
    /// `"key"`
    Bare(String),
    /// `[{"id": ...}, "key", ...]`
    List(Vec<KeyEntry>),
    /// `{"id": ...}`
    Descriptor(KeyDescriptor),
}

impl KeyArgument {
    /// Classify and decode one raw argument. Empty and `null` arguments
    /// yield `None`.
    pub fn parse(raw: &str) -> Result<Option<Self>, serde_json::Error> {
        let parsed = match raw.as_bytes().first() {
            None => return Ok(None),
            Some(b'"') => Self::Bare(serde_json::from_str(raw)?),
            Some(b'[') => Self::List(serde_json::from_str(raw)?),
            Some(_) => match serde_json::from_str::<Option<KeyDescriptor>>(raw)? {
                Some(descriptor) => Self::Descriptor(descriptor),
                None => return Ok(None),
            },
        };
        Ok(Some(parsed))
    }

    /// Keys named by this argument, in order.
    pub fn into_keys(self) -> Vec<String> {
        match self {
            Self::Bare(key) => vec![key],
            Self::List(entries) => entries.into_iter().filter_map(KeyEntry::into_key).collect(),
            Self::Descriptor(descriptor) => descriptor.into_key().into_iter().collect(),
        }
    }
}

/// Normalize key-bearing arguments into at most `limit` keys.
///
/// The limit bounds the total across all arguments. Once it is reached the
/// remaining arguments are not decoded. Any decode error aborts the whole
/// normalization.
pub fn normalize_keys<S: AsRef<str>>(
    raw_args: &[S],
    limit: usize,
) -> Result<Vec<String>, DecodeError> {
    let mut keys = Vec::with_capacity(limit.min(raw_args.len()));

    for (index, raw) in raw_args.iter().enumerate() {
        if keys.len() >= limit {
            break;
        }
        let parsed = KeyArgument::parse(raw.as_ref())
            .map_err(|source| DecodeError::KeyArgument { index, source })?;
        let Some(argument) = parsed else {
            continue;
        };
        let remaining = limit - keys.len();
        keys.extend(argument.into_keys().into_iter().take(remaining));
    }

    Ok(keys)
}

//! Typed registry records.
//!
//! A record is a map of field name to a tagged value. On the wire each value
//! is an externally tagged JSON object, e.g.
//! `{"fields": {"version": {"integer": 3}, "latestPack": {"reference": "pack-3"}}}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a record inside one registry container.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Opaque locator of a binary blob, interpreted by the registry backend that
/// produced it (a container-relative path for the directory and HTTP backends).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobHandle {
    location: String,
}

impl BlobHandle {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Reference(RecordId),
    Blob(BlobHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Reference,
    Blob,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Reference => "reference",
            FieldKind::Blob => "blob",
        };
        f.write_str(s)
    }
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Reference(_) => FieldKind::Reference,
            FieldValue::Blob(_) => FieldKind::Blob,
        }
    }
}

/// Typed field access failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("field {field:?} is missing")]
    Missing { field: String },

    #[error("field {field:?} is a {found}, expected a {expected}")]
    WrongType {
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        expected: FieldKind,
        pick: impl FnOnce(&'a FieldValue) -> Option<T>,
    ) -> Result<T, RecordError> {
        let value = self.fields.get(name).ok_or_else(|| RecordError::Missing {
            field: name.to_string(),
        })?;
        pick(value).ok_or_else(|| RecordError::WrongType {
            field: name.to_string(),
            expected,
            found: value.kind(),
        })
    }

    pub fn string(&self, name: &str) -> Result<&str, RecordError> {
        self.typed(name, FieldKind::String, |v| match v {
            FieldValue::String(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn integer(&self, name: &str) -> Result<i64, RecordError> {
        self.typed(name, FieldKind::Integer, |v| match v {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        })
    }

    pub fn reference(&self, name: &str) -> Result<&RecordId, RecordError> {
        self.typed(name, FieldKind::Reference, |v| match v {
            FieldValue::Reference(id) => Some(id),
            _ => None,
        })
    }

    pub fn blob(&self, name: &str) -> Result<&BlobHandle, RecordError> {
        self.typed(name, FieldKind::Blob, |v| match v {
            FieldValue::Blob(b) => Some(b),
            _ => None,
        })
    }
}

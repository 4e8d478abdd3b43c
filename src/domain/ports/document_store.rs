//! Document store port.
//!
//! The backing database is consumed as an opaque document store addressed by
//! `(collection path, document id)`, queryable by field equality. Adapters
//! resolve the server-timestamp sentinel at write time, so callers never embed
//! their own wall-clock reads into audit fields.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::DomainResult;

/// Opaque document identifier, assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A named entity group, possibly nested under a parent entity
/// (`courses/{courseId}/lessons`). Opaque to the store beyond its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// A top-level collection like `courses` or `users`.
    pub fn top(name: &str) -> Self {
        Self(name.to_string())
    }

    /// A subcollection nested under one document of this collection.
    pub fn child(&self, parent_id: &DocumentId, name: &str) -> Self {
        Self(format!("{}/{}/{}", self.0, parent_id, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A field value in a write request.
///
/// `ServerTimestamp` is a sentinel the adapter replaces with its own clock
/// reading (RFC 3339 string) when the write is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Value(Value),
    ServerTimestamp,
}

impl FieldValue {
    pub fn string(s: impl Into<String>) -> Self {
        FieldValue::Value(Value::String(s.into()))
    }

    pub fn bool(b: bool) -> Self {
        FieldValue::Value(Value::Bool(b))
    }

    pub fn null() -> Self {
        FieldValue::Value(Value::Null)
    }

    /// Resolve this value against the adapter's clock reading.
    pub fn resolve(self, now: DateTime<Utc>) -> Value {
        match self {
            FieldValue::Value(v) => v,
            FieldValue::ServerTimestamp => Value::String(now.to_rfc3339()),
        }
    }
}

/// Ordered map of field names to write values.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Resolve every sentinel in a field map against a single clock reading.
pub fn resolve_field_map(fields: FieldMap, now: DateTime<Utc>) -> serde_json::Map<String, Value> {
    fields
        .into_iter()
        .map(|(name, value)| (name, value.resolve(now)))
        .collect()
}

/// Equality predicate over a single document field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn matches(&self, fields: &serde_json::Map<String, Value>) -> bool {
        fields.get(&self.field).unwrap_or(&Value::Null) == &self.value
    }
}

/// A document as read from the store: its id plus an opaque field tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: serde_json::Map<String, Value>,
}

/// Contract for the backing document database.
///
/// Ordering of `query` results is store-defined. No retries, cancellation, or
/// deadlines are layered here; every call runs to completion or failure.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id. `Ok(None)` means confirmed absent.
    async fn get(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
    ) -> DomainResult<Option<Document>>;

    /// All documents in `collection` matching every filter (equality only).
    async fn query(
        &self,
        collection: &CollectionPath,
        filters: &[FieldFilter],
    ) -> DomainResult<Vec<Document>>;

    /// Insert a new document, returning the store-assigned id.
    async fn insert(&self, collection: &CollectionPath, fields: FieldMap)
        -> DomainResult<DocumentId>;

    /// Create or fully replace the document at a caller-chosen id.
    async fn upsert(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        fields: FieldMap,
    ) -> DomainResult<()>;

    /// Partial-field update. Fails with `NotFound` if the document is absent.
    async fn update(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        fields: FieldMap,
    ) -> DomainResult<()>;

    /// Physically remove a document. Fails with `NotFound` if absent.
    async fn hard_delete(&self, collection: &CollectionPath, id: &DocumentId) -> DomainResult<()>;
}

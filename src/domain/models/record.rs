//! Record lifecycle metadata shared by every persisted entity.
//!
//! Every lifecycle-managed document carries audit and soft-delete fields.
//! Domain-specific fields are opaque to the lifecycle and cache mechanisms.
//!
//! Invariant: `is_deleted == true` iff `deleted_at` is set iff `deleted_by`
//! is set. Breaking this pairing is a defect.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{Document, DocumentId, FieldMap, FieldValue};

/// Document field names as stored in the backing database.
pub mod fields {
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const UPDATED_BY: &str = "updatedBy";
    pub const IS_DELETED: &str = "isDeleted";
    pub const DELETED_AT: &str = "deletedAt";
    pub const DELETED_BY: &str = "deletedBy";
}

/// Identity of the actor performing a mutation, threaded explicitly into every
/// lifecycle-mutating call rather than read from ambient session state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Audit and soft-delete metadata embedded (flattened) in every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_by: Option<ActorId>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_by: Option<ActorId>,
}

impl RecordMeta {
    /// Check the delete-axis pairing invariant.
    pub fn is_lifecycle_consistent(&self) -> bool {
        self.is_deleted == self.deleted_at.is_some() && self.is_deleted == self.deleted_by.is_some()
    }
}

/// A typed record together with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: DocumentId,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Stored<T> {
    pub fn new(id: DocumentId, record: T) -> Self {
        Self { id, record }
    }
}

/// Decode a raw document into a typed record, keeping the id alongside.
pub fn decode<T: DeserializeOwned>(doc: &Document) -> DomainResult<Stored<T>> {
    let record = serde_json::from_value(Value::Object(doc.fields.clone()))
        .map_err(|e| DomainError::Serialization(format!("{}: {e}", doc.id)))?;
    Ok(Stored::new(doc.id.clone(), record))
}

/// Serialize a domain value into a write map of concrete field values.
///
/// The value must serialize to a JSON object; anything else is a programming
/// error surfaced as a validation failure.
pub fn encode<T: Serialize>(value: &T) -> DomainResult<FieldMap> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(name, v)| (name, FieldValue::Value(v)))
            .collect()),
        other => Err(DomainError::Validation(format!(
            "expected an object-shaped record, got {other}"
        ))),
    }
}

/// Audit stamp applied to every mutation: `updatedAt` resolved by the store,
/// `updatedBy` set to the acting identity.
pub fn audit_fields(actor: &ActorId) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(fields::UPDATED_AT.to_string(), FieldValue::ServerTimestamp);
    fields.insert(
        fields::UPDATED_BY.to_string(),
        FieldValue::string(actor.as_str()),
    );
    fields
}

/// Creation stamp for new records: timestamps resolved by the store, not yet
/// deleted.
pub fn creation_fields() -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(fields::CREATED_AT.to_string(), FieldValue::ServerTimestamp);
    fields.insert(fields::UPDATED_AT.to_string(), FieldValue::ServerTimestamp);
    fields.insert(fields::IS_DELETED.to_string(), FieldValue::bool(false));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(deleted: bool) -> RecordMeta {
        let now = Utc::now();
        RecordMeta {
            created_at: now,
            updated_at: now,
            updated_by: None,
            is_deleted: deleted,
            deleted_at: deleted.then_some(now),
            deleted_by: deleted.then(|| ActorId::new("adminX")),
        }
    }

    #[test]
    fn test_lifecycle_consistency() {
        assert!(meta(false).is_lifecycle_consistent());
        assert!(meta(true).is_lifecycle_consistent());

        let mut broken = meta(true);
        broken.deleted_by = None;
        assert!(!broken.is_lifecycle_consistent());

        let mut broken = meta(false);
        broken.deleted_at = Some(Utc::now());
        assert!(!broken.is_lifecycle_consistent());
    }

    #[test]
    fn test_meta_round_trip_uses_camel_case() {
        let json = serde_json::to_value(meta(true)).unwrap();
        assert!(json.get("isDeleted").unwrap().as_bool().unwrap());
        assert!(json.get("deletedAt").is_some());
        assert!(json.get("deletedBy").is_some());
        assert!(json.get("createdAt").is_some());

        let back: RecordMeta = serde_json::from_value(json).unwrap();
        assert!(back.is_lifecycle_consistent());
    }

    #[test]
    fn test_encode_rejects_non_objects() {
        assert!(encode(&42u32).is_err());
    }
}

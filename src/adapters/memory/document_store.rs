//! In-memory document store.
//!
//! A faithful fake of the backing document database for tests and offline
//! development: collections are maps of id to JSON field trees, queries are
//! equality scans in insertion order, and server timestamps resolve against
//! the injected clock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{
    resolve_field_map, Clock, CollectionPath, Document, DocumentId, DocumentStore, FieldFilter,
    FieldMap,
};

type FieldTree = serde_json::Map<String, serde_json::Value>;

pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<(DocumentId, FieldTree)>>>,
    clock: Arc<dyn Clock>,
    /// Fault injection: number of update calls still allowed before the next
    /// one fails. `usize::MAX` disables injection.
    updates_before_failure: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            clock,
            updates_before_failure: AtomicUsize::new(usize::MAX),
        }
    }

    /// Allow `remaining` more updates, then fail every subsequent one with a
    /// store-unavailable error. For exercising partial-failure paths.
    pub fn fail_after_updates(&self, remaining: usize) {
        self.updates_before_failure
            .store(remaining, Ordering::SeqCst);
    }

    fn consume_update_budget(&self) -> DomainResult<()> {
        let remaining = self.updates_before_failure.load(Ordering::SeqCst);
        if remaining == usize::MAX {
            return Ok(());
        }
        if remaining == 0 {
            return Err(DomainError::StoreUnavailable(
                "injected update failure".to_string(),
            ));
        }
        self.updates_before_failure
            .store(remaining - 1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
    ) -> DomainResult<Option<Document>> {
        let collections = self.collections.read().expect("store lock poisoned");
        Ok(collections.get(collection.as_str()).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(doc_id, fields)| Document {
                    id: doc_id.clone(),
                    fields: fields.clone(),
                })
        }))
    }

    async fn query(
        &self,
        collection: &CollectionPath,
        filters: &[FieldFilter],
    ) -> DomainResult<Vec<Document>> {
        let collections = self.collections.read().expect("store lock poisoned");
        let docs = collections
            .get(collection.as_str())
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| filters.iter().all(|f| f.matches(fields)))
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn insert(
        &self,
        collection: &CollectionPath,
        fields: FieldMap,
    ) -> DomainResult<DocumentId> {
        let id = DocumentId::new(Uuid::new_v4().to_string());
        let resolved = resolve_field_map(fields, self.clock.now());
        let mut collections = self.collections.write().expect("store lock poisoned");
        collections
            .entry(collection.as_str().to_string())
            .or_default()
            .push((id.clone(), resolved));
        Ok(id)
    }

    async fn upsert(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        fields: FieldMap,
    ) -> DomainResult<()> {
        let resolved = resolve_field_map(fields, self.clock.now());
        let mut collections = self.collections.write().expect("store lock poisoned");
        let docs = collections
            .entry(collection.as_str().to_string())
            .or_default();
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, existing)) => *existing = resolved,
            None => docs.push((id.clone(), resolved)),
        }
        Ok(())
    }

    async fn update(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        fields: FieldMap,
    ) -> DomainResult<()> {
        self.consume_update_budget()?;
        let resolved = resolve_field_map(fields, self.clock.now());
        let mut collections = self.collections.write().expect("store lock poisoned");
        let existing = collections
            .get_mut(collection.as_str())
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
            .ok_or_else(|| DomainError::not_found(collection.as_str(), id.as_str()))?;
        for (name, value) in resolved {
            existing.1.insert(name, value);
        }
        Ok(())
    }

    async fn hard_delete(&self, collection: &CollectionPath, id: &DocumentId) -> DomainResult<()> {
        let mut collections = self.collections.write().expect("store lock poisoned");
        let docs = collections
            .get_mut(collection.as_str())
            .ok_or_else(|| DomainError::not_found(collection.as_str(), id.as_str()))?;
        let before = docs.len();
        docs.retain(|(doc_id, _)| doc_id != id);
        if docs.len() == before {
            return Err(DomainError::not_found(collection.as_str(), id.as_str()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::ManualClock;
    use crate::domain::ports::FieldValue;
    use chrono::Duration;

    fn setup() -> (Arc<ManualClock>, InMemoryDocumentStore, CollectionPath) {
        let clock = Arc::new(ManualClock::default());
        let store = InMemoryDocumentStore::new(clock.clone());
        (clock, store, CollectionPath::top("courses"))
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let (_, store, collection) = setup();
        let a = store.insert(&collection, FieldMap::new()).await.unwrap();
        let b = store.insert(&collection, FieldMap::new()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_server_timestamp_resolves_against_clock() {
        let (clock, store, collection) = setup();
        clock.advance(Duration::hours(2));

        let mut fields = FieldMap::new();
        fields.insert("createdAt".to_string(), FieldValue::ServerTimestamp);
        let id = store.insert(&collection, fields).await.unwrap();

        let doc = store.get(&collection, &id).await.unwrap().unwrap();
        assert_eq!(
            doc.fields["createdAt"],
            serde_json::Value::String(clock.now().to_rfc3339())
        );
    }

    #[tokio::test]
    async fn test_query_filters_by_equality() {
        let (_, store, collection) = setup();
        let mut active = FieldMap::new();
        active.insert("isDeleted".to_string(), FieldValue::bool(false));
        let mut deleted = FieldMap::new();
        deleted.insert("isDeleted".to_string(), FieldValue::bool(true));

        store.insert(&collection, active.clone()).await.unwrap();
        store.insert(&collection, active).await.unwrap();
        store.insert(&collection, deleted).await.unwrap();

        let hits = store
            .query(&collection, &[FieldFilter::eq("isDeleted", false)])
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_update_merges_partial_fields() {
        let (_, store, collection) = setup();
        let mut fields = FieldMap::new();
        fields.insert("title".to_string(), FieldValue::string("Algebra"));
        fields.insert("isDeleted".to_string(), FieldValue::bool(false));
        let id = store.insert(&collection, fields).await.unwrap();

        let mut patch = FieldMap::new();
        patch.insert("title".to_string(), FieldValue::string("Algebra II"));
        store.update(&collection, &id, patch).await.unwrap();

        let doc = store.get(&collection, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["title"], "Algebra II");
        assert_eq!(doc.fields["isDeleted"], false);
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let (_, store, collection) = setup();
        let err = store
            .update(&collection, &DocumentId::new("missing"), FieldMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_nested_collections_are_independent() {
        let (_, store, _) = setup();
        let lessons_a = CollectionPath::top("courses").child(&DocumentId::new("a"), "lessons");
        let lessons_b = CollectionPath::top("courses").child(&DocumentId::new("b"), "lessons");

        store.insert(&lessons_a, FieldMap::new()).await.unwrap();

        assert_eq!(store.query(&lessons_a, &[]).await.unwrap().len(), 1);
        assert!(store.query(&lessons_b, &[]).await.unwrap().is_empty());
    }
}

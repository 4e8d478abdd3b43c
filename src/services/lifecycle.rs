//! Soft-delete lifecycle manager.
//!
//! Delete and restore are reversible state transitions instead of destructive
//! removal. Each transition stamps actor and timestamp metadata; list reads
//! elsewhere in the crate exclude logically-deleted records by default.
//!
//! Both transitions are idempotent: applying one to a record already in the
//! target state performs no write and reports `Unchanged`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::record::{audit_fields, fields, ActorId};
use crate::domain::ports::{
    CollectionPath, Document, DocumentId, DocumentStore, FieldFilter, FieldValue,
};

/// Result of a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// The record changed state.
    Changed,
    /// The record was already in the target state; nothing was written.
    Unchanged,
}

#[derive(Clone)]
pub struct LifecycleService {
    store: Arc<dyn DocumentStore>,
}

impl LifecycleService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Mark a record as logically deleted, stamping who and when.
    ///
    /// The record must exist. Re-deleting an already-deleted record is a
    /// no-op `Unchanged`, preserving the original deletion stamp.
    pub async fn soft_delete(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        actor: &ActorId,
    ) -> DomainResult<LifecycleOutcome> {
        let doc = self.require(collection, id).await?;
        if is_deleted(&doc) {
            return Ok(LifecycleOutcome::Unchanged);
        }

        let mut update = audit_fields(actor);
        update.insert(fields::IS_DELETED.to_string(), FieldValue::bool(true));
        update.insert(fields::DELETED_AT.to_string(), FieldValue::ServerTimestamp);
        update.insert(
            fields::DELETED_BY.to_string(),
            FieldValue::string(actor.as_str()),
        );
        self.store.update(collection, id, update).await?;

        info!(collection = %collection, %id, %actor, "soft-deleted record");
        Ok(LifecycleOutcome::Changed)
    }

    /// Reverse a soft delete, clearing the deletion stamp and recording the
    /// restoring actor in the audit fields.
    pub async fn restore(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        actor: &ActorId,
    ) -> DomainResult<LifecycleOutcome> {
        let doc = self.require(collection, id).await?;
        if !is_deleted(&doc) {
            return Ok(LifecycleOutcome::Unchanged);
        }

        let mut update = audit_fields(actor);
        update.insert(fields::IS_DELETED.to_string(), FieldValue::bool(false));
        update.insert(fields::DELETED_AT.to_string(), FieldValue::null());
        update.insert(fields::DELETED_BY.to_string(), FieldValue::null());
        self.store.update(collection, id, update).await?;

        info!(collection = %collection, %id, %actor, "restored record");
        Ok(LifecycleOutcome::Changed)
    }

    /// Restore every soft-deleted record in a collection, one at a time, in
    /// store-returned order. Best-effort: a failure mid-sweep surfaces as an
    /// error but leaves already-restored records restored.
    pub async fn restore_all(
        &self,
        collection: &CollectionPath,
        actor: &ActorId,
    ) -> DomainResult<u64> {
        let deleted = self.list_deleted(collection).await?;

        let mut count = 0u64;
        for doc in &deleted {
            if let Err(err) = self.restore(collection, &doc.id, actor).await {
                warn!(
                    collection = %collection,
                    id = %doc.id,
                    restored = count,
                    "bulk restore aborted: {err}"
                );
                return Err(err);
            }
            count += 1;
        }

        info!(collection = %collection, %actor, count, "bulk restore complete");
        Ok(count)
    }

    /// The deleted-record view: every document with `isDeleted == true`.
    /// The only deleted-inclusive read in the system (super-admin panel).
    pub async fn list_deleted(&self, collection: &CollectionPath) -> DomainResult<Vec<Document>> {
        self.store
            .query(collection, &[FieldFilter::eq(fields::IS_DELETED, true)])
            .await
    }

    async fn require(&self, collection: &CollectionPath, id: &DocumentId) -> DomainResult<Document> {
        self.store
            .get(collection, id)
            .await?
            .ok_or_else(|| DomainError::not_found(collection.as_str(), id.as_str()))
    }
}

fn is_deleted(doc: &Document) -> bool {
    doc.fields.get(fields::IS_DELETED) == Some(&Value::Bool(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryDocumentStore, ManualClock};
    use crate::domain::models::record::RecordMeta;
    use crate::domain::models::{creation_fields, decode};

    fn setup() -> (Arc<InMemoryDocumentStore>, LifecycleService, CollectionPath) {
        let store = Arc::new(InMemoryDocumentStore::new(Arc::new(ManualClock::default())));
        let service = LifecycleService::new(store.clone());
        (store, service, CollectionPath::top("courses"))
    }

    async fn seed(store: &InMemoryDocumentStore, collection: &CollectionPath) -> DocumentId {
        let mut fields = creation_fields();
        fields.insert("title".to_string(), FieldValue::string("Algebra I"));
        store.insert(collection, fields).await.unwrap()
    }

    async fn meta_of(
        store: &InMemoryDocumentStore,
        collection: &CollectionPath,
        id: &DocumentId,
    ) -> RecordMeta {
        let doc = store.get(collection, id).await.unwrap().unwrap();
        decode::<RecordMeta>(&doc).unwrap().record
    }

    #[tokio::test]
    async fn test_soft_delete_stamps_actor_and_timestamp() {
        let (store, service, collection) = setup();
        let id = seed(&store, &collection).await;

        let outcome = service
            .soft_delete(&collection, &id, &ActorId::new("adminX"))
            .await
            .unwrap();
        assert_eq!(outcome, LifecycleOutcome::Changed);

        let meta = meta_of(&store, &collection, &id).await;
        assert!(meta.is_deleted);
        assert!(meta.deleted_at.is_some());
        assert_eq!(meta.deleted_by, Some(ActorId::new("adminX")));
        assert_eq!(meta.updated_by, Some(ActorId::new("adminX")));
        assert!(meta.is_lifecycle_consistent());
    }

    #[tokio::test]
    async fn test_restore_is_inverse_of_delete_across_actors() {
        let (store, service, collection) = setup();
        let id = seed(&store, &collection).await;

        service
            .soft_delete(&collection, &id, &ActorId::new("actor1"))
            .await
            .unwrap();
        let outcome = service
            .restore(&collection, &id, &ActorId::new("actor2"))
            .await
            .unwrap();
        assert_eq!(outcome, LifecycleOutcome::Changed);

        let meta = meta_of(&store, &collection, &id).await;
        assert!(!meta.is_deleted);
        assert_eq!(meta.deleted_at, None);
        assert_eq!(meta.deleted_by, None);
        assert_eq!(meta.updated_by, Some(ActorId::new("actor2")));
        assert!(meta.is_lifecycle_consistent());
    }

    #[tokio::test]
    async fn test_transitions_are_idempotent() {
        let (store, service, collection) = setup();
        let id = seed(&store, &collection).await;
        let actor = ActorId::new("adminX");

        // Restoring an already-active record reports Unchanged
        assert_eq!(
            service.restore(&collection, &id, &actor).await.unwrap(),
            LifecycleOutcome::Unchanged
        );

        service.soft_delete(&collection, &id, &actor).await.unwrap();
        let first_stamp = meta_of(&store, &collection, &id).await;

        // Re-deleting keeps the original stamp
        assert_eq!(
            service
                .soft_delete(&collection, &id, &ActorId::new("someone_else"))
                .await
                .unwrap(),
            LifecycleOutcome::Unchanged
        );
        let second_stamp = meta_of(&store, &collection, &id).await;
        assert_eq!(first_stamp.deleted_by, second_stamp.deleted_by);
        assert_eq!(first_stamp.deleted_at, second_stamp.deleted_at);
    }

    #[tokio::test]
    async fn test_lifecycle_on_missing_record_is_not_found() {
        let (_, service, collection) = setup();
        let err = service
            .soft_delete(&collection, &DocumentId::new("missing"), &ActorId::new("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_restore_all_restores_only_deleted_records() {
        let (store, service, collection) = setup();
        let actor = ActorId::new("super_admin");

        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(seed(&store, &collection).await);
        }
        for id in ids.iter().take(3) {
            service.soft_delete(&collection, id, &actor).await.unwrap();
        }

        assert_eq!(service.restore_all(&collection, &actor).await.unwrap(), 3);
        // Immediately re-running restores nothing
        assert_eq!(service.restore_all(&collection, &actor).await.unwrap(), 0);

        for id in &ids {
            assert!(!is_deleted(
                &store.get(&collection, id).await.unwrap().unwrap()
            ));
        }
    }

    #[tokio::test]
    async fn test_list_deleted_view() {
        let (store, service, collection) = setup();
        let actor = ActorId::new("super_admin");

        let keep = seed(&store, &collection).await;
        let gone = seed(&store, &collection).await;
        service.soft_delete(&collection, &gone, &actor).await.unwrap();

        let deleted = service.list_deleted(&collection).await.unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].id, gone);
        assert_ne!(deleted[0].id, keep);
    }

    #[tokio::test]
    async fn test_restore_all_partial_failure_keeps_progress() {
        let (store, service, collection) = setup();
        let actor = ActorId::new("super_admin");

        let a = seed(&store, &collection).await;
        let b = seed(&store, &collection).await;
        service.soft_delete(&collection, &a, &actor).await.unwrap();
        service.soft_delete(&collection, &b, &actor).await.unwrap();

        // Queries return insertion order, so the sweep restores `a` first and
        // then trips over the injected fault while restoring `b`.
        store.fail_after_updates(1);
        let result = service.restore_all(&collection, &actor).await;
        assert!(result.is_err());

        // `a` was restored before the failure and stays restored; `b` stays
        // deleted. No rollback.
        assert!(!meta_of(&store, &collection, &a).await.is_deleted);
        assert!(meta_of(&store, &collection, &b).await.is_deleted);
    }
}

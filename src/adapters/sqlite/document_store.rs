//! SQLite implementation of the DocumentStore port.
//!
//! Documents are rows keyed by (collection, id) with the field tree stored as
//! a JSON body. Equality queries scan the collection and filter on the parsed
//! body; collections here are small and read through the TTL cache on the hot
//! paths.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{
    resolve_field_map, Clock, CollectionPath, Document, DocumentId, DocumentStore, FieldFilter,
    FieldMap, SystemClock,
};

#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteDocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
    ) -> DomainResult<Option<Document>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection = ? AND id = ?")
                .bind(collection.as_str())
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(body,)| parse_document(id.clone(), &body))
            .transpose()
    }

    async fn query(
        &self,
        collection: &CollectionPath,
        filters: &[FieldFilter],
    ) -> DomainResult<Vec<Document>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT id, body FROM documents WHERE collection = ? ORDER BY rowid",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut documents = Vec::new();
        for (id, body) in rows {
            let doc = parse_document(DocumentId::new(id), &body)?;
            if filters.iter().all(|f| f.matches(&doc.fields)) {
                documents.push(doc);
            }
        }
        Ok(documents)
    }

    async fn insert(
        &self,
        collection: &CollectionPath,
        fields: FieldMap,
    ) -> DomainResult<DocumentId> {
        let id = DocumentId::new(Uuid::new_v4().to_string());
        let body = encode_body(fields, &*self.clock)?;

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
            .bind(collection.as_str())
            .bind(id.as_str())
            .bind(&body)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn upsert(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        fields: FieldMap,
    ) -> DomainResult<()> {
        let body = encode_body(fields, &*self.clock)?;

        sqlx::query(
            "INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)
             ON CONFLICT(collection, id) DO UPDATE SET body = excluded.body",
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .bind(&body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(
        &self,
        collection: &CollectionPath,
        id: &DocumentId,
        fields: FieldMap,
    ) -> DomainResult<()> {
        // Read-merge-write; single-writer semantics are assumed (§5 of the
        // consistency contract), so no optimistic locking here.
        let existing = self
            .get(collection, id)
            .await?
            .ok_or_else(|| DomainError::not_found(collection.as_str(), id.as_str()))?;

        let mut merged = existing.fields;
        for (name, value) in resolve_field_map(fields, self.clock.now()) {
            merged.insert(name, value);
        }
        let body = serde_json::to_string(&serde_json::Value::Object(merged))?;

        let result = sqlx::query("UPDATE documents SET body = ? WHERE collection = ? AND id = ?")
            .bind(&body)
            .bind(collection.as_str())
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(collection.as_str(), id.as_str()));
        }
        Ok(())
    }

    async fn hard_delete(&self, collection: &CollectionPath, id: &DocumentId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(collection.as_str(), id.as_str()));
        }
        Ok(())
    }
}

fn parse_document(id: DocumentId, body: &str) -> DomainResult<Document> {
    match serde_json::from_str(body)? {
        serde_json::Value::Object(fields) => Ok(Document { id, fields }),
        other => Err(DomainError::Serialization(format!(
            "document body is not an object: {other}"
        ))),
    }
}

fn encode_body(fields: FieldMap, clock: &dyn Clock) -> DomainResult<String> {
    let resolved = resolve_field_map(fields, clock.now());
    Ok(serde_json::to_string(&serde_json::Value::Object(resolved))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use crate::domain::ports::FieldValue;

    async fn setup() -> (SqliteDocumentStore, CollectionPath) {
        let pool = create_migrated_test_pool().await.unwrap();
        (SqliteDocumentStore::new(pool), CollectionPath::top("courses"))
    }

    fn course_fields(title: &str, deleted: bool) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("title".to_string(), FieldValue::string(title));
        fields.insert("isDeleted".to_string(), FieldValue::bool(deleted));
        fields.insert("createdAt".to_string(), FieldValue::ServerTimestamp);
        fields
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (store, collection) = setup().await;
        let id = store
            .insert(&collection, course_fields("Algebra I", false))
            .await
            .unwrap();

        let doc = store.get(&collection, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["title"], "Algebra I");
        assert!(doc.fields["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_get_missing_is_confirmed_absent() {
        let (store, collection) = setup().await;
        let result = store
            .get(&collection, &DocumentId::new("missing"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_query_equality_filter() {
        let (store, collection) = setup().await;
        store
            .insert(&collection, course_fields("Active", false))
            .await
            .unwrap();
        store
            .insert(&collection, course_fields("Deleted", true))
            .await
            .unwrap();

        let active = store
            .query(&collection, &[FieldFilter::eq("isDeleted", false)])
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].fields["title"], "Active");
    }

    #[tokio::test]
    async fn test_update_merges_and_preserves_other_fields() {
        let (store, collection) = setup().await;
        let id = store
            .insert(&collection, course_fields("Algebra I", false))
            .await
            .unwrap();

        let mut patch = FieldMap::new();
        patch.insert("title".to_string(), FieldValue::string("Algebra II"));
        patch.insert("updatedAt".to_string(), FieldValue::ServerTimestamp);
        store.update(&collection, &id, patch).await.unwrap();

        let doc = store.get(&collection, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["title"], "Algebra II");
        assert_eq!(doc.fields["isDeleted"], false);
        assert!(doc.fields["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (store, collection) = setup().await;
        let mut patch = FieldMap::new();
        patch.insert("title".to_string(), FieldValue::string("x"));
        let err = store
            .update(&collection, &DocumentId::new("missing"), patch)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_upsert_creates_then_replaces() {
        let (store, collection) = setup().await;
        let id = DocumentId::new("lesson-1");

        let mut first = FieldMap::new();
        first.insert("finished".to_string(), FieldValue::bool(false));
        first.insert("extra".to_string(), FieldValue::string("x"));
        store.upsert(&collection, &id, first).await.unwrap();

        let mut second = FieldMap::new();
        second.insert("finished".to_string(), FieldValue::bool(true));
        store.upsert(&collection, &id, second).await.unwrap();

        let doc = store.get(&collection, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["finished"], true);
        // Full replace, not a merge
        assert!(doc.fields.get("extra").is_none());
    }

    #[tokio::test]
    async fn test_hard_delete_removes_row() {
        let (store, collection) = setup().await;
        let id = store
            .insert(&collection, course_fields("Gone", false))
            .await
            .unwrap();

        store.hard_delete(&collection, &id).await.unwrap();
        assert!(store.get(&collection, &id).await.unwrap().is_none());

        let err = store.hard_delete(&collection, &id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_nested_collection_paths_are_distinct() {
        let (store, _) = setup().await;
        let lessons = CollectionPath::top("courses").child(&DocumentId::new("c1"), "lessons");

        store
            .insert(&lessons, course_fields("Lesson 1", false))
            .await
            .unwrap();

        assert_eq!(store.query(&lessons, &[]).await.unwrap().len(), 1);
        assert!(store
            .query(&CollectionPath::top("courses"), &[])
            .await
            .unwrap()
            .is_empty());
    }
}

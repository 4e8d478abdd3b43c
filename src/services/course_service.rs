//! Course catalog service.
//!
//! The two hot read paths (course listing, single-course fetch) are
//! read-through cached: consult the cache, fall back to the store with the
//! deleted-records filter applied, then populate the entry. Writes go straight
//! to the store and do not invalidate cache entries, so a cached list may
//! report a just-deleted or just-edited course until its TTL lapses.

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::record::{audit_fields, fields};
use crate::domain::models::{
    courses_collection, creation_fields, decode, encode, ActorId, Course, NewCourse, Stored,
};
use crate::domain::ports::{DocumentId, DocumentStore, FieldFilter, FieldMap};
use crate::services::cache::TtlCache;
use crate::services::lifecycle::{LifecycleOutcome, LifecycleService};

const LIST_CACHE_KEY: &str = "courses";

fn entity_cache_key(id: &DocumentId) -> String {
    format!("course_{id}")
}

#[derive(Clone)]
pub struct CourseService {
    store: Arc<dyn DocumentStore>,
    lifecycle: LifecycleService,
    cache: TtlCache,
    list_ttl_minutes: i64,
    entity_ttl_minutes: i64,
}

impl CourseService {
    pub fn new(store: Arc<dyn DocumentStore>, cache: TtlCache) -> Self {
        Self {
            lifecycle: LifecycleService::new(store.clone()),
            store,
            cache,
            list_ttl_minutes: 30,
            entity_ttl_minutes: 60,
        }
    }

    pub fn with_ttls(mut self, list_ttl_minutes: i64, entity_ttl_minutes: i64) -> Self {
        self.list_ttl_minutes = list_ttl_minutes;
        self.entity_ttl_minutes = entity_ttl_minutes;
        self
    }

    /// All active courses, served from cache within the TTL window.
    pub async fn list_courses(&self) -> DomainResult<Vec<Stored<Course>>> {
        if let Some(cached) = self.cache.get::<Vec<Stored<Course>>>(LIST_CACHE_KEY) {
            return Ok(cached);
        }

        let docs = self
            .store
            .query(
                &courses_collection(),
                &[FieldFilter::eq(fields::IS_DELETED, false)],
            )
            .await?;
        let courses = docs
            .iter()
            .map(decode::<Course>)
            .collect::<DomainResult<Vec<_>>>()?;

        self.cache
            .put(LIST_CACHE_KEY, &courses, self.list_ttl_minutes);
        Ok(courses)
    }

    /// One course by id; absent when missing or soft-deleted.
    pub async fn get_course(&self, id: &DocumentId) -> DomainResult<Option<Stored<Course>>> {
        let key = entity_cache_key(id);
        if let Some(cached) = self.cache.get::<Stored<Course>>(&key) {
            return Ok(Some(cached));
        }

        let Some(doc) = self.store.get(&courses_collection(), id).await? else {
            return Ok(None);
        };
        let course = decode::<Course>(&doc)?;
        if course.record.meta.is_deleted {
            return Ok(None);
        }

        self.cache.put(&key, &course, self.entity_ttl_minutes);
        Ok(Some(course))
    }

    pub async fn create_course(&self, new: NewCourse) -> DomainResult<DocumentId> {
        new.validate()
            .map_err(crate::domain::errors::DomainError::Validation)?;
        let mut doc_fields = encode(&new)?;
        doc_fields.extend(creation_fields());
        self.store.insert(&courses_collection(), doc_fields).await
    }

    /// Patch course fields, stamping audit metadata.
    pub async fn update_course(
        &self,
        id: &DocumentId,
        patch: FieldMap,
        actor: &ActorId,
    ) -> DomainResult<()> {
        let mut update = patch;
        update.extend(audit_fields(actor));
        self.store.update(&courses_collection(), id, update).await
    }

    pub async fn soft_delete_course(
        &self,
        id: &DocumentId,
        actor: &ActorId,
    ) -> DomainResult<LifecycleOutcome> {
        self.lifecycle
            .soft_delete(&courses_collection(), id, actor)
            .await
    }

    pub async fn restore_course(
        &self,
        id: &DocumentId,
        actor: &ActorId,
    ) -> DomainResult<LifecycleOutcome> {
        self.lifecycle.restore(&courses_collection(), id, actor).await
    }
}

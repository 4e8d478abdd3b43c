//! Lesson management within a course's nested lesson collection.
//!
//! Lesson reads are intentionally uncached; they always reflect the store.

use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::record::{audit_fields, fields};
use crate::domain::models::{
    creation_fields, decode, encode, lessons_collection, ActorId, Lesson, NewLesson, Stored,
};
use crate::domain::ports::{DocumentId, DocumentStore, FieldFilter, FieldMap};
use crate::services::lifecycle::{LifecycleOutcome, LifecycleService};

#[derive(Clone)]
pub struct LessonService {
    store: Arc<dyn DocumentStore>,
    lifecycle: LifecycleService,
}

impl LessonService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            lifecycle: LifecycleService::new(store.clone()),
            store,
        }
    }

    /// Active lessons of a course, ascending by their `order` field.
    pub async fn list_lessons(&self, course_id: &DocumentId) -> DomainResult<Vec<Stored<Lesson>>> {
        let docs = self
            .store
            .query(
                &lessons_collection(course_id),
                &[FieldFilter::eq(fields::IS_DELETED, false)],
            )
            .await?;
        let mut lessons = docs
            .iter()
            .map(decode::<Lesson>)
            .collect::<DomainResult<Vec<_>>>()?;
        lessons.sort_by_key(|l| l.record.order);
        Ok(lessons)
    }

    pub async fn get_lesson(
        &self,
        course_id: &DocumentId,
        lesson_id: &DocumentId,
    ) -> DomainResult<Option<Stored<Lesson>>> {
        let Some(doc) = self
            .store
            .get(&lessons_collection(course_id), lesson_id)
            .await?
        else {
            return Ok(None);
        };
        let lesson = decode::<Lesson>(&doc)?;
        if lesson.record.meta.is_deleted {
            return Ok(None);
        }
        Ok(Some(lesson))
    }

    pub async fn add_lesson(
        &self,
        course_id: &DocumentId,
        new: NewLesson,
    ) -> DomainResult<DocumentId> {
        new.validate().map_err(DomainError::Validation)?;
        let mut doc_fields = encode(&new)?;
        doc_fields.extend(creation_fields());
        self.store
            .insert(&lessons_collection(course_id), doc_fields)
            .await
    }

    pub async fn update_lesson(
        &self,
        course_id: &DocumentId,
        lesson_id: &DocumentId,
        patch: FieldMap,
        actor: &ActorId,
    ) -> DomainResult<()> {
        let mut update = patch;
        update.extend(audit_fields(actor));
        self.store
            .update(&lessons_collection(course_id), lesson_id, update)
            .await
    }

    pub async fn soft_delete_lesson(
        &self,
        course_id: &DocumentId,
        lesson_id: &DocumentId,
        actor: &ActorId,
    ) -> DomainResult<LifecycleOutcome> {
        self.lifecycle
            .soft_delete(&lessons_collection(course_id), lesson_id, actor)
            .await
    }

    pub async fn restore_lesson(
        &self,
        course_id: &DocumentId,
        lesson_id: &DocumentId,
        actor: &ActorId,
    ) -> DomainResult<LifecycleOutcome> {
        self.lifecycle
            .restore(&lessons_collection(course_id), lesson_id, actor)
            .await
    }
}

//! Lesson completion tracking, per user.
//!
//! Progress records are keyed by lesson id inside each user's progress
//! subcollection and written whole on every completion, so marking a lesson
//! finished twice is harmless.

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{decode, progress_collection, LessonProgress, Stored};
use crate::domain::ports::{DocumentId, DocumentStore, FieldFilter, FieldMap, FieldValue};

#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn DocumentStore>,
}

impl ProgressService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Record that a user finished a lesson, stamping the completion time.
    pub async fn mark_lesson_finished(
        &self,
        user_id: &DocumentId,
        course_id: &DocumentId,
        lesson_id: &DocumentId,
    ) -> DomainResult<()> {
        let mut doc_fields = FieldMap::new();
        doc_fields.insert(
            "courseId".to_string(),
            FieldValue::string(course_id.as_str()),
        );
        doc_fields.insert("finished".to_string(), FieldValue::bool(true));
        doc_fields.insert("finishedAt".to_string(), FieldValue::ServerTimestamp);
        self.store
            .upsert(&progress_collection(user_id), lesson_id, doc_fields)
            .await
    }

    pub async fn get_lesson_progress(
        &self,
        user_id: &DocumentId,
        lesson_id: &DocumentId,
    ) -> DomainResult<Option<Stored<LessonProgress>>> {
        let Some(doc) = self
            .store
            .get(&progress_collection(user_id), lesson_id)
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(decode::<LessonProgress>(&doc)?))
    }

    /// Every progress record a user has within one course.
    pub async fn course_progress(
        &self,
        user_id: &DocumentId,
        course_id: &DocumentId,
    ) -> DomainResult<Vec<Stored<LessonProgress>>> {
        let docs = self
            .store
            .query(
                &progress_collection(user_id),
                &[FieldFilter::eq("courseId", course_id.as_str())],
            )
            .await?;
        docs.iter().map(decode::<LessonProgress>).collect()
    }
}

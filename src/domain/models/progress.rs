//! Per-lesson progress records, kept in a subcollection under each user and
//! keyed by lesson id. Progress documents are written whole (upsert) and are
//! not lifecycle-managed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{CollectionPath, DocumentId};

/// Subcollection of progress records nested under one user.
pub fn progress_collection(user_id: &DocumentId) -> CollectionPath {
    CollectionPath::top("users").child(user_id, "progress")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub course_id: DocumentId,
    pub finished: bool,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

//! Course catalog domain model.

use serde::{Deserialize, Serialize};

use crate::domain::models::record::RecordMeta;
use crate::domain::ports::{CollectionPath, DocumentId};

/// Top-level collection holding courses.
pub fn courses_collection() -> CollectionPath {
    CollectionPath::top("courses")
}

/// Subcollection of lessons nested under one course.
pub fn lessons_collection(course_id: &DocumentId) -> CollectionPath {
    courses_collection().child(course_id, "lessons")
}

/// A course as persisted, lifecycle metadata flattened alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub tutor_id: DocumentId,
    #[serde(default)]
    pub tutor_name: Option<String>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

/// Fields supplied when creating a course; audit metadata is stamped by the
/// service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub tutor_id: DocumentId,
    #[serde(default)]
    pub tutor_name: Option<String>,
}

impl NewCourse {
    pub fn new(title: impl Into<String>, tutor_id: DocumentId) -> Self {
        Self {
            title: title.into(),
            description: None,
            tutor_id,
            tutor_name: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tutor_name(mut self, name: impl Into<String>) -> Self {
        self.tutor_name = Some(name.into());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("course title cannot be empty".to_string());
        }
        Ok(())
    }
}

//! Lesson domain model. Lessons live in a subcollection nested under their
//! course.

use serde::{Deserialize, Serialize};

use crate::domain::models::record::RecordMeta;

/// A lesson as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub title: String,
    /// Position within the course; listings sort ascending on this.
    pub order: u32,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub materials_url: Option<String>,
    #[serde(default)]
    pub quiz_url: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

/// Fields supplied when adding a lesson to a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLesson {
    pub title: String,
    pub order: u32,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub materials_url: Option<String>,
    #[serde(default)]
    pub quiz_url: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl NewLesson {
    pub fn new(title: impl Into<String>, order: u32) -> Self {
        Self {
            title: title.into(),
            order,
            video_id: None,
            materials_url: None,
            quiz_url: None,
            remarks: None,
        }
    }

    pub fn with_video(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }

    pub fn with_materials(mut self, url: impl Into<String>) -> Self {
        self.materials_url = Some(url.into());
        self
    }

    pub fn with_quiz(mut self, url: impl Into<String>) -> Self {
        self.quiz_url = Some(url.into());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("lesson title cannot be empty".to_string());
        }
        Ok(())
    }
}

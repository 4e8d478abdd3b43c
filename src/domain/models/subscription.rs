//! Subscription domain model: a student's enrollment request for a course,
//! reviewed manually against an out-of-band payment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::record::{ActorId, RecordMeta};
use crate::domain::ports::{CollectionPath, DocumentId};

/// Top-level collection holding subscriptions.
pub fn subscriptions_collection() -> CollectionPath {
    CollectionPath::top("subscriptions")
}

/// Review state of a subscription. Requests start `UnderReview`; a reviewer
/// moves them to `Subscribed` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubscriptionStatus {
    UnderReview,
    Subscribed,
    Rejected,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnderReview => "underReview",
            Self::Subscribed => "subscribed",
            Self::Rejected => "rejected",
        }
    }
}

/// A subscription as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub user_id: DocumentId,
    pub course_id: DocumentId,
    /// Denormalized for tutor-side visibility queries.
    pub tutor_id: DocumentId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub course_title: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub payment_proof_url: Option<String>,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub reviewer_id: Option<ActorId>,
    #[serde(default)]
    pub reviewer_remark: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

/// A new enrollment request; always enters the review queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub user_id: DocumentId,
    pub course_id: DocumentId,
    pub tutor_id: DocumentId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub course_title: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub payment_proof_url: Option<String>,
    pub status: SubscriptionStatus,
}

impl NewSubscription {
    pub fn new(user_id: DocumentId, course_id: DocumentId, tutor_id: DocumentId) -> Self {
        Self {
            user_id,
            course_id,
            tutor_id,
            username: None,
            course_title: None,
            payment_id: None,
            payment_proof_url: None,
            status: SubscriptionStatus::UnderReview,
        }
    }

    pub fn with_payment(mut self, payment_id: impl Into<String>) -> Self {
        self.payment_id = Some(payment_id.into());
        self
    }

    pub fn with_payment_proof(mut self, url: impl Into<String>) -> Self {
        self.payment_proof_url = Some(url.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_course_title(mut self, title: impl Into<String>) -> Self {
        self.course_title = Some(title.into());
        self
    }
}

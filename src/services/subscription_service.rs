//! Subscription workflow: enrollment requests and their manual review.
//!
//! A student submits a request referencing an out-of-band payment; a tutor or
//! super admin reviews it, approving or rejecting with an optional remark.

use std::sync::Arc;

use tracing::info;

use crate::domain::errors::DomainResult;
use crate::domain::models::record::{audit_fields, fields};
use crate::domain::models::{
    creation_fields, decode, encode, subscriptions_collection, ActorId, NewSubscription, Stored,
    Subscription, SubscriptionStatus,
};
use crate::domain::ports::{DocumentId, DocumentStore, FieldFilter, FieldValue};
use crate::services::lifecycle::{LifecycleOutcome, LifecycleService};

#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn DocumentStore>,
    lifecycle: LifecycleService,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            lifecycle: LifecycleService::new(store.clone()),
            store,
        }
    }

    /// Submit an enrollment request; it enters the review queue.
    pub async fn create_subscription(&self, new: NewSubscription) -> DomainResult<DocumentId> {
        let mut doc_fields = encode(&new)?;
        doc_fields.extend(creation_fields());
        let id = self
            .store
            .insert(&subscriptions_collection(), doc_fields)
            .await?;

        info!(%id, user = %new.user_id, course = %new.course_id, "subscription submitted");
        Ok(id)
    }

    pub async fn get_subscription(
        &self,
        id: &DocumentId,
    ) -> DomainResult<Option<Stored<Subscription>>> {
        let Some(doc) = self.store.get(&subscriptions_collection(), id).await? else {
            return Ok(None);
        };
        let sub = decode::<Subscription>(&doc)?;
        if sub.record.meta.is_deleted {
            return Ok(None);
        }
        Ok(Some(sub))
    }

    /// A student's own subscriptions, all statuses.
    pub async fn list_for_student(
        &self,
        user_id: &DocumentId,
    ) -> DomainResult<Vec<Stored<Subscription>>> {
        self.list_by("userId", user_id).await
    }

    /// Requests targeting one tutor's courses, for the review dashboard.
    pub async fn list_for_tutor(
        &self,
        tutor_id: &DocumentId,
    ) -> DomainResult<Vec<Stored<Subscription>>> {
        self.list_by("tutorId", tutor_id).await
    }

    /// Record a review decision, stamping reviewer, remark, and review time.
    pub async fn review(
        &self,
        id: &DocumentId,
        status: SubscriptionStatus,
        reviewer: &ActorId,
        remark: Option<String>,
    ) -> DomainResult<()> {
        let mut update = audit_fields(reviewer);
        update.insert("status".to_string(), FieldValue::string(status.as_str()));
        update.insert(
            "reviewerId".to_string(),
            FieldValue::string(reviewer.as_str()),
        );
        update.insert(
            "reviewerRemark".to_string(),
            match remark {
                Some(remark) => FieldValue::string(remark),
                None => FieldValue::null(),
            },
        );
        update.insert("reviewedAt".to_string(), FieldValue::ServerTimestamp);
        self.store
            .update(&subscriptions_collection(), id, update)
            .await?;

        info!(%id, %reviewer, status = status.as_str(), "subscription reviewed");
        Ok(())
    }

    pub async fn soft_delete_subscription(
        &self,
        id: &DocumentId,
        actor: &ActorId,
    ) -> DomainResult<LifecycleOutcome> {
        self.lifecycle
            .soft_delete(&subscriptions_collection(), id, actor)
            .await
    }

    pub async fn restore_subscription(
        &self,
        id: &DocumentId,
        actor: &ActorId,
    ) -> DomainResult<LifecycleOutcome> {
        self.lifecycle
            .restore(&subscriptions_collection(), id, actor)
            .await
    }

    async fn list_by(
        &self,
        field: &str,
        id: &DocumentId,
    ) -> DomainResult<Vec<Stored<Subscription>>> {
        let docs = self
            .store
            .query(
                &subscriptions_collection(),
                &[
                    FieldFilter::eq(fields::IS_DELETED, false),
                    FieldFilter::eq(field, id.as_str()),
                ],
            )
            .await?;
        docs.iter().map(decode::<Subscription>).collect()
    }
}

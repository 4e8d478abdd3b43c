//! User account management.
//!
//! Profiles are keyed by the authentication uid rather than a generated id,
//! so sign-up writes through `upsert`. The super-admin panel is the only
//! consumer of the deleted-records view and of hard deletion.

use std::sync::Arc;

use tracing::info;

use crate::domain::errors::DomainResult;
use crate::domain::models::record::{audit_fields, fields};
use crate::domain::models::{
    creation_fields, decode, encode, users_collection, ActorId, NewUser, Role, Stored, UserProfile,
    UserStatus,
};
use crate::domain::ports::{DocumentId, DocumentStore, FieldFilter, FieldMap, FieldValue};
use crate::services::lifecycle::{LifecycleOutcome, LifecycleService};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
    lifecycle: LifecycleService,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            lifecycle: LifecycleService::new(store.clone()),
            store,
        }
    }

    /// Active users, optionally narrowed to one role.
    pub async fn list_users(&self, role: Option<Role>) -> DomainResult<Vec<Stored<UserProfile>>> {
        let mut filters = vec![FieldFilter::eq(fields::IS_DELETED, false)];
        if let Some(role) = role {
            filters.push(FieldFilter::eq("role", role.as_str()));
        }
        let docs = self.store.query(&users_collection(), &filters).await?;
        docs.iter().map(decode::<UserProfile>).collect()
    }

    /// One profile by uid; absent when missing or soft-deleted.
    pub async fn get_user(&self, uid: &DocumentId) -> DomainResult<Option<Stored<UserProfile>>> {
        let Some(doc) = self.store.get(&users_collection(), uid).await? else {
            return Ok(None);
        };
        let user = decode::<UserProfile>(&doc)?;
        if user.record.meta.is_deleted {
            return Ok(None);
        }
        Ok(Some(user))
    }

    /// Create the profile document for a freshly authenticated uid. Tutors
    /// start under review; everyone else starts active.
    pub async fn create_user(&self, uid: &DocumentId, new: NewUser) -> DomainResult<()> {
        let status = new.initial_status();
        let mut doc_fields = encode(&new)?;
        doc_fields.insert(
            "status".to_string(),
            FieldValue::string(status.as_str()),
        );
        doc_fields.extend(creation_fields());
        self.store.upsert(&users_collection(), uid, doc_fields).await?;

        info!(%uid, role = new.role.as_str(), status = status.as_str(), "user profile created");
        Ok(())
    }

    pub async fn update_user(
        &self,
        uid: &DocumentId,
        patch: FieldMap,
        actor: &ActorId,
    ) -> DomainResult<()> {
        let mut update = patch;
        update.extend(audit_fields(actor));
        self.store.update(&users_collection(), uid, update).await
    }

    /// Move an account to a new standing, e.g. verifying or rejecting a
    /// tutor under review.
    pub async fn set_status(
        &self,
        uid: &DocumentId,
        status: UserStatus,
        actor: &ActorId,
    ) -> DomainResult<()> {
        let mut update = audit_fields(actor);
        update.insert("status".to_string(), FieldValue::string(status.as_str()));
        self.store.update(&users_collection(), uid, update).await
    }

    /// Tutor accounts awaiting verification.
    pub async fn pending_tutors(&self) -> DomainResult<Vec<Stored<UserProfile>>> {
        let docs = self
            .store
            .query(
                &users_collection(),
                &[
                    FieldFilter::eq(fields::IS_DELETED, false),
                    FieldFilter::eq("role", Role::Tutor.as_str()),
                    FieldFilter::eq("status", UserStatus::UnderReview.as_str()),
                ],
            )
            .await?;
        docs.iter().map(decode::<UserProfile>).collect()
    }

    /// Soft-deleted accounts, for the recovery panel.
    pub async fn list_deleted_users(&self) -> DomainResult<Vec<Stored<UserProfile>>> {
        let docs = self.lifecycle.list_deleted(&users_collection()).await?;
        docs.iter().map(decode::<UserProfile>).collect()
    }

    pub async fn soft_delete_user(
        &self,
        uid: &DocumentId,
        actor: &ActorId,
    ) -> DomainResult<LifecycleOutcome> {
        self.lifecycle
            .soft_delete(&users_collection(), uid, actor)
            .await
    }

    pub async fn restore_user(
        &self,
        uid: &DocumentId,
        actor: &ActorId,
    ) -> DomainResult<LifecycleOutcome> {
        self.lifecycle.restore(&users_collection(), uid, actor).await
    }

    /// Restore every soft-deleted account. Returns how many were restored.
    pub async fn restore_all_users(&self, actor: &ActorId) -> DomainResult<u64> {
        self.lifecycle.restore_all(&users_collection(), actor).await
    }

    /// Permanently remove a profile document. Irreversible; the panel only
    /// offers this for records that are already soft-deleted.
    pub async fn hard_delete_user(&self, uid: &DocumentId, actor: &ActorId) -> DomainResult<()> {
        self.store.hard_delete(&users_collection(), uid).await?;
        info!(%uid, %actor, "user profile permanently deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryDocumentStore, ManualClock};
    use crate::domain::errors::DomainError;

    fn setup() -> UserService {
        let store = Arc::new(InMemoryDocumentStore::new(Arc::new(ManualClock::default())));
        UserService::new(store)
    }

    async fn sign_up(service: &UserService, uid: &str, role: Role) -> DocumentId {
        let uid = DocumentId::new(uid);
        service
            .create_user(&uid, NewUser::new(role).with_email(format!("{uid}@example.com")))
            .await
            .unwrap();
        uid
    }

    #[tokio::test]
    async fn test_tutor_sign_up_lands_under_review() {
        let service = setup();
        let uid = sign_up(&service, "tutor-1", Role::Tutor).await;

        let user = service.get_user(&uid).await.unwrap().unwrap();
        assert_eq!(user.record.role, Role::Tutor);
        assert_eq!(user.record.status, Some(UserStatus::UnderReview));

        let pending = service.pending_tutors().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, uid);
    }

    #[tokio::test]
    async fn test_student_sign_up_is_active_and_not_pending() {
        let service = setup();
        let uid = sign_up(&service, "student-1", Role::Student).await;

        let user = service.get_user(&uid).await.unwrap().unwrap();
        assert_eq!(user.record.status, Some(UserStatus::Active));
        assert!(service.pending_tutors().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verification_clears_pending_queue() {
        let service = setup();
        let admin = ActorId::new("super_admin");
        let uid = sign_up(&service, "tutor-1", Role::Tutor).await;

        service
            .set_status(&uid, UserStatus::Verified, &admin)
            .await
            .unwrap();

        assert!(service.pending_tutors().await.unwrap().is_empty());
        let user = service.get_user(&uid).await.unwrap().unwrap();
        assert_eq!(user.record.status, Some(UserStatus::Verified));
        assert_eq!(user.record.meta.updated_by, Some(admin));
    }

    #[tokio::test]
    async fn test_list_users_filters_by_role() {
        let service = setup();
        sign_up(&service, "tutor-1", Role::Tutor).await;
        sign_up(&service, "student-1", Role::Student).await;
        sign_up(&service, "student-2", Role::Student).await;

        assert_eq!(service.list_users(None).await.unwrap().len(), 3);
        assert_eq!(
            service.list_users(Some(Role::Student)).await.unwrap().len(),
            2
        );
        assert_eq!(
            service.list_users(Some(Role::Tutor)).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_deleted_users_move_between_views() {
        let service = setup();
        let admin = ActorId::new("super_admin");
        let uid = sign_up(&service, "student-1", Role::Student).await;

        service.soft_delete_user(&uid, &admin).await.unwrap();
        assert!(service.get_user(&uid).await.unwrap().is_none());
        assert!(service.list_users(None).await.unwrap().is_empty());

        let deleted = service.list_deleted_users().await.unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].record.meta.deleted_by, Some(admin.clone()));

        assert_eq!(service.restore_all_users(&admin).await.unwrap(), 1);
        assert!(service.get_user(&uid).await.unwrap().is_some());
        assert!(service.list_deleted_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hard_delete_is_permanent() {
        let service = setup();
        let admin = ActorId::new("super_admin");
        let uid = sign_up(&service, "student-1", Role::Student).await;

        service.soft_delete_user(&uid, &admin).await.unwrap();
        service.hard_delete_user(&uid, &admin).await.unwrap();

        assert!(service.get_user(&uid).await.unwrap().is_none());
        assert!(service.list_deleted_users().await.unwrap().is_empty());
        // Restoring afterwards is NotFound, not a resurrection
        let err = service.restore_user(&uid, &admin).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_sign_up_twice_overwrites_profile() {
        let service = setup();
        let uid = DocumentId::new("student-1");
        service
            .create_user(&uid, NewUser::new(Role::Student).with_name("First"))
            .await
            .unwrap();
        service
            .create_user(&uid, NewUser::new(Role::Student).with_name("Second"))
            .await
            .unwrap();

        let users = service.list_users(None).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].record.name.as_deref(), Some("Second"));
    }
}

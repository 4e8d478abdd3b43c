//! User profile domain model and role/status classification.

use serde::{Deserialize, Serialize};

use crate::domain::models::record::RecordMeta;
use crate::domain::ports::CollectionPath;

/// Top-level collection holding user profiles, keyed by auth uid.
pub fn users_collection() -> CollectionPath {
    CollectionPath::top("users")
}

/// Platform role driving the role-based dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Tutor,
    Assistant,
    SuperAdmin,
}

impl Default for Role {
    fn default() -> Self {
        Self::Student
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Tutor => "tutor",
            Self::Assistant => "assistant",
            Self::SuperAdmin => "super_admin",
        }
    }
}

/// Account standing. New tutors start `UnderReview` and must be verified by a
/// super admin before appearing as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserStatus {
    Active,
    UnderReview,
    Verified,
    Rejected,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::UnderReview => "underReview",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

/// A user profile as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

/// Sign-up payload. Role defaults to student; tutors are placed under review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl NewUser {
    pub fn new(role: Role) -> Self {
        Self {
            email: None,
            name: None,
            role,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Initial account standing derived from the requested role.
    pub fn initial_status(&self) -> UserStatus {
        match self.role {
            Role::Tutor => UserStatus::UnderReview,
            _ => UserStatus::Active,
        }
    }
}

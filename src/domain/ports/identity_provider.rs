//! Identity provider port.
//!
//! Authentication itself is an external collaborator; only the shape consumed
//! matters here: the current session user (nullable) and a push-based
//! auth-state notifier invoked on sign-in and sign-out.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// The authenticated session user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Provider-assigned uid; doubles as the `users` document id.
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl AuthUser {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

pub trait IdentityProvider: Send + Sync {
    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<AuthUser>;

    /// Subscribe to auth-state changes. The receiver observes `Some(user)` on
    /// sign-in and `None` on sign-out.
    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>>;
}

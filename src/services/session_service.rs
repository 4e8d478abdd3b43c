//! Session profile mirror.
//!
//! The signed-in user's profile is mirrored into local key-value storage under
//! a dedicated non-expiring key so role checks do not need a store round trip.
//! The mirror is a convenience copy: storage failures are logged and
//! swallowed, and the profile is re-fetched from the store on the next
//! sign-in. Sign-out clears both the mirror and every cache entry.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Stored, UserProfile};
use crate::domain::ports::{AuthUser, DocumentId, IdentityProvider, KeyValueStore};
use crate::services::cache::TtlCache;
use crate::services::user_service::UserService;

/// Storage key for the mirrored profile. Outside the cache namespace, so
/// cache sweeps leave it alone.
pub const SESSION_PROFILE_KEY: &str = "tutorhub_session_profile";

#[derive(Clone)]
pub struct SessionService {
    identity: Arc<dyn IdentityProvider>,
    users: UserService,
    storage: Arc<dyn KeyValueStore>,
    cache: TtlCache,
}

impl SessionService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        users: UserService,
        storage: Arc<dyn KeyValueStore>,
        cache: TtlCache,
    ) -> Self {
        Self {
            identity,
            users,
            storage,
            cache,
        }
    }

    /// The provider's view of who is signed in, if anyone.
    pub fn current_user(&self) -> Option<AuthUser> {
        self.identity.current_user()
    }

    /// Fetch the signed-in user's profile and mirror it to local storage.
    /// Returns `None` when nobody is signed in or the profile is absent.
    pub async fn load_profile(&self) -> DomainResult<Option<Stored<UserProfile>>> {
        let Some(auth) = self.identity.current_user() else {
            return Ok(None);
        };
        let profile = self.users.get_user(&DocumentId::new(auth.uid)).await?;

        if let Some(profile) = &profile {
            self.mirror(profile);
        }
        Ok(profile)
    }

    /// The mirrored profile, without touching the store. Absent on storage
    /// failure or if nothing was mirrored yet.
    pub fn mirrored_profile(&self) -> Option<Stored<UserProfile>> {
        let raw = self.storage.get(SESSION_PROFILE_KEY).ok()??;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(_) => {
                warn!("mirrored session profile is unreadable, discarding");
                let _ = self.storage.remove(SESSION_PROFILE_KEY);
                None
            }
        }
    }

    /// The signed-in user's profile, preferring the local mirror and falling
    /// back to the store (refreshing the mirror) when nothing is mirrored.
    pub async fn resolved_profile(&self) -> DomainResult<Option<Stored<UserProfile>>> {
        if let Some(profile) = self.mirrored_profile() {
            return Ok(Some(profile));
        }
        self.load_profile().await
    }

    /// Drop all per-session local state: the profile mirror and every cache
    /// entry. Called on sign-out.
    pub fn clear_session_state(&self) {
        if let Err(err) = self.storage.remove(SESSION_PROFILE_KEY) {
            warn!("failed to clear session profile mirror: {err}");
        }
        self.cache.evict_all();
        info!("session state cleared");
    }

    /// React to auth-state changes until the identity provider goes away.
    /// Sign-in refreshes the mirror; sign-out clears local state.
    pub async fn watch_auth_state(&self) {
        let mut rx = self.identity.subscribe();
        while rx.changed().await.is_ok() {
            let signed_in = rx.borrow_and_update().is_some();
            if signed_in {
                if let Err(err) = self.load_profile().await {
                    warn!("failed to load profile on sign-in: {err}");
                }
            } else {
                self.clear_session_state();
            }
        }
    }

    fn mirror(&self, profile: &Stored<UserProfile>) {
        let raw = match serde_json::to_string(profile) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("failed to serialize session profile: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.set(SESSION_PROFILE_KEY, &raw) {
            warn!("failed to mirror session profile: {err}");
        }
    }
}

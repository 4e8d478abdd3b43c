//! Local identity provider backed by a watch channel.
//!
//! Stands in for the hosted auth provider: holds the current session user and
//! notifies subscribers on sign-in and sign-out.

use tokio::sync::watch;

use crate::domain::ports::{AuthUser, IdentityProvider};

pub struct LocalIdentityProvider {
    state: watch::Sender<Option<AuthUser>>,
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    pub fn sign_in(&self, user: AuthUser) {
        // send_replace never fails even with no receivers
        self.state.send_replace(Some(user));
    }

    pub fn sign_out(&self) {
        self.state.send_replace(None);
    }
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.state.subscribe()
    }
}

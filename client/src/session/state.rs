//! The process-wide session value and its read/write handles.
//!
//! DESIGN
//! ======
//! One `tokio::sync::watch` channel holds the [`Session`]. The auth controller
//! (and the invalidation listener it installs on the transport) own the only
//! [`SessionWriter`]; every other component gets a [`SessionView`], which can
//! read and await changes but has no mutating API.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::sync::Arc;

use tokio::sync::watch;

use crate::types::UserProfile;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub loading: bool,
    pub authenticated: bool,
}

/// Coarse state machine position derived from a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthPhase {
    Loading,
    Anonymous,
    Authenticated,
}

impl Default for Session {
    /// Startup state: loading, nobody signed in.
    fn default() -> Self {
        Self { user: None, token: None, loading: true, authenticated: false }
    }
}

impl Session {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { user: None, token: None, loading: false, authenticated: false }
    }

    #[must_use]
    pub fn authenticated(user: UserProfile, token: String) -> Self {
        Self { user: Some(user), token: Some(token), loading: false, authenticated: true }
    }

    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        if self.loading {
            AuthPhase::Loading
        } else if self.authenticated && self.user.is_some() && self.token.is_some() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        }
    }
}

// =============================================================================
// READ HANDLE
// =============================================================================

/// Read-only view of the session, cheap to clone.
#[derive(Clone, Debug)]
pub struct SessionView {
    rx: watch::Receiver<Session>,
}

impl SessionView {
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.rx.borrow().clone()
    }

    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        self.rx.borrow().phase()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.rx.borrow().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase() == AuthPhase::Authenticated
    }

    /// Wait until the session is no longer loading and return it.
    pub async fn settled(&mut self) -> Session {
        let settled = self.rx.wait_for(|s| !s.loading).await.map(|s| s.clone());
        match settled {
            Ok(session) => session,
            // The writer is gone; whatever is stored is final.
            Err(_) => self.snapshot(),
        }
    }

    /// Wait for the next change. Returns `false` once the writer is dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

// =============================================================================
// WRITE HANDLE
// =============================================================================

/// Mutating handle, held by the auth controller and its transport listener.
#[derive(Clone, Debug)]
pub(crate) struct SessionWriter {
    tx: Arc<watch::Sender<Session>>,
}

impl SessionWriter {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self { tx: Arc::new(tx) }
    }

    pub(crate) fn view(&self) -> SessionView {
        SessionView { rx: self.tx.subscribe() }
    }

    pub(crate) fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.tx.send_if_modified(|s| {
            let changed = s.loading != loading;
            s.loading = loading;
            changed
        });
    }

    /// Begin an auth operation; loading is cleared when the guard drops.
    pub(crate) fn loading_scope(&self) -> LoadingGuard {
        self.set_loading(true);
        LoadingGuard { writer: self.clone() }
    }

    pub(crate) fn establish(&self, user: UserProfile, token: String) {
        self.tx.send_replace(Session::authenticated(user, token));
    }

    pub(crate) fn reset(&self) {
        self.tx.send_replace(Session::anonymous());
    }

    /// Replace the in-memory user, leaving token and flags alone.
    pub(crate) fn replace_user(&self, user: UserProfile) {
        self.tx.send_modify(|s| s.user = Some(user));
    }
}

/// Clears `loading` on drop, covering early returns and `?` exits.
pub(crate) struct LoadingGuard {
    writer: SessionWriter,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.writer.set_loading(false);
    }
}

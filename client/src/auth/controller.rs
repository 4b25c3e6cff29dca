//! Auth state machine: `Loading` → `Authenticated` | `Anonymous`.
//!
//! DESIGN
//! ======
//! Every operation updates two things in step: the persisted credential and
//! the in-memory [`Session`](crate::session::Session). Failures are turned
//! into a user-facing message (server text when present, otherwise a fixed
//! per-operation default) and emitted as an error notification; the session
//! is left as it was.
//!
//! ERROR HANDLING
//! ==============
//! `initialize` and `logout` never fail: a credential that cannot be read or
//! verified is erased and the user becomes anonymous. `login`, `register`
//! and `update_profile` return [`AuthError`] after notifying.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::sync::Arc;

use serde_json::Value;

use crate::api::AuthApi;
use crate::error::ApiError;
use crate::notify::{Notification, Notifier};
use crate::router::{Navigator, Route};
use crate::session::state::SessionWriter;
use crate::session::{AuthPhase, PersistedCredential, SessionStore, SessionView, StoreError};
use crate::transport::{Invalidation, SessionInvalidation};
use crate::types::{LoginRequest, ProfileUpdate, RegisterRequest, UserProfile};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTER_FAILED: &str = "Registration failed";
pub const PROFILE_UPDATE_FAILED: &str = "Profile update failed";
pub const SIGN_IN_REQUIRED: &str = "Please sign in to continue";

const LOGIN_OK: &str = "Login successful!";
const REGISTER_OK: &str = "Registration successful! You can now sign in.";
const LOGOUT_OK: &str = "Signed out successfully";
const PROFILE_UPDATE_OK: &str = "Profile updated successfully";

/// A failed auth operation, carrying the message already shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },
    #[error("{message}")]
    Store {
        message: String,
        #[source]
        source: StoreError,
    },
    #[error("please sign in to continue")]
    NotSignedIn,
}

impl AuthError {
    fn api(source: ApiError, fallback: &str) -> Self {
        let message = source.server_message().unwrap_or(fallback).to_owned();
        Self::Api { message, source }
    }

    fn store(source: StoreError, fallback: &str) -> Self {
        Self::Store { message: fallback.to_owned(), source }
    }

    /// The user-facing text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Api { message, .. } | Self::Store { message, .. } => message,
            Self::NotSignedIn => SIGN_IN_REQUIRED,
        }
    }
}

pub struct AuthController {
    api: AuthApi,
    store: Arc<dyn SessionStore>,
    session: SessionWriter,
    notifier: Arc<dyn Notifier>,
}

impl AuthController {
    #[must_use]
    pub fn new(api: AuthApi, store: Arc<dyn SessionStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, store, session: SessionWriter::new(), notifier }
    }

    /// Read-only handle for pages and guards.
    #[must_use]
    pub fn view(&self) -> SessionView {
        self.session.view()
    }

    /// Listener to register on the transport; resets this controller's
    /// session and routes to login on 401.
    #[must_use]
    pub fn invalidation_handler(&self, navigator: Arc<dyn Navigator>) -> InvalidationHandler {
        InvalidationHandler { session: self.session.clone(), navigator }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Restore the persisted session, verifying the token with the server.
    /// Always ends in a non-loading phase.
    pub async fn initialize(&self) -> AuthPhase {
        let Some(credential) = self.stored_credential() else {
            self.session.reset();
            return AuthPhase::Anonymous;
        };

        match self.api.current_user().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "session restored");
                self.session.establish(user, credential.token);
                AuthPhase::Authenticated
            }
            Err(error) => {
                tracing::info!(%error, "stored token rejected; discarding session");
                self.erase_credential();
                self.session.reset();
                AuthPhase::Anonymous
            }
        }
    }

    /// A complete stored credential, or `None`. Partial or corrupt entries
    /// are erased.
    fn stored_credential(&self) -> Option<PersistedCredential> {
        match self.store.load() {
            Ok(Some(credential)) => Some(credential),
            Ok(None) => {
                if self.store.token().is_some() {
                    tracing::warn!("token stored without a user; discarding");
                    self.erase_credential();
                }
                None
            }
            Err(error) => {
                tracing::warn!(%error, "stored session unreadable; discarding");
                self.erase_credential();
                None
            }
        }
    }

    fn erase_credential(&self) {
        if let Err(error) = self.store.clear() {
            tracing::error!(%error, "failed to clear session store");
        }
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Authenticate, fetch the profile with the new token, persist both.
    ///
    /// # Errors
    ///
    /// Returns the failure after emitting an error notification; the session
    /// and the store are unchanged.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<UserProfile, AuthError> {
        let _loading = self.session.loading_scope();
        let outcome = self.try_login(credentials).await;
        match &outcome {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "login succeeded");
                self.notifier.notify(Notification::success(LOGIN_OK));
            }
            Err(error) => self.report("login", error),
        }
        outcome
    }

    async fn try_login(&self, credentials: &LoginRequest) -> Result<UserProfile, AuthError> {
        let token = self
            .api
            .login(credentials)
            .await
            .map_err(|e| AuthError::api(e, LOGIN_FAILED))?;
        let user = self
            .api
            .current_user_with(&token.access_token)
            .await
            .map_err(|e| AuthError::api(e, LOGIN_FAILED))?;

        let credential = PersistedCredential { token: token.access_token, user };
        self.store
            .save(&credential)
            .map_err(|e| AuthError::store(e, LOGIN_FAILED))?;
        self.session.establish(credential.user.clone(), credential.token);
        Ok(credential.user)
    }

    /// Create an account. Never signs the user in.
    ///
    /// # Errors
    ///
    /// Returns the failure after emitting an error notification.
    pub async fn register(&self, profile: &RegisterRequest) -> Result<(), AuthError> {
        let _loading = self.session.loading_scope();
        match self.api.register(profile).await {
            Ok(()) => {
                tracing::info!(username = %profile.username, "registration succeeded");
                self.notifier.notify(Notification::success(REGISTER_OK));
                Ok(())
            }
            Err(source) => {
                let error = AuthError::api(source, REGISTER_FAILED);
                self.report("register", &error);
                Err(error)
            }
        }
    }

    /// Forget the credential locally. Idempotent; no network call.
    pub fn logout(&self) {
        self.erase_credential();
        self.session.reset();
        tracing::info!("logged out");
        self.notifier.notify(Notification::success(LOGOUT_OK));
    }

    /// Send a partial profile update. On success the server's answer becomes
    /// the stored user and is overlaid onto the in-memory one.
    ///
    /// # Errors
    ///
    /// Returns the failure after emitting an error notification; the
    /// in-memory user is untouched. Without a signed-in user nothing is sent.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, AuthError> {
        let outcome = self.try_update_profile(update).await;
        match &outcome {
            Ok(_) => self.notifier.notify(Notification::success(PROFILE_UPDATE_OK)),
            Err(error) => self.report("update_profile", error),
        }
        outcome
    }

    async fn try_update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, AuthError> {
        let Some(current) = self.session.current().user else {
            return Err(AuthError::NotSignedIn);
        };
        let patch = self
            .api
            .update_profile(update)
            .await
            .map_err(|e| AuthError::api(e, PROFILE_UPDATE_FAILED))?;

        let merged = current
            .overlay(&patch)
            .map_err(|e| AuthError::api(ApiError::Decode(e.to_string()), PROFILE_UPDATE_FAILED))?;
        // Stored copy is the server's answer as-is when it is a full profile.
        let stored = serde_json::from_value::<UserProfile>(Value::Object(patch)).unwrap_or_else(|_| merged.clone());
        self.store
            .save_user(&stored)
            .map_err(|e| AuthError::store(e, PROFILE_UPDATE_FAILED))?;
        self.session.replace_user(merged.clone());
        Ok(merged)
    }

    fn report(&self, operation: &'static str, error: &AuthError) {
        match error {
            AuthError::Api { source, .. } => tracing::warn!(operation, error = %source, "auth operation failed"),
            AuthError::Store { source, .. } => tracing::error!(operation, error = %source, "auth operation failed"),
            AuthError::NotSignedIn => tracing::warn!(operation, "no signed-in user"),
        }
        self.notifier.notify(Notification::error(error.message()));
    }
}

// =============================================================================
// INVALIDATION
// =============================================================================

/// Transport listener: on 401, drop the in-memory session and go to login.
/// The transport has already erased the stored credential.
pub struct InvalidationHandler {
    session: SessionWriter,
    navigator: Arc<dyn Navigator>,
}

impl SessionInvalidation for InvalidationHandler {
    fn session_invalidated(&self, cause: &Invalidation) {
        tracing::info!(method = %cause.method, path = %cause.path, "session invalidated");
        self.session.reset();
        self.navigator.navigate(Route::Login);
    }
}

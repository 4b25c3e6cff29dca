//! # client
//!
//! Session-aware async client for the sitegen website builder API.
//!
//! The crate holds everything a front end needs besides rendering: the
//! bearer-token [`Transport`](transport::Transport), typed resource clients
//! ([`api`]), the persisted [`session`], the [`AuthController`] state machine,
//! the [`RouteGuard`], and a small routing abstraction. [`SiteClient`] wires
//! them together the way every front end needs them.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod notify;
pub mod query;
pub mod router;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
#[path = "lib_test.rs"]
mod lib_test;

use std::sync::Arc;

pub use api::Api;
pub use auth::{AuthController, AuthError, GuardDecision, RouteGuard};
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind};
pub use notify::{Notification, Notifier, NotifyLevel, TracingNotifier};
pub use router::{Navigator, Route, RouteScope, Router};
pub use session::{AuthPhase, FileSessionStore, MemorySessionStore, SessionStore, SessionView};
pub use transport::Transport;

/// One client instance: transport, resource clients, auth state and router,
/// with the auth controller subscribed to the transport's 401 signal.
pub struct SiteClient {
    pub api: Api,
    pub auth: AuthController,
    pub router: Router,
    transport: Arc<Transport>,
}

impl SiteClient {
    /// Build from config. The credential lives in `config.session_file`
    /// when set, in memory otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be built.
    pub fn new(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self, ApiError> {
        let store: Arc<dyn SessionStore> = match &config.session_file {
            Some(path) => Arc::new(FileSessionStore::new(path)),
            None => Arc::new(MemorySessionStore::new()),
        };
        Self::with_store(config, store, notifier)
    }

    /// # Errors
    ///
    /// Returns an error if the transport cannot be built.
    pub fn with_store(
        config: &ClientConfig,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ApiError> {
        let transport = Arc::new(Transport::new(config, store.clone())?);
        let api = Api::new(transport.clone());
        let auth = AuthController::new(api.auth.clone(), store, notifier);
        let router = Router::default();
        transport.add_invalidation_listener(Arc::new(auth.invalidation_handler(Arc::new(router.clone()))));
        tracing::debug!(base_url = transport.base_url(), "client ready");
        Ok(Self { api, auth, router, transport })
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    #[must_use]
    pub fn session(&self) -> SessionView {
        self.auth.view()
    }

    /// Guard bound to this client's session.
    #[must_use]
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.auth.view())
    }
}

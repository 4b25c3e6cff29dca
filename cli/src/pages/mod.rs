//! One module per page of the web app.
//!
//! SYSTEM CONTEXT
//! ==============
//! A page navigates the router to its [`Route`], runs its requests, and
//! renders the result to stdout. Failures become notifications on stderr and
//! are returned as [`CliError`] so `main` can pick the exit code. Protected
//! pages pass through the route guard first.


pub(crate) mod account;
pub(crate) mod dashboard;
pub(crate) mod editor;
pub(crate) mod home;
pub(crate) mod hosting;
pub(crate) mod templates;

use std::sync::Arc;

use client::{ApiError, ErrorKind, GuardDecision, Navigator, Notification, Notifier, Route, RouteScope, SiteClient};
use serde::Serialize;

use crate::CliError;

const SESSION_EXPIRED: &str = "Your session has expired, please sign in again";
const SERVER_ERROR: &str = "Server error, please try again later";
const UNREACHABLE: &str = "Cannot reach the server";
const TIMED_OUT: &str = "The server took too long to respond";
const SIGN_IN_REQUIRED: &str = "Please sign in to continue";

pub(crate) struct PageContext {
    pub client: SiteClient,
    notifier: Arc<dyn Notifier>,
    json: bool,
}

impl PageContext {
    pub(crate) fn new(client: SiteClient, notifier: Arc<dyn Notifier>, json: bool) -> Self {
        Self { client, notifier, json }
    }

    /// Navigate to `route` and capture a scope for stale-result checks.
    pub(crate) fn open(&self, route: Route) -> RouteScope {
        self.client.router.navigate(route);
        self.client.router.scope()
    }

    /// Open a protected route, waiting for the session to settle first.
    pub(crate) async fn open_protected(&self, route: Route) -> Result<RouteScope, CliError> {
        match self.client.guard().resolve().await {
            GuardDecision::Allow => Ok(self.open(route)),
            GuardDecision::Redirect(to) => {
                self.client.router.navigate(to);
                self.notify(Notification::error(SIGN_IN_REQUIRED));
                Err(CliError::LoginRequired)
            }
            // resolve only returns once loading is over
            GuardDecision::Pending => Err(CliError::LoginRequired),
        }
    }

    /// Fails if a navigation (typically a 401 redirect) happened since `scope`.
    pub(crate) fn still_on(scope: &RouteScope) -> Result<(), CliError> {
        match scope.redirected_to() {
            Some(route) => Err(CliError::Stale(route)),
            None => Ok(()),
        }
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Report a failed request and hand back the error for propagation.
    pub(crate) fn failed(&self, error: ApiError, fallback: &str, key: Option<&'static str>) -> CliError {
        let mut notification = Notification::error(describe(&error, fallback));
        notification.key = key;
        self.notify(notification);
        CliError::Api(error)
    }

    pub(crate) fn invalid(&self, message: &'static str) -> CliError {
        self.notify(Notification::error(message));
        CliError::Validation(message)
    }

    /// Print `value` as JSON under `--json`, otherwise the text from `human`.
    pub(crate) fn render<T: Serialize>(&self, value: &T, human: impl FnOnce(&T) -> String) -> Result<(), CliError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", human(value));
        }
        Ok(())
    }
}

/// User-facing text for a failed request. Client errors carry the server's
/// message; server errors get a generic one.
pub(crate) fn describe(error: &ApiError, fallback: &str) -> String {
    let text = match (error.kind(), error) {
        (ErrorKind::Unauthorized, _) => SESSION_EXPIRED,
        (ErrorKind::Server, _) => SERVER_ERROR,
        (ErrorKind::Validation, _) => error.server_message().unwrap_or(fallback),
        (ErrorKind::Network, ApiError::Timeout) => TIMED_OUT,
        (ErrorKind::Network, ApiError::Transport(_)) => UNREACHABLE,
        (ErrorKind::Network, _) => fallback,
    };
    text.to_owned()
}

pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-")
}

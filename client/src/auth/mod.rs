//! Authentication: the session state machine and the route gate built on it.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`AuthController`] is the only writer of the session. It persists the
//! credential through the [`SessionStore`](crate::session::SessionStore) and
//! installs a [`SessionInvalidation`](crate::transport::SessionInvalidation)
//! listener so a 401 anywhere logs the user out and routes to login.
//! [`RouteGuard`] reads the session and decides whether a protected page may
//! render.

pub mod controller;
pub mod guard;

pub use controller::{AuthController, AuthError, InvalidationHandler};
pub use guard::{GuardDecision, RouteGuard};

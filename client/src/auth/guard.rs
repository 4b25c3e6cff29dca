//! Gate for protected routes.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::router::Route;
use crate::session::{AuthPhase, Session, SessionView};

/// What a protected page should do right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still loading: render a placeholder, do not redirect.
    Pending,
    Redirect(Route),
    Allow,
}

/// Re-evaluates on every call; nothing is cached.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    session: SessionView,
}

impl RouteGuard {
    #[must_use]
    pub fn new(session: SessionView) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn evaluate(session: &Session) -> GuardDecision {
        match session.phase() {
            AuthPhase::Loading => GuardDecision::Pending,
            AuthPhase::Anonymous => GuardDecision::Redirect(Route::Login),
            AuthPhase::Authenticated => GuardDecision::Allow,
        }
    }

    /// Decision for the session as it is now.
    #[must_use]
    pub fn check(&self) -> GuardDecision {
        Self::evaluate(&self.session.snapshot())
    }

    /// Wait out `Loading`, then decide.
    pub async fn resolve(&mut self) -> GuardDecision {
        let settled = self.session.settled().await;
        Self::evaluate(&settled)
    }
}

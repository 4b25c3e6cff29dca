use super::*;
use crate::session::state::SessionWriter;
use crate::test_helpers;
use serde_json::json;
use std::time::Duration;

fn alice() -> crate::types::UserProfile {
    test_helpers::user(json!({ "id": 1, "username": "alice" }))
}

#[test]
fn loading_is_pending_never_redirect() {
    assert_eq!(RouteGuard::evaluate(&Session::default()), GuardDecision::Pending);

    let mut loading_with_user = Session::authenticated(alice(), "abc".into());
    loading_with_user.loading = true;
    assert_eq!(RouteGuard::evaluate(&loading_with_user), GuardDecision::Pending);
}

#[test]
fn anonymous_redirects_to_login() {
    assert_eq!(RouteGuard::evaluate(&Session::anonymous()), GuardDecision::Redirect(Route::Login));
}

#[test]
fn authenticated_flag_without_user_is_not_allowed() {
    let session = Session { user: None, token: Some("abc".into()), loading: false, authenticated: true };
    assert_eq!(RouteGuard::evaluate(&session), GuardDecision::Redirect(Route::Login));
}

#[test]
fn check_follows_session_changes() {
    let writer = SessionWriter::new();
    let guard = RouteGuard::new(writer.view());
    assert_eq!(guard.check(), GuardDecision::Pending);

    writer.establish(alice(), "abc".into());
    assert_eq!(guard.check(), GuardDecision::Allow);

    writer.reset();
    assert_eq!(guard.check(), GuardDecision::Redirect(Route::Login));
}

#[tokio::test]
async fn resolve_waits_for_loading_to_finish() {
    let writer = SessionWriter::new();
    let mut guard = RouteGuard::new(writer.view());

    let pending = tokio::spawn(async move { guard.resolve().await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!pending.is_finished());

    writer.establish(alice(), "abc".into());
    assert_eq!(pending.await.unwrap(), GuardDecision::Allow);
}

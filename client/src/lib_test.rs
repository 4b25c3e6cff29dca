use super::*;
use crate::test_helpers::{self, RecordingNotifier, StubApi};
use serde_json::json;

#[tokio::test]
async fn unauthorized_response_routes_to_login() {
    let api = StubApi::new();
    api.reply("GET", "/auth/me", 200, json!({ "id": 1, "username": "alice" }));
    api.reply("GET", "/hosting/sites", 401, json!({ "error": "Could not validate credentials" }));
    let base = api.start().await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let mut config = test_helpers::config(&base);
    config.session_file = Some(path.clone());

    let store = FileSessionStore::new(&path);
    let credential = session::PersistedCredential {
        token: "abc".into(),
        user: test_helpers::user(json!({ "id": 1, "username": "alice" })),
    };
    store.save(&credential).unwrap();

    let client = SiteClient::new(&config, Arc::new(RecordingNotifier::default())).unwrap();
    assert_eq!(client.auth.initialize().await, AuthPhase::Authenticated);
    client.router.navigate(Route::Dashboard);
    let scope = client.router.scope();
    assert_eq!(client.guard().check(), GuardDecision::Allow);

    client.api.hosting.sites().await.unwrap_err();

    assert_eq!(client.router.current(), Route::Login);
    assert!(!scope.is_current());
    assert_eq!(client.guard().check(), GuardDecision::Redirect(Route::Login));
    assert!(!path.exists());
}

#[test]
fn memory_store_when_no_session_file() {
    let client = SiteClient::new(&ClientConfig::new("http://localhost:8001/api"), Arc::new(TracingNotifier)).unwrap();
    assert_eq!(client.transport().base_url(), "http://localhost:8001/api");
    assert_eq!(client.session().phase(), AuthPhase::Loading);
    assert_eq!(client.guard().check(), GuardDecision::Pending);
}

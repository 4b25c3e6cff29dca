use super::*;
use serde_json::json;

fn credential() -> PersistedCredential {
    PersistedCredential {
        token: "abc".to_owned(),
        user: serde_json::from_value(json!({ "id": 1, "username": "alice" })).unwrap(),
    }
}

// =============================================================================
// MemorySessionStore
// =============================================================================

#[test]
fn memory_store_starts_empty() {
    let store = MemorySessionStore::new();
    assert!(store.token().is_none());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn memory_store_save_then_clear() {
    let store = MemorySessionStore::new();
    store.save(&credential()).unwrap();
    assert_eq!(store.token().as_deref(), Some("abc"));
    assert_eq!(store.load().unwrap(), Some(credential()));

    store.clear().unwrap();
    assert!(store.token().is_none());
    assert!(store.load().unwrap().is_none());
    store.clear().unwrap();
}

#[test]
fn memory_store_save_user_keeps_token() {
    let store = MemorySessionStore::with_credential(&credential()).unwrap();
    let mut user = credential().user;
    user.full_name = Some("Alice A".into());
    store.save_user(&user).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.token, "abc");
    assert_eq!(loaded.user.full_name.as_deref(), Some("Alice A"));
}

// =============================================================================
// FileSessionStore
// =============================================================================

#[test]
fn file_store_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");
    let store = FileSessionStore::new(&path);

    assert!(store.load().unwrap().is_none());
    store.save(&credential()).unwrap();

    let reopened = FileSessionStore::new(&path);
    assert_eq!(reopened.token().as_deref(), Some("abc"));
    assert_eq!(reopened.load().unwrap(), Some(credential()));

    let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["token"], json!("abc"));
    assert!(raw["user"].is_string(), "user is stored as serialized JSON");
}

#[test]
fn file_store_clear_removes_file_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = FileSessionStore::new(&path);
    store.save(&credential()).unwrap();

    store.clear().unwrap();
    assert!(!path.exists());
    store.clear().unwrap();
}

#[test]
fn file_store_token_without_user_is_not_a_credential() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, br#"{"token":"abc"}"#).unwrap();

    let store = FileSessionStore::new(&path);
    assert_eq!(store.token().as_deref(), Some("abc"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn file_store_reports_corrupt_user() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, br#"{"token":"abc","user":"{not json"}"#).unwrap();

    let store = FileSessionStore::new(&path);
    assert!(matches!(store.load(), Err(StoreError::Decode(_))));
}

#[test]
fn file_store_unreadable_file_yields_no_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, b"garbage").unwrap();

    let store = FileSessionStore::new(&path);
    assert!(store.token().is_none());
}

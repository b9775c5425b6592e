//! Integration tests for the session store over file-backed storage.

use chrono::{Duration, Utc};
use client_lib::adapters::{FileSessionStorage, SESSION_STORAGE_KEY};
use client_lib::auth::SessionStore;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use textbook_core::domain::{AuthProvider, Credentials};
use textbook_core::ports::SessionStorage;

fn store_at(dir: &TempDir) -> SessionStore {
    SessionStore::new(Arc::new(FileSessionStorage::new(dir.path().join("session.json"))))
}

fn stored_record(dir: &TempDir) -> Option<serde_json::Value> {
    let raw = fs::read_to_string(dir.path().join("session.json")).ok()?;
    let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
    document.get(SESSION_STORAGE_KEY).cloned()
}

#[tokio::test]
async fn test_rejected_sign_in_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_at(&temp_dir);

    let err = store
        .sign_in(AuthProvider::Email, &Credentials::new("", "secret"))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(stored_record(&temp_dir).is_none());
}

#[tokio::test]
async fn test_session_survives_a_new_store_instance() {
    let temp_dir = TempDir::new().unwrap();
    let before = Utc::now();

    let session = store_at(&temp_dir)
        .sign_in(AuthProvider::Email, &Credentials::new("grace@example.com", "hunter2"))
        .await
        .unwrap();

    // A fresh store, as after a page reload, reads the same record.
    let reloaded = store_at(&temp_dir).get_session().await.unwrap().unwrap();
    assert_eq!(reloaded, session);
    assert_eq!(reloaded.user.email, "grace@example.com");

    let lifetime = reloaded.expires_at - before;
    assert!(lifetime >= Duration::hours(24));
    assert!(lifetime < Duration::hours(24) + Duration::seconds(5));
}

#[tokio::test]
async fn test_sign_out_twice_leaves_storage_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_at(&temp_dir);
    store
        .sign_in(AuthProvider::Google, &Credentials::default())
        .await
        .unwrap();

    store.sign_out().await.unwrap();
    assert!(stored_record(&temp_dir).is_none());
    store.sign_out().await.unwrap();
    assert!(stored_record(&temp_dir).is_none());
}

#[tokio::test]
async fn test_expired_record_is_purged_on_read() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileSessionStorage::new(temp_dir.path().join("session.json"));
    let store = SessionStore::new(Arc::new(storage.clone()));

    let mut session = store
        .sign_in(AuthProvider::Email, &Credentials::new("ada@example.com", "pw"))
        .await
        .unwrap();
    session.expires_at = Utc::now() - Duration::milliseconds(1);
    storage.set(&session).await.unwrap();

    assert!(store.get_session().await.unwrap().is_none());
    assert!(!store.is_authenticated().await.unwrap());
    assert!(stored_record(&temp_dir).is_none());
}

#[tokio::test]
async fn test_second_tab_sees_sign_out_despite_stale_copy() {
    let temp_dir = TempDir::new().unwrap();
    let tab_a = store_at(&temp_dir);
    let tab_b = store_at(&temp_dir);

    tab_a
        .sign_in(AuthProvider::Email, &Credentials::new("ada@example.com", "pw"))
        .await
        .unwrap();
    let stale_copy = tab_b.get_session().await.unwrap().unwrap();

    tab_a.sign_out().await.unwrap();

    // Tab B still holds the value it read earlier, but the store never serves it.
    assert_eq!(stale_copy.user.email, "ada@example.com");
    assert!(tab_b.get_session().await.unwrap().is_none());
    assert!(tab_b.get_auth_token().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sign_in_from_another_tab_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let tab_a = store_at(&temp_dir);
    let tab_b = store_at(&temp_dir);

    tab_a
        .sign_in(AuthProvider::Email, &Credentials::new("ada@example.com", "pw"))
        .await
        .unwrap();
    let google = tab_b
        .sign_in(AuthProvider::Google, &Credentials::default())
        .await
        .unwrap();

    assert_eq!(tab_a.get_session().await.unwrap(), Some(google));
}

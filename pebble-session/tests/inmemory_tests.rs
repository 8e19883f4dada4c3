use pebble_core::{SessionMap, SessionStore};
use pebble_session::*;
use serde_json::json;

fn sample() -> SessionMap {
    let mut data = SessionMap::new();
    data.insert("user".to_string(), json!("ada"));
    data.insert("cart".to_string(), json!([1, 2, 3]));
    data
}

#[tokio::test]
async fn test_load_missing_session() {
    let store = InMemorySessionStore::new();
    assert!(store.load("nope").await.unwrap().is_none());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_persist_and_load() {
    let store = InMemorySessionStore::new();
    store.persist("session1", &sample()).await.unwrap();

    let loaded = store.load("session1").await.unwrap().unwrap();
    assert_eq!(loaded, sample());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_persist_replaces_mapping() {
    let store = InMemorySessionStore::new();
    store.persist("session1", &sample()).await.unwrap();

    let mut smaller = SessionMap::new();
    smaller.insert("user".to_string(), json!("grace"));
    store.persist("session1", &smaller).await.unwrap();

    assert_eq!(store.load("session1").await.unwrap(), Some(smaller));
}

#[tokio::test]
async fn test_clones_share_sessions() {
    let store = InMemorySessionStore::new();
    let other = store.clone();

    store.persist("session1", &sample()).await.unwrap();
    assert!(other.load("session1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_current_id() {
    let store = InMemorySessionStore::new();
    assert!(store.current_id().is_none());

    let store = store.with_current_id("cookie-id");
    assert_eq!(store.current_id().as_deref(), Some("cookie-id"));

    store.set_current_id(None);
    assert!(store.current_id().is_none());
}

#[tokio::test]
async fn test_destroy_session() {
    let store = InMemorySessionStore::new().with_current_id("session1");
    store.persist("session1", &sample()).await.unwrap();
    store.persist("session2", &sample()).await.unwrap();

    store.destroy("session1").await.unwrap();

    assert!(store.load("session1").await.unwrap().is_none());
    assert!(store.load("session2").await.unwrap().is_some());
    assert!(store.current_id().is_none());
}

#[tokio::test]
async fn test_destroy_other_session_keeps_current_id() {
    let store = InMemorySessionStore::new().with_current_id("session1");
    store.destroy("session2").await.unwrap();
    assert_eq!(store.current_id().as_deref(), Some("session1"));
}

//! Integration tests for the session manager
//!
//! Covers the full token lifecycle against the in-memory store: anonymous →
//! authenticated → torn down, plus the expiry broadcast.

use std::sync::Arc;

use pavilion_common::session::{MemoryTokenStore, SessionEvent, SessionManager, TokenStore};

#[tokio::test]
async fn lifecycle_anonymous_authenticated_cleared() {
    let session = SessionManager::new(Arc::new(MemoryTokenStore::new()));
    assert!(!session.is_authenticated());

    session.set_token("abc123").await.unwrap();
    assert!(session.is_authenticated());
    assert_eq!(session.token(), Some("abc123".to_string()));

    session.clear().await.unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(session.token(), None);
}

#[tokio::test]
async fn clear_removes_the_persisted_slot() {
    let store = Arc::new(MemoryTokenStore::new());
    let session = SessionManager::new(store.clone());

    session.set_token("abc123").await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some("abc123".to_string()));

    session.clear().await.unwrap();
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn expiry_reaches_every_subscriber() {
    let session = SessionManager::new(Arc::new(MemoryTokenStore::new()));
    session.set_token("stale").await.unwrap();

    let mut first = session.subscribe();
    let mut second = session.subscribe();

    session.on_unauthorized().await;

    assert_eq!(first.recv().await.unwrap(), SessionEvent::Expired);
    assert_eq!(second.recv().await.unwrap(), SessionEvent::Expired);
}

#[tokio::test]
async fn on_unauthorized_without_subscribers_is_harmless() {
    let session = SessionManager::new(Arc::new(MemoryTokenStore::new()));
    session.set_token("stale").await.unwrap();

    session.on_unauthorized().await;
    assert!(!session.is_authenticated());
}

/// Store that fails on every operation, to verify degraded behavior.
struct BrokenStore;

#[async_trait::async_trait]
impl TokenStore for BrokenStore {
    async fn save(&self, _token: &str) -> Result<(), String> {
        Err("disk full".into())
    }

    async fn load(&self) -> Result<Option<String>, String> {
        Err("disk unreadable".into())
    }

    async fn delete(&self) -> Result<(), String> {
        Err("disk full".into())
    }
}

#[tokio::test]
async fn storage_failures_do_not_poison_the_in_memory_session() {
    let session = SessionManager::load(Arc::new(BrokenStore)).await;
    assert!(!session.is_authenticated());

    // Persistence fails but the in-memory slot is still updated.
    assert!(session.set_token("abc123").await.is_err());
    assert_eq!(session.token(), Some("abc123".to_string()));

    // Teardown still clears memory and emits the event.
    let mut events = session.subscribe();
    session.on_unauthorized().await;
    assert!(!session.is_authenticated());
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
}

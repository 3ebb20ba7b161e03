//! Session manager
//!
//! Owns the in-memory token slot and coordinates it with durable storage.
//! Session expiry is signalled on a broadcast channel rather than by forcing
//! navigation, so the gateway stays free of any UI concern; the host
//! application subscribes and decides how to route the user back to login.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::store::TokenStore;

/// Capacity of the expiry event channel. Events are tiny and rare; a lagging
/// subscriber only misses duplicate expiry signals.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Events emitted by the session manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend rejected the current token; the session was torn down.
    Expired,
}

/// Owner of the current session token
///
/// Lifecycle: absent (anonymous) → present (authenticated) → cleared
/// (expired or logged out). There is no refreshing state; sessions are
/// binary.
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    token: RwLock<Option<String>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Create an anonymous session backed by `store`.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { store, token: RwLock::new(None), events }
    }

    /// Create a manager hydrated from the persisted slot.
    ///
    /// A storage failure degrades to an anonymous session rather than
    /// blocking startup.
    pub async fn load(store: Arc<dyn TokenStore>) -> Self {
        let manager = Self::new(store);
        match manager.store.load().await {
            Ok(Some(token)) => {
                *manager.token.write() = Some(token);
                debug!("session token restored from storage");
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "failed to load persisted session token"),
        }
        manager
    }

    /// Current token, if authenticated. Does not block on storage.
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// True when a token is present
    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// Replace the current token atomically and persist it.
    ///
    /// # Errors
    /// Returns the storage error description if persistence fails; the
    /// in-memory slot is updated regardless, so the session stays usable.
    pub async fn set_token(&self, token: impl Into<String>) -> Result<(), String> {
        let token = token.into();
        *self.token.write() = Some(token.clone());
        self.store.save(&token).await
    }

    /// Remove the token from memory and durable storage.
    ///
    /// # Errors
    /// Returns the storage error description if deletion fails.
    pub async fn clear(&self) -> Result<(), String> {
        *self.token.write() = None;
        self.store.delete().await
    }

    /// `Authorization` header value for the current token, if any.
    pub fn bearer_header_value(&self) -> Option<String> {
        self.token.read().as_ref().map(|token| format!("Bearer {token}"))
    }

    /// Handle a response classified as unauthorized.
    ///
    /// Terminal for the current session: the token is cleared and
    /// [`SessionEvent::Expired`] is broadcast. No further requests should be
    /// attempted with the stale token.
    pub async fn on_unauthorized(&self) {
        info!("session rejected by backend; tearing down");
        if let Err(err) = self.clear().await {
            warn!(error = %err, "failed to delete persisted token during teardown");
        }
        // Nobody listening is fine; the event is advisory.
        let _ = self.events.send(SessionEvent::Expired);
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(MemoryTokenStore::new()))
    }

    #[tokio::test]
    async fn set_token_replaces_previous_value() {
        let session = manager();
        session.set_token("first").await.unwrap();
        session.set_token("second").await.unwrap();
        assert_eq!(session.token(), Some("second".to_string()));
    }

    #[tokio::test]
    async fn bearer_header_is_absent_when_anonymous() {
        let session = manager();
        assert_eq!(session.bearer_header_value(), None);

        session.set_token("abc123").await.unwrap();
        assert_eq!(session.bearer_header_value(), Some("Bearer abc123".to_string()));
    }

    #[tokio::test]
    async fn on_unauthorized_clears_token_and_broadcasts() {
        let session = manager();
        session.set_token("stale").await.unwrap();
        let mut events = session.subscribe();

        session.on_unauthorized().await;

        assert!(!session.is_authenticated());
        assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
    }

    #[tokio::test]
    async fn load_hydrates_from_storage() {
        let store = Arc::new(MemoryTokenStore::new());
        store.save("persisted").await.unwrap();

        let session = SessionManager::load(store).await;
        assert_eq!(session.token(), Some("persisted".to_string()));
    }
}

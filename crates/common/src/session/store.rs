//! Durable storage trait for the session token

use async_trait::async_trait;
use parking_lot::RwLock;

/// Trait for token persistence backends
///
/// The store holds at most one value: the current bearer token. Saving
/// replaces any previous value.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist the token, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error description if storage fails.
    async fn save(&self, token: &str) -> Result<(), String>;

    /// Retrieve the persisted token, if any.
    ///
    /// # Errors
    /// Returns an error description if retrieval fails. A missing token is
    /// `Ok(None)`, not an error.
    async fn load(&self) -> Result<Option<String>, String>;

    /// Remove the persisted token. Deleting an absent token is a no-op.
    ///
    /// # Errors
    /// Returns an error description if deletion fails.
    async fn delete(&self) -> Result<(), String>;
}

/// In-memory token store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save(&self, token: &str) -> Result<(), String> {
        *self.slot.write() = Some(token.to_owned());
        Ok(())
    }

    async fn load(&self) -> Result<Option<String>, String> {
        Ok(self.slot.read().clone())
    }

    async fn delete(&self) -> Result<(), String> {
        *self.slot.write() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_replaces_previous_value() {
        tokio_test::block_on(async {
            let store = MemoryTokenStore::new();
            store.save("first").await.unwrap();
            store.save("second").await.unwrap();
            assert_eq!(store.load().await.unwrap(), Some("second".to_string()));
        });
    }

    #[test]
    fn delete_is_idempotent() {
        tokio_test::block_on(async {
            let store = MemoryTokenStore::new();
            store.delete().await.unwrap();
            store.save("tok").await.unwrap();
            store.delete().await.unwrap();
            store.delete().await.unwrap();
            assert_eq!(store.load().await.unwrap(), None);
        });
    }
}

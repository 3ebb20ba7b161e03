//! File-backed session token store
//!
//! Persists the bearer token as a small JSON document so a restarted host
//! application can resume the session. The [`TokenStore`] contract reports
//! failures as plain strings; the session manager degrades to an anonymous
//! session when loading fails.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use pavilion_common::session::TokenStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct TokenDocument {
    token: String,
}

/// Token store writing to a single JSON file
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn save(&self, token: &str) -> Result<(), String> {
        let document = TokenDocument { token: token.to_owned() };
        let contents = serde_json::to_string(&document)
            .map_err(|err| format!("failed to encode token document: {err}"))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| format!("failed to create token directory: {err}"))?;
        }
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|err| format!("failed to write token file: {err}"))?;

        debug!(path = %self.path.display(), "session token persisted");
        Ok(())
    }

    async fn load(&self) -> Result<Option<String>, String> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(format!("failed to read token file: {err}")),
        };

        let document: TokenDocument = serde_json::from_str(&contents)
            .map_err(|err| format!("token file is corrupt: {err}"))?;
        Ok(Some(document.token))
    }

    async fn delete(&self) -> Result<(), String> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(format!("failed to delete token file: {err}")),
        }
    }
}

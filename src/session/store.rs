//! Token store backends
//!
//! Persists the access token, refresh token and username under the keys
//! `access`, `refresh` and `username`. Contents are untrusted until the
//! guard has inspected them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::SessionError;

/// Raw contents of the token store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Persistence for the session tokens
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the stored tokens; an empty store yields the default value
    async fn load(&self) -> Result<StoredTokens, SessionError>;

    /// Replace the stored tokens
    async fn save(&self, tokens: &StoredTokens) -> Result<(), SessionError>;

    /// Forget all stored tokens
    async fn clear(&self) -> Result<(), SessionError>;
}

/// JSON file backend, the terminal counterpart of browser local storage
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<StoredTokens, SessionError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| SessionError::Corrupt {
                path: self.path.clone(),
                error: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredTokens::default()),
            Err(e) => Err(SessionError::Io(e)),
        }
    }

    async fn save(&self, tokens: &StoredTokens) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(tokens).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            error: e.to_string(),
        })?;

        // Write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        tokio::fs::rename(&tmp, &self.path).await?;
        tracing::debug!(path = ?self.path, "Session tokens saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = ?self.path, "Session tokens cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io(e)),
        }
    }
}

/// In-memory backend
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    tokens: RwLock<StoredTokens>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self {
            tokens: RwLock::new(tokens),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<StoredTokens, SessionError> {
        Ok(self.tokens.read().await.clone())
    }

    async fn save(&self, tokens: &StoredTokens) -> Result<(), SessionError> {
        *self.tokens.write().await = tokens.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.tokens.write().await = StoredTokens::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tokens() -> StoredTokens {
        StoredTokens {
            access: Some("access-token".to_string()),
            refresh: Some("refresh-token".to_string()),
            username: Some("anna".to_string()),
        }
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert_eq!(store.load().await.unwrap(), StoredTokens::default());
    }

    #[tokio::test]
    async fn test_file_store_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        store.save(&tokens()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), tokens());

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["access"], "access-token");
        assert_eq!(value["refresh"], "refresh-token");
        assert_eq!(value["username"], "anna");

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), StoredTokens::default());
        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileSessionStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, SessionError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemorySessionStore::new();
        store.save(&tokens()).await.unwrap();
        assert_eq!(store.load().await.unwrap().username.as_deref(), Some("anna"));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().access.is_none());
    }
}

//! JSON-file session storage (`session.json`).

use crate::paths::MoodflixPaths;
use async_trait::async_trait;
use moodflix_core::error::Result;
use moodflix_core::session::{Session, SessionStore};
use std::path::{Path, PathBuf};

/// Persists the signed-in session as a single JSON document.
///
/// Responsibilities:
/// - Write the session atomically (temp file + rename)
/// - Restrict file permissions to the owner on Unix
/// - Treat a missing file as "signed out"
///
/// Does NOT:
/// - Verify or refresh the token
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at the default location (`~/.config/moodflix/session.json`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: MoodflixPaths::session_file()?,
        })
    }

    /// Store at a custom path (for testing).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(unix)]
    async fn restrict_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
        Ok(())
    }

    #[cfg(not(unix))]
    async fn restrict_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let session = serde_json::from_str(&content)?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(session)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await?;
        Self::restrict_permissions(&tmp_path).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!("[SessionStore] Saved session to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("[SessionStore] Removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodflix_core::MoodflixError;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_file_is_signed_out() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::with_path(temp_dir.path().join("session.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::with_path(temp_dir.path().join("nested/session.json"));

        let session = Session::new("tok-123", json!({"email": "ada@example.com"}));
        store.save(&session).await.unwrap();

        let loaded = store.load().await.unwrap().expect("session should exist");
        assert_eq!(loaded, session);

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        // clearing twice is fine
        store.clear().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let store = FileSessionStore::with_path(&path);
        store
            .save(&Session::new("tok", serde_json::Value::Null))
            .await
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileSessionStore::with_path(path);
        assert!(matches!(
            store.load().await,
            Err(MoodflixError::Serialization { .. })
        ));
    }
}

//! Token persistence backends.
//!
//! This module defines the [`TokenStore`] trait that abstracts over session
//! persistence, and the default [`JsonTokenStore`] implementation backed by a
//! JSON file with atomic writes (write-to-temp + rename) so a crash never
//! leaves the file corrupt.
//!
//! The trait is deliberately minimal: a session holds exactly one opaque
//! credential, so the backend only needs load, save and clear.

use crate::domain::error::{Result, UrlscopeError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Abstraction over session-token persistence backends.
///
/// Implementations must survive process restarts: a token saved in one run
/// is expected to be loadable in the next.
pub trait TokenStore: Send {
    /// Reads the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<String>>;

    /// Persists the given token, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&mut self, token: &str) -> Result<()>;

    /// Removes the persisted token.
    ///
    /// Clearing an already-empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails.
    fn clear(&mut self) -> Result<()>;
}

/// On-disk format for the session file.
///
/// Wrapped in a versioned object rather than storing the bare token string,
/// leaving room for future fields without a breaking format change.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionData {
    /// Version of the session file format for future migrations.
    version: u32,

    /// The opaque credential, absent when logged out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            version: 1,
            token: None,
        }
    }
}

/// JSON file token store.
///
/// Stores the session token in a human-readable JSON file. Writes go to a
/// temporary sibling first and are renamed into place, so readers never
/// observe a partially written file.
pub struct JsonTokenStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,
}

impl JsonTokenStore {
    /// Creates a token store backed by the given file.
    ///
    /// Parent directories are created automatically; the file itself is only
    /// created on the first [`save`](TokenStore::save).
    ///
    /// # Errors
    ///
    /// Returns an error if parent directory creation fails.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing token store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self { file_path })
    }

    /// Reads and parses the session file, or defaults when it is absent.
    fn read_data(&self) -> Result<SessionData> {
        if !self.file_path.exists() {
            return Ok(SessionData::default());
        }

        let contents = std::fs::read_to_string(&self.file_path)?;
        serde_json::from_str(&contents)
            .map_err(|e| UrlscopeError::Storage(format!("failed to parse session file: {e}")))
    }

    /// Writes the session file atomically.
    fn write_data(&self, data: &SessionData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| UrlscopeError::Storage(format!("failed to serialize session: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, "session file saved");
        Ok(())
    }
}

impl TokenStore for JsonTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let data = self.read_data()?;
        tracing::debug!(present = data.token.is_some(), "loaded persisted token");
        Ok(data.token)
    }

    fn save(&mut self, token: &str) -> Result<()> {
        let mut data = self.read_data().unwrap_or_default();
        data.token = Some(token.to_string());
        self.write_data(&data)
    }

    fn clear(&mut self) -> Result<()> {
        if !self.file_path.exists() {
            tracing::debug!("no session file to clear");
            return Ok(());
        }
        let mut data = self.read_data().unwrap_or_default();
        data.token = None;
        self.write_data(&data)
    }
}

/// In-memory token store for tests and for running without persistence.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &str) -> Result<()> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.token = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = JsonTokenStore::new(path.clone()).unwrap();
        assert_eq!(store.load().unwrap(), None);

        store.save("tok-123").unwrap();
        assert_eq!(store.load().unwrap(), Some("tok-123".to_string()));

        // A fresh store over the same file sees the persisted value.
        let reopened = JsonTokenStore::new(path).unwrap();
        assert_eq!(reopened.load().unwrap(), Some("tok-123".to_string()));
    }

    #[test]
    fn clear_removes_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonTokenStore::new(dir.path().join("session.json")).unwrap();

        store.save("tok-123").unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clear_on_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonTokenStore::new(dir.path().join("session.json")).unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonTokenStore::new(path).unwrap();
        assert!(matches!(store.load(), Err(UrlscopeError::Storage(_))));
    }
}

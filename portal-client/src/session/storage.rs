//! Durable session storage
//!
//! The session survives process restarts as two string entries under
//! fixed keys: the bearer token and the identity JSON blob. The medium
//! is a plain key/value store so an embedding shell can substitute its
//! own (browser local storage, a settings database).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key for the persisted bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key for the persisted identity JSON blob.
pub const USER_KEY: &str = "user";

/// String key/value persistence surviving restarts.
pub trait KeyValueStorage: Send + Sync {
    /// Read an entry. Unreadable storage is treated as absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Write an entry.
    fn set(&self, key: &str, value: &str) -> std::io::Result<()>;

    /// Remove an entry if present.
    fn remove(&self, key: &str) -> std::io::Result<()>;
}

// =============================================================================
// File-backed storage
// =============================================================================

/// File-backed storage: one JSON object file holding all entries.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    data: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Load storage from `dir/session.json`, starting empty if the file
    /// is missing or unreadable.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join("session.json");
        let data = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "session file unreadable, starting empty");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    fn save(&self, data: &HashMap<String, String>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, content)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.data.lock().expect("storage lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        let mut data = self.data.lock().expect("storage lock poisoned");
        data.insert(key.to_string(), value.to_string());
        self.save(&data)
    }

    fn remove(&self, key: &str) -> std::io::Result<()> {
        let mut data = self.data.lock().expect("storage lock poisoned");
        if data.remove(key).is_some() {
            return self.save(&data);
        }
        Ok(())
    }
}

// =============================================================================
// In-memory storage
// =============================================================================

/// In-memory storage. Nothing survives the process; used by tests and
/// by embedders that manage persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an entry, for seeding test fixtures.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.data
            .lock()
            .expect("storage lock poisoned")
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.data.lock().expect("storage lock poisoned").len()
    }

    /// Whether the storage holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.data.lock().expect("storage lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.data
            .lock()
            .expect("storage lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> std::io::Result<()> {
        self.data.lock().expect("storage lock poisoned").remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_storage_round_trips() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::load(dir.path());

        storage.set(TOKEN_KEY, "tok1").unwrap();
        storage.set(USER_KEY, r#"{"id":7,"username":"al"}"#).unwrap();
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok1"));

        // A fresh load sees the persisted entries
        let reloaded = FileStorage::load(dir.path());
        assert_eq!(reloaded.get(TOKEN_KEY).as_deref(), Some("tok1"));
        assert_eq!(
            reloaded.get(USER_KEY).as_deref(),
            Some(r#"{"id":7,"username":"al"}"#)
        );

        reloaded.remove(TOKEN_KEY).unwrap();
        reloaded.remove(USER_KEY).unwrap();
        let reloaded = FileStorage::load(dir.path());
        assert_eq!(reloaded.get(TOKEN_KEY), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("session.json"), "not json").unwrap();
        let storage = FileStorage::load(dir.path());
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn removing_missing_key_is_ok() {
        let storage = MemoryStorage::new();
        storage.remove(TOKEN_KEY).unwrap();
        assert!(storage.is_empty());
    }
}

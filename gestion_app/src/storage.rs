//! Durable key/value storage for the session layer.
//!
//! Mirrors the browser-localStorage contract the stores expect: synchronous
//! get/set/remove on string keys. The file-backed implementation keeps the
//! whole map in one JSON file and rewrites it atomically on every mutation.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use tracing::{error, warn};

/// Durable key for the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Durable key for the serialized session user blob.
pub const USER_KEY: &str = "user";

/// Synchronous string key/value storage. Not a suspension point; failures
/// are logged, never surfaced to callers.
pub trait KeyStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// File-backed storage: one JSON object per file, written via temp + rename.
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStorage {
    /// Open the store at `path`, loading existing entries. A missing file is
    /// an empty store; a corrupt one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(err) => {
                    warn!("[Storage] corrupt store at {:?}, starting empty: {}", path, err);
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                warn!("[Storage] cannot read {:?}, starting empty: {}", path, err);
                HashMap::new()
            }
        };
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Err(err) = self.try_persist(entries) {
            error!("[Storage] failed to persist {:?}: {}", self.path, err);
        }
    }

    fn try_persist(&self, entries: &HashMap<String, String>) -> anyhow::Result<()> {
        usuarios_common::ensure_parent(&self.path)?;
        let json = serde_json::to_string_pretty(entries)?;
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl KeyStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(TOKEN_KEY), None);
        storage.set(TOKEN_KEY, "abc");
        assert_eq!(storage.get(TOKEN_KEY), Some("abc".to_string()));
        storage.remove(TOKEN_KEY);
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::open(&path);
        storage.set(TOKEN_KEY, "abc");
        storage.set(USER_KEY, r#"{"id":1}"#);
        drop(storage);

        let storage = FileStorage::open(&path);
        assert_eq!(storage.get(TOKEN_KEY), Some("abc".to_string()));
        assert_eq!(storage.get(USER_KEY), Some(r#"{"id":1}"#.to_string()));
    }

    #[test]
    fn test_file_storage_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::open(&path);
        storage.set(TOKEN_KEY, "abc");
        storage.remove(TOKEN_KEY);
        drop(storage);

        let storage = FileStorage::open(&path);
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json at all {").unwrap();

        let storage = FileStorage::open(&path);
        assert_eq!(storage.get(TOKEN_KEY), None);

        // Still writable after the corrupt load.
        storage.set(TOKEN_KEY, "abc");
        let storage = FileStorage::open(&path);
        assert_eq!(storage.get(TOKEN_KEY), Some("abc".to_string()));
    }

    #[test]
    fn test_missing_parent_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("session.json");

        let storage = FileStorage::open(&path);
        storage.set(USER_KEY, "x");
        assert!(path.exists());
    }
}

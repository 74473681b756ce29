//! Persisted key-value state.
//!
//! # Design
//! The engine persists exactly two keys (the session token and the display
//! name) through a small key-value abstraction with explicit save and clear
//! calls; nothing reads it implicitly. `FileStore` keeps the map as a JSON
//! object in a single file, loaded once at open and written through on every
//! change.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Key-value persistence for the session.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// A store read or write failed.
#[derive(Debug, Clone)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store failed: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// JSON-file-backed store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open `path`, loading any existing entries. A missing file is an empty
    /// store; the file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| StoreError(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StoreError(e.to_string())),
        };
        Ok(Self { path, entries })
    }

    fn write_through(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StoreError(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| StoreError(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.write_through()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.write_through()
        } else {
            Ok(())
        }
    }
}

/// In-memory store, for tests and sessions that should not outlive the
/// process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = FileStore::open(&path).unwrap();
        assert!(store.get("token").is_none());
        store.set("token", "t1").unwrap();
        store.set("username", "alice").unwrap();
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("token").as_deref(), Some("t1"));
        assert_eq!(store.get("username").as_deref(), Some("alice"));
    }

    #[test]
    fn file_store_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("token", "t1").unwrap();
        store.remove("token").unwrap();
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert!(store.get("token").is_none());
    }

    #[test]
    fn file_store_remove_of_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("session.json")).unwrap();
        assert!(store.remove("token").is_ok());
    }

    #[test]
    fn file_store_rejects_corrupt_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(FileStore::open(&path).is_err());
    }

    #[test]
    fn memory_store_set_get_remove() {
        let mut store = MemoryStore::new();
        store.set("token", "t1").unwrap();
        assert_eq!(store.get("token").as_deref(), Some("t1"));
        store.remove("token").unwrap();
        assert!(store.get("token").is_none());
    }
}

//! String key/value storage behind the player state.
//!
//! The session only ever talks to [`KeyValueStore`]. [`FileStore`] keeps every
//! key in one JSON object on disk; [`MemoryStore`] backs tests.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use civic_types::Phase;
use civic_utils::{atomic_write, quarantine, recover_bak_file};

/// Storage keys.
pub mod keys {
    pub const BLIND_LAYERS: &str = "blind_layers";
    pub const ADJUSTED_LAYERS: &str = "adjusted_layers";
    pub const ACTIVE_LAYER: &str = "active_layer";
    pub const COMPARE_VIEW: &str = "compare_view";
}

/// Key holding the layer map for `phase`.
#[must_use]
pub const fn phase_key(phase: Phase) -> &'static str {
    match phase {
        Phase::Blind => keys::BLIND_LAYERS,
        Phase::Adjusted => keys::ADJUSTED_LAYERS,
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entries<K: Into<String>, V: Into<String>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// All keys in `<dir>/state.json`, rewritten atomically on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub const FILE_NAME: &'static str = "state.json";

    /// Open (or start) the store in `dir`.
    ///
    /// An unreadable or malformed file is moved aside and the store starts
    /// empty; only a failure to read an existing file is an error.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        let path = dir.join(Self::FILE_NAME);
        recover_bak_file(&path);

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Self {
                    path,
                    entries: BTreeMap::new(),
                });
            }
            Err(source) => return Err(StorageError::Read { path, source }),
        };

        let entries = match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Store file is malformed: {e}");
                if let Err(e) = quarantine(&path) {
                    tracing::warn!(path = %path.display(), "Failed to move store file aside: {e}");
                }
                BTreeMap::new()
            }
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened store");
        Ok(Self { path, entries })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        atomic_write(&self.path, json.as_bytes()).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.entries.get(key).is_some_and(|v| v == value) {
            return Ok(());
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_none() {
            return Ok(());
        }
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let mut store = MemoryStore::new();
        store.set(keys::ACTIVE_LAYER, "capital").unwrap();
        assert_eq!(store.get(keys::ACTIVE_LAYER).as_deref(), Some("capital"));
        store.remove(keys::ACTIVE_LAYER).unwrap();
        assert!(store.get(keys::ACTIVE_LAYER).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.set(keys::BLIND_LAYERS, r#"{"operating":[100]}"#).unwrap();
            store.set(keys::COMPARE_VIEW, "combined").unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            store.get(keys::BLIND_LAYERS).as_deref(),
            Some(r#"{"operating":[100]}"#)
        );
        assert_eq!(store.get(keys::COMPARE_VIEW).as_deref(), Some("combined"));
    }

    #[test]
    fn file_store_creates_missing_dir_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("civic");
        let mut store = FileStore::open(&nested).unwrap();
        assert!(store.get(keys::ACTIVE_LAYER).is_none());
        store.set(keys::ACTIVE_LAYER, "operating").unwrap();
        assert!(nested.join(FileStore::FILE_NAME).exists());
    }

    #[test]
    fn file_store_quarantines_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FileStore::FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let store = FileStore::open(dir.path()).unwrap();

        assert!(store.get(keys::BLIND_LAYERS).is_none());
        assert!(!path.exists());
        assert!(dir.path().join("state.json.corrupt").exists());
    }

    #[test]
    fn file_store_remove_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set(keys::BLIND_LAYERS, "{}").unwrap();
        store.set(keys::ADJUSTED_LAYERS, "{}").unwrap();
        store.remove(keys::BLIND_LAYERS).unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert!(reopened.get(keys::BLIND_LAYERS).is_none());
        assert_eq!(reopened.get(keys::ADJUSTED_LAYERS).as_deref(), Some("{}"));
    }

    #[test]
    fn phase_keys_are_distinct() {
        assert_eq!(phase_key(Phase::Blind), "blind_layers");
        assert_eq!(phase_key(Phase::Adjusted), "adjusted_layers");
    }
}

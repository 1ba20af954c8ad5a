//! String-keyed JSON value stores.

use crate::error::StoreError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A string-keyed mapping persisted outside the process.
///
/// Writes are buffered until [`flush`](KeyValueStore::flush).
pub trait KeyValueStore {
    /// Replace the in-memory mapping with the persisted one.
    fn load(&mut self) -> Result<(), StoreError>;

    /// Value for `key`.
    fn get(&self, key: &str) -> Option<&Value>;

    /// Set `key` to `value`.
    fn put(&mut self, key: String, value: Value);

    /// Persist the mapping.
    fn flush(&mut self) -> Result<(), StoreError>;

    /// Delete every key, in memory and persisted.
    fn clear(&mut self) -> Result<(), StoreError>;

    /// Number of keys.
    fn len(&self) -> usize;

    /// True when there are no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mapping persisted as one pretty-printed JSON object.
///
/// Flushes write a sibling temporary file and rename it over the target, so
/// a crash never leaves a partially written mapping.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Store at `path`. Nothing is read until [`load`](KeyValueStore::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok(());
        }
        let map: Map<String, Value> = serde_json::from_str(&content)?;
        self.entries.extend(map);
        debug!(path = %self.path.display(), entries = self.entries.len(), "Loaded key-value store");
        Ok(())
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn put(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let temp = self.temp_path();
        std::fs::write(&temp, json).map_err(|e| StoreError::io(&temp, e))?;
        std::fs::rename(&temp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// In-memory store that keeps the last flushed snapshot separately.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: BTreeMap<String, Value>,
    persisted: BTreeMap<String, Value>,
    flushes: usize,
}

impl MemoryKvStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose persisted state already holds `entries`.
    pub fn with_persisted(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            persisted: entries.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Mapping as of the last flush.
    pub fn persisted(&self) -> &BTreeMap<String, Value> {
        &self.persisted
    }

    /// Number of flushes so far.
    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl KeyValueStore for MemoryKvStore {
    fn load(&mut self) -> Result<(), StoreError> {
        self.entries = self.persisted.clone();
        Ok(())
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn put(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.persisted = self.entries.clone();
        self.flushes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.persisted.clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

//! Extract sources: discovery and reading of named extract files.

use crate::error::ExtractError;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::warn;

/// A discoverable extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractEntry {
    /// File name, unique within the source
    pub name: String,
    /// Last modification time
    pub modified: SystemTime,
}

/// Provider of named, byte-addressable extract files.
pub trait ExtractSource {
    /// List available extracts, oldest modification first, ties by name.
    fn discover(&self) -> Result<Vec<ExtractEntry>, ExtractError>;

    /// Read the full contents of an extract.
    fn read(&self, entry: &ExtractEntry) -> Result<Vec<u8>, ExtractError>;
}

/// Lowercase hex BLAKE3 digest of extract contents.
///
/// # Example
///
/// ```
/// use adapter_extract::fingerprint;
///
/// let fp = fingerprint(b"Spot;FR0000120271;98.12;2024-03-15");
/// assert_eq!(fp.len(), 64);
/// assert_eq!(fp, fingerprint(b"Spot;FR0000120271;98.12;2024-03-15"));
/// ```
pub fn fingerprint(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

fn sort_entries(entries: &mut [ExtractEntry]) {
    entries.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.name.cmp(&b.name)));
}

/// Non-recursive scan of one directory for files with a given extension.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    extension: String,
}

impl DirectorySource {
    /// Source over `dir`, matching `extension` (with or without the leading dot).
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Scanned directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension)
    }
}

impl ExtractSource for DirectorySource {
    fn discover(&self) -> Result<Vec<ExtractEntry>, ExtractError> {
        let read_dir = std::fs::read_dir(&self.dir).map_err(|e| ExtractError::io(&self.dir, e))?;

        let mut entries = Vec::new();
        for item in read_dir {
            let item = item.map_err(|e| ExtractError::io(&self.dir, e))?;
            let path = item.path();
            if !self.matches(&path) {
                continue;
            }
            let metadata = match item.metadata() {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping extract without metadata");
                    continue;
                }
            };
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                warn!(path = %path.display(), "Skipping extract with non UTF-8 name");
                continue;
            };
            entries.push(ExtractEntry {
                name: name.to_string(),
                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }
        sort_entries(&mut entries);
        Ok(entries)
    }

    fn read(&self, entry: &ExtractEntry) -> Result<Vec<u8>, ExtractError> {
        let path = self.dir.join(&entry.name);
        std::fs::read(&path).map_err(|e| ExtractError::io(path, e))
    }
}

/// In-memory extracts.
///
/// Each insert stamps the extract with a later modification time than every
/// earlier one, so discovery order follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, (u64, Vec<u8>)>,
    unreadable: HashSet<String>,
    clock: u64,
}

impl MemorySource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }

    /// Add or replace an extract.
    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.clock += 1;
        self.files.insert(name.into(), (self.clock, contents.into()));
    }

    /// Remove an extract.
    pub fn remove(&mut self, name: &str) {
        self.files.remove(name);
    }

    /// Make reads of `name` fail until cleared.
    pub fn mark_unreadable(&mut self, name: impl Into<String>) {
        self.unreadable.insert(name.into());
    }

    /// Make `name` readable again.
    pub fn clear_unreadable(&mut self, name: &str) {
        self.unreadable.remove(name);
    }
}

impl ExtractSource for MemorySource {
    fn discover(&self) -> Result<Vec<ExtractEntry>, ExtractError> {
        let mut entries: Vec<ExtractEntry> = self
            .files
            .iter()
            .map(|(name, (stamp, _))| ExtractEntry {
                name: name.clone(),
                modified: SystemTime::UNIX_EPOCH + Duration::from_secs(*stamp),
            })
            .collect();
        sort_entries(&mut entries);
        Ok(entries)
    }

    fn read(&self, entry: &ExtractEntry) -> Result<Vec<u8>, ExtractError> {
        if self.unreadable.contains(&entry.name) {
            return Err(ExtractError::unreadable(&entry.name));
        }
        self.files
            .get(&entry.name)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| ExtractError::NotFound(entry.name.clone()))
    }
}

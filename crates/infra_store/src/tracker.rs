//! Processed-file tracking.
//!
//! The tracker is the gate in front of the pipeline: a file whose name is
//! tracked is not processed again unless a reset clears the mapping (or, with
//! change detection on, its content fingerprint differs from the recorded one).

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Marker stored per processed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMarker {
    /// Content fingerprint at processing time
    pub fingerprint: String,
    /// Processing time, RFC 3339 UTC
    pub processed_at: String,
}

/// Tracks processed extract files in a [`KeyValueStore`].
///
/// # Example
///
/// ```
/// use infra_store::{IncrementalFileTracker, MemoryKvStore};
///
/// let mut tracker = IncrementalFileTracker::open(MemoryKvStore::new()).unwrap();
/// assert!(!tracker.is_tracked("2024-03-15.md"));
///
/// tracker.mark_processed("2024-03-15.md", "ab12").unwrap();
/// assert!(tracker.is_tracked("2024-03-15.md"));
/// assert!(!tracker.has_changed("2024-03-15.md", "ab12"));
/// assert!(tracker.has_changed("2024-03-15.md", "cd34"));
/// ```
#[derive(Debug)]
pub struct IncrementalFileTracker<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> IncrementalFileTracker<K> {
    /// Load the persisted mapping from `store`.
    pub fn open(mut store: K) -> Result<Self, StoreError> {
        store.load()?;
        debug!(tracked = store.len(), "Loaded file tracker");
        Ok(Self { store })
    }

    /// Whether `name` has been processed.
    pub fn is_tracked(&self, name: &str) -> bool {
        self.store.get(name).is_some()
    }

    /// Recorded marker for `name`. Entries in any other shape read as `None`.
    pub fn marker(&self, name: &str) -> Option<FileMarker> {
        self.store
            .get(name)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Whether `fingerprint` differs from the one recorded for `name`.
    ///
    /// Untracked names and entries without a readable marker count as changed.
    pub fn has_changed(&self, name: &str, fingerprint: &str) -> bool {
        self.marker(name)
            .map_or(true, |marker| marker.fingerprint != fingerprint)
    }

    /// Record `name` as processed and flush immediately.
    pub fn mark_processed(&mut self, name: &str, fingerprint: &str) -> Result<(), StoreError> {
        let marker = FileMarker {
            fingerprint: fingerprint.to_string(),
            processed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        self.store.put(name.to_string(), serde_json::to_value(marker)?);
        self.store.flush()
    }

    /// Forget every tracked file.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.store.clear()
    }

    /// Number of tracked files.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when no file is tracked.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Underlying store.
    pub fn store(&self) -> &K {
        &self.store
    }

    /// Release the underlying store.
    pub fn into_store(self) -> K {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;
    use serde_json::json;

    #[test]
    fn test_mark_flushes_each_file() {
        let mut tracker = IncrementalFileTracker::open(MemoryKvStore::new()).unwrap();
        tracker.mark_processed("a.md", "f1").unwrap();
        tracker.mark_processed("b.md", "f2").unwrap();

        assert_eq!(tracker.store().flushes(), 2);
        assert_eq!(tracker.store().persisted().len(), 2);
    }

    #[test]
    fn test_marker_contents() {
        let mut tracker = IncrementalFileTracker::open(MemoryKvStore::new()).unwrap();
        tracker.mark_processed("a.md", "f1").unwrap();

        let marker = tracker.marker("a.md").unwrap();
        assert_eq!(marker.fingerprint, "f1");
        assert!(chrono::DateTime::parse_from_rfc3339(&marker.processed_at).is_ok());
        assert!(marker.processed_at.ends_with('Z'));
    }

    #[test]
    fn test_legacy_entry_is_tracked_but_changed() {
        let kv = MemoryKvStore::with_persisted([("old.md".to_string(), json!(1710460800.0))]);
        let tracker = IncrementalFileTracker::open(kv).unwrap();
        assert!(tracker.is_tracked("old.md"));
        assert!(tracker.marker("old.md").is_none());
        assert!(tracker.has_changed("old.md", "anything"));
    }

    #[test]
    fn test_reset_clears_persisted() {
        let mut tracker = IncrementalFileTracker::open(MemoryKvStore::new()).unwrap();
        tracker.mark_processed("a.md", "f1").unwrap();
        tracker.reset().unwrap();

        assert!(tracker.is_empty());
        assert!(!tracker.is_tracked("a.md"));
        assert!(tracker.store().persisted().is_empty());
    }
}

//! File-backed credential storage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::storage::{CredentialStore, StoreKey};

/// A [`CredentialStore`] backed by a JSON file on disk.
///
/// The file holds a flat string-to-string object, one entry per
/// [`StoreKey`]. A missing or unreadable file is treated as an empty store;
/// a corrupt file is logged and discarded on the next write. Every mutation
/// rewrites the whole file, which is fine for four small keys.
///
/// # Example
///
/// ```rust,no_run
/// use habit_api::{CredentialStore, FileStore, StoreKey};
///
/// let store = FileStore::new("session.json");
/// store.set(StoreKey::Token, "abc");
/// assert_eq!(store.get(StoreKey::Token), Some("abc".to_string()));
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Guards read-modify-write cycles against overlapping mutations.
    lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file is not created until the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> HashMap<String, String> {
        match std::fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), "corrupt credential file, treating as empty: {err}");
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "failed to read credential file: {err}");
                HashMap::new()
            }
        }
    }

    fn persist(&self, map: &HashMap<String, String>) {
        let payload = match serde_json::to_vec_pretty(map) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!("failed to serialize credential file: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, payload) {
            tracing::warn!(path = %self.path.display(), "failed to write credential file: {err}");
        }
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: StoreKey) -> Option<String> {
        let _guard = self.lock.lock().ok()?;
        self.load().remove(key.as_str())
    }

    fn set(&self, key: StoreKey, value: &str) {
        let Ok(_guard) = self.lock.lock() else {
            return;
        };
        let mut map = self.load();
        map.insert(key.as_str().to_string(), value.to_string());
        self.persist(&map);
    }

    fn remove(&self, key: StoreKey) {
        let Ok(_guard) = self.lock.lock() else {
            return;
        };
        let mut map = self.load();
        if map.remove(key.as_str()).is_some() {
            self.persist(&map);
        }
    }
}

// Verify FileStore is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FileStore>();
};

//! Persisted client state for the habit tracker SDK.
//!
//! The backend issues an opaque bearer token on login; the client persists
//! that token plus a small cache of display fields (username, email, avatar
//! URL) so a session can be restored without re-entering credentials. This
//! module defines the storage contract and two implementations:
//!
//! - [`MemoryStore`]: ephemeral, for tests and throwaway sessions
//! - [`FileStore`]: a JSON file on disk
//!
//! Writes are best-effort: a failed write is logged and swallowed, never
//! surfaced, since losing a cached display field must not break the session.

mod file;

pub use file::FileStore;

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// The four keys of persisted client state.
///
/// All values are optional strings, and all are cleared together on logout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Opaque bearer token issued by the backend.
    Token,
    /// Cached display name.
    Username,
    /// Cached email address.
    Email,
    /// Cached avatar URL.
    AvatarUrl,
}

impl StoreKey {
    /// Every key, in clearing order.
    pub const ALL: [Self; 4] = [Self::Token, Self::Username, Self::Email, Self::AvatarUrl];

    /// Returns the serialized key name used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Username => "username",
            Self::Email => "email",
            Self::AvatarUrl => "avatar_url",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value persistence for session credentials and display fields.
///
/// Implementations must be `Send + Sync`; access is expected to be
/// single-threaded in practice (one interactive session), so no transactional
/// discipline is required beyond individual get/set/remove calls.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: StoreKey) -> Option<String>;

    /// Stores `value` under `key`. Best-effort: failures are logged, not returned.
    fn set(&self, key: StoreKey, value: &str);

    /// Removes the value under `key`, if present. Best-effort.
    fn remove(&self, key: StoreKey);

    /// Removes every key. Called on logout.
    fn clear_all(&self) {
        for key in StoreKey::ALL {
            self.remove(key);
        }
    }
}

/// An in-memory [`CredentialStore`].
///
/// State lives only as long as the process; useful for tests and for callers
/// that do not want cross-restart session persistence.
///
/// # Example
///
/// ```rust
/// use habit_api::{CredentialStore, MemoryStore, StoreKey};
///
/// let store = MemoryStore::new();
/// store.set(StoreKey::Token, "abc");
/// assert_eq!(store.get(StoreKey::Token), Some("abc".to_string()));
///
/// store.clear_all();
/// assert!(store.get(StoreKey::Token).is_none());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: StoreKey) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|map| map.get(&key).cloned())
    }

    fn set(&self, key: StoreKey, value: &str) {
        if let Ok(mut map) = self.values.lock() {
            map.insert(key, value.to_string());
        }
    }

    fn remove(&self, key: StoreKey) {
        if let Ok(mut map) = self.values.lock() {
            map.remove(&key);
        }
    }
}

// Verify MemoryStore is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MemoryStore>();
};

//! Session storage abstraction.
//!
//! Stands in for the browser's storage areas: the cart demo persists to a
//! session-scoped store, the theme preference to a durable one. Scope is a
//! property of the *instance* the application root hands to each store, not
//! of the trait.
//!
//! Storage is best-effort everywhere: callers keep their in-memory state
//! authoritative and log failures at `warn` rather than surfacing them.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Fixed keys under which snapshots are persisted.
pub mod keys {
    /// Key for the cart snapshot (session scope).
    pub const CART: &str = "cart";

    /// Key for the theme preference (durable scope).
    pub const THEME: &str = "theme";
}

/// Errors a storage backend can report.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store rejected the write for lack of space.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// The backing store cannot be reached at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key-value store scoped to one storage area.
pub trait SessionStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the write is rejected.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage backend.
///
/// Lives exactly as long as the owning application root, which makes it the
/// session-scoped store. A host embedding this library can supply its own
/// [`SessionStorage`] implementation for the durable area.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

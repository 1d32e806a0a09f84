//! Synchronous local key-value storage abstraction.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::EngagementError;

/// Minimal interface over the browser's persistent local storage.
///
/// Implementations must be cheap and synchronous; web storage is. A failing
/// implementation models storage that is disabled or over quota — callers
/// in [`super::SessionStore`] degrade to in-memory defaults and never
/// surface these errors.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::LocalStorage`] when storage is unavailable.
    fn get(&self, key: &str) -> Result<Option<String>, EngagementError>;

    /// Stores `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::LocalStorage`] when storage is unavailable
    /// or full.
    fn set(&self, key: &str, value: &str) -> Result<(), EngagementError>;

    /// Removes the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::LocalStorage`] when storage is unavailable.
    fn remove(&self, key: &str) -> Result<(), EngagementError>;
}

/// In-process [`KeyValueStore`] backed by a mutex-guarded map.
///
/// The default implementation for tests and for embedding the core where
/// no real browser storage exists.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, EngagementError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), EngagementError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), EngagementError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

//! In-memory storage backend.

use super::StoragePort;
use crate::error::StorageError;
use futures::future::{self, BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Shared in-process key/value map. Clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous peek, handy for assertions and debugging.
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Seed a raw value without going through the async port.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), value.into());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> BoxFuture<'static, Result<Option<String>, StorageError>> {
        let result = self
            .entries
            .read()
            .map(|entries| entries.get(key).cloned())
            .map_err(|e| StorageError::Read {
                key: key.to_string(),
                reason: e.to_string(),
            });
        future::ready(result).boxed()
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, Result<(), StorageError>> {
        let result = self
            .entries
            .write()
            .map(|mut entries| {
                entries.insert(key.to_string(), value);
            })
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: e.to_string(),
            });
        future::ready(result).boxed()
    }

    fn remove(&self, key: &str) -> BoxFuture<'static, Result<(), StorageError>> {
        let result = self
            .entries
            .write()
            .map(|mut entries| {
                entries.remove(key);
            })
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: e.to_string(),
            });
        future::ready(result).boxed()
    }
}

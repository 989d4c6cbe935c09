//! Storage port: the key/value capability the engine persists through.
//!
//! Values are UTF-8 JSON text. The engine never touches a concrete backend;
//! it is handed an `Arc<dyn StoragePort>` so tests can inject `MemoryStorage`.
//!
//! - `memory`: in-process map, used by tests and ephemeral sessions
//! - `file`: one JSON file per key under a profile directory

pub mod file;
pub mod memory;

use crate::error::StorageError;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Async key/value storage scoped to one profile.
pub trait StoragePort: Send + Sync {
    fn get(&self, key: &str) -> BoxFuture<'static, Result<Option<String>, StorageError>>;
    fn set(&self, key: &str, value: String) -> BoxFuture<'static, Result<(), StorageError>>;
    fn remove(&self, key: &str) -> BoxFuture<'static, Result<(), StorageError>>;
}

/// Read and deserialize the JSON value under `key`.
///
/// A missing key is `Ok(None)`; unparsable text is `StorageError::Parse`.
pub async fn get_json<T: DeserializeOwned>(
    storage: &dyn StoragePort,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match storage.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Parse {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Serialize `value` and write it under `key`.
pub async fn set_json<T: Serialize>(
    storage: &dyn StoragePort,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|e| StorageError::Write {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    storage.set(key, json).await
}

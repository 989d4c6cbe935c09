//! File-backed storage: one `<key>.json` file per key inside a profile directory.
//!
//! Default location is `~/.config/vark-results/storage/` (XDG aware via `dirs`).

use super::StoragePort;
use crate::error::StorageError;
use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the profile directory. Created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStorage { root: root.into() }
    }

    /// Profile directory under the user's config dir.
    pub fn default_root() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("vark-results")
            .join("storage")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Keys contain emails; keep ASCII alphanumerics and `@ . - _`, write every
/// other byte (including `%`) as `%XX`. Distinct keys get distinct names.
fn sanitize_key(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'@' | b'.' | b'-' | b'_') {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("%{:02X}", byte));
        }
    }
    name
}

impl StoragePort for FileStorage {
    fn get(&self, key: &str) -> BoxFuture<'static, Result<Option<String>, StorageError>> {
        let path = self.path_for(key);
        let key = key.to_string();
        async move {
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => Ok(Some(content)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(StorageError::Read {
                    key,
                    reason: e.to_string(),
                }),
            }
        }
        .boxed()
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, Result<(), StorageError>> {
        let root = self.root.clone();
        let path = self.path_for(key);
        let key = key.to_string();
        async move {
            let write_err = |e: std::io::Error| StorageError::Write {
                key: key.clone(),
                reason: e.to_string(),
            };
            tokio::fs::create_dir_all(&root).await.map_err(write_err)?;
            tokio::fs::write(&path, value).await.map_err(write_err)?;
            log::debug!("[Storage] wrote {}", path.display());
            Ok(())
        }
        .boxed()
    }

    fn remove(&self, key: &str) -> BoxFuture<'static, Result<(), StorageError>> {
        let path = self.path_for(key);
        let key = key.to_string();
        async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::Write {
                    key,
                    reason: e.to_string(),
                }),
            }
        }
        .boxed()
    }
}

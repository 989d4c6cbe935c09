//! Result History Management
//!
//! Append-only, newest-first persistence of `ResultRecord`s through the
//! storage port. The whole log lives under a single key and is rewritten on
//! every append (read full, prepend, write full).
//!
//! ## Key scoping
//! - `HistoryScope::PerIdentity` (default): `vark_results_<lowercased email>`
//! - `HistoryScope::Global`: one shared `vark_results_data` key for every
//!   signed-in user of the profile
//!
//! Guests never read or write history under either scope.

use crate::config::AppConfig;
use crate::error::StorageError;
use crate::models::{Identity, ResultRecord};
use crate::storage::{self, StoragePort};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which storage key a signed-in identity's history lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryScope {
    #[default]
    PerIdentity,
    Global,
}

pub struct HistoryStore {
    storage: Arc<dyn StoragePort>,
    scope: HistoryScope,
    key_prefix: String,
    global_key: String,
}

impl HistoryStore {
    pub fn new(
        storage: Arc<dyn StoragePort>,
        scope: HistoryScope,
        key_prefix: impl Into<String>,
        global_key: impl Into<String>,
    ) -> Self {
        HistoryStore {
            storage,
            scope,
            key_prefix: key_prefix.into(),
            global_key: global_key.into(),
        }
    }

    /// Build a store using the keys and scope from `config`.
    pub fn from_config(storage: Arc<dyn StoragePort>, config: &AppConfig) -> Self {
        Self::new(
            storage,
            config.history_scope,
            config.results_key_prefix.clone(),
            config.global_results_key.clone(),
        )
    }

    pub fn scope(&self) -> HistoryScope {
        self.scope
    }

    /// Storage key for `identity`, or `None` for guests.
    ///
    /// Emails are matched case-insensitively at sign-in, so the per-identity
    /// key uses the lowercased address.
    pub fn key_for(&self, identity: &Identity) -> Option<String> {
        if identity.is_guest {
            return None;
        }
        Some(match self.scope {
            HistoryScope::PerIdentity => {
                format!("{}{}", self.key_prefix, identity.email.to_lowercase())
            }
            HistoryScope::Global => self.global_key.clone(),
        })
    }

    async fn read_log(&self, key: &str) -> Result<Vec<ResultRecord>, StorageError> {
        Ok(storage::get_json::<Vec<ResultRecord>>(self.storage.as_ref(), key)
            .await?
            .unwrap_or_default())
    }

    /// Full history for `identity`, newest first.
    ///
    /// Read and parse failures are logged and reported as an empty history.
    pub async fn fetch_all(&self, identity: &Identity) -> Vec<ResultRecord> {
        let Some(key) = self.key_for(identity) else {
            return Vec::new();
        };
        match self.read_log(&key).await {
            Ok(records) => {
                log::debug!("[History] {} record(s) under {}", records.len(), key);
                records
            }
            Err(e) => {
                log::warn!("[History] Treating history as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Number of records visible to `identity`.
    pub async fn count(&self, identity: &Identity) -> usize {
        self.fetch_all(identity).await.len()
    }

    /// Prepend `record` and write the full log back. Returns the updated log.
    ///
    /// An unreadable prior log is replaced rather than blocking the append.
    /// Guests get an empty log back and nothing is written.
    pub async fn append(
        &self,
        identity: &Identity,
        record: ResultRecord,
    ) -> Result<Vec<ResultRecord>, StorageError> {
        let Some(key) = self.key_for(identity) else {
            log::debug!("[History] Guest submission not persisted");
            return Ok(Vec::new());
        };

        let mut records = match self.read_log(&key).await {
            Ok(records) => records,
            Err(e) => {
                log::warn!("[History] Prior history unreadable, starting fresh: {}", e);
                Vec::new()
            }
        };
        records.insert(0, record);

        storage::set_json(self.storage.as_ref(), &key, &records).await?;
        log::info!("[History] Stored record; {} total under {}", records.len(), key);
        Ok(records)
    }
}

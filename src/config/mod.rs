//! Configuration module for the assessment engine.
//!
//! # Module Structure
//!
//! - `loader`: settings paths plus JSON load/save
//! - `validator`: sanity checks on loaded settings
//!
//! # Settings Management
//!
//! `SettingsManager` loads `AppConfig` from `settings.json`, falling back to
//! defaults when the file is missing or no longer parses, and persists it back.

pub mod loader;
pub mod validator;

use crate::error::ConfigError;
use crate::history::HistoryScope;
use std::path::{Path, PathBuf};

/// Engine configuration: sign-in policy, storage keys and local paths.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // Sign-in
    /// Email suffixes accepted on the federated path, e.g. "@escola.pr.gov.br"
    pub allowed_domains: Vec<String>,
    pub guest_email: String,
    pub guest_name: String,

    // Storage keys
    pub session_key: String,
    pub results_key_prefix: String,
    pub global_results_key: String,
    pub history_scope: HistoryScope,

    // Paths (empty means the platform default)
    pub storage_dir: String,
    pub log_dir: String,

    // Debug Settings
    pub debug_logging: bool,

    /// Assessment document offered for download
    pub assessment_document: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            allowed_domains: vec!["@escola.pr.gov.br".to_string()],
            guest_email: "guest".to_string(),
            guest_name: "Visitante".to_string(),
            session_key: "vark_user_session".to_string(),
            results_key_prefix: "vark_results_".to_string(),
            global_results_key: "vark_results_data".to_string(),
            history_scope: HistoryScope::PerIdentity,
            storage_dir: String::new(),
            log_dir: String::new(),
            debug_logging: false,
            assessment_document: "/VARK_CA_Wayground.pdf".to_string(),
        }
    }
}

impl AppConfig {
    /// Storage directory, resolving the empty default.
    pub fn storage_path(&self) -> PathBuf {
        if self.storage_dir.is_empty() {
            crate::storage::FileStorage::default_root()
        } else {
            PathBuf::from(&self.storage_dir)
        }
    }

    /// Log directory, resolving the empty default to `./logs`.
    pub fn log_path(&self) -> PathBuf {
        if self.log_dir.is_empty() {
            PathBuf::from("logs")
        } else {
            PathBuf::from(&self.log_dir)
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug_logging {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

/// Settings persistence for `AppConfig`.
pub struct SettingsManager;

impl SettingsManager {
    /// Load settings from the default path.
    pub fn load() -> Result<AppConfig, ConfigError> {
        let path = loader::get_global_settings_path()?;
        Ok(Self::load_from(&path))
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields defaults. A file that fails to parse or validate
    /// logs a warning and also yields defaults.
    pub fn load_from(path: &Path) -> AppConfig {
        match loader::load_config_from_file(path) {
            Ok(config) => match validator::validate_config(&config) {
                Ok(()) => config,
                Err(e) => {
                    log::warn!("[Config] Invalid settings, falling back to defaults: {}", e);
                    AppConfig::default()
                }
            },
            Err(ConfigError::FileNotFound(_)) => AppConfig::default(),
            Err(e) => {
                log::warn!("[Config] Failed to read settings, falling back to defaults: {}", e);
                AppConfig::default()
            }
        }
    }

    /// Validate and save settings to the default path.
    pub fn save(config: &AppConfig) -> Result<(), ConfigError> {
        loader::ensure_settings_dir_exists()?;
        let path = loader::get_global_settings_path()?;
        Self::save_to(config, &path)
    }

    /// Validate and save settings to `path`.
    pub fn save_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
        validator::validate_config(config)?;
        loader::save_config_to_file(config, path)
    }
}

//! Settings file location and JSON (de)serialization.

use super::AppConfig;
use crate::error::ConfigError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "vark-results";
const SETTINGS_FILE: &str = "settings.json";

fn settings_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_DIR))
        .ok_or_else(|| ConfigError::ValidationFailed("no user config directory".to_string()))
}

/// `~/.config/vark-results/settings.json` on Linux.
pub fn get_global_settings_path() -> Result<PathBuf, ConfigError> {
    settings_dir().map(|dir| dir.join(SETTINGS_FILE))
}

pub fn ensure_settings_dir_exists() -> Result<(), ConfigError> {
    fs::create_dir_all(settings_dir()?)?;
    Ok(())
}

/// Read and deserialize settings. Fields absent from the file take defaults.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig, ConfigError> {
    validate_config_path(path)?;

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.display().to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Serialize settings as pretty JSON, creating parent directories.
pub fn save_config_to_file(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    validate_config_path(path)?;

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)?,
        _ => {}
    }
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    log::debug!("[Config] Settings written to {}", path.display());
    Ok(())
}

/// Settings live in a `.json` file; anything else is refused.
pub fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    let is_json = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed(format!(
            "settings path '{}' is not a .json file",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryScope;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_through_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("settings.json");

        let mut config = AppConfig::default();
        config.history_scope = HistoryScope::Global;
        config.allowed_domains.push("@seed.pr.gov.br".to_string());

        save_config_to_file(&config, &path).unwrap();
        assert_eq!(load_config_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_absent_file_reported() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_config_from_file(&temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_path_extension() {
        assert!(validate_config_path(Path::new("settings.json")).is_ok());
        assert!(validate_config_path(Path::new("SETTINGS.JSON")).is_ok());
        assert!(validate_config_path(Path::new("settings.toml")).is_err());
        assert!(validate_config_path(Path::new("settings")).is_err());
        assert!(validate_config_path(Path::new("")).is_err());
    }
}

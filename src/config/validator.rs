//! Config validation.

use super::AppConfig;
use crate::error::ConfigError;

/// Validate allowed domain suffixes: at least one, each `@` followed by a host.
pub fn validate_allowed_domains(domains: &[String]) -> Result<(), ConfigError> {
    if domains.is_empty() {
        return Err(ConfigError::ValidationFailed(
            "At least one allowed domain is required".to_string(),
        ));
    }

    for domain in domains {
        if !domain.starts_with('@') || domain.len() < 2 || domain[1..].contains('@') {
            return Err(ConfigError::ValidationFailed(format!(
                "Allowed domain must look like '@example.org', got: '{}'",
                domain
            )));
        }
    }

    Ok(())
}

/// Storage keys must be non-empty and the session key must not collide with
/// the history keys.
pub fn validate_storage_keys(config: &AppConfig) -> Result<(), ConfigError> {
    let keys = [
        ("session_key", &config.session_key),
        ("results_key_prefix", &config.results_key_prefix),
        ("global_results_key", &config.global_results_key),
    ];
    for (name, value) in keys {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(format!(
                "Storage key '{}' cannot be empty",
                name
            )));
        }
    }

    if config.session_key == config.global_results_key
        || config.session_key.starts_with(&config.results_key_prefix)
    {
        return Err(ConfigError::ValidationFailed(format!(
            "Session key '{}' collides with the results keys",
            config.session_key
        )));
    }

    Ok(())
}

/// Run every check on `config`.
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_allowed_domains(&config.allowed_domains)?;
    validate_storage_keys(config)?;

    if config.guest_email.trim().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "Guest email sentinel cannot be empty".to_string(),
        ));
    }

    Ok(())
}

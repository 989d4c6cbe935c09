//! Sign-in flows producing a cached custom session.
//!
//! Both paths persist the same `SessionRecord` shape under the session key;
//! the resolver only ever sees the resulting record.

use super::token::{decode_claims, IdentityClaims};
use crate::config::AppConfig;
use crate::error::{AppError, AuthError};
use crate::log_parsed;
use crate::models::SessionRecord;
use crate::storage::{self, StoragePort};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("static email pattern compiles"));

/// Check `email` against the allowed domain suffixes (ASCII case-insensitive).
pub fn check_domain(email: &str, allowed: &[String]) -> Result<(), AuthError> {
    let lowered = email.to_ascii_lowercase();
    let shaped = EMAIL_SHAPE.is_match(email);
    if shaped
        && allowed
            .iter()
            .any(|suffix| lowered.ends_with(&suffix.to_ascii_lowercase()))
    {
        Ok(())
    } else {
        Err(AuthError::DomainNotAllowed {
            email: email.to_string(),
        })
    }
}

/// Build the session record for a federated sign-in.
pub fn federated_session(claims: IdentityClaims) -> SessionRecord {
    SessionRecord {
        email: claims.email,
        name: claims.name,
        picture: claims.picture,
        is_guest: false,
    }
}

/// Build the guest session record.
pub fn guest_session(config: &AppConfig) -> SessionRecord {
    SessionRecord {
        email: config.guest_email.clone(),
        name: Some(config.guest_name.clone()),
        picture: None,
        is_guest: true,
    }
}

/// Decode `token`, enforce the domain allow-list and cache the session.
///
/// Nothing is written when decoding or the domain check fails.
pub async fn sign_in_federated(
    storage: &dyn StoragePort,
    config: &AppConfig,
    token: &str,
) -> Result<SessionRecord, AppError> {
    let claims = decode_claims(token).map_err(|e| {
        log::warn!("[SignIn] Token rejected: {}", e);
        e
    })?;

    if let Err(e) = check_domain(&claims.email, &config.allowed_domains) {
        log::warn!("[SignIn] {}", e);
        return Err(e.into());
    }

    let session = federated_session(claims);
    storage::set_json(storage, &config.session_key, &session).await?;
    log_parsed!("SIGN-IN: federated session cached for {}", session.email);
    Ok(session)
}

/// Cache a guest session. Fails only if the storage write fails.
pub async fn sign_in_guest(
    storage: &dyn StoragePort,
    config: &AppConfig,
) -> Result<SessionRecord, AppError> {
    let session = guest_session(config);
    storage::set_json(storage, &config.session_key, &session).await?;
    log_parsed!("SIGN-IN: guest session started");
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::encode_unsigned;
    use crate::storage::MemoryStorage;

    fn token_for(email: &str) -> String {
        encode_unsigned(&IdentityClaims {
            email: email.to_string(),
            name: Some("Maria Silva".to_string()),
            picture: Some("pic".to_string()),
        })
    }

    #[test]
    fn test_check_domain() {
        let allowed = vec!["@escola.pr.gov.br".to_string()];
        assert!(check_domain("maria@escola.pr.gov.br", &allowed).is_ok());
        assert!(check_domain("Maria@Escola.PR.gov.br", &allowed).is_ok());
        assert!(check_domain("maria@gmail.com", &allowed).is_err());
        assert!(check_domain("@escola.pr.gov.br", &allowed).is_err());
        assert!(check_domain("maria@evil.com@escola.pr.gov.br", &allowed).is_err());
    }

    #[tokio::test]
    async fn test_federated_sign_in_persists_session() {
        let storage = MemoryStorage::new();
        let config = AppConfig::default();

        let session = sign_in_federated(&storage, &config, &token_for("maria@escola.pr.gov.br"))
            .await
            .unwrap();
        assert!(!session.is_guest);

        let raw = storage.snapshot(&config.session_key).unwrap();
        let stored: SessionRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, session);
    }

    #[tokio::test]
    async fn test_domain_rejection_persists_nothing() {
        let storage = MemoryStorage::new();
        let config = AppConfig::default();

        let err = sign_in_federated(&storage, &config, &token_for("maria@gmail.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Auth(AuthError::DomainNotAllowed { .. })
        ));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_token_persists_nothing() {
        let storage = MemoryStorage::new();
        let config = AppConfig::default();

        let err = sign_in_federated(&storage, &config, "garbage").await.unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::MalformedToken(_))));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_guest_sign_in() {
        let storage = MemoryStorage::new();
        let config = AppConfig::default();

        let session = sign_in_guest(&storage, &config).await.unwrap();
        assert!(session.is_guest);
        assert_eq!(session.email, "guest");
        assert!(storage.snapshot(&config.session_key).is_some());
    }
}

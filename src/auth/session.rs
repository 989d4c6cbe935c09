//! Session resolution: merges the federated session and the cached custom
//! session into a single identity.

use crate::error::StorageError;
use crate::models::{Identity, SessionRecord};
use crate::storage::{self, StoragePort};
use futures::future::{self, BoxFuture, FutureExt};
use std::sync::{Arc, RwLock};

/// Session descriptor reported by the federated sign-in provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedSession {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_ref: Option<String>,
}

/// External federated sign-in provider.
pub trait FederatedProvider: Send + Sync {
    /// Currently active federated session, if any.
    fn current_session(&self) -> BoxFuture<'static, Option<FederatedSession>>;
    /// End the federated session.
    fn sign_out(&self) -> BoxFuture<'static, ()>;
}

/// Provider for builds without a federated backend: never signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFederatedProvider;

impl FederatedProvider for NoFederatedProvider {
    fn current_session(&self) -> BoxFuture<'static, Option<FederatedSession>> {
        future::ready(None).boxed()
    }

    fn sign_out(&self) -> BoxFuture<'static, ()> {
        future::ready(()).boxed()
    }
}

/// In-memory provider whose session can be set directly.
#[derive(Debug, Clone, Default)]
pub struct StaticFederatedProvider {
    session: Arc<RwLock<Option<FederatedSession>>>,
}

impl StaticFederatedProvider {
    pub fn new(session: Option<FederatedSession>) -> Self {
        StaticFederatedProvider {
            session: Arc::new(RwLock::new(session)),
        }
    }

    pub fn set_session(&self, session: Option<FederatedSession>) {
        if let Ok(mut current) = self.session.write() {
            *current = session;
        }
    }
}

impl FederatedProvider for StaticFederatedProvider {
    fn current_session(&self) -> BoxFuture<'static, Option<FederatedSession>> {
        let session = self.session.read().ok().and_then(|s| s.clone());
        future::ready(session).boxed()
    }

    fn sign_out(&self) -> BoxFuture<'static, ()> {
        self.set_session(None);
        future::ready(()).boxed()
    }
}

/// Where the active identity comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySource {
    None,
    Federated(FederatedSession),
    Custom(SessionRecord),
}

/// Pick the identity source. A federated session with an email wins over the
/// cached custom session.
pub fn select_source(
    federated: Option<FederatedSession>,
    custom: Option<SessionRecord>,
) -> IdentitySource {
    match (federated, custom) {
        (Some(session), _) if session.email.is_some() => IdentitySource::Federated(session),
        (_, Some(record)) => IdentitySource::Custom(record),
        _ => IdentitySource::None,
    }
}

/// Collapse an identity source into the canonical identity.
pub fn resolve_identity(source: &IdentitySource) -> Option<Identity> {
    match source {
        IdentitySource::None => None,
        IdentitySource::Federated(session) => session.email.as_ref().map(|email| Identity {
            email: email.clone(),
            display_name: session.display_name.clone().unwrap_or_default(),
            avatar_ref: session.avatar_ref.clone(),
            is_guest: false,
        }),
        IdentitySource::Custom(record) => Some(Identity::from_session(record)),
    }
}

/// Reads both identity sources and resolves them.
pub struct SessionResolver {
    storage: Arc<dyn StoragePort>,
    federated: Arc<dyn FederatedProvider>,
    session_key: String,
}

impl SessionResolver {
    pub fn new(
        storage: Arc<dyn StoragePort>,
        federated: Arc<dyn FederatedProvider>,
        session_key: impl Into<String>,
    ) -> Self {
        SessionResolver {
            storage,
            federated,
            session_key: session_key.into(),
        }
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Load the cached custom session.
    ///
    /// A malformed record is removed and treated as absent; read failures are
    /// treated as absent too. Neither reaches the caller.
    pub async fn load_custom_session(&self) -> Option<SessionRecord> {
        match storage::get_json::<SessionRecord>(self.storage.as_ref(), &self.session_key).await {
            Ok(record) => record,
            Err(StorageError::Parse { reason, .. }) => {
                log::warn!("[Session] Discarding malformed cached session: {}", reason);
                if let Err(e) = self.storage.remove(&self.session_key).await {
                    log::warn!("[Session] Could not remove malformed session: {}", e);
                }
                None
            }
            Err(e) => {
                log::warn!("[Session] Cached session unavailable: {}", e);
                None
            }
        }
    }

    /// Evaluate both sources and return the winning one.
    pub async fn source(&self) -> IdentitySource {
        let federated = self.federated.current_session().await;
        let custom = self.load_custom_session().await;
        select_source(federated, custom)
    }

    /// Resolve the active identity, if any.
    pub async fn resolve(&self) -> Option<Identity> {
        let source = self.source().await;
        let identity = resolve_identity(&source);
        match &identity {
            Some(id) => log::debug!(
                "[Session] Resolved identity {} (guest: {})",
                id.email,
                id.is_guest
            ),
            None => log::debug!("[Session] No identity"),
        }
        identity
    }

    /// Sign out of the federated provider and drop the cached session.
    ///
    /// The federated sign-out always runs; a failure to remove the cached
    /// session is returned after it.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.federated.sign_out().await;
        self.storage.remove(&self.session_key).await
    }
}

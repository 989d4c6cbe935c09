//! AppController: central orchestrator behind the presentation layer.
//!
//! Owns the resolved identity, the visible history and the transient result.
//! Collaborators are injected as trait objects (`StoragePort`,
//! `FederatedProvider`) so tests run against in-memory fakes.
//!
//! State sits behind a `std::sync::RwLock` that is never held across an
//! `.await`; the in-flight submission flag is an `AtomicBool`.

use crate::auth::{self, FederatedProvider, FederatedSession, SessionResolver};
use crate::config::AppConfig;
use crate::error::{AppError, StorageError, SubmitError};
use crate::history::HistoryStore;
use crate::log_parsed;
use crate::models::{Identity, QuizInput, ResultRecord, ResultView, ViewState};
use crate::quiz;
use crate::result::ResultSession;
use crate::storage::StoragePort;
use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct EngineState {
    identity: Option<Identity>,
    history: Vec<ResultRecord>,
    result: ResultSession,
}

/// Resets the submitting flag when the submission ends, however it ends.
struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct AppController {
    config: AppConfig,
    storage: Arc<dyn StoragePort>,
    resolver: SessionResolver,
    history_store: HistoryStore,
    state: RwLock<EngineState>,
    submitting: AtomicBool,
}

impl AppController {
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn StoragePort>,
        federated: Arc<dyn FederatedProvider>,
    ) -> Self {
        let resolver =
            SessionResolver::new(storage.clone(), federated, config.session_key.clone());
        let history_store = HistoryStore::from_config(storage.clone(), &config);
        AppController {
            config,
            storage,
            resolver,
            history_store,
            state: RwLock::new(EngineState::default()),
            submitting: AtomicBool::new(false),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn assessment_document(&self) -> &str {
        &self.config.assessment_document
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read_state().identity.clone()
    }

    pub fn history(&self) -> Vec<ResultRecord> {
        self.read_state().history.clone()
    }

    pub fn current_result(&self) -> Option<ResultView> {
        self.read_state().result.current().cloned()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self) -> ViewState {
        let state = self.read_state();
        ViewState {
            identity: state.identity.clone(),
            history: state.history.clone(),
            current_result: state.result.current().cloned(),
            submitting: self.is_submitting(),
        }
    }

    /// Install `identity` and load its history (or clear history when absent).
    async fn adopt(&self, identity: Option<Identity>) -> Option<Identity> {
        let history = match &identity {
            Some(id) => self.history_store.fetch_all(id).await,
            None => Vec::new(),
        };
        let mut state = self.write_state();
        state.identity = identity.clone();
        state.history = history;
        identity
    }

    /// Resolve the identity from both sources and load its history.
    ///
    /// Called on startup and after every sign-in.
    pub async fn refresh(&self) -> Option<Identity> {
        let identity = self.resolver.resolve().await;
        self.adopt(identity).await
    }

    /// React to a pushed federated session change.
    pub async fn on_federated_change(&self, session: Option<FederatedSession>) -> Option<Identity> {
        let custom = self.resolver.load_custom_session().await;
        let source = auth::select_source(session, custom);
        self.adopt(auth::resolve_identity(&source)).await
    }

    /// Federated sign-in with an identity token from the widget.
    pub async fn sign_in_federated(&self, token: &str) -> Result<Option<Identity>, AppError> {
        auth::sign_in_federated(self.storage.as_ref(), &self.config, token).await?;
        Ok(self.refresh().await)
    }

    /// Guest sign-in.
    pub async fn sign_in_guest(&self) -> Result<Option<Identity>, AppError> {
        auth::sign_in_guest(self.storage.as_ref(), &self.config).await?;
        Ok(self.refresh().await)
    }

    /// Validate, score and store a quiz submission.
    ///
    /// On a storage write failure the result is still shown and the error
    /// carries the record. If the identity changed while the record was being
    /// stored (logout or another sign-in), the view state is left untouched.
    pub async fn submit(&self, input: QuizInput) -> Result<ResultView, SubmitError> {
        let identity = self.identity().ok_or(SubmitError::NoSession)?;

        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::Busy);
        }
        let _guard = SubmitGuard(&self.submitting);

        let validated = quiz::validate(&input).map_err(|e| {
            log::info!("[Submit] Rejected: {}", e);
            SubmitError::from(e)
        })?;

        let record = quiz::build_record(&validated, Local::now());
        let view = quiz::result_view(record.clone());
        let stored = self.history_store.append(&identity, record.clone()).await;

        let mut state = self.write_state();
        if state.identity.as_ref() != Some(&identity) {
            log::warn!("[Submit] Session changed while saving; result not displayed");
            return match stored {
                Ok(_) => Ok(view),
                Err(source) => Err(SubmitError::Persistence {
                    record: Box::new(record),
                    source,
                }),
            };
        }
        state.result.replace(view.clone());
        match stored {
            Ok(history) => {
                if !identity.is_guest {
                    state.history = history;
                }
                log_parsed!("SUBMIT: result {} recorded for {}", record.id, record.name);
                Ok(view)
            }
            Err(source) => {
                log::error!("[Submit] Result shown but not saved: {}", source);
                Err(SubmitError::Persistence {
                    record: Box::new(record),
                    source,
                })
            }
        }
    }

    /// Sign out everywhere and drop all derived state.
    ///
    /// In-memory state is cleared even when removing the cached session fails.
    pub async fn logout(&self) -> Result<(), StorageError> {
        let cleared = self.resolver.clear().await;
        {
            let mut state = self.write_state();
            *state = EngineState::default();
        }
        log_parsed!("LOGOUT: session cleared");
        cleared
    }
}

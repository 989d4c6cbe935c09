//! VARK Results engine
//!
//! Session resolution and result persistence for a learning-style (VARK)
//! self-assessment: a user signs in (federated or guest), enters four
//! sub-scores that must total 16, and the engine derives percentages, keeps
//! the latest result for display and appends it to a local history.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Core data structures and types
//! - **config**: Settings (sign-in policy, storage keys, paths)
//! - **storage**: Injected key/value storage port and its backends
//! - **auth**: Identity token decoding, sign-in flows, session resolution
//! - **quiz**: Input validation and score transformation
//! - **history**: Append-only, identity-scoped result history
//! - **result**: Transient holder of the latest result
//! - **controller**: Render boundary tying everything together
//! - **log_collector**: Decoupled disk logging behind the `log` facade

// Core foundational modules
pub mod error;
pub mod models;

pub mod config;
pub mod storage;

pub mod auth;
pub mod quiz;

pub mod history;
pub mod result;

pub mod controller;

// Robust, decoupled logging system
pub mod log_collector;

// Re-export the log crate for macro usage
pub use log;

pub use log_collector::{LogChannel, LogCollector, LogLine};

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{
    AppError, AuthError, ConfigError, Result, StorageError, SubmitError, ValidationError,
};

pub use models::{
    BreakdownEntry, Category, Identity, PercentageSet, QuizInput, ResultRecord, ResultView,
    ScoreSet, SessionRecord, ViewState, TOTAL_POINTS,
};

pub use config::{AppConfig, SettingsManager};
pub use storage::{FileStorage, MemoryStorage, StoragePort};
pub use auth::{
    FederatedProvider, FederatedSession, IdentityClaims, NoFederatedProvider,
    StaticFederatedProvider,
};
pub use history::{HistoryScope, HistoryStore};
pub use result::ResultSession;
pub use controller::AppController;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

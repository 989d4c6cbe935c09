//! Unified error type hierarchy for VARK Results
//!
//! Provides structured error handling with AuthError, ValidationError,
//! StorageError, ConfigError, SubmitError and the umbrella AppError.

use crate::models::{Category, ResultRecord};
use std::io;
use thiserror::Error;

/// Sign-in and identity token errors.
///
/// Both variants leave the user unauthenticated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Malformed identity token: {0}")]
    MalformedToken(String),

    #[error("Email domain not allowed: {email}")]
    DomainNotAllowed { email: String },
}

/// Quiz form validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    MissingName,

    #[error("Scores must sum to exactly 16, got {total}")]
    InvalidSum { total: i64 },

    #[error("Score for {category} must be between 0 and 16, got {value}")]
    ScoreOutOfRange { category: Category, value: i64 },
}

/// Key/value storage failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage read failed for '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("Storage write failed for '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("Unparsable data under '{key}': {reason}")]
    Parse { key: String, reason: String },
}

/// Settings file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Settings file not found: {0}")]
    FileNotFound(String),

    #[error("Settings file is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    ValidationFailed(String),

    #[error("Settings I/O failed: {0}")]
    IoError(#[from] io::Error),
}

/// Outcome of a rejected quiz submission.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No identity is resolved; the user must sign in again.
    #[error("No active session")]
    NoSession,

    /// A submission is already in flight.
    #[error("A submission is already in progress")]
    Busy,

    /// The record was created and is shown, but could not be stored.
    #[error("Result could not be saved: {source}")]
    Persistence {
        record: Box<ResultRecord>,
        source: StorageError,
    },
}

/// Umbrella error surfaced to the presentation layer.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("Settings: {0}")]
    Settings(String),

    #[error("I/O: {0}")]
    Io(String),
}

impl AppError {
    /// Portuguese message for the end user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Auth(AuthError::MalformedToken(_)) => {
                "Erro ao processar login.".to_string()
            }
            AppError::Auth(AuthError::DomainNotAllowed { .. }) => {
                "Acesso restrito a e-mails institucionais.".to_string()
            }
            AppError::Validation(v) | AppError::Submit(SubmitError::Validation(v)) => {
                validation_message(v)
            }
            AppError::Submit(SubmitError::NoSession) => {
                "Erro de sessão. Por favor, faça login novamente.".to_string()
            }
            AppError::Submit(SubmitError::Busy) => "Salvando...".to_string(),
            AppError::Submit(SubmitError::Persistence { .. }) | AppError::Storage(_) => {
                "Erro ao salvar os dados. Tente novamente.".to_string()
            }
            AppError::Settings(msg) => format!("Configuração inválida: {}", msg),
            AppError::Io(msg) => format!("Falha de leitura ou escrita: {}", msg),
        }
    }
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::MissingName => "Por favor, digite seu nome.".to_string(),
        ValidationError::InvalidSum { total } => format!(
            "A soma das alternativas deve ser exatamente 16. O total atual é {}.",
            total
        ),
        ValidationError::ScoreOutOfRange { category, value } => format!(
            "A pontuação de {} deve estar entre 0 e 16. Valor informado: {}.",
            category, value
        ),
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Settings(e.to_string())
    }
}

/// Result alias for the binary and other top-level callers.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

//! Unified error handling for Atelier Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

pub use crate::domain::ErrorCategory;

/// Root error type for Atelier Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AtelierError {
    /// Engine rule violations (unknown component, bad specifier, ...).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Orchestration failures (history backend, filesystem, cache).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl AtelierError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Run: atelier config list to inspect the effective settings".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in Atelier".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::CacheLockError | ApplicationError::HistoryError { .. })
        )
    }

    pub fn history(reason: impl Into<String>) -> Self {
        Self::Application(ApplicationError::HistoryError {
            reason: reason.into(),
        })
    }
}

/// Convenient result type alias.
pub type AtelierResult<T> = Result<T, AtelierError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> AtelierResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> AtelierResult<T> {
        self.map_err(|e| AtelierError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

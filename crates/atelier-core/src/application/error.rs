//! Application layer errors.
//!
//! These errors represent failures in orchestration, not engine rules.
//! Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Scaffold output already holds files and overwrite was not requested.
    #[error("Output directory {path} is not empty")]
    OutputNotEmpty { path: PathBuf },

    /// A scaffold write failed partway through.
    #[error(
        "Scaffold write failed ({} written, {} not written): {reason}",
        .written.len(),
        .not_written.len()
    )]
    PartialScaffoldWrite {
        written: Vec<String>,
        not_written: Vec<String>,
        rolled_back: bool,
        reason: String,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The history backend failed (process, parse or I/O).
    #[error("History backend error: {reason}")]
    HistoryError { reason: String },

    /// Snapshot cache access failed (lock poisoned).
    #[error("Snapshot cache error")]
    CacheLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::OutputNotEmpty { path } => vec![
                format!("Directory already has content: {}", path.display()),
                "Use --overwrite to write into it anyway".into(),
                "Or choose a different output path".into(),
            ],
            Self::PartialScaffoldWrite {
                not_written,
                rolled_back,
                reason,
                ..
            } => {
                let mut out = vec![format!("Cause: {reason}")];
                if !rolled_back && !not_written.is_empty() {
                    out.push(format!("Not written: {}", not_written.join(", ")));
                }
                out
            }
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::HistoryError { .. } => vec![
                "Check that project_root points at the source repository".into(),
                "Try: atelier --backend worktree to read the working tree directly".into(),
            ],
            Self::CacheLockError => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::OutputNotEmpty { .. } => ErrorCategory::Conflict,
            Self::HistoryError { .. } => ErrorCategory::Configuration,
            Self::PartialScaffoldWrite { .. }
            | Self::FilesystemError { .. }
            | Self::CacheLockError => ErrorCategory::Internal,
        }
    }
}

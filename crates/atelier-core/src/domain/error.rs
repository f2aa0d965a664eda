// ============================================================================
// domain/error.rs - ENGINE ERROR TAXONOMY
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant names the offending identifier or specifier so a caller
/// never has to surface a generic failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Unknown property '{0}'")]
    UnknownProperty(String),

    #[error("Unknown scaffold template '{0}'")]
    UnknownTemplate(String),

    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("Invalid version range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },

    #[error("Invalid redaction rule '{pattern}': {reason}")]
    InvalidRedactionRule { pattern: String, reason: String },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("Component '{name}' not found")]
    ComponentNotFound { name: String },

    #[error("Component '{name}' exists but is excluded by redaction rules")]
    ComponentRestricted { name: String },

    #[error("File '{path}' not found")]
    FileNotFound { path: String },

    #[error("File '{path}' exists but is excluded by redaction rules")]
    FileRestricted { path: String },

    #[error("Version '{version}' not found")]
    VersionNotFound { version: String },

    // ========================================================================
    // Conflict Errors (409-level equivalent)
    // ========================================================================
    #[error("Version '{version}' is ambiguous; candidates: {}", .candidates.join(", "))]
    AmbiguousVersion {
        version: String,
        candidates: Vec<String>,
    },

    #[error("Duplicate identity '{identity}' in category '{category}': '{first}' and '{second}'")]
    DuplicateIdentity {
        category: String,
        identity: String,
        first: String,
        second: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownCategory(_) => vec![
                "Valid categories: sections, navigation, animations, ui, cosmic, magicui, experiments, all".into(),
            ],
            Self::UnknownProperty(_) => vec![
                "Valid properties: colors, animations, borders, spacing, fonts, all".into(),
            ],
            Self::UnknownTemplate(_) => {
                vec!["Valid templates: full-project, minimal-landing".into()]
            }
            Self::InvalidQuery { .. } => vec!["Provide a non-empty search query".into()],
            Self::InvalidRange { .. } => vec![
                "Ranges use the form <from>..<to>, e.g. v1.0.0..v1.2.0".into(),
            ],
            Self::ComponentNotFound { name } => vec![
                format!("No component named '{name}' in this version"),
                "Try: atelier list, or atelier search <query>".into(),
            ],
            Self::ComponentRestricted { name } => vec![
                format!("'{name}' matches an exclusion rule and cannot be emitted"),
            ],
            Self::FileNotFound { path } => vec![
                format!("No tracked file '{path}' in this version"),
                "Paths are relative to the app root, e.g. tailwind.config.ts or lib/utils.ts".into(),
            ],
            Self::FileRestricted { path } => vec![
                format!("'{path}' matches an exclusion rule and cannot be emitted"),
            ],
            Self::VersionNotFound { version } => vec![
                format!("'{version}' is neither a known tag nor a revision"),
                "Try: atelier changelog to list revisions".into(),
            ],
            Self::AmbiguousVersion { candidates, .. } => vec![
                "Use a longer revision prefix".into(),
                format!("Candidates: {}", candidates.join(", ")),
            ],
            Self::DuplicateIdentity { first, second, .. } => vec![
                format!("Rename '{first}' or '{second}' so their identities differ"),
            ],
            Self::InvalidRedactionRule { .. } => vec![
                "Check the [redaction] section of your configuration".into(),
            ],
            Self::InvalidPath { .. } => vec!["Paths must be relative to the source tree".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidPath { .. }
            | Self::UnknownCategory(_)
            | Self::UnknownProperty(_)
            | Self::UnknownTemplate(_)
            | Self::InvalidQuery { .. }
            | Self::InvalidRange { .. } => ErrorCategory::Validation,
            Self::InvalidRedactionRule { .. } => ErrorCategory::Configuration,
            Self::ComponentNotFound { .. }
            | Self::ComponentRestricted { .. }
            | Self::FileNotFound { .. }
            | Self::FileRestricted { .. }
            | Self::VersionNotFound { .. } => ErrorCategory::NotFound,
            Self::AmbiguousVersion { .. } | Self::DuplicateIdentity { .. } => {
                ErrorCategory::Conflict
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Configuration,
    Internal,
}

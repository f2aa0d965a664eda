//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `atelier-adapters` crate provides implementations.

use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::{HistoryEntry, RelativePath, RevisionId, ScaffoldTemplate};
use crate::error::AtelierResult;

/// Bounds for a history walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    /// Newest revision to include.
    pub until: RevisionId,
    /// Entries reachable from this revision are left out.
    pub since: Option<RevisionId>,
    /// Only entries touching at least one of these paths; empty means all.
    pub paths: Vec<RelativePath>,
    pub max_depth: usize,
}

/// Port for versioned source history.
///
/// Implemented by:
/// - `atelier_adapters::history::GitHistory` (a git repository)
/// - `atelier_adapters::history::WorktreeHistory` (plain directory, one revision)
/// - `atelier_adapters::history::MemoryHistory` (testing)
///
/// ## Design Notes
///
/// - Paths are relative to the project root and normalized, even when the
///   root is a subdirectory of a larger repository
/// - `read_files` is only ever called with paths that passed exclusion
/// - Implementations may block on processes or disk; callers treat every
///   method as blocking
#[cfg_attr(test, mockall::automock)]
pub trait HistorySource: Send + Sync {
    /// Most recent revision, or `None` for an empty history.
    fn head(&self) -> AtelierResult<Option<RevisionId>>;

    /// Revision a tag points at.
    fn tag(&self, name: &str) -> AtelierResult<Option<RevisionId>>;

    /// Every revision whose identifier starts with `prefix`.
    fn revisions_with_prefix(&self, prefix: &str) -> AtelierResult<Vec<RevisionId>>;

    /// All `(tag, revision)` pairs.
    fn tags(&self) -> AtelierResult<Vec<(String, RevisionId)>>;

    /// Every tracked path at `revision`.
    fn list_paths(&self, revision: &RevisionId) -> AtelierResult<Vec<RelativePath>>;

    /// Content of `paths` at `revision`. Missing paths are omitted.
    fn read_files(
        &self,
        revision: &RevisionId,
        paths: &[RelativePath],
    ) -> AtelierResult<BTreeMap<RelativePath, Vec<u8>>>;

    /// History entries, newest first.
    fn log(&self, query: &LogQuery) -> AtelierResult<Vec<HistoryEntry>>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `atelier_adapters::filesystem::LocalFilesystem` (production)
/// - `atelier_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> AtelierResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> AtelierResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory with at least one entry.
    fn is_nonempty_dir(&self, path: &Path) -> AtelierResult<bool>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> AtelierResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> AtelierResult<()>;
}

/// A shared configuration file every scaffold of a template receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedArtifact {
    /// Output path, also looked up under the source tree's app root.
    pub path: RelativePath,
    /// Used when the source tree has no file at `path`.
    pub fallback: String,
}

/// Port for the fixed set of shared scaffold artifacts.
///
/// Implemented by:
/// - `atelier_adapters::shared_artifacts::BuiltinArtifacts`
pub trait SharedArtifactSource: Send + Sync {
    fn artifacts(&self, template: ScaffoldTemplate) -> Vec<SharedArtifact>;
}

//! Working-tree history: a plain directory with exactly one revision.
//!
//! The revision identifier is a digest of every file's path, size and
//! modification time, so it changes whenever the tree does. Reads against
//! a stale identifier fail instead of mixing two states of the tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use atelier_core::{
    application::{ApplicationError, ports::{HistorySource, LogQuery}},
    domain::{HistoryEntry, RelativePath, RevisionId},
    error::{AtelierError, AtelierResult},
};

/// Directories never worth walking.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", ".next", "target"];

/// History source over an unversioned directory.
#[derive(Debug, Clone)]
pub struct WorktreeHistory {
    root: PathBuf,
}

struct TreeState {
    id: RevisionId,
    paths: Vec<RelativePath>,
    newest: Option<SystemTime>,
}

impl WorktreeHistory {
    pub fn new(root: impl Into<PathBuf>) -> AtelierResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(AtelierError::history(format!(
                "source directory not found: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn scan(&self) -> AtelierResult<TreeState> {
        let mut entries: Vec<(RelativePath, u64, Option<SystemTime>)> = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_skipped(e));

        for entry in walker {
            let entry = entry.map_err(|e| AtelierError::history(format!("directory walk error: {e}")))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let Ok(path) = RelativePath::try_new(relative.to_string_lossy()) else {
                warn!(path = %relative.display(), "Skipping unrepresentable path");
                continue;
            };
            let metadata = entry
                .metadata()
                .map_err(|e| AtelierError::history(format!("cannot stat {path}: {e}")))?;
            entries.push((path, metadata.len(), metadata.modified().ok()));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut hasher = blake3::Hasher::new();
        for (path, len, modified) in &entries {
            hasher.update(path.as_str().as_bytes());
            hasher.update(&len.to_le_bytes());
            let nanos = modified
                .and_then(|m| m.duration_since(SystemTime::UNIX_EPOCH).ok())
                .map(|d| d.as_nanos())
                .unwrap_or_default();
            hasher.update(&nanos.to_le_bytes());
        }
        let id = RevisionId::new(&hasher.finalize().to_hex().as_str()[..40]);
        debug!(files = entries.len(), snapshot = %id.short(), "Scanned working tree");

        Ok(TreeState {
            id,
            newest: entries.iter().filter_map(|e| e.2).max(),
            paths: entries.into_iter().map(|e| e.0).collect(),
        })
    }

    fn current(&self, revision: &RevisionId) -> AtelierResult<TreeState> {
        let state = self.scan()?;
        if &state.id != revision {
            return Err(AtelierError::history(format!(
                "working tree changed since snapshot {} was taken",
                revision.short()
            )));
        }
        Ok(state)
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

impl HistorySource for WorktreeHistory {
    fn head(&self) -> AtelierResult<Option<RevisionId>> {
        Ok(Some(self.scan()?.id))
    }

    fn tag(&self, _name: &str) -> AtelierResult<Option<RevisionId>> {
        Ok(None)
    }

    fn revisions_with_prefix(&self, prefix: &str) -> AtelierResult<Vec<RevisionId>> {
        let id = self.scan()?.id;
        Ok(if id.starts_with(prefix) { vec![id] } else { Vec::new() })
    }

    fn tags(&self) -> AtelierResult<Vec<(String, RevisionId)>> {
        Ok(Vec::new())
    }

    fn list_paths(&self, revision: &RevisionId) -> AtelierResult<Vec<RelativePath>> {
        Ok(self.current(revision)?.paths)
    }

    fn read_files(
        &self,
        revision: &RevisionId,
        paths: &[RelativePath],
    ) -> AtelierResult<BTreeMap<RelativePath, Vec<u8>>> {
        let mut files = BTreeMap::new();
        for path in paths {
            let absolute = self.root.join(path.as_str());
            match fs::read(&absolute) {
                Ok(bytes) => {
                    files.insert(path.clone(), bytes);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(ApplicationError::FilesystemError {
                        path: absolute,
                        reason: e.to_string(),
                    }
                    .into());
                }
            }
        }
        // A write between listing and reading would mix two states.
        self.current(revision)?;
        Ok(files)
    }

    fn log(&self, query: &LogQuery) -> AtelierResult<Vec<HistoryEntry>> {
        if query.since.as_ref() == Some(&query.until) {
            return Ok(Vec::new());
        }
        let state = self.current(&query.until)?;
        let timestamp = state
            .newest
            .map(DateTime::<Utc>::from)
            .unwrap_or_default();
        Ok(vec![HistoryEntry::new(state.id, timestamp, "working tree")])
    }
}

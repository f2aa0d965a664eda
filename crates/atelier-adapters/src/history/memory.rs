//! In-memory history: a linear list of commits with tags.
//!
//! Used by tests and demos. Each commit stores a full tree; revision
//! identifiers are blake3 digests chained through the parent, so they look
//! and behave like content-addressed hashes.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use atelier_core::{
    application::ports::{HistorySource, LogQuery},
    domain::{HistoryEntry, RelativePath, RevisionId},
    error::{AtelierError, AtelierResult},
};

/// Revision identifiers are cut to git's SHA-1 hex length.
const REVISION_LEN: usize = 40;

type Tree = BTreeMap<RelativePath, Vec<u8>>;

#[derive(Debug, Clone)]
struct Commit {
    id: RevisionId,
    message: String,
    timestamp: DateTime<Utc>,
    tree: Tree,
}

/// Linear in-memory history.
///
/// # Example
///
/// ```
/// use atelier_adapters::history::MemoryHistory;
///
/// let history = MemoryHistory::new()
///     .commit("add button", &[("homepage/components/ui/Button.tsx", "export {}")])
///     .tagged("v1.0.0");
/// assert_eq!(history.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    commits: Vec<Commit>,
    tags: BTreeMap<String, usize>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a commit that adds or replaces `files` on top of the previous tree.
    pub fn commit(self, message: &str, files: &[(&str, &str)]) -> Self {
        self.commit_with(message, |tree| {
            for (path, content) in files {
                tree.insert(RelativePath::new(path), content.as_bytes().to_vec());
            }
        })
    }

    /// Record a commit that deletes `paths`.
    pub fn commit_removing(self, message: &str, paths: &[&str]) -> Self {
        self.commit_with(message, |tree| {
            for path in paths {
                tree.remove(&RelativePath::new(path));
            }
        })
    }

    /// Record a commit whose tree is derived from the previous one by `edit`.
    pub fn commit_with(mut self, message: &str, edit: impl FnOnce(&mut Tree)) -> Self {
        let mut tree = self.commits.last().map(|c| c.tree.clone()).unwrap_or_default();
        edit(&mut tree);

        let mut hasher = blake3::Hasher::new();
        if let Some(parent) = self.commits.last() {
            hasher.update(parent.id.as_str().as_bytes());
        }
        hasher.update(message.as_bytes());
        for (path, content) in &tree {
            hasher.update(path.as_str().as_bytes());
            hasher.update(&[0]);
            hasher.update(content);
            hasher.update(&[0]);
        }
        let hex = hasher.finalize().to_hex();

        let index = self.commits.len() as i64;
        let epoch = Utc
            .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .single()
            .unwrap_or_default();

        self.commits.push(Commit {
            id: RevisionId::new(hex.as_str().chars().take(REVISION_LEN).collect::<String>()),
            message: message.to_string(),
            timestamp: epoch + Duration::days(index),
            tree,
        });
        self
    }

    /// Tag the most recent commit. No-op on an empty history.
    pub fn tagged(mut self, name: &str) -> Self {
        if let Some(last) = self.commits.len().checked_sub(1) {
            self.tags.insert(name.to_string(), last);
        }
        self
    }

    /// Identifier of the commit at `index` (0 is the oldest).
    pub fn revision(&self, index: usize) -> Option<&RevisionId> {
        self.commits.get(index).map(|c| &c.id)
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    fn index_of(&self, revision: &RevisionId) -> AtelierResult<usize> {
        self.commits
            .iter()
            .position(|c| &c.id == revision)
            .ok_or_else(|| AtelierError::history(format!("unknown revision {revision}")))
    }

    /// Whether commit `index` changed any path at or below `scope`.
    fn touches(&self, index: usize, scope: &[RelativePath]) -> bool {
        if scope.is_empty() {
            return true;
        }
        let empty = Tree::new();
        let current = &self.commits[index].tree;
        let previous = match index.checked_sub(1) {
            Some(i) => &self.commits[i].tree,
            None => &empty,
        };
        let in_scope = |p: &RelativePath| scope.iter().any(|s| p.starts_with(s));

        let changed = current
            .iter()
            .any(|(p, c)| in_scope(p) && previous.get(p) != Some(c));
        let removed = previous
            .keys()
            .any(|p| in_scope(p) && !current.contains_key(p));
        changed || removed
    }
}

impl HistorySource for MemoryHistory {
    fn head(&self) -> AtelierResult<Option<RevisionId>> {
        Ok(self.commits.last().map(|c| c.id.clone()))
    }

    fn tag(&self, name: &str) -> AtelierResult<Option<RevisionId>> {
        Ok(self.tags.get(name).map(|&i| self.commits[i].id.clone()))
    }

    fn revisions_with_prefix(&self, prefix: &str) -> AtelierResult<Vec<RevisionId>> {
        Ok(self
            .commits
            .iter()
            .filter(|c| c.id.starts_with(prefix))
            .map(|c| c.id.clone())
            .collect())
    }

    fn tags(&self) -> AtelierResult<Vec<(String, RevisionId)>> {
        Ok(self
            .tags
            .iter()
            .map(|(name, &i)| (name.clone(), self.commits[i].id.clone()))
            .collect())
    }

    fn list_paths(&self, revision: &RevisionId) -> AtelierResult<Vec<RelativePath>> {
        let index = self.index_of(revision)?;
        Ok(self.commits[index].tree.keys().cloned().collect())
    }

    fn read_files(
        &self,
        revision: &RevisionId,
        paths: &[RelativePath],
    ) -> AtelierResult<BTreeMap<RelativePath, Vec<u8>>> {
        let tree = &self.commits[self.index_of(revision)?].tree;
        Ok(paths
            .iter()
            .filter_map(|p| tree.get(p).map(|c| (p.clone(), c.clone())))
            .collect())
    }

    fn log(&self, query: &LogQuery) -> AtelierResult<Vec<HistoryEntry>> {
        let until = self.index_of(&query.until)?;
        // In a linear history everything at or before `since` is reachable from it.
        let floor = match &query.since {
            Some(since) => Some(self.index_of(since)?),
            None => None,
        };

        Ok((0..=until)
            .rev()
            .take_while(|&i| floor.is_none_or(|f| i > f))
            .filter(|&i| self.touches(i, &query.paths))
            .take(query.max_depth)
            .map(|i| {
                let c = &self.commits[i];
                HistoryEntry::new(c.id.clone(), c.timestamp, c.message.clone())
            })
            .collect())
    }
}

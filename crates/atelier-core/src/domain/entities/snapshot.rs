use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::common::RelativePath;

/// Fully qualified identifier of one point in history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RevisionId(String);

impl RevisionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 characters, for display.
    pub fn short(&self) -> &str {
        let end = self.0.char_indices().nth(12).map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable view of every admitted path's bytes at one revision.
///
/// `withheld` lists paths that were tracked but excluded before reading;
/// their content is never loaded, only their existence is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    id: RevisionId,
    files: BTreeMap<RelativePath, Vec<u8>>,
    withheld: BTreeSet<RelativePath>,
}

impl Snapshot {
    pub fn new(
        id: RevisionId,
        files: BTreeMap<RelativePath, Vec<u8>>,
        withheld: BTreeSet<RelativePath>,
    ) -> Self {
        Self {
            id,
            files,
            withheld,
        }
    }

    pub fn id(&self) -> &RevisionId {
        &self.id
    }

    pub fn files(&self) -> impl Iterator<Item = (&RelativePath, &[u8])> {
        self.files.iter().map(|(p, b)| (p, b.as_slice()))
    }

    pub fn get(&self, path: &RelativePath) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn withheld(&self) -> impl Iterator<Item = &RelativePath> {
        self.withheld.iter()
    }

    pub fn is_withheld(&self, path: &RelativePath) -> bool {
        self.withheld.contains(path)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// One history record: revision, timestamp, subject line, tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub revision: RevisionId,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl HistoryEntry {
    pub fn new(revision: RevisionId, timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            revision,
            timestamp,
            message: message.into(),
            tags: Vec::new(),
        }
    }
}

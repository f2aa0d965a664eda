use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use super::{common::RelativePath, component::ComponentRecord, snapshot::RevisionId};
use crate::domain::specs::SpecBundle;
use crate::domain::value_objects::Category;

/// Why a file is part of a blueprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileRole {
    Root,
    Auxiliary,
    /// Primary file of another catalogued component.
    Component,
    /// Any other local module (utilities, tokens, styles).
    Module,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlueprintFile {
    pub path: RelativePath,
    pub role: FileRole,
    pub content: String,
}

/// Target of a local reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EdgeTarget {
    Component {
        identity: String,
        category: Category,
        path: RelativePath,
    },
    Module {
        path: RelativePath,
    },
}

impl EdgeTarget {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::Component { path, .. } | Self::Module { path } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    pub from: RelativePath,
    pub to: EdgeTarget,
}

/// Non-fatal condition attached to a successful result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Warning {
    /// A local reference whose target is absent or redacted away.
    DanglingDependency { from: RelativePath, specifier: String },
    /// A file that could not be safely sanitized and was left out.
    RedactionExcluded { path: RelativePath, reason: String },
    /// Two scaffold sources wrote different content to one path.
    WriteConflict {
        path: RelativePath,
        previous: String,
        winner: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingDependency { from, specifier } => {
                write!(f, "dangling dependency '{specifier}' referenced from {from}")
            }
            Self::RedactionExcluded { path, reason } => {
                write!(f, "{path} excluded: {reason}")
            }
            Self::WriteConflict {
                path,
                previous,
                winner,
            } => write!(f, "{path}: '{winner}' overrides '{previous}'"),
        }
    }
}

/// A resolved, dependency-complete, redacted bundle for one component under
/// one snapshot.
///
/// Every path appears exactly once in `files`, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blueprint {
    pub snapshot: RevisionId,
    pub version: String,
    pub root: ComponentRecord,
    pub files: Vec<BlueprintFile>,
    pub edges: Vec<DependencyEdge>,
    pub external: BTreeSet<String>,
    pub specs: SpecBundle,
    pub warnings: Vec<Warning>,
    pub digest: String,
}

impl Blueprint {
    /// Assemble a blueprint and compute its content digest.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        snapshot: RevisionId,
        version: impl Into<String>,
        root: ComponentRecord,
        files: Vec<BlueprintFile>,
        edges: Vec<DependencyEdge>,
        external: BTreeSet<String>,
        specs: SpecBundle,
        warnings: Vec<Warning>,
    ) -> Self {
        let digest = digest_files(&snapshot, &files);
        Self {
            snapshot,
            version: version.into(),
            root,
            files,
            edges,
            external,
            specs,
            warnings,
            digest,
        }
    }

    pub fn file(&self, path: &RelativePath) -> Option<&BlueprintFile> {
        self.files.iter().find(|f| &f.path == path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &RelativePath> {
        self.files.iter().map(|f| &f.path)
    }
}

fn digest_files(snapshot: &RevisionId, files: &[BlueprintFile]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(snapshot.as_str().as_bytes());
    for file in files {
        hasher.update(&[0]);
        hasher.update(file.path.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(file.content.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

//! Engine request and result types.
//!
//! Requests carry already-parsed values; dispatchers parse user strings with
//! `FromStr` on the domain types so malformed input fails before any history
//! access. Results are `Serialize` and meant to be rendered verbatim.

use serde::Serialize;
use std::path::PathBuf;

use crate::domain::{
    CategoryFilter, CategoryGroups, HistoryEntry, PropertySelector, RelativePath, RevisionId,
    ScaffoldTemplate, SearchFilters, SearchHit, SpecBundle, VersionRange, VersionRef,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub name: String,
    pub version: VersionRef,
    pub include_dependencies: bool,
}

impl ResolveRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: VersionRef::Latest,
            include_dependencies: true,
        }
    }

    pub fn at(mut self, version: VersionRef) -> Self {
        self.version = version;
        self
    }

    pub fn without_dependencies(mut self) -> Self {
        self.include_dependencies = false;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub category: CategoryFilter,
    pub version: VersionRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentListing {
    pub snapshot: RevisionId,
    pub version: String,
    pub total: usize,
    pub categories: CategoryGroups,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecsRequest {
    pub name: String,
    pub property: PropertySelector,
    pub version: VersionRef,
}

impl SpecsRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property: PropertySelector::All,
            version: VersionRef::Latest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecReport {
    pub component: String,
    pub snapshot: RevisionId,
    pub version: String,
    /// Files the properties were mined from.
    pub files: usize,
    pub specs: SpecBundle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogRequest {
    pub name: Option<String>,
    pub range: Option<VersionRange>,
}

/// History entries, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Changelog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Set when the walk stopped at the configured depth limit.
    pub truncated: bool,
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub filters: SearchFilters,
    pub version: VersionRef,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: SearchFilters::default(),
            version: VersionRef::Latest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub snapshot: RevisionId,
    pub hits: Vec<SearchHit>,
}

/// A tracked file addressed relative to the app root, e.g. `tailwind.config.ts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFileRequest {
    pub path: String,
    pub version: VersionRef,
}

impl ReadFileRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: VersionRef::Latest,
        }
    }

    pub fn at(mut self, version: VersionRef) -> Self {
        self.version = version;
        self
    }
}

/// Redacted content of one tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedFile {
    /// Relative to the app root, as requested.
    pub path: RelativePath,
    pub snapshot: RevisionId,
    pub version: String,
    /// Qualified name when the file is a component's primary file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    pub template: ScaffoldTemplate,
    pub components: Vec<String>,
    pub output: PathBuf,
    pub version: VersionRef,
    pub overwrite: bool,
    pub dry_run: bool,
}

impl ScaffoldRequest {
    pub fn new(
        template: ScaffoldTemplate,
        components: impl IntoIterator<Item = impl Into<String>>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            template,
            components: components.into_iter().map(Into::into).collect(),
            output: output.into(),
            version: VersionRef::Latest,
            overwrite: false,
            dry_run: false,
        }
    }
}

//! Snapshot resolution and the per-revision cache.
//!
//! A [`SnapshotView`] bundles everything derived from one revision: the raw
//! snapshot, the redacted sources, the catalog and assembled blueprints.
//! Views are built outside any lock and published whole; the cache only
//! ever grows, so a reader never sees a half-built view.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::HistorySource},
    domain::{
        Blueprint, Catalog, DomainError, RedactionPolicy, RelativePath, RevisionId, Snapshot,
        SourceLayout, VersionRef, Warning,
    },
    error::AtelierResult,
};

/// Everything derived from one pinned revision.
#[derive(Debug)]
pub struct SnapshotView {
    snapshot: Snapshot,
    sources: BTreeMap<RelativePath, String>,
    exclusions: BTreeMap<RelativePath, Warning>,
    catalog: Catalog,
    blueprints: RwLock<HashMap<(String, bool), Arc<Blueprint>>>,
}

impl SnapshotView {
    /// Sanitize a snapshot and index its components.
    pub fn build(
        snapshot: Snapshot,
        layout: &SourceLayout,
        policy: &RedactionPolicy,
    ) -> Result<Self, DomainError> {
        let mut sources = BTreeMap::new();
        let mut exclusions = BTreeMap::new();
        for (path, bytes) in snapshot.files() {
            match policy.sanitize(path, bytes) {
                Ok(text) => {
                    sources.insert(path.clone(), text);
                }
                Err(warning) => {
                    exclusions.insert(path.clone(), warning);
                }
            }
        }

        let withheld: Vec<&RelativePath> =
            snapshot.withheld().chain(exclusions.keys()).collect();
        let catalog = Catalog::build(layout, sources.keys(), withheld)?;

        Ok(Self {
            snapshot,
            sources,
            exclusions,
            catalog,
            blueprints: RwLock::new(HashMap::new()),
        })
    }

    pub fn id(&self) -> &RevisionId {
        self.snapshot.id()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Redacted text of an admitted file.
    pub fn source(&self, path: &RelativePath) -> Option<&str> {
        self.sources.get(path).map(String::as_str)
    }

    pub fn sources(&self) -> impl Iterator<Item = (&RelativePath, &str)> {
        self.sources.iter().map(|(p, s)| (p, s.as_str()))
    }

    /// Why a tracked file was withheld after reading, if it was.
    pub fn exclusion(&self, path: &RelativePath) -> Option<&Warning> {
        self.exclusions.get(path)
    }

    pub fn is_excluded(&self, path: &RelativePath) -> bool {
        self.exclusions.contains_key(path)
    }

    /// Tracked but never emitted, whether withheld by path or by content.
    pub fn is_restricted(&self, path: &RelativePath) -> bool {
        self.snapshot.is_withheld(path) || self.is_excluded(path)
    }

    pub(crate) fn cached_blueprint(&self, key: &(String, bool)) -> AtelierResult<Option<Arc<Blueprint>>> {
        let cache = self
            .blueprints
            .read()
            .map_err(|_| ApplicationError::CacheLockError)?;
        Ok(cache.get(key).cloned())
    }

    pub(crate) fn publish_blueprint(
        &self,
        key: (String, bool),
        blueprint: Blueprint,
    ) -> AtelierResult<Arc<Blueprint>> {
        let mut cache = self
            .blueprints
            .write()
            .map_err(|_| ApplicationError::CacheLockError)?;
        Ok(cache.entry(key).or_insert_with(|| Arc::new(blueprint)).clone())
    }
}

/// Maps version specifiers to revisions and revisions to cached views.
pub struct SnapshotResolver {
    history: Arc<dyn HistorySource>,
    layout: SourceLayout,
    policy: RedactionPolicy,
    cache: RwLock<HashMap<RevisionId, Arc<SnapshotView>>>,
}

impl SnapshotResolver {
    pub fn new(history: Arc<dyn HistorySource>, layout: SourceLayout, policy: RedactionPolicy) -> Self {
        Self {
            history,
            layout,
            policy,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn layout(&self) -> &SourceLayout {
        &self.layout
    }

    pub fn history(&self) -> &Arc<dyn HistorySource> {
        &self.history
    }

    /// Resolve a specifier to a fully qualified revision.
    ///
    /// Revision prefixes that match nothing are retried as tag names, so a
    /// hex-looking tag such as `cafe` still resolves.
    #[instrument(skip(self), fields(version = %version))]
    pub fn resolve_revision(&self, version: &VersionRef) -> AtelierResult<RevisionId> {
        let not_found = || DomainError::VersionNotFound {
            version: version.to_string(),
        };

        match version {
            VersionRef::Latest => Ok(self.history.head()?.ok_or_else(not_found)?),
            VersionRef::Tag(name) => Ok(self.history.tag(name)?.ok_or_else(not_found)?),
            VersionRef::Revision(prefix) => {
                let mut matches = self.history.revisions_with_prefix(prefix)?;
                match matches.len() {
                    0 => Ok(self.history.tag(prefix)?.ok_or_else(not_found)?),
                    1 => Ok(matches.remove(0)),
                    _ => {
                        matches.sort();
                        Err(DomainError::AmbiguousVersion {
                            version: prefix.clone(),
                            candidates: matches.iter().map(|r| r.short().to_string()).collect(),
                        }
                        .into())
                    }
                }
            }
        }
    }

    /// Resolve a specifier and return its view, loading it on first use.
    pub fn pin(&self, version: &VersionRef) -> AtelierResult<Arc<SnapshotView>> {
        let revision = self.resolve_revision(version)?;
        self.view(&revision)
    }

    /// View for an already-resolved revision.
    pub fn view(&self, revision: &RevisionId) -> AtelierResult<Arc<SnapshotView>> {
        {
            let cache = self
                .cache
                .read()
                .map_err(|_| ApplicationError::CacheLockError)?;
            if let Some(view) = cache.get(revision) {
                debug!(snapshot = %revision.short(), "Snapshot cache hit");
                return Ok(Arc::clone(view));
            }
        }

        let view = Arc::new(self.load(revision)?);

        let mut cache = self
            .cache
            .write()
            .map_err(|_| ApplicationError::CacheLockError)?;
        Ok(Arc::clone(cache.entry(revision.clone()).or_insert(view)))
    }

    pub fn cached_revisions(&self) -> AtelierResult<usize> {
        Ok(self
            .cache
            .read()
            .map_err(|_| ApplicationError::CacheLockError)?
            .len())
    }

    #[instrument(skip(self), fields(snapshot = %revision.short()))]
    fn load(&self, revision: &RevisionId) -> AtelierResult<SnapshotView> {
        let mut admitted = Vec::new();
        let mut withheld = BTreeSet::new();
        for path in self.history.list_paths(revision)? {
            if !self.layout.is_tracked(&path) {
                continue;
            }
            if self.policy.is_excluded(&path) {
                withheld.insert(path);
            } else {
                admitted.push(path);
            }
        }

        let files = self.history.read_files(revision, &admitted)?;
        let snapshot = Snapshot::new(revision.clone(), files, withheld);
        let view = SnapshotView::build(snapshot, &self.layout, &self.policy)?;

        info!(
            files = view.sources.len(),
            withheld = view.snapshot.withheld().count(),
            excluded = view.exclusions.len(),
            components = view.catalog.len(),
            "Snapshot loaded"
        );
        Ok(view)
    }
}

//! The engine facade: one method per operation.
//!
//! Every operation pins exactly one snapshot up front and reads only from
//! that view, so concurrent callers never observe a mix of revisions.

use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument};

use super::{
    requests::{
        Changelog, ChangelogRequest, ComponentListing, ListRequest, ReadFileRequest,
        ResolveRequest, ScaffoldRequest, SearchRequest, SearchResults, SpecReport, SpecsRequest,
        TrackedFile,
    },
    scaffold_service::ScaffoldService,
    snapshot_service::{SnapshotResolver, SnapshotView},
};
use crate::{
    application::ports::LogQuery,
    domain::{
        Blueprint, BlueprintFile, ComponentRecord, ComponentRef, DomainError, FileRole,
        PropertySelector,
        Reference, RelativePath, RevisionId, ScaffoldReport, SearchQuery, SpecBundle, VersionRef,
        Warning,
        dependency::{self, ModuleResolver},
        search::{self, Candidate},
    },
    error::AtelierResult,
};

/// Default bound on history walks.
pub const DEFAULT_MAX_DEPTH: usize = 500;

pub struct AtelierEngine {
    resolver: SnapshotResolver,
    scaffolder: ScaffoldService,
    max_depth: usize,
}

impl AtelierEngine {
    pub fn new(resolver: SnapshotResolver, scaffolder: ScaffoldService) -> Self {
        Self {
            resolver,
            scaffolder,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn resolver(&self) -> &SnapshotResolver {
        &self.resolver
    }

    /// Resolve one component into a redacted, dependency-complete blueprint.
    #[instrument(skip(self, request), fields(component = %request.name, version = %request.version))]
    pub fn resolve_component(&self, request: &ResolveRequest) -> AtelierResult<Blueprint> {
        let view = self.resolver.pin(&request.version)?;
        self.blueprint(
            &view,
            &request.name,
            &request.version,
            request.include_dependencies,
        )
    }

    /// Identities grouped by category, in traversal order.
    #[instrument(skip(self, request), fields(version = %request.version))]
    pub fn list_components(&self, request: &ListRequest) -> AtelierResult<ComponentListing> {
        let view = self.resolver.pin(&request.version)?;
        let categories = view.catalog().grouped(request.category);
        Ok(ComponentListing {
            snapshot: view.id().clone(),
            version: request.version.to_string(),
            total: categories.total(),
            categories,
        })
    }

    /// Design properties across every file of the component's blueprint.
    #[instrument(skip(self, request), fields(component = %request.name, version = %request.version))]
    pub fn get_specs(&self, request: &SpecsRequest) -> AtelierResult<SpecReport> {
        let view = self.resolver.pin(&request.version)?;
        let blueprint = self.blueprint(&view, &request.name, &request.version, true)?;
        let specs = SpecBundle::extract(
            request.property,
            blueprint.files.iter().map(|f| f.content.as_str()),
        );
        Ok(SpecReport {
            component: blueprint.root.qualified_name(),
            snapshot: blueprint.snapshot,
            version: request.version.to_string(),
            files: blueprint.files.len(),
            specs,
        })
    }

    /// History entries, newest first, optionally scoped to one component.
    ///
    /// The component's paths are taken from the snapshot at the upper end of
    /// the range. Entries carry the tags that point at them.
    #[instrument(skip(self, request), fields(component = ?request.name))]
    pub fn get_changelog(&self, request: &ChangelogRequest) -> AtelierResult<Changelog> {
        let (until, since) = match &request.range {
            Some(range) => (
                self.resolver.resolve_revision(&range.to)?,
                Some(self.resolver.resolve_revision(&range.from)?),
            ),
            None => (self.resolver.resolve_revision(&VersionRef::Latest)?, None),
        };

        let (component, paths) = match &request.name {
            Some(name) => {
                let view = self.resolver.view(&until)?;
                let record = view.catalog().find(&ComponentRef::parse(name)?)?;
                (
                    Some(record.qualified_name()),
                    record.paths().cloned().collect(),
                )
            }
            None => {
                let app_root = &self.resolver.layout().app_root;
                let paths = if app_root.is_empty() {
                    Vec::new()
                } else {
                    vec![app_root.clone()]
                };
                (None, paths)
            }
        };

        // One extra entry tells a history of exactly `max_depth` apart from a longer one.
        let history = self.resolver.history();
        let mut entries = history.log(&LogQuery {
            until,
            since,
            paths,
            max_depth: self.max_depth + 1,
        })?;
        let truncated = entries.len() > self.max_depth;
        entries.truncate(self.max_depth);

        let mut tags: HashMap<RevisionId, Vec<String>> = HashMap::new();
        for (name, revision) in history.tags()? {
            tags.entry(revision).or_default().push(name);
        }
        for entry in &mut entries {
            if let Some(names) = tags.get(&entry.revision) {
                entry.tags = names.clone();
                entry.tags.sort();
            }
        }

        info!(entries = entries.len(), truncated, "Changelog collected");

        Ok(Changelog {
            component,
            range: request.range.as_ref().map(ToString::to_string),
            truncated,
            entries,
        })
    }

    /// Rank every catalog entry against a free-text query.
    #[instrument(skip(self, request), fields(query = %request.query, version = %request.version))]
    pub fn search(&self, request: &SearchRequest) -> AtelierResult<SearchResults> {
        let query = SearchQuery::new(&request.query, request.filters.clone())?;
        let view = self.resolver.pin(&request.version)?;
        let layout = self.resolver.layout();

        let prepared: Vec<(&ComponentRecord, String, BTreeSet<String>)> = view
            .catalog()
            .records()
            .iter()
            .map(|record| {
                let content = record
                    .paths()
                    .filter_map(|p| view.source(p))
                    .collect::<Vec<_>>()
                    .join("\n");
                let external = dependency::closure(
                    layout,
                    view.catalog(),
                    record,
                    |p| view.source(p),
                    false,
                )
                .external;
                (record, content, external)
            })
            .collect();

        let hits = search::rank(
            &query,
            prepared.iter().map(|(record, content, external)| Candidate {
                record: *record,
                content: content.as_str(),
                external,
            }),
        );
        debug!(hits = hits.len(), "Search ranked");

        Ok(SearchResults {
            query: query.text().to_string(),
            snapshot: view.id().clone(),
            hits,
        })
    }

    /// Redacted content of one tracked file, such as a config file or a
    /// `lib/` module, addressed relative to the app root.
    #[instrument(skip(self, request), fields(path = %request.path, version = %request.version))]
    pub fn read_file(&self, request: &ReadFileRequest) -> AtelierResult<TrackedFile> {
        let relative = RelativePath::try_new(&request.path)?;
        if relative.is_empty() {
            return Err(DomainError::InvalidPath {
                path: request.path.clone(),
                reason: "a file path is required".into(),
            }
            .into());
        }
        let full = self.resolver.layout().app_root.join(relative.as_str())?;

        let view = self.resolver.pin(&request.version)?;
        let Some(content) = view.source(&full) else {
            let path = relative.to_string();
            return Err(if view.is_restricted(&full) {
                DomainError::FileRestricted { path }
            } else {
                DomainError::FileNotFound { path }
            }
            .into());
        };

        Ok(TrackedFile {
            component: view.catalog().by_path(&full).map(ComponentRecord::qualified_name),
            path: relative,
            snapshot: view.id().clone(),
            version: request.version.to_string(),
            content: content.to_string(),
        })
    }

    /// Assemble blueprints and shared artifacts into an output tree.
    ///
    /// The output check runs before any history access, so a refused
    /// scaffold reads and writes nothing. A dry run returns the planned file
    /// list without touching the filesystem.
    #[instrument(skip(self, request), fields(template = %request.template, output = %request.output.display()))]
    pub fn create_scaffold(&self, request: &ScaffoldRequest) -> AtelierResult<ScaffoldReport> {
        self.scaffolder
            .check_output(&request.output, request.overwrite)?;

        let view = self.resolver.pin(&request.version)?;
        let blueprints = request
            .components
            .iter()
            .map(|name| self.blueprint(&view, name, &request.version, true))
            .collect::<AtelierResult<Vec<_>>>()?;

        let refs: Vec<&Blueprint> = blueprints.iter().collect();
        let plan = self.scaffolder.plan(
            &request.output,
            request.template,
            self.resolver.layout(),
            |p| view.source(p),
            &refs,
        );

        let mut warnings: Vec<Warning> = Vec::new();
        for warning in blueprints
            .iter()
            .flat_map(|b| b.warnings.iter())
            .chain(plan.conflicts())
        {
            if !warnings.contains(warning) {
                warnings.push(warning.clone());
            }
        }

        let files = if request.dry_run {
            plan.files().map(|f| f.path.clone()).collect()
        } else {
            self.scaffolder.write(&plan)?
        };

        info!(
            files = files.len(),
            warnings = warnings.len(),
            dry_run = request.dry_run,
            "Scaffold complete"
        );

        Ok(ScaffoldReport {
            output: request.output.clone(),
            template: plan.template(),
            snapshot: view.id().clone(),
            components: blueprints.iter().map(|b| b.root.qualified_name()).collect(),
            files,
            dry_run: request.dry_run,
            warnings,
        })
    }

    /// Cached blueprint for `name` in `view`, labelled with `version`.
    fn blueprint(
        &self,
        view: &SnapshotView,
        name: &str,
        version: &VersionRef,
        include_dependencies: bool,
    ) -> AtelierResult<Blueprint> {
        let record = view.catalog().find(&ComponentRef::parse(name)?)?;
        let key = (record.qualified_name(), include_dependencies);

        let shared = match view.cached_blueprint(&key)? {
            Some(hit) => {
                debug!(component = %key.0, "Blueprint cache hit");
                hit
            }
            None => {
                let built = self.assemble(view, record, include_dependencies);
                view.publish_blueprint(key, built)?
            }
        };

        let mut blueprint = (*shared).clone();
        blueprint.version = version.to_string();
        Ok(blueprint)
    }

    fn assemble(
        &self,
        view: &SnapshotView,
        record: &ComponentRecord,
        include_dependencies: bool,
    ) -> Blueprint {
        let layout = self.resolver.layout();
        let closure = dependency::closure(
            layout,
            view.catalog(),
            record,
            |p| view.source(p),
            include_dependencies,
        );

        let files: Vec<BlueprintFile> = closure
            .files
            .iter()
            .filter_map(|(path, role)| {
                view.source(path).map(|content| BlueprintFile {
                    path: path.clone(),
                    role: *role,
                    content: content.to_string(),
                })
            })
            .collect();

        let specs = SpecBundle::extract(
            PropertySelector::All,
            files
                .iter()
                .filter(|f| matches!(f.role, FileRole::Root | FileRole::Auxiliary))
                .map(|f| f.content.as_str()),
        );

        // A dangling reference may point at a file dropped during sanitizing.
        let excluded = ModuleResolver::new(layout, |p: &RelativePath| view.is_excluded(p));
        let mut warnings = closure.warnings.clone();
        for warning in &closure.warnings {
            let Warning::DanglingDependency { from, specifier } = warning else {
                continue;
            };
            if let Reference::Local(target) = excluded.resolve(from, specifier) {
                if let Some(note) = view.exclusion(&target) {
                    if !warnings.contains(note) {
                        warnings.push(note.clone());
                    }
                }
            }
        }

        debug!(
            component = %record.qualified_name(),
            files = files.len(),
            edges = closure.edges.len(),
            "Blueprint assembled"
        );

        Blueprint::new(
            view.id().clone(),
            VersionRef::Latest.to_string(),
            record.clone(),
            files,
            closure.edges,
            closure.external,
            specs,
            warnings,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::application::ports::{Filesystem, HistorySource, SharedArtifact, SharedArtifactSource};
    use crate::domain::{
        Category, CategoryFilter, DomainError, HistoryEntry, MatchTier, PropertyKind,
        RedactionPolicy, ScaffoldTemplate, SearchFilters, SourceLayout, VersionRange,
    };
    use crate::error::AtelierError;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    /// Two linear commits; `v1` tags the first.
    struct TwoCommits {
        trees: Vec<(RevisionId, BTreeMap<RelativePath, Vec<u8>>)>,
    }

    impl TwoCommits {
        fn new() -> Self {
            let first: BTreeMap<RelativePath, Vec<u8>> = [
                (
                    "homepage/components/ui/HeroSection.tsx",
                    "import { CosmicButton } from '@/components/cosmic/CosmicButton'\n\
                     import { tokens } from '../../lib/design-tokens'\n\
                     import { motion } from 'framer-motion'\n\
                     // layout drafted in MyMarky\n\
                     export const HeroSection = () => <div className=\"bg-blue-500 p-4\" />",
                ),
                (
                    "homepage/components/cosmic/CosmicButton.tsx",
                    "import './missing'\nexport const CosmicButton = () => <button className=\"rounded-lg animate-pulse\" />",
                ),
                (
                    "homepage/lib/design-tokens.ts",
                    "export const tokens = { radius: 'rounded-xl' }",
                ),
                ("homepage/components/ui/Navbar.tsx", "export const Navbar = () => <nav />"),
            ]
            .into_iter()
            .map(|(p, c)| (RelativePath::new(p), c.as_bytes().to_vec()))
            .collect();

            let mut second = first.clone();
            second.insert(
                RelativePath::new("homepage/components/ui/Navbar.tsx"),
                b"export const Navbar = () => <nav className=\"text-lg\" />".to_vec(),
            );

            Self {
                trees: vec![
                    (RevisionId::new("aaaa000000000000"), first),
                    (RevisionId::new("bbbb000000000000"), second),
                ],
            }
        }

        fn tree(&self, revision: &RevisionId) -> AtelierResult<&BTreeMap<RelativePath, Vec<u8>>> {
            self.trees
                .iter()
                .find(|(id, _)| id == revision)
                .map(|(_, t)| t)
                .ok_or_else(|| {
                    ApplicationError::HistoryError {
                        reason: format!("unknown revision {revision}"),
                    }
                    .into()
                })
        }
    }

    impl HistorySource for TwoCommits {
        fn head(&self) -> AtelierResult<Option<RevisionId>> {
            Ok(self.trees.last().map(|(id, _)| id.clone()))
        }

        fn tag(&self, name: &str) -> AtelierResult<Option<RevisionId>> {
            Ok((name == "v1").then(|| self.trees[0].0.clone()))
        }

        fn revisions_with_prefix(&self, prefix: &str) -> AtelierResult<Vec<RevisionId>> {
            Ok(self
                .trees
                .iter()
                .filter(|(id, _)| id.starts_with(prefix))
                .map(|(id, _)| id.clone())
                .collect())
        }

        fn tags(&self) -> AtelierResult<Vec<(String, RevisionId)>> {
            Ok(vec![("v1".into(), self.trees[0].0.clone())])
        }

        fn list_paths(&self, revision: &RevisionId) -> AtelierResult<Vec<RelativePath>> {
            Ok(self.tree(revision)?.keys().cloned().collect())
        }

        fn read_files(
            &self,
            revision: &RevisionId,
            paths: &[RelativePath],
        ) -> AtelierResult<BTreeMap<RelativePath, Vec<u8>>> {
            let tree = self.tree(revision)?;
            Ok(paths
                .iter()
                .filter_map(|p| tree.get(p).map(|c| (p.clone(), c.clone())))
                .collect())
        }

        fn log(&self, query: &LogQuery) -> AtelierResult<Vec<HistoryEntry>> {
            let touches_navbar = |i: usize| i == 1;
            let mut out = Vec::new();
            for (i, (id, _)) in self.trees.iter().enumerate().rev() {
                if out.len() == query.max_depth {
                    break;
                }
                if query.since.as_ref() == Some(id) {
                    break;
                }
                if i > self.trees.iter().position(|(t, _)| t == &query.until).unwrap_or(0) {
                    continue;
                }
                let scoped_elsewhere = query
                    .paths
                    .iter()
                    .all(|p| !p.as_str().contains("Navbar") && p.as_str() != "homepage");
                if !query.paths.is_empty() && scoped_elsewhere && touches_navbar(i) {
                    continue;
                }
                out.push(HistoryEntry::new(
                    id.clone(),
                    Utc.with_ymd_and_hms(2025, 1, 1 + i as u32, 0, 0, 0).unwrap(),
                    format!("commit {i}"),
                ));
            }
            Ok(out)
        }
    }

    #[derive(Default)]
    struct RecordingFs {
        written: Mutex<Vec<PathBuf>>,
        occupied: bool,
    }

    impl Filesystem for RecordingFs {
        fn create_dir_all(&self, _path: &Path) -> AtelierResult<()> {
            Ok(())
        }
        fn write_file(&self, path: &Path, _content: &str) -> AtelierResult<()> {
            self.written.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
        fn exists(&self, _path: &Path) -> bool {
            false
        }
        fn is_nonempty_dir(&self, _path: &Path) -> AtelierResult<bool> {
            Ok(self.occupied)
        }
        fn remove_file(&self, _path: &Path) -> AtelierResult<()> {
            Ok(())
        }
        fn remove_dir_all(&self, _path: &Path) -> AtelierResult<()> {
            Ok(())
        }
    }

    struct OneArtifact;

    impl SharedArtifactSource for OneArtifact {
        fn artifacts(&self, _template: ScaffoldTemplate) -> Vec<SharedArtifact> {
            vec![SharedArtifact {
                path: RelativePath::new("package.json"),
                fallback: "{}".into(),
            }]
        }
    }

    fn engine_with(fs: RecordingFs) -> AtelierEngine {
        let resolver = SnapshotResolver::new(
            Arc::new(TwoCommits::new()),
            SourceLayout::default(),
            RedactionPolicy::from_lists(&[], &[], &["MyMarky".into()]).unwrap(),
        );
        AtelierEngine::new(resolver, ScaffoldService::new(Box::new(fs), Box::new(OneArtifact)))
    }

    fn engine() -> AtelierEngine {
        engine_with(RecordingFs::default())
    }

    #[test]
    fn read_file_serves_redacted_tracked_files() {
        let engine = engine();
        let tokens = engine
            .read_file(&ReadFileRequest::new("lib/design-tokens.ts"))
            .unwrap();
        assert_eq!(tokens.path.as_str(), "lib/design-tokens.ts");
        assert_eq!(tokens.component, None);
        assert!(tokens.content.contains("rounded-xl"));
        assert_eq!(tokens.snapshot.short(), "bbbb00000000");

        let request = ReadFileRequest::new("components/ui/HeroSection.tsx")
            .at(VersionRef::Tag("v1".into()));
        let hero = engine.read_file(&request).unwrap();
        assert_eq!(hero.component.as_deref(), Some("sections/hero-section"));
        assert_eq!(hero.version, "v1");
        assert!(hero.content.contains("[REDACTED_TOOL]"));
        assert!(!hero.content.contains("MyMarky"));
    }

    #[test]
    fn read_file_rejects_missing_and_escaping_paths() {
        let engine = engine();
        assert!(matches!(
            engine.read_file(&ReadFileRequest::new("next.config.ts")),
            Err(AtelierError::Domain(DomainError::FileNotFound { path })) if path == "next.config.ts"
        ));
        assert!(matches!(
            engine.read_file(&ReadFileRequest::new("../README.md")),
            Err(AtelierError::Domain(DomainError::InvalidPath { .. }))
        ));
        assert!(matches!(
            engine.read_file(&ReadFileRequest::new("")),
            Err(AtelierError::Domain(DomainError::InvalidPath { .. }))
        ));
    }

    #[test]
    fn hero_section_pulls_its_closure() {
        let bp = engine()
            .resolve_component(&ResolveRequest::new("hero-section"))
            .unwrap();

        let paths: Vec<_> = bp.paths().map(|p| p.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "homepage/components/ui/HeroSection.tsx",
                "homepage/components/cosmic/CosmicButton.tsx",
                "homepage/lib/design-tokens.ts",
            ]
        );
        assert!(bp.external.contains("framer-motion"));
        assert_eq!(bp.edges.len(), 2);
        assert!(bp.warnings.iter().any(|w| matches!(
            w,
            Warning::DanglingDependency { specifier, .. } if specifier == "./missing"
        )));
        assert!(
            bp.files
                .iter()
                .all(|f| !f.content.contains("MyMarky"))
        );
        assert_eq!(bp.version, "latest");
    }

    #[test]
    fn resolution_is_deterministic_and_labelled() {
        let engine = engine();
        let a = engine
            .resolve_component(&ResolveRequest::new("hero-section"))
            .unwrap();
        let b = engine
            .resolve_component(&ResolveRequest::new("sections/hero-section").at("bbbb".parse().unwrap()))
            .unwrap();
        assert_eq!(a.digest, b.digest);
        assert_eq!(b.version, "bbbb");
    }

    #[test]
    fn without_dependencies_only_the_root_is_returned() {
        let bp = engine()
            .resolve_component(&ResolveRequest::new("hero-section").without_dependencies())
            .unwrap();
        assert_eq!(bp.files.len(), 1);
        assert!(bp.edges.is_empty());
        assert!(bp.external.contains("framer-motion"));
    }

    #[test]
    fn unknown_component_is_not_found() {
        let err = engine()
            .resolve_component(&ResolveRequest::new("ghost"))
            .unwrap_err();
        assert!(matches!(
            err,
            AtelierError::Domain(DomainError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn listing_is_stable_and_filtered() {
        let engine = engine();
        let request = ListRequest {
            category: CategoryFilter::Only(Category::Ui),
            version: VersionRef::Latest,
        };
        let first = engine.list_components(&request).unwrap();
        let second = engine.list_components(&request).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.categories.0.len(), 1);
        assert_eq!(first.total, 1);
    }

    #[test]
    fn specs_cover_the_whole_closure() {
        let report = engine()
            .get_specs(&SpecsRequest::new("hero-section"))
            .unwrap();
        assert_eq!(report.files, 3);
        let borders = report.specs.get(PropertyKind::Borders).unwrap();
        assert!(borders.contains("rounded-lg"));
        assert!(borders.contains("rounded-xl"));
        assert!(report.specs.get(PropertyKind::Fonts).unwrap().is_empty());
    }

    #[test]
    fn changelog_is_newest_first_with_tags() {
        let log = engine().get_changelog(&ChangelogRequest::default()).unwrap();
        let revs: Vec<_> = log.entries.iter().map(|e| e.revision.short()).collect();
        assert_eq!(revs, vec!["bbbb00000000", "aaaa00000000"]);
        assert_eq!(log.entries[1].tags, vec!["v1"]);
        assert!(!log.truncated);
    }

    #[test]
    fn changelog_range_and_component_scope() {
        let engine = engine();
        let ranged = engine
            .get_changelog(&ChangelogRequest {
                name: None,
                range: Some("v1..latest".parse::<VersionRange>().unwrap()),
            })
            .unwrap();
        assert_eq!(ranged.entries.len(), 1);
        assert_eq!(ranged.range.as_deref(), Some("v1..latest"));

        let scoped = engine
            .get_changelog(&ChangelogRequest {
                name: Some("hero-section".into()),
                range: None,
            })
            .unwrap();
        assert_eq!(scoped.component.as_deref(), Some("sections/hero-section"));
        assert_eq!(scoped.entries.len(), 1);
    }

    #[test]
    fn changelog_depth_limit_sets_truncated() {
        let log = engine()
            .with_max_depth(1)
            .get_changelog(&ChangelogRequest::default())
            .unwrap();
        assert!(log.truncated);
        assert_eq!(log.entries.len(), 1);
        assert_eq!(log.entries[0].revision.short(), "bbbb00000000");
    }

    #[test]
    fn history_of_exactly_max_depth_is_not_truncated() {
        let log = engine()
            .with_max_depth(2)
            .get_changelog(&ChangelogRequest::default())
            .unwrap();
        assert!(!log.truncated);
        assert_eq!(log.entries.len(), 2);
    }

    #[test]
    fn identity_beats_dependency_in_search() {
        let results = engine()
            .search(&SearchRequest::new("hero"))
            .unwrap();
        assert_eq!(results.hits[0].identity, "hero-section");
        assert_eq!(results.hits[0].tier, MatchTier::IdentitySubstring);

        let motion = engine().search(&SearchRequest::new("framer")).unwrap();
        assert_eq!(motion.hits.len(), 1);
        assert_eq!(motion.hits[0].identity, "hero-section");
        assert!(motion.hits[0].tier < MatchTier::IdentitySubstring);
    }

    #[test]
    fn search_filters_by_property() {
        let mut request = SearchRequest::new("export");
        request.filters = SearchFilters {
            has_property: Some(PropertyKind::Animations),
            ..Default::default()
        };
        let results = engine().search(&request).unwrap();
        let ids: Vec<_> = results.hits.iter().map(|h| h.identity.as_str()).collect();
        assert_eq!(ids, vec!["cosmic-button"]);
    }

    #[test]
    fn empty_query_is_invalid() {
        let err = engine().search(&SearchRequest::new("  ")).unwrap_err();
        assert!(matches!(
            err,
            AtelierError::Domain(DomainError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn scaffold_into_occupied_output_is_refused() {
        let engine = engine_with(RecordingFs {
            occupied: true,
            ..Default::default()
        });
        let request = ScaffoldRequest::new(
            ScaffoldTemplate::MinimalLanding,
            ["hero-section", "navbar"],
            "/out",
        );
        let err = engine.create_scaffold(&request).unwrap_err();
        assert!(matches!(
            err,
            AtelierError::Application(ApplicationError::OutputNotEmpty { .. })
        ));
    }

    #[test]
    fn scaffold_dry_run_plans_without_writing() {
        let mut request = ScaffoldRequest::new(
            ScaffoldTemplate::MinimalLanding,
            ["hero-section", "navbar"],
            "/out",
        );
        request.dry_run = true;
        let report = engine().create_scaffold(&request).unwrap();

        assert_eq!(report.components, vec!["sections/hero-section", "ui/navbar"]);
        assert!(report.files.contains(&RelativePath::new("package.json")));
        assert!(
            report
                .files
                .contains(&RelativePath::new("components/cosmic/CosmicButton.tsx"))
        );
        assert_eq!(report.files.len(), 5);
        assert!(report.dry_run);
    }

    #[test]
    fn scaffold_writes_every_planned_file() {
        let request = ScaffoldRequest::new(ScaffoldTemplate::FullProject, ["navbar"], "/out");
        let report = engine().create_scaffold(&request).unwrap();
        assert_eq!(
            report.files,
            vec![
                RelativePath::new("package.json"),
                RelativePath::new("components/ui/Navbar.tsx"),
            ]
        );
    }
}

//! End-to-end engine tests over the shipped adapters.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use atelier_adapters::{
    Backend, BuiltinArtifacts, GitHistory, LocalFilesystem, MemoryFilesystem, MemoryHistory,
    open_history,
};
use atelier_core::application::ports::{Filesystem, HistorySource};
use atelier_core::application::{
    ApplicationError, AtelierEngine, ChangelogRequest, ListRequest, ReadFileRequest,
    ResolveRequest, ScaffoldRequest, ScaffoldService, SearchRequest, SnapshotResolver,
};
use atelier_core::domain::{
    DomainError, RedactionPolicy, RelativePath, ScaffoldTemplate, SourceLayout, VersionRef,
    Warning,
};
use atelier_core::error::AtelierError;
use tempfile::TempDir;
use walkdir::WalkDir;

const CARD_V1: &str = "import { Button } from './Button'\n\
import { keys } from '../../lib/secrets/keys'\n\
import { blob } from '../../lib/blob'\n\
const apiKey = 'api_key_abc123'\n\
export const Card = () => <div className=\"rounded-md p-2\"><Button /></div>";

fn history() -> MemoryHistory {
    MemoryHistory::new()
        .commit(
            "initial components",
            &[
                ("homepage/components/ui/Button.tsx", "export const Button = () => <button />"),
                ("homepage/components/ui/Card.tsx", CARD_V1),
                ("homepage/components/ui/Internal.tsx", "export const Internal = 1"),
                ("homepage/lib/secrets/keys.ts", "export const keys = ['x']"),
                ("homepage/package.json", "{ \"name\": \"from-tree\" }\n"),
                ("README.md", "not tracked"),
            ],
        )
        .commit_with("add binary blob", |tree| {
            tree.insert(RelativePath::new("homepage/lib/blob.ts"), vec![0xff, 0xfe, 0x00]);
        })
        .tagged("v1")
        .commit(
            "navbar and button polish",
            &[
                ("homepage/components/Navbar.tsx", "export const Navbar = () => <nav />"),
                (
                    "homepage/components/ui/Button.tsx",
                    "export const Button = () => <button className=\"font-bold\" />",
                ),
            ],
        )
}

fn policy() -> RedactionPolicy {
    RedactionPolicy::from_lists(
        &["secrets/".into(), "Internal.tsx".into()],
        &[r"api[_-]?key[_-]?[a-zA-Z0-9]+".into()],
        &["Blackbox".into()],
    )
    .unwrap()
}

fn engine_over(history: Arc<dyn HistorySource>, fs: MemoryFilesystem) -> AtelierEngine {
    let resolver = SnapshotResolver::new(history, SourceLayout::default(), policy());
    AtelierEngine::new(
        resolver,
        ScaffoldService::new(Box::new(fs), Box::new(BuiltinArtifacts::new())),
    )
}

fn engine() -> AtelierEngine {
    engine_over(Arc::new(history()), MemoryFilesystem::new())
}

#[test]
fn each_version_sees_its_own_tree() {
    let engine = engine();

    let err = engine
        .resolve_component(&ResolveRequest::new("navbar").at("v1".parse().unwrap()))
        .unwrap_err();
    assert!(matches!(
        err,
        AtelierError::Domain(DomainError::ComponentNotFound { .. })
    ));

    let old = engine
        .resolve_component(&ResolveRequest::new("button").at("v1".parse().unwrap()))
        .unwrap();
    let new = engine
        .resolve_component(&ResolveRequest::new("button"))
        .unwrap();
    assert_ne!(old.digest, new.digest);
    assert_ne!(old.snapshot, new.snapshot);
    assert_eq!(old.version, "v1");
    assert!(new.files[0].content.contains("font-bold"));
}

#[test]
fn revision_prefix_and_tag_agree() {
    let history = history();
    let prefix = history.revision(1).unwrap().as_str()[..12].to_string();
    let engine = engine_over(Arc::new(history), MemoryFilesystem::new());

    let by_tag = engine
        .resolve_component(&ResolveRequest::new("card").at("v1".parse().unwrap()))
        .unwrap();
    let by_prefix = engine
        .resolve_component(&ResolveRequest::new("card").at(VersionRef::Revision(prefix)))
        .unwrap();
    assert_eq!(by_tag.digest, by_prefix.digest);
}

#[test]
fn unknown_version_is_reported() {
    let err = engine()
        .resolve_component(&ResolveRequest::new("card").at("v9".parse().unwrap()))
        .unwrap_err();
    assert!(matches!(
        err,
        AtelierError::Domain(DomainError::VersionNotFound { .. })
    ));
}

#[test]
fn redaction_applies_before_anything_leaves_the_engine() {
    let bp = engine()
        .resolve_component(&ResolveRequest::new("card"))
        .unwrap();

    let paths: Vec<_> = bp.paths().map(|p| p.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "homepage/components/ui/Card.tsx",
            "homepage/components/ui/Button.tsx",
        ]
    );
    let card = &bp.files[0].content;
    assert!(card.contains("[REDACTED_KEY]"));
    assert!(!card.contains("api_key_abc123"));

    // Excluded and undecodable files surface only as warnings.
    assert!(bp.warnings.iter().any(|w| matches!(
        w,
        Warning::DanglingDependency { specifier, .. } if specifier == "../../lib/secrets/keys"
    )));
    assert!(bp.warnings.iter().any(|w| matches!(
        w,
        Warning::RedactionExcluded { path, .. } if path.as_str() == "homepage/lib/blob.ts"
    )));
}

#[test]
fn excluded_component_is_restricted_not_missing() {
    let err = engine()
        .resolve_component(&ResolveRequest::new("internal"))
        .unwrap_err();
    assert!(matches!(
        err,
        AtelierError::Domain(DomainError::ComponentRestricted { .. })
    ));

    let listing = engine().list_components(&ListRequest::default()).unwrap();
    let all: Vec<_> = listing.categories.0.values().flatten().collect();
    assert!(!all.iter().any(|id| id.as_str() == "internal"));
    assert_eq!(listing.total, 3);
}

#[test]
fn tracked_files_are_readable_unless_excluded() {
    let engine = engine();
    let package = engine
        .read_file(&ReadFileRequest::new("package.json").at("v1".parse().unwrap()))
        .unwrap();
    assert!(package.content.contains("from-tree"));
    assert_eq!(package.version, "v1");

    assert!(matches!(
        engine.read_file(&ReadFileRequest::new("lib/secrets/keys.ts")),
        Err(AtelierError::Domain(DomainError::FileRestricted { .. }))
    ));
    assert!(matches!(
        engine.read_file(&ReadFileRequest::new("lib/blob.ts")),
        Err(AtelierError::Domain(DomainError::FileRestricted { .. }))
    ));
}

#[test]
fn changelog_walks_memory_history() {
    let log = engine().get_changelog(&ChangelogRequest::default()).unwrap();
    let messages: Vec<_> = log.entries.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["navbar and button polish", "add binary blob", "initial components"]
    );
    assert_eq!(log.entries[1].tags, vec!["v1"]);

    let card = engine()
        .get_changelog(&ChangelogRequest {
            name: Some("card".into()),
            range: None,
        })
        .unwrap();
    assert_eq!(card.entries.len(), 1);
    assert_eq!(card.entries[0].message, "initial components");
}

#[test]
fn search_ranks_identity_first() {
    let results = engine().search(&SearchRequest::new("button")).unwrap();
    assert_eq!(results.hits[0].identity, "button");
    assert!(results.hits.iter().any(|h| h.identity == "card"));
}

#[test]
fn scaffold_into_memory_uses_tree_artifacts_first() {
    let fs = MemoryFilesystem::new();
    let engine = engine_over(Arc::new(history()), fs.clone());

    let report = engine
        .create_scaffold(&ScaffoldRequest::new(
            ScaffoldTemplate::MinimalLanding,
            ["card"],
            "/out",
        ))
        .unwrap();
    assert!(!report.dry_run);
    assert_eq!(report.components, vec!["ui/card"]);

    let package = fs.read_file(Path::new("/out/package.json")).unwrap();
    assert!(package.contains("from-tree"));
    let tsconfig = fs.read_file(Path::new("/out/tsconfig.json")).unwrap();
    assert!(tsconfig.contains("compilerOptions"));
    let card = fs
        .read_file(Path::new("/out/components/ui/Card.tsx"))
        .unwrap();
    assert!(card.contains("[REDACTED_KEY]"));
    assert!(fs.read_file(Path::new("/out/lib/secrets/keys.ts")).is_none());
}

#[test]
fn failed_write_rolls_back_the_new_root() {
    let fs = MemoryFilesystem::new().fail_writes_to("/out/app/page.tsx");
    let engine = engine_over(Arc::new(history()), fs.clone());

    let err = engine
        .create_scaffold(&ScaffoldRequest::new(
            ScaffoldTemplate::MinimalLanding,
            ["card"],
            "/out",
        ))
        .unwrap_err();
    match err {
        AtelierError::Application(ApplicationError::PartialScaffoldWrite {
            rolled_back,
            not_written,
            ..
        }) => {
            assert!(rolled_back);
            assert!(not_written.iter().any(|p| p.ends_with("page.tsx")));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(fs.list_files().is_empty());
}

#[test]
fn failed_write_into_existing_root_leaves_it_as_found() {
    let fs = MemoryFilesystem::new().fail_writes_to("/out/app/page.tsx");
    fs.create_dir_all(Path::new("/out")).unwrap();
    let engine = engine_over(Arc::new(history()), fs.clone());

    let err = engine
        .create_scaffold(&ScaffoldRequest::new(
            ScaffoldTemplate::MinimalLanding,
            ["card"],
            "/out",
        ))
        .unwrap_err();
    assert!(matches!(
        err,
        AtelierError::Application(ApplicationError::PartialScaffoldWrite {
            rolled_back: true,
            ..
        })
    ));
    assert!(fs.list_files().is_empty());
    assert!(fs.exists(Path::new("/out")));
    assert!(!fs.exists(Path::new("/out/app")));
    assert!(!fs.exists(Path::new("/out/components")));
}

/// Every file under `dir`, relative path to content.
fn tree_of(dir: &Path) -> BTreeMap<String, String> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_string_lossy().replace('\\', "/");
            (rel, fs::read_to_string(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn scaffold_on_local_disk_respects_overwrite() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("site");
    let resolver = SnapshotResolver::new(Arc::new(history()), SourceLayout::default(), policy());
    let engine = AtelierEngine::new(
        resolver,
        ScaffoldService::new(
            Box::new(LocalFilesystem::new()),
            Box::new(BuiltinArtifacts::new()),
        ),
    );

    let mut request =
        ScaffoldRequest::new(ScaffoldTemplate::FullProject, ["navbar", "card"], &output);
    let report = engine.create_scaffold(&request).unwrap();
    assert!(output.join("components/navigation/Navbar.tsx").is_file());
    assert!(output.join("components/ui/Card.tsx").is_file());
    assert!(output.join("lib/utils.ts").is_file());
    assert_eq!(report.files.len(), 12);
    let first = tree_of(&output);

    let err = engine.create_scaffold(&request).unwrap_err();
    assert!(matches!(
        err,
        AtelierError::Application(ApplicationError::OutputNotEmpty { .. })
    ));

    request.overwrite = true;
    let again = engine.create_scaffold(&request).unwrap();
    assert_eq!(again.files, report.files);
    assert_eq!(tree_of(&output), first);
}

#[test]
fn worktree_backend_serves_a_plain_directory() {
    let tmp = TempDir::new().unwrap();
    let ui = tmp.path().join("homepage/components/ui");
    fs::create_dir_all(&ui).unwrap();
    fs::write(ui.join("Button.tsx"), "export const Button = () => <button />").unwrap();

    let history = open_history(tmp.path(), Backend::Worktree).unwrap();
    let engine = engine_over(history, MemoryFilesystem::new());

    let listing = engine.list_components(&ListRequest::default()).unwrap();
    assert_eq!(listing.total, 1);
    let log = engine.get_changelog(&ChangelogRequest::default()).unwrap();
    assert_eq!(log.entries.len(), 1);
}

// ── git backend ───────────────────────────────────────────────────────────────

fn git(repo: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args([
            "-c",
            "user.name=Atelier Tests",
            "-c",
            "user.email=tests@atelier.invalid",
            "-c",
            "commit.gpgsign=false",
            "-c",
            "tag.gpgsign=false",
        ])
        .args(args)
        .current_dir(repo)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

fn write(repo: &Path, path: &str, content: &str) -> PathBuf {
    let target = repo.join(path);
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(&target, content).unwrap();
    target
}

#[test]
fn git_backend_resolves_tags_and_history() {
    if !GitHistory::is_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path();
    git(repo, &["init", "-q"]);

    write(repo, "homepage/components/ui/Button.tsx", "export const Button = 1");
    git(repo, &["add", "."]);
    git(repo, &["commit", "-q", "-m", "add button"]);
    git(repo, &["tag", "v1"]);

    write(
        repo,
        "homepage/components/ui/Button.tsx",
        "export const Button = () => <button className=\"text-red-500\" />",
    );
    // Uncommitted files are invisible to the git backend.
    write(repo, "homepage/components/ui/Draft.tsx", "export const Draft = 1");
    git(repo, &["add", "homepage/components/ui/Button.tsx"]);
    git(repo, &["commit", "-q", "-m", "style button"]);

    let history = open_history(repo, Backend::Auto).unwrap();
    let engine = engine_over(history, MemoryFilesystem::new());

    let old = engine
        .resolve_component(&ResolveRequest::new("button").at("v1".parse().unwrap()))
        .unwrap();
    assert_eq!(old.files[0].content, "export const Button = 1");
    let new = engine
        .resolve_component(&ResolveRequest::new("button"))
        .unwrap();
    assert!(new.files[0].content.contains("text-red-500"));

    let draft = engine.resolve_component(&ResolveRequest::new("draft"));
    assert!(draft.is_err());

    let log = engine.get_changelog(&ChangelogRequest::default()).unwrap();
    let messages: Vec<_> = log.entries.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["style button", "add button"]);
    assert_eq!(log.entries[1].tags, vec!["v1"]);

    let short = &log.entries[1].revision.as_str()[..8];
    let by_prefix = engine
        .resolve_component(&ResolveRequest::new("button").at(short.parse().unwrap()))
        .unwrap();
    assert_eq!(by_prefix.digest, old.digest);
}

#[test]
fn git_root_in_a_subdirectory_matches_the_worktree() {
    if !GitHistory::is_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path();
    git(repo, &["init", "-q"]);

    write(repo, "site/homepage/components/ui/Button.tsx", "export const Button = 1");
    git(repo, &["add", "."]);
    git(repo, &["commit", "-q", "-m", "add button"]);
    write(repo, "tools/homepage/components/ui/Other.tsx", "export const Other = 1");
    git(repo, &["add", "."]);
    git(repo, &["commit", "-q", "-m", "unrelated tooling"]);

    let project = repo.join("site");
    let via_git = engine_over(
        open_history(&project, Backend::Auto).unwrap(),
        MemoryFilesystem::new(),
    );
    let via_tree = engine_over(
        open_history(&project, Backend::Worktree).unwrap(),
        MemoryFilesystem::new(),
    );

    let listed = via_git.list_components(&ListRequest::default()).unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(
        listed.total,
        via_tree.list_components(&ListRequest::default()).unwrap().total
    );

    let button = via_git
        .resolve_component(&ResolveRequest::new("button"))
        .unwrap();
    assert_eq!(button.files[0].path.as_str(), "homepage/components/ui/Button.tsx");
    assert_eq!(button.files[0].content, "export const Button = 1");

    let log = via_git.get_changelog(&ChangelogRequest::default()).unwrap();
    let messages: Vec<_> = log.entries.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["add button"]);
}

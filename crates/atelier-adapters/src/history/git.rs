//! Git-backed history via the `git` executable.
//!
//! Content is read in one `git cat-file --batch` round trip per snapshot,
//! so loading a tree costs a fixed number of processes regardless of how
//! many files it has.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, instrument};

use atelier_core::{
    application::ports::{HistorySource, LogQuery},
    domain::{HistoryEntry, RelativePath, RevisionId},
    error::{AtelierError, AtelierResult},
};

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

/// Failures of a single git invocation.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to execute `git {command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`git {command}` failed: {stderr}")]
    Failed { command: String, stderr: String },

    #[error("unexpected output from `git {command}`: {reason}")]
    Parse { command: String, reason: String },
}

impl From<GitError> for AtelierError {
    fn from(e: GitError) -> Self {
        AtelierError::history(e.to_string())
    }
}

/// History source reading a local git repository.
///
/// The project root may be a subdirectory of the work tree. Paths handed to
/// and returned from the port are relative to that root, so the catalog is
/// the same as the working-tree backend's for the same directory.
#[derive(Debug, Clone)]
pub struct GitHistory {
    repo: PathBuf,
    /// Project root relative to the work-tree top; empty at the top.
    prefix: RelativePath,
}

impl GitHistory {
    /// Open the repository containing `root`, scoped to `root`.
    #[instrument(skip(root), fields(root = %root.as_ref().display()))]
    pub fn open(root: impl AsRef<Path>) -> AtelierResult<Self> {
        let at_root = Self {
            repo: root.as_ref().to_path_buf(),
            prefix: RelativePath::new(""),
        };
        let top = at_root.run(&["rev-parse", "--show-toplevel"], None)?;
        let top = String::from_utf8_lossy(&top).trim().to_string();
        let prefix = at_root.run(&["rev-parse", "--show-prefix"], None)?;
        let prefix = RelativePath::try_new(String::from_utf8_lossy(&prefix).trim())?;
        debug!(toplevel = %top, prefix = %prefix, "Opened git repository");
        Ok(Self {
            repo: PathBuf::from(top),
            prefix,
        })
    }

    /// Project root relative to the work-tree top.
    pub fn prefix(&self) -> &RelativePath {
        &self.prefix
    }

    /// Work-tree path of a root-relative path.
    fn in_tree(&self, path: &RelativePath) -> AtelierResult<RelativePath> {
        Ok(self.prefix.join(path.as_str())?)
    }

    /// Whether a usable `git` executable is on the PATH.
    pub fn is_available() -> bool {
        Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    /// Whether `path` lies inside a git work tree.
    pub fn is_repository(path: &Path) -> bool {
        Command::new("git")
            .arg("-C")
            .arg(path)
            .args(["rev-parse", "--is-inside-work-tree"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    pub fn root(&self) -> &Path {
        &self.repo
    }

    fn output(&self, args: &[&str], input: Option<Vec<u8>>) -> Result<Output, GitError> {
        let command = args.join(" ");
        let spawn_err = |source| GitError::Spawn {
            command: command.clone(),
            source,
        };

        let mut child = Command::new("git")
            .arg("-C")
            .arg(&self.repo)
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        // Feed stdin from a separate thread so a full stdout pipe cannot
        // deadlock against a blocked writer.
        let writer = match (input, child.stdin.take()) {
            (Some(bytes), Some(mut stdin)) => {
                Some(std::thread::spawn(move || stdin.write_all(&bytes)))
            }
            _ => None,
        };

        let output = child.wait_with_output().map_err(spawn_err)?;
        if let Some(handle) = writer {
            match handle.join() {
                Ok(result) => result.map_err(spawn_err)?,
                Err(_) => {
                    return Err(GitError::Parse {
                        command,
                        reason: "stdin writer panicked".into(),
                    });
                }
            }
        }
        Ok(output)
    }

    fn run(&self, args: &[&str], input: Option<Vec<u8>>) -> Result<Vec<u8>, GitError> {
        let output = self.output(args, input)?;
        if !output.status.success() {
            return Err(GitError::Failed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    /// `rev-parse --verify` of a commit-ish; `None` if it does not resolve.
    fn verify_commit(&self, spec: &str) -> Result<Option<RevisionId>, GitError> {
        let peeled = format!("{spec}^{{commit}}");
        let output = self.output(&["rev-parse", "--verify", "--quiet", &peeled], None)?;
        if !output.status.success() {
            return Ok(None);
        }
        let sha = String::from_utf8_lossy(&output.stdout).trim().to_ascii_lowercase();
        Ok((!sha.is_empty()).then(|| RevisionId::new(sha)))
    }
}

impl HistorySource for GitHistory {
    fn head(&self) -> AtelierResult<Option<RevisionId>> {
        Ok(self.verify_commit("HEAD")?)
    }

    fn tag(&self, name: &str) -> AtelierResult<Option<RevisionId>> {
        if name.starts_with('-') {
            return Ok(None);
        }
        Ok(self.verify_commit(&format!("refs/tags/{name}"))?)
    }

    fn revisions_with_prefix(&self, prefix: &str) -> AtelierResult<Vec<RevisionId>> {
        if prefix.len() < 4 || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Vec::new());
        }
        let disambiguate = format!("--disambiguate={prefix}");
        let output = self.output(&["rev-parse", &disambiguate], None)?;
        if !output.status.success() {
            return Ok(Vec::new());
        }
        let objects = String::from_utf8_lossy(&output.stdout).to_string();
        if objects.trim().is_empty() {
            return Ok(Vec::new());
        }

        // Keep commits only; the prefix may also match trees and blobs.
        let checked = self.run(&["cat-file", "--batch-check"], Some(objects.into_bytes()))?;
        Ok(String::from_utf8_lossy(&checked)
            .lines()
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                let sha = parts.next()?;
                (parts.next()? == "commit").then(|| RevisionId::new(sha))
            })
            .collect())
    }

    fn tags(&self) -> AtelierResult<Vec<(String, RevisionId)>> {
        let format = "--format=%(refname:short)%00%(*objectname)%00%(objectname)";
        let raw = self.run(&["for-each-ref", format, "refs/tags"], None)?;
        Ok(String::from_utf8_lossy(&raw)
            .lines()
            .filter_map(|line| {
                let mut parts = line.split('\0');
                let name = parts.next()?;
                let peeled = parts.next()?;
                let direct = parts.next()?;
                let target = if peeled.is_empty() { direct } else { peeled };
                Some((name.to_string(), RevisionId::new(target)))
            })
            .collect())
    }

    #[instrument(skip(self), fields(snapshot = %revision.short()))]
    fn list_paths(&self, revision: &RevisionId) -> AtelierResult<Vec<RelativePath>> {
        let raw = self.run(
            &["ls-tree", "-r", "-z", "--name-only", revision.as_str()],
            None,
        )?;
        let paths: Vec<RelativePath> = raw
            .split(|b| *b == 0)
            .filter(|s| !s.is_empty())
            .filter_map(|s| std::str::from_utf8(s).ok())
            .filter_map(|s| RelativePath::try_new(s).ok())
            .filter_map(|p| p.strip_prefix(&self.prefix))
            .filter(|p| !p.is_empty())
            .collect();
        debug!(paths = paths.len(), "Listed tree");
        Ok(paths)
    }

    #[instrument(skip(self, paths), fields(snapshot = %revision.short(), requested = paths.len()))]
    fn read_files(
        &self,
        revision: &RevisionId,
        paths: &[RelativePath],
    ) -> AtelierResult<BTreeMap<RelativePath, Vec<u8>>> {
        let wanted: Vec<&RelativePath> = paths
            .iter()
            .filter(|p| !p.as_str().contains('\n'))
            .collect();
        if wanted.is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut input = Vec::new();
        for path in &wanted {
            let full = self.in_tree(path)?;
            input.extend_from_slice(format!("{}:{}\n", revision.as_str(), full.as_str()).as_bytes());
        }
        let raw = self.run(&["cat-file", "--batch"], Some(input))?;
        Ok(parse_batch(&raw, &wanted)?)
    }

    #[instrument(skip(self, query), fields(until = %query.until.short(), depth = query.max_depth))]
    fn log(&self, query: &LogQuery) -> AtelierResult<Vec<HistoryEntry>> {
        let format = "--format=%H%x1f%aI%x1f%s%x1e";
        let max_count = format!("--max-count={}", query.max_depth);
        let range = match &query.since {
            Some(since) => format!("{}..{}", since.as_str(), query.until.as_str()),
            None => query.until.as_str().to_string(),
        };

        let mut scope = query
            .paths
            .iter()
            .map(|p| self.in_tree(p))
            .collect::<AtelierResult<Vec<_>>>()?;
        if scope.is_empty() && !self.prefix.is_empty() {
            scope.push(self.prefix.clone());
        }

        let mut args = vec!["log", format, max_count.as_str(), range.as_str(), "--"];
        args.extend(scope.iter().map(RelativePath::as_str));

        let raw = self.run(&args, None)?;
        Ok(parse_log(&String::from_utf8_lossy(&raw))?)
    }
}

/// Parse `cat-file --batch` output for `wanted`, in request order.
fn parse_batch(
    raw: &[u8],
    wanted: &[&RelativePath],
) -> Result<BTreeMap<RelativePath, Vec<u8>>, GitError> {
    let parse_err = |reason: String| GitError::Parse {
        command: "cat-file --batch".into(),
        reason,
    };

    let mut files = BTreeMap::new();
    let mut rest = raw;
    for path in wanted {
        let newline = rest
            .iter()
            .position(|b| *b == b'\n')
            .ok_or_else(|| parse_err(format!("truncated header for {path}")))?;
        let header = String::from_utf8_lossy(&rest[..newline]).to_string();
        rest = &rest[newline + 1..];

        if header.ends_with(" missing") || header.ends_with(" ambiguous") {
            continue;
        }
        let mut parts = header.split_whitespace();
        let kind = parts.nth(1).unwrap_or_default();
        let size: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| parse_err(format!("bad header '{header}'")))?;
        if rest.len() < size + 1 {
            return Err(parse_err(format!("truncated content for {path}")));
        }
        if kind == "blob" {
            files.insert((*path).clone(), rest[..size].to_vec());
        }
        rest = &rest[size + 1..];
    }
    Ok(files)
}

fn parse_log(raw: &str) -> Result<Vec<HistoryEntry>, GitError> {
    raw.split(RECORD_SEP)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|record| {
            let mut fields = record.splitn(3, FIELD_SEP);
            let (Some(sha), Some(date), Some(subject)) =
                (fields.next(), fields.next(), fields.next())
            else {
                return Err(GitError::Parse {
                    command: "log".into(),
                    reason: format!("malformed record '{record}'"),
                });
            };
            let timestamp = DateTime::parse_from_rfc3339(date)
                .map_err(|e| GitError::Parse {
                    command: "log".into(),
                    reason: format!("bad date '{date}': {e}"),
                })?
                .with_timezone(&Utc);
            Ok(HistoryEntry::new(RevisionId::new(sha), timestamp, subject))
        })
        .collect()
}

//! History source adapters.

mod git;
mod memory;
mod worktree;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use atelier_core::{application::ports::HistorySource, error::AtelierResult};

pub use git::{GitError, GitHistory};
pub use memory::MemoryHistory;
pub use worktree::WorktreeHistory;

/// Which history backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Git when the root is inside a repository, otherwise the working tree.
    #[default]
    Auto,
    Git,
    Worktree,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Git => "git",
            Self::Worktree => "worktree",
        })
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "git" => Ok(Self::Git),
            "worktree" | "dir" => Ok(Self::Worktree),
            other => Err(format!("unknown backend '{other}' (expected auto, git or worktree)")),
        }
    }
}

/// Open the history at `root` with the requested backend.
pub fn open_history(root: &Path, backend: Backend) -> AtelierResult<Arc<dyn HistorySource>> {
    let use_git = match backend {
        Backend::Git => true,
        Backend::Worktree => false,
        Backend::Auto => GitHistory::is_available() && GitHistory::is_repository(root),
    };

    let history: Arc<dyn HistorySource> = if use_git {
        Arc::new(GitHistory::open(root)?)
    } else {
        Arc::new(WorktreeHistory::new(root)?)
    };
    info!(root = %root.display(), backend = if use_git { "git" } else { "worktree" }, "History opened");
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_and_displays() {
        assert_eq!("GIT".parse::<Backend>().unwrap(), Backend::Git);
        assert_eq!("dir".parse::<Backend>().unwrap(), Backend::Worktree);
        assert_eq!(Backend::default().to_string(), "auto");
        assert!("svn".parse::<Backend>().is_err());
    }

    #[test]
    fn auto_falls_back_to_worktree_outside_git() {
        let tmp = tempfile::TempDir::new().unwrap();
        // A temp dir is normally outside any repository; skip if it is not.
        if GitHistory::is_repository(tmp.path()) {
            return;
        }
        let history = open_history(tmp.path(), Backend::Auto).unwrap();
        assert!(history.tags().unwrap().is_empty());
        assert!(history.head().unwrap().is_some());
    }
}

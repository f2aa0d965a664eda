use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use super::{blueprint::Warning, common::RelativePath, snapshot::RevisionId};
use crate::domain::{error::DomainError, value_objects::ScaffoldTemplate};

/// Final scaffold tree ready for materialization.
///
/// This is the output of merging shared artifacts and blueprints.
/// It contains no I/O, only data. Entries keep first-insertion order;
/// a later write to an existing path replaces its content in place.
#[derive(Debug, Clone)]
pub struct ScaffoldPlan {
    pub(crate) root: PathBuf,
    pub(crate) template: ScaffoldTemplate,
    pub(crate) entries: Vec<FileToWrite>,
    pub(crate) conflicts: Vec<Warning>,
    index: HashMap<RelativePath, usize>,
}

impl ScaffoldPlan {
    pub fn new(root: impl Into<PathBuf>, template: ScaffoldTemplate) -> Self {
        Self {
            root: root.into(),
            template,
            entries: Vec::new(),
            conflicts: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a file, resolving collisions in favour of the later source.
    ///
    /// Identical content from two sources is not a conflict.
    pub fn add_file(&mut self, path: RelativePath, content: String, origin: impl Into<String>) {
        let origin = origin.into();
        match self.index.get(&path) {
            Some(&idx) => {
                let existing = &mut self.entries[idx];
                if existing.content == content {
                    return;
                }
                self.conflicts.push(Warning::WriteConflict {
                    path: path.clone(),
                    previous: existing.origin.clone(),
                    winner: origin.clone(),
                });
                existing.content = content;
                existing.origin = origin;
            }
            None => {
                self.index.insert(path.clone(), self.entries.len());
                self.entries.push(FileToWrite {
                    path,
                    content,
                    origin,
                });
            }
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::InvalidPath {
                path: self.root.display().to_string(),
                reason: "scaffold plan is empty".into(),
            });
        }
        Ok(())
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn template(&self) -> ScaffoldTemplate {
        self.template
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter()
    }

    /// Every directory that must exist before the files are written.
    pub fn directories(&self) -> BTreeSet<RelativePath> {
        let mut dirs = BTreeSet::new();
        for entry in &self.entries {
            let mut parent = entry.path.parent();
            while !parent.is_empty() {
                let next = parent.parent();
                dirs.insert(parent);
                parent = next;
            }
        }
        dirs
    }

    pub fn conflicts(&self) -> &[Warning] {
        &self.conflicts
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToWrite {
    pub path: RelativePath,
    pub content: String,
    /// Which shared artifact or component produced this content.
    pub origin: String,
}

/// What a scaffold run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldReport {
    pub output: PathBuf,
    pub template: ScaffoldTemplate,
    pub snapshot: RevisionId,
    pub components: Vec<String>,
    /// Every file of the plan; nothing was written when `dry_run` is set.
    pub files: Vec<RelativePath>,
    pub dry_run: bool,
    pub warnings: Vec<Warning>,
}

//! Scaffold Service - plan merging and materialization.
//!
//! This service coordinates the write side of scaffolding:
//! 1. Merge shared artifacts and blueprints into one plan
//! 2. Refuse non-empty outputs unless overwriting
//! 3. Write the plan, rolling back on failure
//!
//! It is the only part of the engine with externally visible side effects.

use std::path::Path;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, SharedArtifactSource},
    },
    domain::{Blueprint, Placement, RelativePath, ScaffoldPlan, ScaffoldTemplate, SourceLayout},
    error::AtelierResult,
};

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    artifacts: Box<dyn SharedArtifactSource>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use atelier_core::application::ScaffoldService;
    /// # use atelier_core::application::{Filesystem, SharedArtifactSource};
    /// # fn example(filesystem: Box<dyn Filesystem>, artifacts: Box<dyn SharedArtifactSource>) {
    ///
    /// let service = ScaffoldService::new(
    ///     filesystem, // impl Filesystem
    ///     artifacts,  // impl SharedArtifactSource
    /// );
    /// # }
    /// ```
    pub fn new(filesystem: Box<dyn Filesystem>, artifacts: Box<dyn SharedArtifactSource>) -> Self {
        Self {
            filesystem,
            artifacts,
        }
    }

    /// Fail with `OutputNotEmpty` unless the output may be written.
    pub fn check_output(&self, output: &Path, overwrite: bool) -> AtelierResult<()> {
        if !overwrite && self.filesystem.is_nonempty_dir(output)? {
            return Err(ApplicationError::OutputNotEmpty {
                path: output.to_path_buf(),
            }
            .into());
        }
        Ok(())
    }

    /// Merge shared artifacts, then blueprints in caller order.
    ///
    /// `source` supplies the snapshot's redacted text for a repository path;
    /// a shared artifact present there replaces the built-in fallback.
    /// Blueprint files are placed per category, see [`Placement`].
    pub fn plan<'s>(
        &self,
        output: &Path,
        template: ScaffoldTemplate,
        layout: &SourceLayout,
        source: impl Fn(&RelativePath) -> Option<&'s str>,
        blueprints: &[&Blueprint],
    ) -> ScaffoldPlan {
        let mut plan = ScaffoldPlan::new(output, template);

        for artifact in self.artifacts.artifacts(template) {
            let from_tree = layout
                .app_root
                .join(artifact.path.as_str())
                .ok()
                .and_then(|p| source(&p).map(str::to_string));
            let origin = if from_tree.is_some() { "source" } else { "builtin" };
            plan.add_file(
                artifact.path,
                from_tree.unwrap_or(artifact.fallback),
                format!("{template}:{origin}"),
            );
        }

        for blueprint in blueprints {
            let origin = blueprint.root.qualified_name();
            let placement = Placement::for_blueprint(layout, blueprint);
            for file in &blueprint.files {
                let Some(target) = placement.destination(&file.path) else {
                    continue;
                };
                plan.add_file(
                    target.clone(),
                    placement.relocate(&file.path, &file.content),
                    origin.as_str(),
                );
            }
        }

        plan
    }

    /// Write a plan to disk, all or nothing.
    ///
    /// On failure every file and directory this call created is removed
    /// again, whether or not the output root existed beforehand. Files that
    /// were already present keep whatever this call wrote over them.
    #[instrument(skip_all, fields(output = %plan.root().display(), files = plan.entry_count()))]
    pub fn write(&self, plan: &ScaffoldPlan) -> AtelierResult<Vec<RelativePath>> {
        plan.validate()?;

        let mut progress = WriteProgress::default();
        match self.write_all(plan, &mut progress) {
            Ok(()) => {
                info!(files = progress.files.len(), "Successfully wrote all files");
                Ok(progress.files)
            }
            Err(e) => {
                warn!(error = %e, "Write failed, attempting rollback");
                let rolled_back = self.rollback(plan.root(), &progress);
                let not_written = plan
                    .files()
                    .map(|f| &f.path)
                    .filter(|p| !progress.files.contains(p))
                    .map(ToString::to_string)
                    .collect();
                Err(ApplicationError::PartialScaffoldWrite {
                    written: progress.files.iter().map(ToString::to_string).collect(),
                    not_written,
                    rolled_back,
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }

    fn write_all(&self, plan: &ScaffoldPlan, progress: &mut WriteProgress) -> AtelierResult<()> {
        let root = plan.root();
        progress.created_root = !self.filesystem.exists(root);
        self.filesystem.create_dir_all(root)?;

        for dir in plan.directories() {
            let path = root.join(dir.as_str());
            let fresh = !self.filesystem.exists(&path);
            self.filesystem.create_dir_all(&path)?;
            if fresh && !progress.dirs.iter().any(|d| dir.starts_with(d)) {
                progress.dirs.push(dir);
            }
        }

        for file in plan.files() {
            let path = root.join(file.path.as_str());
            let fresh = !self.filesystem.exists(&path);
            self.filesystem.write_file(&path, &file.content)?;
            if fresh {
                progress.created.push(file.path.clone());
            }
            progress.files.push(file.path.clone());
        }

        Ok(())
    }

    /// Best-effort removal of what one run created. `true` when nothing failed.
    fn rollback(&self, root: &Path, progress: &WriteProgress) -> bool {
        let clean = if progress.created_root {
            removed(self.filesystem.remove_dir_all(root), root)
        } else {
            let mut clean = true;
            for file in progress.created.iter().rev() {
                let path = root.join(file.as_str());
                clean &= removed(self.filesystem.remove_file(&path), &path);
            }
            for dir in &progress.dirs {
                let path = root.join(dir.as_str());
                clean &= removed(self.filesystem.remove_dir_all(&path), &path);
            }
            clean
        };
        if clean {
            info!(files = progress.files.len(), "Rollback successful");
        }
        clean
    }
}

fn removed(result: AtelierResult<()>, path: &Path) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Rollback failed");
            false
        }
    }
}

/// What one `write` call has created so far.
#[derive(Debug, Default)]
struct WriteProgress {
    created_root: bool,
    /// Top-most directories that did not exist before this run.
    dirs: Vec<RelativePath>,
    /// Every file written, in plan order.
    files: Vec<RelativePath>,
    /// Written files that did not exist before this run.
    created: Vec<RelativePath>,
}

//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use atelier_core::{
    application::{ApplicationError, ports::Filesystem},
    error::AtelierResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can hand one clone to the engine and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    /// Writes to this path fail, for rollback tests.
    fail_on: Option<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to `path` fail.
    pub fn fail_writes_to(self, path: impl Into<PathBuf>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.fail_on = Some(path.into());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> AtelierResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::CacheLockError)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> AtelierResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::CacheLockError)?;

        if inner.fail_on.as_deref() == Some(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Injected write failure".into(),
            }
            .into());
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_nonempty_dir(&self, path: &Path) -> AtelierResult<bool> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::CacheLockError)?;
        if inner.files.contains_key(path) {
            return Ok(true);
        }
        Ok(inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .any(|p| p != path && p.starts_with(path)))
    }

    fn remove_file(&self, path: &Path) -> AtelierResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::CacheLockError)?;
        inner.files.remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> AtelierResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::CacheLockError)?;

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/out/a.ts"), "x").is_err());

        fs.create_dir_all(Path::new("/out")).unwrap();
        fs.write_file(Path::new("/out/a.ts"), "x").unwrap();
        assert_eq!(fs.read_file(Path::new("/out/a.ts")).as_deref(), Some("x"));
    }

    #[test]
    fn occupancy_and_removal() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/out/sub")).unwrap();
        assert!(fs.is_nonempty_dir(Path::new("/out")).unwrap());
        assert!(!fs.is_nonempty_dir(Path::new("/out/sub")).unwrap());

        fs.remove_dir_all(Path::new("/out")).unwrap();
        assert!(!fs.exists(Path::new("/out")));
        assert!(!fs.exists(Path::new("/out/sub")));
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new();
        let other = fs.clone();
        fs.create_dir_all(Path::new("/x")).unwrap();
        fs.write_file(Path::new("/x/y"), "z").unwrap();
        assert_eq!(other.list_files(), vec![PathBuf::from("/x/y")]);
        other.clear();
        assert!(fs.list_files().is_empty());
    }
}

//! Infrastructure adapters for Atelier.
//!
//! This crate implements the ports defined in `atelier-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod history;
pub mod rules_loader;
pub mod shared_artifacts;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use history::{
    Backend, GitError, GitHistory, MemoryHistory, WorktreeHistory, open_history,
};
pub use rules_loader::RulesLoader;
pub use shared_artifacts::BuiltinArtifacts;

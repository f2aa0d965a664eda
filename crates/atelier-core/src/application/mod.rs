//! Application layer for Atelier.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (AtelierEngine, SnapshotResolver, ScaffoldService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    AtelierEngine, Changelog, ChangelogRequest, ComponentListing, DEFAULT_MAX_DEPTH, ListRequest,
    ReadFileRequest, ResolveRequest, ScaffoldRequest, ScaffoldService, SearchRequest,
    SearchResults, SnapshotResolver, SnapshotView, SpecReport, SpecsRequest, TrackedFile,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, HistorySource, LogQuery, SharedArtifact, SharedArtifactSource};

pub use error::ApplicationError;

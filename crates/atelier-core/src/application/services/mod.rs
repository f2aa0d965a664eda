//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! the engine operations: resolve, list, specs, changelog, search, file
//! reads and scaffold.

pub mod engine;
pub mod requests;
pub mod scaffold_service;
pub mod snapshot_service;

pub use engine::{AtelierEngine, DEFAULT_MAX_DEPTH};
pub use requests::{
    Changelog, ChangelogRequest, ComponentListing, ListRequest, ReadFileRequest, ResolveRequest,
    ScaffoldRequest, SearchRequest, SearchResults, SpecReport, SpecsRequest, TrackedFile,
};
pub use scaffold_service::ScaffoldService;
pub use snapshot_service::{SnapshotResolver, SnapshotView};

//! Atelier Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Atelier, a
//! component resolution and versioned blueprint assembly engine for
//! design-system source trees, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           atelier-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (AtelierEngine, SnapshotResolver,      │
//! │   ScaffoldService)                      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (HistorySource, Filesystem, Artifacts)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    atelier-adapters (Infrastructure)    │
//! │  (GitHistory, LocalFilesystem, etc)     │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Catalog, closure, redaction, specs,    │
//! │  search, scaffold plans)                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use atelier_core::prelude::*;
//! # use std::sync::Arc;
//! # fn example(
//! #     history: Arc<dyn HistorySource>,
//! #     policy: RedactionPolicy,
//! #     filesystem: Box<dyn Filesystem>,
//! #     artifacts: Box<dyn SharedArtifactSource>,
//! # ) {
//!
//! // 1. Pin history and redaction rules
//! let resolver = SnapshotResolver::new(history, SourceLayout::default(), policy);
//!
//! // 2. Build the engine with injected adapters
//! let engine = AtelierEngine::new(resolver, ScaffoldService::new(filesystem, artifacts));
//!
//! // 3. Resolve a component
//! let blueprint = engine.resolve_component(&ResolveRequest::new("hero-section")).unwrap();
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        AtelierEngine, ChangelogRequest, ListRequest, ResolveRequest, ScaffoldRequest,
        ScaffoldService, SearchRequest, SnapshotResolver, SpecsRequest,
        ports::{Filesystem, HistorySource, SharedArtifactSource},
    };
    pub use crate::domain::{
        Blueprint, Category, CategoryFilter, PropertyKind, PropertySelector, RedactionPolicy,
        RelativePath, RevisionId, ScaffoldTemplate, SearchFilters, SourceLayout, VersionRange,
        VersionRef,
    };
    pub use crate::error::{AtelierError, AtelierResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

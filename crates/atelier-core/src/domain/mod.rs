// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Atelier.
//!
//! This module contains pure logic: no process spawning, no filesystem, no
//! history access. Everything here operates on an already-loaded
//! [`Snapshot`] and on configuration values handed in by callers.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: History and filesystem access go through application ports
//! - **Immutable values**: catalogs, blueprints and bundles are never mutated
//!   once built
//! - **Closed variants**: categories, property kinds, templates and version
//!   specifiers are enums, not strings
//!
// Public API - what the world sees
pub mod catalog;
pub mod dependency;
pub mod entities;
pub mod error;
pub mod placement;
pub mod redaction;
pub mod search;
pub mod specs;
pub mod value_objects;

// Re-exports for convenience
pub use catalog::{Catalog, CategoryGroups, SourceLayout};
pub use dependency::{Closure, Reference};
pub use entities::{
    Blueprint, BlueprintFile, ComponentRecord, ComponentRef, DependencyEdge, EdgeTarget,
    FileRole, FileToWrite, HistoryEntry, RevisionId, ScaffoldPlan, ScaffoldReport, Snapshot,
    Warning,
};
pub use error::{DomainError, ErrorCategory};
pub use placement::Placement;
pub use redaction::{RedactionPolicy, RedactionRule};
pub use search::{MatchTier, SearchFilters, SearchHit, SearchQuery};
pub use specs::SpecBundle;
pub use value_objects::{
    Category, CategoryFilter, PropertyKind, PropertySelector, RuleKind, ScaffoldTemplate,
    VersionRange, VersionRef,
};

pub use entities::common::{RelativePath, to_kebab_case};

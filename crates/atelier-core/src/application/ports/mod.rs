//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `atelier-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `HistorySource`: revisions, tags, tracked paths and file content
//!   - `Filesystem`: scaffold output
//!   - `SharedArtifactSource`: per-template configuration files
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - `AtelierEngine` operations, invoked by the CLI

pub mod output;

pub use output::{Filesystem, HistorySource, LogQuery, SharedArtifact, SharedArtifactSource};

#[cfg(test)]
pub use output::MockHistorySource;

pub mod blueprint;
pub mod common;
pub mod component;
pub mod scaffold;
pub mod snapshot;

pub use crate::domain::DomainError;
pub use common::RelativePath;
pub use blueprint::{Blueprint, BlueprintFile, DependencyEdge, EdgeTarget, FileRole, Warning};
pub use component::{ComponentRecord, ComponentRef};
pub use scaffold::{FileToWrite, ScaffoldPlan, ScaffoldReport};
pub use snapshot::{HistoryEntry, RevisionId, Snapshot};

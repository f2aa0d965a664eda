use serde::Serialize;
use std::fmt;

use super::{DomainError, common::RelativePath, common::to_kebab_case};
use crate::domain::value_objects::Category;

/// One catalogued component.
///
/// Records are created while a catalog is built and never change afterwards;
/// they hold paths into the snapshot, not content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentRecord {
    pub identity: String,
    pub category: Category,
    pub path: RelativePath,
    pub auxiliary: Vec<RelativePath>,
}

impl ComponentRecord {
    pub fn new(identity: impl Into<String>, category: Category, path: RelativePath) -> Self {
        Self {
            identity: identity.into(),
            category,
            path,
            auxiliary: Vec::new(),
        }
    }

    pub fn with_auxiliary(mut self, path: RelativePath) -> Self {
        self.auxiliary.push(path);
        self
    }

    /// `category/identity`, unique within one catalog.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.category, self.identity)
    }

    /// Primary path followed by auxiliary paths.
    pub fn paths(&self) -> impl Iterator<Item = &RelativePath> {
        std::iter::once(&self.path).chain(self.auxiliary.iter())
    }
}

/// A caller-supplied component address: `name` or `category/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    pub category: Option<Category>,
    pub identity: String,
    raw: String,
}

impl ComponentRef {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let (category, name) = match trimmed.split_once('/') {
            Some((cat, name)) => (Some(cat.parse::<Category>()?), name),
            None => (None, trimmed),
        };

        let identity = to_kebab_case(name);
        if identity.is_empty() {
            return Err(DomainError::ComponentNotFound {
                name: raw.to_string(),
            });
        }

        Ok(Self {
            category,
            identity,
            raw: trimmed.to_string(),
        })
    }

    pub fn matches(&self, record: &ComponentRecord) -> bool {
        record.identity == self.identity && self.category.is_none_or(|c| c == record.category)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

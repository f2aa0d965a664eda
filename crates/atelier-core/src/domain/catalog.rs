//! Catalog index: component discovery and classification.
//!
//! A catalog is built once per snapshot from the set of admitted paths and
//! never changes afterwards. Records keep directory traversal order (sorted
//! path order), which is what listing and search tie-breaking rely on.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::domain::{
    entities::{ComponentRecord, ComponentRef, RelativePath, common::to_kebab_case},
    error::DomainError,
    value_objects::{Category, CategoryFilter},
};

/// Where components and modules live inside the tracked tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    /// Tree prefix the engine tracks. `@/` imports resolve against it.
    pub app_root: RelativePath,
    /// Component directory, relative to `app_root`.
    pub components_dir: RelativePath,
    pub alias_prefix: String,
    pub component_extensions: Vec<String>,
    pub source_extensions: Vec<String>,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            app_root: RelativePath::new("homepage"),
            components_dir: RelativePath::new("components"),
            alias_prefix: "@/".into(),
            component_extensions: vec!["tsx".into()],
            source_extensions: ["tsx", "ts", "jsx", "js", "mjs", "css", "json"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl SourceLayout {
    pub fn components_root(&self) -> RelativePath {
        self.app_root
            .join(self.components_dir.as_str())
            .unwrap_or_else(|_| self.app_root.clone())
    }

    /// Whether a path belongs to the tracked source set.
    pub fn is_tracked(&self, path: &RelativePath) -> bool {
        path.starts_with(&self.app_root) && has_extension(path, &self.source_extensions)
    }

    /// Whether a path is a component's primary file: `<stem>.<ext>` with
    /// exactly one dot, below the components directory.
    pub fn is_component_file(&self, path: &RelativePath) -> bool {
        path.starts_with(&self.components_root())
            && has_extension(path, &self.component_extensions)
            && path.file_name().matches('.').count() == 1
            && !path.stem().is_empty()
    }

    /// Category by directory convention.
    pub fn classify(&self, path: &RelativePath) -> Category {
        let relative = path
            .strip_prefix(&self.components_root())
            .unwrap_or_else(|| path.clone());
        let dirs: Vec<String> = relative
            .parent()
            .segments()
            .map(str::to_ascii_lowercase)
            .collect();
        let has_dir = |name: &str| dirs.iter().any(|d| d == name);
        let stem = path.stem().to_ascii_lowercase();

        if has_dir("cosmic") {
            Category::Cosmic
        } else if has_dir("magicui") {
            Category::MagicUi
        } else if has_dir("experiments") {
            Category::Experiments
        } else if has_dir("ui") {
            if stem.contains("section") {
                Category::Sections
            } else if stem.contains("animation") {
                Category::Animations
            } else {
                Category::Ui
            }
        } else if ["nav", "header", "footer"].iter().any(|k| stem.contains(k)) {
            Category::Navigation
        } else {
            Category::Ui
        }
    }
}

fn has_extension(path: &RelativePath, extensions: &[String]) -> bool {
    path.extension()
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Identities grouped by category, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryGroups(pub BTreeMap<Category, Vec<String>>);

impl CategoryGroups {
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// Immutable component index for one snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ComponentRecord>,
    by_category: BTreeMap<Category, Vec<usize>>,
    by_path: HashMap<RelativePath, usize>,
    restricted: Vec<(Category, String)>,
}

impl Catalog {
    /// Build from admitted paths (sorted) and withheld paths.
    ///
    /// Withheld component files become restricted identities: lookups for
    /// them fail with `ComponentRestricted` rather than `ComponentNotFound`.
    pub fn build<'a>(
        layout: &SourceLayout,
        admitted: impl IntoIterator<Item = &'a RelativePath>,
        withheld: impl IntoIterator<Item = &'a RelativePath>,
    ) -> Result<Self, DomainError> {
        let admitted: Vec<&RelativePath> = admitted.into_iter().collect();

        let mut siblings: HashMap<(RelativePath, &str), Vec<&RelativePath>> = HashMap::new();
        for path in admitted.iter().copied() {
            if !layout.is_component_file(path) {
                siblings
                    .entry((path.parent(), path.stem()))
                    .or_default()
                    .push(path);
            }
        }

        let mut catalog = Catalog::default();
        let mut seen: HashMap<(Category, String), RelativePath> = HashMap::new();

        for path in admitted.iter().copied() {
            if !layout.is_component_file(path) {
                continue;
            }
            let category = layout.classify(path);
            let identity = to_kebab_case(path.stem());

            if let Some(first) = seen.insert((category, identity.clone()), path.clone()) {
                return Err(DomainError::DuplicateIdentity {
                    category: category.to_string(),
                    identity,
                    first: first.to_string(),
                    second: path.to_string(),
                });
            }

            let mut record = ComponentRecord::new(identity, category, path.clone());
            if let Some(aux) = siblings.get(&(path.parent(), path.stem())) {
                for p in aux {
                    record = record.with_auxiliary((*p).clone());
                }
            }

            let idx = catalog.records.len();
            catalog.by_category.entry(category).or_default().push(idx);
            catalog.by_path.insert(path.clone(), idx);
            catalog.records.push(record);
        }

        for path in withheld {
            if layout.is_component_file(path) {
                catalog
                    .restricted
                    .push((layout.classify(path), to_kebab_case(path.stem())));
            }
        }

        Ok(catalog)
    }

    /// Resolve `name` or `category/name`; unqualified names take the first
    /// match in traversal order.
    pub fn lookup(&self, name: &str) -> Result<&ComponentRecord, DomainError> {
        let wanted = ComponentRef::parse(name)?;
        self.find(&wanted)
    }

    pub fn find(&self, wanted: &ComponentRef) -> Result<&ComponentRecord, DomainError> {
        if let Some(record) = self.records.iter().find(|r| wanted.matches(r)) {
            return Ok(record);
        }

        let restricted = self.restricted.iter().any(|(cat, id)| {
            *id == wanted.identity && wanted.category.is_none_or(|c| c == *cat)
        });
        if restricted {
            Err(DomainError::ComponentRestricted {
                name: wanted.raw().to_string(),
            })
        } else {
            Err(DomainError::ComponentNotFound {
                name: wanted.raw().to_string(),
            })
        }
    }

    pub fn by_path(&self, path: &RelativePath) -> Option<&ComponentRecord> {
        self.by_path.get(path).map(|&idx| &self.records[idx])
    }

    /// All records in traversal order.
    pub fn records(&self) -> &[ComponentRecord] {
        &self.records
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &ComponentRecord> {
        self.by_category
            .get(&category)
            .into_iter()
            .flatten()
            .map(|&idx| &self.records[idx])
    }

    pub fn grouped(&self, filter: CategoryFilter) -> CategoryGroups {
        let groups = Category::ALL
            .into_iter()
            .filter(|c| filter.admits(*c))
            .map(|c| {
                let ids = self.in_category(c).map(|r| r.identity.clone()).collect();
                (c, ids)
            })
            .collect();
        CategoryGroups(groups)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

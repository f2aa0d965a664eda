//! Output placement for scaffolded blueprint files.
//!
//! Component files land at `<components_dir>/<category>/<file name>`, so a
//! `sections` component classified from `components/ui/` still ends up under
//! `components/sections/`. Every other module keeps its location relative to
//! the app root. Local specifiers are rewritten to follow the moves.

use std::collections::HashMap;

use crate::domain::{
    catalog::SourceLayout,
    dependency::{ModuleResolver, Reference, rewrite_specifiers},
    entities::{Blueprint, EdgeTarget, FileRole, RelativePath},
    value_objects::Category,
};

/// Source path to output path for every file of one blueprint.
#[derive(Debug)]
pub struct Placement<'a> {
    layout: &'a SourceLayout,
    destinations: HashMap<RelativePath, RelativePath>,
}

impl<'a> Placement<'a> {
    pub fn for_blueprint(layout: &'a SourceLayout, blueprint: &Blueprint) -> Self {
        let mut categories: HashMap<&RelativePath, Category> = HashMap::new();
        for edge in &blueprint.edges {
            if let EdgeTarget::Component { category, path, .. } = &edge.to {
                categories.insert(path, *category);
            }
        }

        let destinations = blueprint
            .files
            .iter()
            .map(|file| {
                let category = match file.role {
                    FileRole::Root | FileRole::Auxiliary => Some(blueprint.root.category),
                    FileRole::Component => categories.get(&file.path).copied(),
                    FileRole::Module => None,
                };
                let destination = category
                    .and_then(|c| component_destination(layout, c, &file.path))
                    .unwrap_or_else(|| app_relative(layout, &file.path));
                (file.path.clone(), destination)
            })
            .collect();

        Self {
            layout,
            destinations,
        }
    }

    pub fn destination(&self, source: &RelativePath) -> Option<&RelativePath> {
        self.destinations.get(source)
    }

    /// `text` of the file at `source`, with local specifiers rewritten so
    /// they resolve from its destination.
    pub fn relocate(&self, source: &RelativePath, text: &str) -> String {
        let Some(from) = self.destinations.get(source) else {
            return text.to_string();
        };
        let resolver =
            ModuleResolver::new(self.layout, |p: &RelativePath| self.destinations.contains_key(p));
        let alias = self.layout.alias_prefix.as_str();
        let importer_moved = app_relative(self.layout, source) != *from;

        rewrite_specifiers(text, |specifier| {
            let Reference::Local(target) = resolver.resolve(source, specifier) else {
                return None;
            };
            let to = self.destinations.get(&target)?;
            let target_moved = app_relative(self.layout, &target) != *to;
            let aliased = specifier.starts_with(alias);
            if !target_moved && (aliased || !importer_moved) {
                return None;
            }

            let form = specifier_form(specifier, &target, to);
            Some(if aliased {
                format!("{alias}{form}")
            } else {
                relative_specifier(&from.parent(), &form)
            })
        })
    }
}

fn app_relative(layout: &SourceLayout, path: &RelativePath) -> RelativePath {
    path.strip_prefix(&layout.app_root)
        .unwrap_or_else(|| path.clone())
}

fn component_destination(
    layout: &SourceLayout,
    category: Category,
    path: &RelativePath,
) -> Option<RelativePath> {
    layout
        .components_dir
        .join(category.as_str())
        .and_then(|dir| dir.join(path.file_name()))
        .ok()
}

/// Keep the specifier's shape: explicit extension, bare module or directory.
fn specifier_form(specifier: &str, target: &RelativePath, destination: &RelativePath) -> String {
    if specifier.ends_with(target.file_name()) {
        return destination.to_string();
    }
    if target.stem() == "index" && !specifier.ends_with("index") {
        return destination.parent().to_string();
    }
    let full = destination.as_str();
    match destination.extension() {
        Some(ext) => full
            .strip_suffix(&format!(".{ext}"))
            .unwrap_or(full)
            .to_string(),
        None => full.to_string(),
    }
}

/// `./x` or `../x` form of `to` as seen from the directory `from_dir`.
fn relative_specifier(from_dir: &RelativePath, to: &str) -> String {
    let from: Vec<&str> = from_dir.segments().collect();
    let to: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let ups = from.len() - common;

    let mut parts: Vec<&str> = std::iter::repeat_n("..", ups).collect();
    parts.extend(&to[common..]);
    match (ups, parts.is_empty()) {
        (_, true) => ".".to_string(),
        (0, false) => format!("./{}", parts.join("/")),
        _ => parts.join("/"),
    }
}

//! Dependency extraction and closure computation.
//!
//! References are scanned from (redacted) source text. Local specifiers
//! become edges into the tracked tree; everything else is recorded as a
//! third-party package name and never expanded.

use regex::Regex;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::LazyLock;

use crate::domain::{
    catalog::{Catalog, SourceLayout},
    entities::{ComponentRecord, DependencyEdge, EdgeTarget, FileRole, RelativePath, Warning},
};

static IMPORTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        \b(?:import|export)\s+(?:type\s+)?[\w*$\{\}\s,]+?\s+from\s*['"]([^'"\n]+)['"]
        | \bimport\s*['"]([^'"\n]+)['"]
        | \bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)
        | \brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)
        "#,
    )
    .expect("static regex")
});

/// Every module specifier referenced by `text`, in textual order.
pub fn scan_specifiers(text: &str) -> Vec<&str> {
    IMPORTS
        .captures_iter(text)
        .filter_map(|caps| {
            (1..=4)
                .find_map(|i| caps.get(i))
                .map(|m| m.as_str().trim())
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Replace module specifiers in one pass over `text`.
///
/// `rewrite` sees each specifier in textual order; `None` leaves it as is.
pub fn rewrite_specifiers(text: &str, mut rewrite: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in IMPORTS.captures_iter(text) {
        let Some(m) = (1..=4).find_map(|i| caps.get(i)) else {
            continue;
        };
        if let Some(replacement) = rewrite(m.as_str().trim()) {
            out.push_str(&text[last..m.start()]);
            out.push_str(&replacement);
            last = m.end();
        }
    }
    out.push_str(&text[last..]);
    out
}

/// What a specifier points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Resolved local file.
    Local(RelativePath),
    /// Local specifier with no admitted target.
    Dangling,
    /// Third-party package name.
    External(String),
}

/// Resolves specifiers against the layout and the set of available files.
pub struct ModuleResolver<'a, F> {
    layout: &'a SourceLayout,
    exists: F,
}

impl<'a, F> ModuleResolver<'a, F>
where
    F: Fn(&RelativePath) -> bool,
{
    pub fn new(layout: &'a SourceLayout, exists: F) -> Self {
        Self { layout, exists }
    }

    pub fn resolve(&self, from: &RelativePath, specifier: &str) -> Reference {
        let base = if let Some(rest) = specifier.strip_prefix(self.layout.alias_prefix.as_str()) {
            self.layout.app_root.join(rest)
        } else if is_relative(specifier) {
            from.parent().join(specifier)
        } else {
            return Reference::External(package_name(specifier));
        };

        match base {
            Ok(base) => self
                .candidates(&base)
                .into_iter()
                .find(|c| (self.exists)(c))
                .map_or(Reference::Dangling, Reference::Local),
            Err(_) => Reference::Dangling,
        }
    }

    /// Exact path, then `<base>.<ext>`, then `<base>/index.<ext>`.
    fn candidates(&self, base: &RelativePath) -> Vec<RelativePath> {
        let exts = &self.layout.source_extensions;
        let mut out = Vec::with_capacity(1 + exts.len() * 2);
        if !base.is_empty() {
            out.push(base.clone());
            out.extend(exts.iter().filter_map(|ext| {
                RelativePath::try_new(format!("{base}.{ext}")).ok()
            }));
        }
        out.extend(exts.iter().filter_map(|ext| base.join(format!("index.{ext}")).ok()));
        out
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "." || specifier == ".." || specifier.starts_with("./") || specifier.starts_with("../")
}

/// `react-dom/client` → `react-dom`, `@radix-ui/react-slot/x` → `@radix-ui/react-slot`.
pub fn package_name(specifier: &str) -> String {
    let mut parts = specifier.split('/');
    let first = parts.next().unwrap_or_default();
    match (first.starts_with('@'), parts.next()) {
        (true, Some(second)) => format!("{first}/{second}"),
        _ => first.to_string(),
    }
}

/// Files, edges and packages reachable from one component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
    pub files: Vec<(RelativePath, FileRole)>,
    pub edges: Vec<DependencyEdge>,
    pub external: BTreeSet<String>,
    pub warnings: Vec<Warning>,
}

/// Breadth-first closure from `root`.
///
/// The visited set is keyed by resolved path, so cycles terminate and every
/// file appears once no matter how many edges reach it. With
/// `include_dependencies` off only the root's own files are returned, but
/// their packages and dangling references are still reported.
pub fn closure<'s, S>(
    layout: &SourceLayout,
    catalog: &Catalog,
    root: &ComponentRecord,
    source: S,
    include_dependencies: bool,
) -> Closure
where
    S: Fn(&RelativePath) -> Option<&'s str>,
{
    let resolver = ModuleResolver::new(layout, |p: &RelativePath| source(p).is_some());
    let mut out = Closure::default();
    let mut visited: HashSet<RelativePath> = HashSet::new();
    let mut queue: VecDeque<RelativePath> = VecDeque::new();
    let mut seen_edges: HashSet<(RelativePath, RelativePath)> = HashSet::new();

    let roots = std::iter::once((&root.path, FileRole::Root))
        .chain(root.auxiliary.iter().map(|p| (p, FileRole::Auxiliary)));
    for (path, role) in roots {
        if source(path).is_some() && visited.insert(path.clone()) {
            out.files.push((path.clone(), role));
            queue.push_back(path.clone());
        }
    }

    while let Some(current) = queue.pop_front() {
        let Some(text) = source(&current) else {
            continue;
        };

        for specifier in scan_specifiers(text) {
            match resolver.resolve(&current, specifier) {
                Reference::External(name) => {
                    out.external.insert(name);
                }
                Reference::Dangling => out.warnings.push(Warning::DanglingDependency {
                    from: current.clone(),
                    specifier: specifier.to_string(),
                }),
                Reference::Local(target) => {
                    if !include_dependencies || target == current {
                        continue;
                    }
                    let component = catalog.by_path(&target);
                    if seen_edges.insert((current.clone(), target.clone())) {
                        out.edges.push(DependencyEdge {
                            from: current.clone(),
                            to: match component {
                                Some(r) => EdgeTarget::Component {
                                    identity: r.identity.clone(),
                                    category: r.category,
                                    path: target.clone(),
                                },
                                None => EdgeTarget::Module {
                                    path: target.clone(),
                                },
                            },
                        });
                    }
                    if visited.insert(target.clone()) {
                        let role = if component.is_some() {
                            FileRole::Component
                        } else {
                            FileRole::Module
                        };
                        out.files.push((target.clone(), role));
                        queue.push_back(target);
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn scans_every_import_form() {
        let text = r#"
            import React, { useState } from 'react';
            import type { Props } from "./types";
            import {
              motion,
              AnimatePresence,
            } from "framer-motion";
            import './hero.css';
            export { Button } from '@/components/ui/button';
            export * from "../shared";
            const Lazy = dynamic(() => import('./lazy-panel'));
            const fs = require("node:fs");
        "#;
        assert_eq!(
            scan_specifiers(text),
            vec![
                "react",
                "./types",
                "framer-motion",
                "./hero.css",
                "@/components/ui/button",
                "../shared",
                "./lazy-panel",
                "node:fs",
            ]
        );
    }

    #[test]
    fn rewrite_touches_only_selected_specifiers() {
        let text = "import { motion } from 'framer-motion';\nimport { Button } from \"../ui/Button\";\n";
        let out = rewrite_specifiers(text, |s| (s == "../ui/Button").then(|| "./Button".to_string()));
        assert_eq!(
            out,
            "import { motion } from 'framer-motion';\nimport { Button } from \"./Button\";\n"
        );
        assert_eq!(rewrite_specifiers(text, |_| None), text);
    }

    #[test]
    fn package_names() {
        assert_eq!(package_name("react-dom/client"), "react-dom");
        assert_eq!(package_name("@radix-ui/react-slot"), "@radix-ui/react-slot");
        assert_eq!(package_name("@radix-ui/react-slot/dist"), "@radix-ui/react-slot");
        assert_eq!(package_name("lodash"), "lodash");
    }

    fn tree(files: &[(&str, &str)]) -> BTreeMap<RelativePath, String> {
        files
            .iter()
            .map(|(p, c)| (RelativePath::new(p), c.to_string()))
            .collect()
    }

    #[test]
    fn resolves_alias_extension_and_index() {
        let layout = SourceLayout::default();
        let files = tree(&[
            ("homepage/lib/utils.ts", ""),
            ("homepage/components/ui/index.ts", ""),
        ]);
        let resolver = ModuleResolver::new(&layout, |p: &RelativePath| files.contains_key(p));
        let from = RelativePath::new("homepage/components/ui/button.tsx");

        assert_eq!(
            resolver.resolve(&from, "@/lib/utils"),
            Reference::Local(RelativePath::new("homepage/lib/utils.ts"))
        );
        assert_eq!(
            resolver.resolve(&from, "../ui"),
            Reference::Local(RelativePath::new("homepage/components/ui/index.ts"))
        );
        assert_eq!(resolver.resolve(&from, "./missing"), Reference::Dangling);
        assert_eq!(
            resolver.resolve(&from, "../../../../escape"),
            Reference::Dangling
        );
        assert_eq!(
            resolver.resolve(&from, "clsx"),
            Reference::External("clsx".into())
        );
    }

    #[test]
    fn closure_terminates_on_cycles_without_duplicates() {
        let layout = SourceLayout::default();
        let files = tree(&[
            (
                "homepage/components/ui/ping.tsx",
                "import { Pong } from './pong';\nimport { cn } from '@/lib/utils';",
            ),
            (
                "homepage/components/ui/pong.tsx",
                "import { Ping } from './ping';\nimport { cn } from '@/lib/utils';\nimport x from 'framer-motion';",
            ),
            ("homepage/lib/utils.ts", "import { clsx } from 'clsx';"),
        ]);
        let catalog = Catalog::build(&layout, files.keys(), &[]).unwrap();
        let root = catalog.lookup("ping").unwrap();

        let c = closure(&layout, &catalog, root, |p| files.get(p).map(String::as_str), true);

        let paths: Vec<_> = c.files.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "homepage/components/ui/ping.tsx",
                "homepage/components/ui/pong.tsx",
                "homepage/lib/utils.ts",
            ]
        );
        assert_eq!(c.files[1].1, FileRole::Component);
        assert_eq!(c.files[2].1, FileRole::Module);
        assert_eq!(c.edges.len(), 4);
        assert_eq!(
            c.external.iter().cloned().collect::<Vec<_>>(),
            vec!["clsx", "framer-motion"]
        );
        assert!(c.warnings.is_empty());
    }

    #[test]
    fn dangling_references_become_warnings() {
        let layout = SourceLayout::default();
        let files = tree(&[(
            "homepage/components/ui/hero.tsx",
            "import { Secret } from './secret-panel';",
        )]);
        let catalog = Catalog::build(&layout, files.keys(), &[]).unwrap();
        let root = catalog.lookup("hero").unwrap();

        let c = closure(&layout, &catalog, root, |p| files.get(p).map(String::as_str), true);

        assert_eq!(c.files.len(), 1);
        assert_eq!(
            c.warnings,
            vec![Warning::DanglingDependency {
                from: RelativePath::new("homepage/components/ui/hero.tsx"),
                specifier: "./secret-panel".into(),
            }]
        );
    }

    #[test]
    fn without_dependencies_only_root_files_are_kept() {
        let layout = SourceLayout::default();
        let files = tree(&[
            (
                "homepage/components/ui/card.tsx",
                "import styles from './card.module.css';\nimport { cn } from '@/lib/utils';\nimport 'clsx';",
            ),
            ("homepage/components/ui/card.module.css", ".card {}"),
            ("homepage/lib/utils.ts", ""),
        ]);
        let catalog = Catalog::build(&layout, files.keys(), &[]).unwrap();
        let root = catalog.lookup("card").unwrap();

        let c = closure(&layout, &catalog, root, |p| files.get(p).map(String::as_str), false);

        let roles: Vec<_> = c.files.iter().map(|(_, r)| *r).collect();
        assert_eq!(roles, vec![FileRole::Root, FileRole::Auxiliary]);
        assert!(c.edges.is_empty());
        assert!(c.external.contains("clsx"));
    }
}

//! Design-property mining over already-redacted source text.

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use crate::domain::value_objects::{PropertyKind, PropertySelector};

static COLORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:bg|text|border)-(?:slate|gray|zinc|neutral|stone|red|orange|amber|yellow|lime|green|emerald|teal|cyan|sky|blue|indigo|violet|purple|fuchsia|pink|rose)-\d+\b",
    )
    .expect("static regex")
});
static ANIMATIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\banimate-[\w-]+").expect("static regex"));
static BORDERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\brounded-(?:none|sm|md|lg|xl|2xl|3xl|full|\d+)\b").expect("static regex")
});
static SPACING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:p|m|px|py|pl|pr|pt|pb|mx|my|ml|mr|mt|mb)-\d+\b").expect("static regex")
});
static FONTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\btext-(?:xs|sm|base|lg|xl|2xl|3xl|4xl|5xl|6xl|7xl|8xl|9xl)\b")
        .expect("static regex")
});

fn matcher(kind: PropertyKind) -> &'static Regex {
    match kind {
        PropertyKind::Colors => &COLORS,
        PropertyKind::Animations => &ANIMATIONS,
        PropertyKind::Borders => &BORDERS,
        PropertyKind::Spacing => &SPACING,
        PropertyKind::Fonts => &FONTS,
    }
}

/// Property kind → sorted set of literal values found.
///
/// Every requested kind has a key, even when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SpecBundle(BTreeMap<PropertyKind, BTreeSet<String>>);

impl SpecBundle {
    /// Scan `sources` for the kinds named by `selector`.
    pub fn extract<'a>(
        selector: PropertySelector,
        sources: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let kinds = selector.kinds();
        let mut bundle: BTreeMap<PropertyKind, BTreeSet<String>> =
            kinds.iter().map(|k| (*k, BTreeSet::new())).collect();

        for text in sources {
            for kind in &kinds {
                if let Some(values) = bundle.get_mut(kind) {
                    values.extend(matcher(*kind).find_iter(text).map(|m| m.as_str().to_string()));
                }
            }
        }
        Self(bundle)
    }

    pub fn get(&self, kind: PropertyKind) -> Option<&BTreeSet<String>> {
        self.0.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKind, &BTreeSet<String>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }
}

/// Whether `text` contains at least one literal of `kind`.
pub fn mentions(kind: PropertyKind, text: &str) -> bool {
    matcher(kind).is_match(text)
}

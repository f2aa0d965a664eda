//! Free-text ranking over catalog metadata and redacted content.

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::domain::{
    entities::{ComponentRecord, RelativePath, common::to_kebab_case},
    error::DomainError,
    specs,
    value_objects::{Category, CategoryFilter, PropertyKind},
};

/// Why a component matched, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTier {
    Dependency = 1,
    Content = 2,
    IdentitySubstring = 3,
    Identity = 4,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub category: CategoryFilter,
    /// Only components importing this third-party package.
    pub uses: Option<String>,
    /// Only components with at least one literal of this kind.
    pub has_property: Option<PropertyKind>,
}

/// A validated, normalized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
    kebab: String,
    filters: SearchFilters,
}

impl SearchQuery {
    pub fn new(text: &str, filters: SearchFilters) -> Result<Self, DomainError> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Err(DomainError::InvalidQuery {
                reason: "query is empty".into(),
            });
        }
        let kebab = to_kebab_case(&needle);
        Ok(Self {
            needle,
            kebab,
            filters,
        })
    }

    pub fn text(&self) -> &str {
        &self.needle
    }
}

/// What the ranker knows about one component.
pub struct Candidate<'a> {
    pub record: &'a ComponentRecord,
    /// Redacted text of the component's own files.
    pub content: &'a str,
    /// Third-party packages the component imports directly.
    pub external: &'a BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub identity: String,
    pub category: Category,
    pub path: RelativePath,
    pub tier: MatchTier,
    pub reason: String,
}

/// Score every candidate; ties keep candidate order.
pub fn rank<'a>(
    query: &SearchQuery,
    candidates: impl IntoIterator<Item = Candidate<'a>>,
) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = candidates
        .into_iter()
        .filter(|c| admits(&query.filters, c))
        .filter_map(|c| score(query, &c))
        .collect();
    hits.sort_by_key(|h| Reverse(h.tier));
    hits
}

fn admits(filters: &SearchFilters, c: &Candidate<'_>) -> bool {
    if !filters.category.admits(c.record.category) {
        return false;
    }
    if let Some(pkg) = &filters.uses {
        if !c.external.iter().any(|e| e.eq_ignore_ascii_case(pkg)) {
            return false;
        }
    }
    filters
        .has_property
        .is_none_or(|kind| specs::mentions(kind, c.content))
}

fn score(q: &SearchQuery, c: &Candidate<'_>) -> Option<SearchHit> {
    let identity = c.record.identity.as_str();

    let (tier, reason) = if identity == q.needle || identity == q.kebab {
        (MatchTier::Identity, format!("identity is '{identity}'"))
    } else if identity.contains(&q.needle) || (!q.kebab.is_empty() && identity.contains(&q.kebab)) {
        (MatchTier::IdentitySubstring, format!("identity contains '{}'", q.needle))
    } else if c.content.to_lowercase().contains(&q.needle) {
        (MatchTier::Content, format!("source mentions '{}'", q.needle))
    } else if let Some(pkg) = c
        .external
        .iter()
        .find(|e| e.to_lowercase().contains(&q.needle))
    {
        (MatchTier::Dependency, format!("uses '{pkg}'"))
    } else {
        return None;
    };

    Some(SearchHit {
        identity: identity.to_string(),
        category: c.record.category,
        path: c.record.path.clone(),
        tier,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        record: ComponentRecord,
        content: &'static str,
        external: BTreeSet<String>,
    }

    fn fixture(identity: &str, category: Category, content: &'static str, deps: &[&str]) -> Fixture {
        Fixture {
            record: ComponentRecord::new(
                identity,
                category,
                RelativePath::new(format!("homepage/components/{identity}.tsx")),
            ),
            content,
            external: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn candidates(fixtures: &[Fixture]) -> Vec<Candidate<'_>> {
        fixtures
            .iter()
            .map(|f| Candidate {
                record: &f.record,
                content: f.content,
                external: &f.external,
            })
            .collect()
    }

    fn identities(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.identity.as_str()).collect()
    }

    #[test]
    fn empty_query_is_rejected() {
        assert!(matches!(
            SearchQuery::new("   ", SearchFilters::default()),
            Err(DomainError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn tiers_rank_identity_above_dependencies() {
        let fixtures = [
            fixture("fade-in", Category::Animations, "", &["framer-motion"]),
            fixture("motion-card", Category::Ui, "", &[]),
            fixture("hero", Category::Sections, "<motion.div/>", &[]),
            fixture("motion", Category::Ui, "", &[]),
        ];
        let q = SearchQuery::new("Motion", SearchFilters::default()).unwrap();
        let hits = rank(&q, candidates(&fixtures));

        assert_eq!(identities(&hits), vec!["motion", "motion-card", "hero", "fade-in"]);
        assert_eq!(hits[3].tier, MatchTier::Dependency);
        assert_eq!(hits[3].reason, "uses 'framer-motion'");
    }

    #[test]
    fn ties_keep_traversal_order() {
        let fixtures = [
            fixture("zeta-button", Category::Ui, "", &[]),
            fixture("alpha-button", Category::Ui, "", &[]),
        ];
        let q = SearchQuery::new("button", SearchFilters::default()).unwrap();
        assert_eq!(
            identities(&rank(&q, candidates(&fixtures))),
            vec!["zeta-button", "alpha-button"]
        );
    }

    #[test]
    fn filters_narrow_candidates() {
        let fixtures = [
            fixture("hero-section", Category::Sections, "animate-pulse", &["framer-motion"]),
            fixture("hero-banner", Category::Ui, "", &[]),
        ];

        let by_category = SearchQuery::new(
            "hero",
            SearchFilters {
                category: CategoryFilter::Only(Category::Ui),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(identities(&rank(&by_category, candidates(&fixtures))), vec!["hero-banner"]);

        let by_package = SearchQuery::new(
            "hero",
            SearchFilters {
                uses: Some("Framer-Motion".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(identities(&rank(&by_package, candidates(&fixtures))), vec!["hero-section"]);

        let animated = SearchQuery::new(
            "hero",
            SearchFilters {
                has_property: Some(PropertyKind::Animations),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(identities(&rank(&animated, candidates(&fixtures))), vec!["hero-section"]);
    }

    #[test]
    fn multi_word_queries_match_kebab_identities() {
        let fixtures = [fixture("hero-section", Category::Sections, "", &[])];
        let q = SearchQuery::new("Hero Section", SearchFilters::default()).unwrap();
        let hits = rank(&q, candidates(&fixtures));
        assert_eq!(hits[0].tier, MatchTier::Identity);
    }
}

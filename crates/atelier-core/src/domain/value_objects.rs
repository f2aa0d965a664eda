//! Domain value objects: Category, PropertyKind, ScaffoldTemplate, VersionRef.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. Every
//! string the outside world sends (category filter, spec property, template
//! name, version specifier) is parsed here into a closed enum, so the rest of
//! the engine matches on variants instead of comparing strings.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm, the `FromStr` arm and the `ALL` entry here
//! 3. The compiler points at every handler that must learn the new variant

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Category ─────────────────────────────────────────────────────────────────

/// The category a component is filed under, derived from directory convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sections,
    Navigation,
    Animations,
    Ui,
    Cosmic,
    MagicUi,
    Experiments,
}

impl Category {
    /// Listing order used for grouped output.
    pub const ALL: [Category; 7] = [
        Self::Sections,
        Self::Navigation,
        Self::Animations,
        Self::Ui,
        Self::Cosmic,
        Self::MagicUi,
        Self::Experiments,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sections => "sections",
            Self::Navigation => "navigation",
            Self::Animations => "animations",
            Self::Ui => "ui",
            Self::Cosmic => "cosmic",
            Self::MagicUi => "magicui",
            Self::Experiments => "experiments",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sections" | "section" => Ok(Self::Sections),
            "navigation" | "nav" => Ok(Self::Navigation),
            "animations" | "animation" => Ok(Self::Animations),
            "ui" => Ok(Self::Ui),
            "cosmic" => Ok(Self::Cosmic),
            "magicui" | "magic-ui" => Ok(Self::MagicUi),
            "experiments" | "experiment" => Ok(Self::Experiments),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}

/// A category selector: one category or every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn admits(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => *c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

// ── PropertyKind ─────────────────────────────────────────────────────────────

/// A design property family mined from component source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Colors,
    Animations,
    Borders,
    Spacing,
    Fonts,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 5] = [
        Self::Colors,
        Self::Animations,
        Self::Borders,
        Self::Spacing,
        Self::Fonts,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Colors => "colors",
            Self::Animations => "animations",
            Self::Borders => "borders",
            Self::Spacing => "spacing",
            Self::Fonts => "fonts",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "colors" | "color" => Ok(Self::Colors),
            "animations" | "animation" => Ok(Self::Animations),
            "borders" | "border" => Ok(Self::Borders),
            "spacing" => Ok(Self::Spacing),
            "fonts" | "font" => Ok(Self::Fonts),
            _ => Err(DomainError::UnknownProperty(s.to_string())),
        }
    }
}

/// Which property kinds a specs request wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertySelector {
    #[default]
    All,
    Only(PropertyKind),
}

impl PropertySelector {
    pub fn kinds(&self) -> Vec<PropertyKind> {
        match self {
            Self::All => PropertyKind::ALL.to_vec(),
            Self::Only(kind) => vec![*kind],
        }
    }
}

impl FromStr for PropertySelector {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

// ── ScaffoldTemplate ─────────────────────────────────────────────────────────

/// Output project shape for scaffold generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaffoldTemplate {
    FullProject,
    MinimalLanding,
}

impl ScaffoldTemplate {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullProject => "full-project",
            Self::MinimalLanding => "minimal-landing",
        }
    }
}

impl fmt::Display for ScaffoldTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaffoldTemplate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full-project" | "full" | "nextjs-full-project" => Ok(Self::FullProject),
            "minimal-landing" | "landing" | "landing-page" => Ok(Self::MinimalLanding),
            _ => Err(DomainError::UnknownTemplate(s.to_string())),
        }
    }
}

// ── VersionRef ───────────────────────────────────────────────────────────────

/// A version specifier: `latest` | `<tag>` | `<revision-prefix>`.
///
/// Bare specifiers made of 4 to 40 hex digits parse as revision prefixes,
/// anything else as a tag. `tag:` and `rev:` prefixes force the reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum VersionRef {
    #[default]
    Latest,
    Tag(String),
    Revision(String),
}

impl fmt::Display for VersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Tag(t) => f.write_str(t),
            Self::Revision(r) => f.write_str(r),
        }
    }
}

impl FromStr for VersionRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("latest") || s == "HEAD" {
            return Ok(Self::Latest);
        }
        if let Some(tag) = s.strip_prefix("tag:") {
            return non_empty(tag, s).map(Self::Tag);
        }
        if let Some(rev) = s.strip_prefix("rev:") {
            return non_empty(rev, s).map(|r| Self::Revision(r.to_ascii_lowercase()));
        }
        if is_revision_prefix(s) {
            Ok(Self::Revision(s.to_ascii_lowercase()))
        } else {
            Ok(Self::Tag(s.to_string()))
        }
    }
}

fn non_empty(value: &str, original: &str) -> Result<String, DomainError> {
    if value.trim().is_empty() {
        Err(DomainError::VersionNotFound {
            version: original.to_string(),
        })
    } else {
        Ok(value.trim().to_string())
    }
}

fn is_revision_prefix(s: &str) -> bool {
    (4..=40).contains(&s.len()) && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// A changelog range `<from>..<to>`: entries reachable from `to` but not
/// from `from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    pub from: VersionRef,
    pub to: VersionRef,
}

impl FromStr for VersionRange {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidRange {
            range: s.to_string(),
            reason: reason.to_string(),
        };

        if s.contains("...") {
            return Err(invalid("symmetric '...' ranges are not supported"));
        }
        let (from, to) = s
            .split_once("..")
            .ok_or_else(|| invalid("expected '<from>..<to>'"))?;
        if from.trim().is_empty() || to.trim().is_empty() {
            return Err(invalid("both ends of the range are required"));
        }
        if to.contains("..") {
            return Err(invalid("more than one '..' separator"));
        }

        Ok(Self {
            from: from.parse().map_err(|_| invalid("unparsable start"))?,
            to: to.parse().map_err(|_| invalid("unparsable end"))?,
        })
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

// ── RuleKind ─────────────────────────────────────────────────────────────────

/// What a redaction rule does when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    /// Glob over repository paths; matching files are never read.
    ExcludePath,
    /// Regex over file content; matches become `[REDACTED_KEY]`.
    RedactSecret,
    /// Literal name in file content; matches become `[REDACTED_TOOL]`.
    RedactProprietaryName,
}

impl RuleKind {
    pub const fn default_placeholder(&self) -> Option<&'static str> {
        match self {
            Self::ExcludePath => None,
            Self::RedactSecret => Some("[REDACTED_KEY]"),
            Self::RedactProprietaryName => Some("[REDACTED_TOOL]"),
        }
    }
}

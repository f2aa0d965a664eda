//! Redaction filter: path exclusion and content sanitization.
//!
//! Two passes, always in this order:
//!
//! 1. **Path exclusion** decides which tracked paths may be read at all.
//!    Excluded paths never reach the catalog and never appear as
//!    dependencies.
//! 2. **Content redaction** replaces sensitive tokens in surviving files
//!    with a fixed placeholder.
//!
//! A policy refuses any rule set in which one rule would match another
//! rule's placeholder, so redacting already-redacted text is a no-op.
//! Content that cannot be sanitized with certainty is withheld entirely.

use glob::{MatchOptions, Pattern};
use regex::{NoExpand, Regex, RegexBuilder};

use crate::domain::{
    entities::{RelativePath, Warning},
    error::DomainError,
    value_objects::RuleKind,
};

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
enum Matcher {
    /// Any pattern matching the whole path.
    WholePath(Vec<Pattern>),
    /// Pattern matched against each individual segment.
    Segment(Pattern),
    Content(Regex),
}

/// One redaction rule.
#[derive(Debug, Clone)]
pub struct RedactionRule {
    kind: RuleKind,
    pattern: String,
    placeholder: Option<String>,
    matcher: Matcher,
}

impl RedactionRule {
    /// Exclude paths matching `glob`.
    ///
    /// - `dir/` excludes everything below any directory named `dir`
    /// - a pattern without `/` is tested against every path segment
    /// - anything else is tested against the whole path
    pub fn exclude_path(glob: &str) -> Result<Self, DomainError> {
        let glob = glob.trim();
        let invalid = |reason: String| DomainError::InvalidRedactionRule {
            pattern: glob.to_string(),
            reason,
        };
        if glob.is_empty() {
            return Err(invalid("empty pattern".into()));
        }
        let compile = |p: &str| Pattern::new(p).map_err(|e| invalid(e.to_string()));

        let matcher = if let Some(dir) = glob.strip_suffix('/') {
            let dir = dir.trim_start_matches('/');
            Matcher::WholePath(vec![
                compile(&format!("{dir}/*"))?,
                compile(&format!("*/{dir}/*"))?,
            ])
        } else if !glob.contains('/') {
            Matcher::Segment(compile(glob)?)
        } else {
            Matcher::WholePath(vec![compile(glob)?])
        };

        Ok(Self {
            kind: RuleKind::ExcludePath,
            pattern: glob.to_string(),
            placeholder: None,
            matcher,
        })
    }

    /// Replace matches of `regex` with `[REDACTED_KEY]`.
    pub fn secret(regex: &str) -> Result<Self, DomainError> {
        Self::content(RuleKind::RedactSecret, regex, regex)
    }

    /// Replace the literal `name` with `[REDACTED_TOOL]`.
    pub fn proprietary_name(name: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidRedactionRule {
                pattern: name.to_string(),
                reason: "empty name".into(),
            });
        }
        Self::content(RuleKind::RedactProprietaryName, name, &regex::escape(name))
    }

    fn content(kind: RuleKind, display: &str, regex: &str) -> Result<Self, DomainError> {
        let compiled = RegexBuilder::new(regex)
            .case_insensitive(true)
            .build()
            .map_err(|e| DomainError::InvalidRedactionRule {
                pattern: display.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            kind,
            pattern: display.to_string(),
            placeholder: kind.default_placeholder().map(str::to_string),
            matcher: Matcher::Content(compiled),
        })
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        if self.kind != RuleKind::ExcludePath {
            self.placeholder = Some(placeholder.into());
        }
        self
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    fn matches_path(&self, path: &RelativePath) -> bool {
        match &self.matcher {
            Matcher::WholePath(patterns) => patterns
                .iter()
                .any(|p| p.matches_with(path.as_str(), GLOB_OPTIONS)),
            Matcher::Segment(pattern) => path
                .segments()
                .any(|s| pattern.matches_with(s, GLOB_OPTIONS)),
            Matcher::Content(_) => false,
        }
    }

    fn regex(&self) -> Option<&Regex> {
        match &self.matcher {
            Matcher::Content(re) => Some(re),
            _ => None,
        }
    }
}

/// A validated, ordered rule set.
#[derive(Debug, Clone, Default)]
pub struct RedactionPolicy {
    path_rules: Vec<RedactionRule>,
    content_rules: Vec<RedactionRule>,
}

impl RedactionPolicy {
    pub fn new(rules: impl IntoIterator<Item = RedactionRule>) -> Result<Self, DomainError> {
        let (path_rules, content_rules): (Vec<_>, Vec<_>) = rules
            .into_iter()
            .partition(|r| r.kind == RuleKind::ExcludePath);

        for rule in &content_rules {
            let Some(placeholder) = rule.placeholder() else {
                continue;
            };
            for other in &content_rules {
                if other.regex().is_some_and(|re| re.is_match(placeholder)) {
                    return Err(DomainError::InvalidRedactionRule {
                        pattern: other.pattern.clone(),
                        reason: format!("matches the placeholder '{placeholder}'"),
                    });
                }
            }
        }

        Ok(Self {
            path_rules,
            content_rules,
        })
    }

    /// Build a policy from plain configuration lists.
    pub fn from_lists(
        exclude_paths: &[String],
        secret_patterns: &[String],
        proprietary_names: &[String],
    ) -> Result<Self, DomainError> {
        let mut rules = Vec::new();
        for glob in exclude_paths {
            rules.push(RedactionRule::exclude_path(glob)?);
        }
        for re in secret_patterns {
            rules.push(RedactionRule::secret(re)?);
        }
        for name in proprietary_names {
            rules.push(RedactionRule::proprietary_name(name)?);
        }
        Self::new(rules)
    }

    /// Policy extended with more rules, re-validated as a whole.
    pub fn extended(
        &self,
        extra: impl IntoIterator<Item = RedactionRule>,
    ) -> Result<Self, DomainError> {
        Self::new(
            self.path_rules
                .iter()
                .chain(self.content_rules.iter())
                .cloned()
                .chain(extra),
        )
    }

    /// Whether a path must never be read.
    pub fn is_excluded(&self, path: &RelativePath) -> bool {
        self.path_rules.iter().any(|r| r.matches_path(path))
    }

    /// Apply every content rule once, in order.
    pub fn redact(&self, text: &str) -> String {
        let mut out = text.to_string();
        for rule in &self.content_rules {
            if let (Some(re), Some(placeholder)) = (rule.regex(), rule.placeholder()) {
                if re.is_match(&out) {
                    out = re.replace_all(&out, NoExpand(placeholder)).into_owned();
                }
            }
        }
        out
    }

    /// Whether any content rule matches `text`.
    pub fn contains_sensitive(&self, text: &str) -> bool {
        self.content_rules
            .iter()
            .filter_map(RedactionRule::regex)
            .any(|re| re.is_match(text))
    }

    /// Decode and redact one file, or explain why it must be withheld.
    pub fn sanitize(&self, path: &RelativePath, bytes: &[u8]) -> Result<String, Warning> {
        let text = std::str::from_utf8(bytes).map_err(|_| Warning::RedactionExcluded {
            path: path.clone(),
            reason: "content is not valid UTF-8".into(),
        })?;

        let redacted = self.redact(text);
        if self.contains_sensitive(&redacted) {
            return Err(Warning::RedactionExcluded {
                path: path.clone(),
                reason: "sensitive content survived redaction".into(),
            });
        }
        Ok(redacted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RedactionPolicy {
        RedactionPolicy::from_lists(
            &[
                ".env*".into(),
                "*secret*".into(),
                "*internal*".into(),
                "personas/".into(),
                "Deep Research/".into(),
                "node_modules/".into(),
            ],
            &[
                r"sk-[a-zA-Z0-9]{48}".into(),
                r"api[_-]?key[_-]?[a-zA-Z0-9]+".into(),
            ],
            &["MyMarky".into(), "UseQueue".into()],
        )
        .unwrap()
    }

    #[test]
    fn excludes_by_segment_and_directory() {
        let p = policy();
        for path in [
            "homepage/.env.local",
            "homepage/components/SecretPanel.tsx",
            "homepage/internal-tools/x.ts",
            "personas/alice.md",
            "docs/Deep Research/notes.md",
            "homepage/node_modules/react/index.js",
        ] {
            assert!(p.is_excluded(&RelativePath::new(path)), "{path}");
        }
        for path in [
            "homepage/components/ui/button.tsx",
            "homepage/environment.ts",
            "homepage/mypersonas.ts",
        ] {
            assert!(!p.is_excluded(&RelativePath::new(path)), "{path}");
        }
    }

    #[test]
    fn redacts_case_insensitively() {
        let p = policy();
        let key = format!("sk-{}", "a".repeat(48));
        let text = format!("const k = '{key}'; // mymarky and API_KEY_abc123\n");
        let out = p.redact(&text);
        assert_eq!(
            out,
            "const k = '[REDACTED_KEY]'; // [REDACTED_TOOL] and [REDACTED_KEY]\n"
        );
    }

    #[test]
    fn redaction_is_idempotent() {
        let p = policy();
        let path = RelativePath::new("a.ts");
        let once = p.sanitize(&path, b"UseQueue apikey123").unwrap();
        let twice = p.sanitize(&path, once.as_bytes()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_rule_matching_its_own_placeholder() {
        let err = RedactionPolicy::from_lists(&[], &["REDACTED".into()], &[]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRedactionRule { .. }));

        let err = RedactionPolicy::from_lists(&[], &[], &["TOOL".into()]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRedactionRule { .. }));
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert!(RedactionRule::secret("(unclosed").is_err());
        assert!(RedactionRule::exclude_path("[").is_err());
        assert!(RedactionRule::proprietary_name("  ").is_err());
    }

    #[test]
    fn non_utf8_content_is_withheld() {
        let p = policy();
        let warning = p
            .sanitize(&RelativePath::new("blob.ts"), &[0xff, 0xfe, 0x00])
            .unwrap_err();
        assert!(matches!(warning, Warning::RedactionExcluded { .. }));
    }

    #[test]
    fn custom_placeholder() {
        let p = RedactionPolicy::new([RedactionRule::proprietary_name("Acme")
            .unwrap()
            .with_placeholder("<tool>")])
        .unwrap();
        assert_eq!(p.redact("use ACME here"), "use <tool> here");
    }
}

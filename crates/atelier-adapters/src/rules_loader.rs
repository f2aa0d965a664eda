//! Filesystem-based redaction rule loader.
//!
//! Reads an extra rule file named by `redaction.rules_file` and converts it
//! into domain [`RedactionRule`] values that are appended to the configured
//! policy.
//!
//! # Rule file format
//!
//! ```toml
//! # Shorthand lists, same meaning as the [redaction] config section
//! exclude_paths     = ["drafts/", "*.local.ts"]
//! secret_patterns   = ["ghp_[A-Za-z0-9]{36}"]
//! proprietary_names = ["Acme Studio"]
//!
//! # Explicit rules, with an optional custom placeholder
//! [[rule]]
//! kind        = "redact-proprietary-name"   # exclude-path | redact-secret | redact-proprietary-name
//! pattern     = "Blackbox"
//! placeholder = "[REDACTED_VENDOR]"
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument};

use atelier_core::domain::{DomainError, RedactionRule, RuleKind};

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a rule file.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct RuleManifest {
    #[serde(default)]
    pub exclude_paths: Vec<String>,
    #[serde(default)]
    pub secret_patterns: Vec<String>,
    #[serde(default)]
    pub proprietary_names: Vec<String>,
    /// Explicit `[[rule]]` entries.
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleEntry>,
}

/// One `[[rule]]` entry.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    pub kind: RuleKind,
    pub pattern: String,
    /// Replacement text; ignored for `exclude-path`.
    pub placeholder: Option<String>,
}

impl RuleEntry {
    fn to_rule(&self) -> Result<RedactionRule, DomainError> {
        let rule = match self.kind {
            RuleKind::ExcludePath => RedactionRule::exclude_path(&self.pattern)?,
            RuleKind::RedactSecret => RedactionRule::secret(&self.pattern)?,
            RuleKind::RedactProprietaryName => RedactionRule::proprietary_name(&self.pattern)?,
        };
        Ok(match &self.placeholder {
            Some(p) => rule.with_placeholder(p.clone()),
            None => rule,
        })
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`RedactionRule`]s from a TOML file.
///
/// # Example
///
/// ```no_run
/// use atelier_adapters::rules_loader::RulesLoader;
///
/// let rules = RulesLoader::new("./redaction.toml").load()?;
/// println!("Loaded {} rules", rules.len());
/// # Ok::<(), atelier_core::domain::DomainError>(())
/// ```
pub struct RulesLoader {
    path: PathBuf,
}

impl RulesLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse and compile every rule in the file.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRedactionRule`] if the file is missing,
    /// unparseable, or any pattern fails to compile. A bad rule fails the
    /// whole file: silently dropping a redaction rule would leak content.
    #[instrument(skip(self), fields(file = %self.path.display()))]
    pub fn load(&self) -> Result<Vec<RedactionRule>, DomainError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| self.invalid(format!("failed to read: {e}")))?;
        let rules = parse_rules(&raw).map_err(|e| match e {
            DomainError::InvalidRedactionRule { pattern, reason } if pattern.is_empty() => {
                self.invalid(reason)
            }
            other => other,
        })?;
        debug!(count = rules.len(), "loaded redaction rules");
        Ok(rules)
    }

    fn invalid(&self, reason: String) -> DomainError {
        DomainError::InvalidRedactionRule {
            pattern: self.path.display().to_string(),
            reason,
        }
    }
}

/// Compile the rules in a TOML document, shorthand lists first.
pub fn parse_rules(raw: &str) -> Result<Vec<RedactionRule>, DomainError> {
    let manifest: RuleManifest = toml::from_str(raw).map_err(|e| DomainError::InvalidRedactionRule {
        pattern: String::new(),
        reason: format!("failed to parse: {e}"),
    })?;

    let mut rules = Vec::new();
    for glob in &manifest.exclude_paths {
        rules.push(RedactionRule::exclude_path(glob)?);
    }
    for re in &manifest.secret_patterns {
        rules.push(RedactionRule::secret(re)?);
    }
    for name in &manifest.proprietary_names {
        rules.push(RedactionRule::proprietary_name(name)?);
    }
    for entry in &manifest.rules {
        rules.push(entry.to_rule()?);
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::domain::{RedactionPolicy, RelativePath};
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
exclude_paths = ["drafts/"]
secret_patterns = ["ghp_[A-Za-z0-9]{8}"]

[[rule]]
kind = "redact-proprietary-name"
pattern = "Blackbox"
placeholder = "[REDACTED_VENDOR]"
"#;

    #[test]
    fn shorthand_and_explicit_rules_are_compiled() {
        let rules = parse_rules(SAMPLE).unwrap();
        let kinds: Vec<_> = rules.iter().map(|r| r.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::ExcludePath,
                RuleKind::RedactSecret,
                RuleKind::RedactProprietaryName
            ]
        );
        assert_eq!(rules[2].placeholder(), Some("[REDACTED_VENDOR]"));

        let policy = RedactionPolicy::new(rules).unwrap();
        assert!(policy.is_excluded(&RelativePath::new("homepage/drafts/x.tsx")));
        assert_eq!(
            policy.redact("token ghp_abcd1234 via blackbox"),
            "token [REDACTED_KEY] via [REDACTED_VENDOR]"
        );
    }

    #[test]
    fn bad_regex_names_the_pattern() {
        let err = parse_rules(r#"secret_patterns = ["(unclosed"]"#).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidRedactionRule { pattern, .. } if pattern == "(unclosed"
        ));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let raw = "[[rule]]\nkind = \"obfuscate\"\npattern = \"x\"\n";
        assert!(parse_rules(raw).is_err());
    }

    #[test]
    fn load_reports_the_file_on_parse_errors() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("rules.toml");
        fs::write(&file, "exclude_paths = 3").unwrap();

        let err = RulesLoader::new(&file).load().unwrap_err();
        match err {
            DomainError::InvalidRedactionRule { pattern, .. } => {
                assert!(pattern.ends_with("rules.toml"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(RulesLoader::new("/no/such/rules.toml").load().is_err());
    }

    #[test]
    fn loads_from_disk() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("rules.toml");
        fs::write(&file, SAMPLE).unwrap();
        assert_eq!(RulesLoader::new(&file).load().unwrap().len(), 3);
    }
}

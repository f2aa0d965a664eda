//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only ever sees the values derived
//! from it (a [`SourceLayout`] and a [`RedactionPolicy`]).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (`--root`, `--backend`, handled at the call-site)
//! 2. Environment variables: `ATELIER__<SECTION>__<KEY>`, lists comma-separated
//! 3. Config file: `--config`, else the platform config dir
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use atelier_adapters::{Backend, RulesLoader};
use atelier_core::{
    application::DEFAULT_MAX_DEPTH,
    domain::{DomainError, RedactionPolicy, RelativePath, SourceLayout},
};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub history: HistoryConfig,
    pub redaction: RedactionConfig,
    pub output: OutputConfig,
}

/// Where the tracked tree lives and how it is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Repository root.
    pub project_root: PathBuf,
    /// Tree prefix the engine tracks; `@/` imports resolve against it.
    pub app_root: String,
    /// Component directory, relative to `app_root`.
    pub components_dir: String,
    pub alias_prefix: String,
    pub component_extensions: Vec<String>,
    pub source_extensions: Vec<String>,
    pub backend: Backend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Upper bound on entries returned by one changelog walk.
    pub max_depth: usize,
}

/// The redaction rule set. These lists are data: nothing in the engine
/// hard-codes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactionConfig {
    pub exclude_paths: Vec<String>,
    pub secret_patterns: Vec<String>,
    pub proprietary_names: Vec<String>,
    /// Extra TOML rule file, appended to the lists above.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let layout = SourceLayout::default();
        Self {
            project_root: PathBuf::from("."),
            app_root: layout.app_root.to_string(),
            components_dir: layout.components_dir.to_string(),
            alias_prefix: layout.alias_prefix,
            component_extensions: layout.component_extensions,
            source_extensions: layout.source_extensions,
            backend: Backend::Auto,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for RedactionConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            exclude_paths: strings(&[
                ".env*",
                "*secret*",
                "*private*",
                "*internal*",
                "personas/",
                "messaging/",
                "internal-docs/",
                "Deep Research/",
                "node_modules/",
                ".git/",
            ]),
            secret_patterns: strings(&["sk-[a-zA-Z0-9]{48}", r"api[_-]?key[_-]?[a-zA-Z0-9]+"]),
            proprietary_names: Vec::new(),
            rules_file: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then `ATELIER__*`
    /// environment variables.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(p) => (p.clone(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");

        let defaults = Config::try_from(&Self::default())
            .context("Failed to serialise built-in defaults")?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix("ATELIER")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("redaction.exclude_paths")
                    .with_list_parse_key("redaction.secret_patterns")
                    .with_list_parse_key("redaction.proprietary_names")
                    .with_list_parse_key("source.component_extensions")
                    .with_list_parse_key("source.source_extensions")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from '{}'", path.display()))?;

        settings
            .try_deserialize()
            .context("Invalid configuration values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `atelier.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "atelier", "atelier")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(Self::LOCAL_FILE))
    }

    pub const LOCAL_FILE: &'static str = "atelier.toml";

    /// Repository root after applying the `--root` override.
    pub fn project_root(&self, override_root: Option<&Path>) -> PathBuf {
        override_root
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.source.project_root.clone())
    }

    /// The layout the engine indexes with.
    pub fn layout(&self) -> Result<SourceLayout, DomainError> {
        Ok(SourceLayout {
            app_root: RelativePath::try_new(&self.source.app_root)?,
            components_dir: RelativePath::try_new(&self.source.components_dir)?,
            alias_prefix: self.source.alias_prefix.clone(),
            component_extensions: self.source.component_extensions.clone(),
            source_extensions: self.source.source_extensions.clone(),
        })
    }

    /// Compile the configured lists plus the optional rule file.
    pub fn redaction_policy(&self) -> Result<RedactionPolicy, DomainError> {
        let base = RedactionPolicy::from_lists(
            &self.redaction.exclude_paths,
            &self.redaction.secret_patterns,
            &self.redaction.proprietary_names,
        )?;
        match &self.redaction.rules_file {
            Some(file) => base.extended(RulesLoader::new(file).load()?),
            None => Ok(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_track_homepage() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.source.app_root, "homepage");
        assert_eq!(cfg.source.backend, Backend::Auto);
        assert_eq!(cfg.history.max_depth, 500);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn default_rules_compile_and_redact() {
        let policy = AppConfig::default().redaction_policy().unwrap();
        assert!(policy.is_excluded(&RelativePath::new("homepage/.env.local")));
        assert!(policy.is_excluded(&RelativePath::new("homepage/personas/a.ts")));
        assert_eq!(policy.redact("key = api_key_123"), "key = [REDACTED_KEY]");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("absent.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("atelier.toml");
        std::fs::write(
            &file,
            "[source]\napp_root = \"site\"\nbackend = \"worktree\"\n\n[history]\nmax_depth = 20\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&file)).unwrap();
        assert_eq!(cfg.source.app_root, "site");
        assert_eq!(cfg.source.backend, Backend::Worktree);
        assert_eq!(cfg.history.max_depth, 20);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.source.components_dir, "components");
        assert!(!cfg.redaction.exclude_paths.is_empty());
    }

    #[test]
    fn layout_rejects_escaping_roots() {
        let mut cfg = AppConfig::default();
        cfg.source.app_root = "../outside".into();
        assert!(cfg.layout().is_err());
    }

    #[test]
    fn rules_file_extends_policy() {
        let tmp = TempDir::new().unwrap();
        let rules = tmp.path().join("rules.toml");
        std::fs::write(&rules, "proprietary_names = [\"Blackbox\"]\n").unwrap();

        let mut cfg = AppConfig::default();
        cfg.redaction.rules_file = Some(rules);
        let policy = cfg.redaction_policy().unwrap();
        assert_eq!(policy.redact("made with Blackbox"), "made with [REDACTED_TOOL]");
    }

    #[test]
    fn override_root_wins() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.project_root(None), PathBuf::from("."));
        assert_eq!(
            cfg.project_root(Some(Path::new("/repo"))),
            PathBuf::from("/repo")
        );
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}

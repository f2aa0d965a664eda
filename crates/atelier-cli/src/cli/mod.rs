//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here: user strings
//! are handed to the domain parsers by the command handlers.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, LogFormat, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "atelier",
    bin_name = "atelier",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Resolve design-system components into versioned blueprints",
    long_about = "Atelier reads a versioned component source tree, resolves components \
                  with their full dependency closure, redacts sensitive content and \
                  assembles runnable scaffolds.",
    after_help = "EXAMPLES:\n\
        \x20 atelier resolve hero-section\n\
        \x20 atelier list --category cosmic --at v1.2.0\n\
        \x20 atelier changelog navbar --range v1.0.0..latest\n\
        \x20 atelier scaffold --template full-project hero-section navbar -o ./site",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a component into a blueprint.
    #[command(
        visible_alias = "get",
        about = "Resolve a component and its dependencies",
        after_help = "EXAMPLES:\n\
            \x20 atelier resolve hero-section\n\
            \x20 atelier resolve cosmic/orbit-button --at v1.0.0\n\
            \x20 atelier resolve navbar --no-deps --output-format json"
    )]
    Resolve(ResolveArgs),

    /// List catalogued components.
    #[command(
        visible_alias = "ls",
        about = "List components by category",
        after_help = "EXAMPLES:\n\
            \x20 atelier list\n\
            \x20 atelier list --category ui\n\
            \x20 atelier list --at 3f2a9c1"
    )]
    List(ListArgs),

    /// Extract design properties.
    #[command(
        about = "Extract design properties from a component",
        after_help = "EXAMPLES:\n\
            \x20 atelier specs hero-section\n\
            \x20 atelier specs hero-section --property colors"
    )]
    Specs(SpecsArgs),

    /// Show change history.
    #[command(
        visible_alias = "log",
        about = "Show the change history of a component or the whole tree",
        after_help = "EXAMPLES:\n\
            \x20 atelier changelog\n\
            \x20 atelier changelog navbar --range v1.0.0..v1.1.0"
    )]
    Changelog(ChangelogArgs),

    /// Search components.
    #[command(
        visible_alias = "find",
        about = "Search components by name, content and dependencies",
        after_help = "EXAMPLES:\n\
            \x20 atelier search button\n\
            \x20 atelier search motion --uses framer-motion\n\
            \x20 atelier search card --has-property animations --category ui"
    )]
    Search(SearchArgs),

    /// Print one tracked file.
    #[command(
        visible_alias = "cat",
        about = "Print a redacted tracked file, such as a config file or lib module",
        after_help = "EXAMPLES:\n\
            \x20 atelier show tailwind.config.ts\n\
            \x20 atelier show lib/design-tokens.ts --at v1.0.0"
    )]
    Show(ShowArgs),

    /// Assemble components into a project.
    #[command(
        visible_alias = "new",
        about = "Assemble a runnable project from components",
        after_help = "EXAMPLES:\n\
            \x20 atelier scaffold --template minimal-landing hero-section -o ./landing\n\
            \x20 atelier scaffold -t full-project hero-section navbar -o ./site --dry-run"
    )]
    Scaffold(ScaffoldArgs),

    /// Initialise an Atelier configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 atelier init           # default location\n\
            \x20 atelier init --local   # ./atelier.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 atelier completions bash > ~/.local/share/bash-completion/completions/atelier\n\
            \x20 atelier completions zsh  > ~/.zfunc/_atelier"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Atelier configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 atelier config get source.app_root\n\
            \x20 atelier config list\n\
            \x20 atelier config path"
    )]
    Config(ConfigCommands),
}

// ── resolve ───────────────────────────────────────────────────────────────────

/// Arguments for `atelier resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// `name` or `category/name`.
    #[arg(value_name = "COMPONENT")]
    pub name: String,

    /// Version: `latest`, a tag, or a revision prefix.
    #[arg(long = "at", value_name = "VERSION", default_value = "latest")]
    pub at: String,

    /// Return only the component's own files.
    #[arg(long = "no-deps", help = "Do not include dependencies")]
    pub no_deps: bool,

    /// Print file contents in human output.
    #[arg(long = "contents", help = "Print file contents")]
    pub contents: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `atelier list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Category filter, or `all`.
    #[arg(short = 'k', long = "category", default_value = "all")]
    pub category: String,

    #[arg(long = "at", value_name = "VERSION", default_value = "latest")]
    pub at: String,
}

// ── specs ─────────────────────────────────────────────────────────────────────

/// Arguments for `atelier specs`.
#[derive(Debug, Args)]
pub struct SpecsArgs {
    #[arg(value_name = "COMPONENT")]
    pub name: String,

    /// colors, animations, borders, spacing, fonts or all.
    #[arg(short = 'p', long = "property", default_value = "all")]
    pub property: String,

    #[arg(long = "at", value_name = "VERSION", default_value = "latest")]
    pub at: String,
}

// ── show ──────────────────────────────────────────────────────────────────────

/// Arguments for `atelier show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Path relative to the app root.
    #[arg(value_name = "PATH")]
    pub path: String,

    #[arg(long = "at", value_name = "VERSION", default_value = "latest")]
    pub at: String,
}

// ── changelog ─────────────────────────────────────────────────────────────────

/// Arguments for `atelier changelog`.
#[derive(Debug, Args)]
pub struct ChangelogArgs {
    /// Limit to one component; omit for the whole tree.
    #[arg(value_name = "COMPONENT")]
    pub name: Option<String>,

    /// `<from>..<to>`, newest end last.
    #[arg(long = "range", value_name = "RANGE")]
    pub range: Option<String>,
}

// ── search ────────────────────────────────────────────────────────────────────

/// Arguments for `atelier search`.
#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(value_name = "QUERY")]
    pub query: String,

    #[arg(short = 'k', long = "category", default_value = "all")]
    pub category: String,

    /// Only components importing this package.
    #[arg(long = "uses", value_name = "PACKAGE")]
    pub uses: Option<String>,

    /// Only components with at least one literal of this kind.
    #[arg(long = "has-property", value_name = "PROPERTY")]
    pub has_property: Option<String>,

    #[arg(long = "at", value_name = "VERSION", default_value = "latest")]
    pub at: String,

    /// Maximum hits to print.
    #[arg(short = 'n', long = "limit", value_name = "N")]
    pub limit: Option<usize>,
}

// ── scaffold ──────────────────────────────────────────────────────────────────

/// Arguments for `atelier scaffold`.
#[derive(Debug, Args)]
pub struct ScaffoldArgs {
    /// Components to include; on path conflicts the later one wins.
    #[arg(value_name = "COMPONENT", required = true)]
    pub components: Vec<String>,

    /// `full-project` or `minimal-landing`.
    #[arg(short = 't', long = "template", default_value = "full-project")]
    pub template: String,

    /// Output directory; must be empty unless `--overwrite` is given.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: PathBuf,

    #[arg(long = "at", value_name = "VERSION", default_value = "latest")]
    pub at: String,

    /// Write into a non-empty directory.
    #[arg(long = "overwrite", help = "Allow writing into a non-empty directory")]
    pub overwrite: bool,

    /// Compute the plan without writing.
    #[arg(long = "dry-run", help = "Show what would be written without writing")]
    pub dry_run: bool,

    /// Skip the overwrite confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Do not ask for confirmation")]
    pub yes: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `atelier init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `atelier.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `atelier completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `atelier config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `source.app_root`.
        key: String,
    },
    /// Print all effective configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

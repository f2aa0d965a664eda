//! Command handlers, one module per subcommand.
//!
//! Handlers parse user strings with the domain `FromStr` impls, call the
//! engine, and render the result. No engine rules live here.

pub mod changelog;
pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod resolve;
pub mod scaffold;
pub mod search;
pub mod show;
pub mod specs;

use tracing::{debug, instrument};

use atelier_adapters::{Backend, BuiltinArtifacts, LocalFilesystem, open_history};
use atelier_core::{
    application::{AtelierEngine, ScaffoldService, SnapshotResolver},
    domain::Warning,
};

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Wire the engine from configuration plus the `--root` / `--backend` flags.
#[instrument(skip_all)]
pub fn build_engine(config: &AppConfig, global: &GlobalArgs) -> CliResult<AtelierEngine> {
    let backend = match global.backend.as_deref() {
        Some(raw) => raw.parse::<Backend>().map_err(|message| CliError::InvalidInput {
            message,
            source: None,
        })?,
        None => config.source.backend,
    };
    let root = config.project_root(global.root.as_deref());
    debug!(root = %root.display(), %backend, "Opening history");

    let history = open_history(&root, backend).with_cli_context(|| "opening history")?;
    let layout = config.layout()?;
    let policy = config.redaction_policy()?;

    let resolver = SnapshotResolver::new(history, layout, policy);
    let scaffolder = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(BuiltinArtifacts::new()),
    );
    Ok(AtelierEngine::new(resolver, scaffolder).with_max_depth(config.history.max_depth))
}

/// Print non-fatal warnings after a result.
pub(crate) fn print_warnings(output: &OutputManager, warnings: &[Warning]) -> CliResult<()> {
    for warning in warnings {
        output.warning(&warning.to_string())?;
    }
    Ok(())
}

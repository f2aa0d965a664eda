//! Implementation of the `atelier list` command.

use tracing::instrument;

use atelier_core::{
    application::ListRequest,
    domain::{CategoryFilter, VersionRef},
};

use crate::{
    cli::{GlobalArgs, ListArgs, OutputFormat},
    commands::build_engine,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(category = %args.category, at = %args.at))]
pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let request = ListRequest {
        category: args.category.parse::<CategoryFilter>()?,
        version: args.at.parse::<VersionRef>()?,
    };

    let engine = build_engine(&config, &global)?;
    let listing = engine.list_components(&request)?;

    match output.format() {
        OutputFormat::Json => output.json(&listing)?,
        // One `category/name` per line for scripts.
        OutputFormat::Plain => {
            for (category, names) in &listing.categories.0 {
                for name in names {
                    output.print(&format!("{category}/{name}"))?;
                }
            }
        }
        OutputFormat::Human | OutputFormat::Auto => {
            output.header(&format!(
                "{} components @ {} ({})",
                listing.total,
                listing.version,
                listing.snapshot.short()
            ))?;
            for (category, names) in &listing.categories.0 {
                output.print("")?;
                output.print(&format!("{category} ({})", names.len()))?;
                for name in names {
                    output.print(&format!("  {name}"))?;
                }
            }
        }
    }

    Ok(())
}

//! `atelier specs`: design properties of one component.

use tracing::instrument;

use atelier_core::{
    application::SpecsRequest,
    domain::{PropertySelector, VersionRef},
};

use crate::{
    cli::{GlobalArgs, SpecsArgs},
    commands::build_engine,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(component = %args.name))]
pub fn execute(
    args: SpecsArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let request = SpecsRequest {
        name: args.name,
        property: args.property.parse::<PropertySelector>()?,
        version: args.at.parse::<VersionRef>()?,
    };

    let engine = build_engine(&config, &global)?;
    let report = engine.get_specs(&request)?;

    if output.is_json() {
        output.json(&report)?;
        return Ok(());
    }

    output.header(&format!(
        "{} @ {} ({}), {} files",
        report.component,
        report.version,
        report.snapshot.short(),
        report.files
    ))?;
    if report.specs.is_empty() {
        output.info("No design properties found")?;
    }
    for (kind, values) in report.specs.iter() {
        output.print("")?;
        output.print(&format!("{kind} ({})", values.len()))?;
        for value in values {
            output.print(&format!("  {value}"))?;
        }
    }
    Ok(())
}

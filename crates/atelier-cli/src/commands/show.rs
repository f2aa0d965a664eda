//! `atelier show`: one redacted tracked file.

use tracing::instrument;

use atelier_core::{application::ReadFileRequest, domain::VersionRef};

use crate::{
    cli::{GlobalArgs, OutputFormat, ShowArgs},
    commands::build_engine,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(path = %args.path))]
pub fn execute(
    args: ShowArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let request = ReadFileRequest::new(args.path).at(args.at.parse::<VersionRef>()?);

    let engine = build_engine(&config, &global)?;
    let file = engine.read_file(&request)?;

    match output.format() {
        OutputFormat::Json => output.json(&file)?,
        OutputFormat::Plain => output.print(file.content.trim_end_matches('\n'))?,
        OutputFormat::Human | OutputFormat::Auto => {
            let owner = file
                .component
                .as_deref()
                .map(|c| format!(", component {c}"))
                .unwrap_or_default();
            output.header(&format!(
                "{} @ {} ({}{owner})",
                file.path,
                file.version,
                file.snapshot.short()
            ))?;
            output.print(file.content.trim_end_matches('\n'))?;
        }
    }
    Ok(())
}

//! `atelier changelog`: history of one component or of the whole tree.

use tracing::instrument;

use atelier_core::{application::ChangelogRequest, domain::VersionRange};

use crate::{
    cli::{ChangelogArgs, GlobalArgs},
    commands::build_engine,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    args: ChangelogArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let range = args
        .range
        .as_deref()
        .map(str::parse::<VersionRange>)
        .transpose()?;
    let request = ChangelogRequest {
        name: args.name,
        range,
    };

    let engine = build_engine(&config, &global)?;
    let changelog = engine.get_changelog(&request)?;

    if output.is_json() {
        output.json(&changelog)?;
        return Ok(());
    }

    let scope = changelog.component.as_deref().unwrap_or("all components");
    match &changelog.range {
        Some(range) => output.header(&format!("Changes to {scope} ({range})"))?,
        None => output.header(&format!("Changes to {scope}"))?,
    }
    if changelog.entries.is_empty() {
        output.info("No changes in range")?;
    }
    for entry in &changelog.entries {
        let tags = if entry.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", entry.tags.join(", "))
        };
        output.print(&format!(
            "{}  {}  {}{tags}",
            entry.revision.short(),
            entry
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            entry.message
        ))?;
    }
    if changelog.truncated {
        output.warning(&format!(
            "Output truncated at {} entries; raise history.max_depth to see more",
            changelog.entries.len()
        ))?;
    }
    Ok(())
}

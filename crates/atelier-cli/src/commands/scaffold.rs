//! Implementation of the `atelier scaffold` command.
//!
//! Translates arguments into a [`ScaffoldRequest`], asks before writing into
//! a non-empty directory, and reports what was (or would be) written.

use std::io::IsTerminal as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, instrument};

use atelier_core::{
    application::ScaffoldRequest,
    domain::{ScaffoldReport, ScaffoldTemplate, VersionRef},
};

use crate::{
    cli::{GlobalArgs, ScaffoldArgs},
    commands::{build_engine, print_warnings},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(template = %args.template, output = %args.output.display()))]
pub fn execute(
    args: ScaffoldArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let template: ScaffoldTemplate = args.template.parse()?;
    let mut request = ScaffoldRequest::new(template, args.components, &args.output);
    request.version = args.at.parse::<VersionRef>()?;
    request.overwrite = args.overwrite;
    request.dry_run = args.dry_run;

    if request.overwrite
        && !request.dry_run
        && !args.yes
        && needs_confirmation(&args.output)
        && !confirm_overwrite(&args.output.display().to_string())?
    {
        return Err(CliError::Cancelled);
    }

    let engine = build_engine(&config, &global)?;

    let spinner = spinner(&output, &format!("Assembling {template}..."));
    let result = engine.create_scaffold(&request);
    spinner.finish_and_clear();
    let report = result?;

    info!(
        files = report.files.len(),
        dry_run = report.dry_run,
        "Scaffold finished"
    );

    if output.is_json() {
        output.json(&report)?;
        return Ok(());
    }
    render(&report, &output)
}

fn render(report: &ScaffoldReport, output: &OutputManager) -> CliResult<()> {
    if report.dry_run {
        output.info(&format!(
            "Dry run: would write {} files to {}",
            report.files.len(),
            report.output.display()
        ))?;
        for path in &report.files {
            output.print(&format!("  {path}"))?;
        }
    } else {
        output.success(&format!(
            "Wrote {} files to {} ({} @ {})",
            report.files.len(),
            report.output.display(),
            report.template,
            report.snapshot.short()
        ))?;
    }
    print_warnings(output, &report.warnings)?;

    if !report.dry_run {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", report.output.display()))?;
        output.print("  npm install && npm run dev")?;
    }
    Ok(())
}

/// Only an interactive terminal writing into a populated directory is asked.
fn needs_confirmation(dir: &std::path::Path) -> bool {
    std::io::stdin().is_terminal()
        && std::fs::read_dir(dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
}

#[cfg(feature = "interactive")]
fn confirm_overwrite(dir: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(format!("'{dir}' is not empty. Write into it anyway?"))
        .default(false)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_overwrite(_dir: &str) -> CliResult<bool> {
    Ok(true)
}

fn spinner(output: &OutputManager, message: &str) -> ProgressBar {
    if output.is_quiet() || output.is_json() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner());
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

//! `atelier resolve`: resolve one component into a blueprint.

use tracing::{info, instrument};

use atelier_core::{
    application::ResolveRequest,
    domain::{Blueprint, FileRole, VersionRef},
};

use crate::{
    cli::{GlobalArgs, ResolveArgs},
    commands::{build_engine, print_warnings},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(component = %args.name, at = %args.at))]
pub fn execute(
    args: ResolveArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let version: VersionRef = args.at.parse()?;
    let mut request = ResolveRequest::new(&args.name).at(version);
    if args.no_deps {
        request = request.without_dependencies();
    }

    let engine = build_engine(&config, &global)?;
    let blueprint = engine.resolve_component(&request)?;
    info!(
        files = blueprint.files.len(),
        snapshot = %blueprint.snapshot,
        "Blueprint resolved"
    );

    if output.is_json() {
        output.json(&blueprint)?;
        return Ok(());
    }
    render(&blueprint, args.contents, &output)
}

fn render(blueprint: &Blueprint, contents: bool, output: &OutputManager) -> CliResult<()> {
    output.header(&format!(
        "{} @ {} ({})",
        blueprint.root.qualified_name(),
        blueprint.version,
        blueprint.snapshot.short()
    ))?;

    output.print("")?;
    output.print(&format!("Files ({}):", blueprint.files.len()))?;
    for file in &blueprint.files {
        output.print(&format!("  {:<10} {}", role_label(file.role), file.path))?;
        if contents {
            for line in file.content.lines() {
                output.detail(&format!("      {line}"))?;
            }
        }
    }

    if !blueprint.external.is_empty() {
        output.print("")?;
        output.print("Packages:")?;
        for package in &blueprint.external {
            output.print(&format!("  {package}"))?;
        }
    }

    if !blueprint.specs.is_empty() {
        output.print("")?;
        output.print("Design properties:")?;
        for (kind, values) in blueprint.specs.iter() {
            output.print(&format!("  {kind}: {}", values.len()))?;
        }
    }

    output.print("")?;
    output.detail(&format!("digest {}", blueprint.digest))?;
    print_warnings(output, &blueprint.warnings)
}

fn role_label(role: FileRole) -> &'static str {
    match role {
        FileRole::Root => "root",
        FileRole::Auxiliary => "auxiliary",
        FileRole::Component => "component",
        FileRole::Module => "module",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels_are_distinct() {
        let labels = [
            role_label(FileRole::Root),
            role_label(FileRole::Auxiliary),
            role_label(FileRole::Component),
            role_label(FileRole::Module),
        ];
        let unique: std::collections::BTreeSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len());
    }
}

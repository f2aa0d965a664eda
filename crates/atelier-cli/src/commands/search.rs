//! `atelier search`: ranked component search.

use tracing::{debug, instrument};

use atelier_core::{
    application::SearchRequest,
    domain::{CategoryFilter, MatchTier, PropertyKind, SearchFilters, VersionRef},
};

use crate::{
    cli::{GlobalArgs, OutputFormat, SearchArgs},
    commands::build_engine,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(query = %args.query))]
pub fn execute(
    args: SearchArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let filters = SearchFilters {
        category: args.category.parse::<CategoryFilter>()?,
        uses: args.uses,
        has_property: args
            .has_property
            .as_deref()
            .map(str::parse::<PropertyKind>)
            .transpose()?,
    };
    let request = SearchRequest {
        query: args.query,
        filters,
        version: args.at.parse::<VersionRef>()?,
    };

    let engine = build_engine(&config, &global)?;
    let mut results = engine.search(&request)?;
    debug!(hits = results.hits.len(), "Search finished");
    if let Some(limit) = args.limit {
        results.hits.truncate(limit);
    }

    match output.format() {
        OutputFormat::Json => output.json(&results)?,
        OutputFormat::Plain => {
            for hit in &results.hits {
                output.print(&format!("{}/{}", hit.category, hit.identity))?;
            }
        }
        OutputFormat::Human | OutputFormat::Auto => {
            output.header(&format!(
                "{} results for '{}' ({})",
                results.hits.len(),
                results.query,
                results.snapshot.short()
            ))?;
            for hit in &results.hits {
                output.print(&format!(
                    "  {:<9} {}/{}  {}",
                    tier_label(hit.tier),
                    hit.category,
                    hit.identity,
                    hit.reason
                ))?;
            }
        }
    }
    Ok(())
}

fn tier_label(tier: MatchTier) -> &'static str {
    match tier {
        MatchTier::Identity => "exact",
        MatchTier::IdentitySubstring => "name",
        MatchTier::Content => "content",
        MatchTier::Dependency => "uses",
    }
}

// `datekit cache` and `datekit sources`: housekeeping and diagnostics.

use clap::Subcommand;
use serde::Serialize;

use crate::error::Result;

use super::{Context, OutputFormat, print_json};

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Delete every cached API response
    Clear,
    /// Print the cache directory
    Path,
}

pub fn run_cache(ctx: &Context, command: CacheCommand) -> Result<()> {
    match command {
        CacheCommand::Clear => {
            let removed = ctx.cache.clear();
            println!(
                "Removed {} cached response(s) from {}",
                removed,
                ctx.cache.dir().display()
            );
        }
        CacheCommand::Path => println!("{}", ctx.cache.dir().display()),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct SourcesReport {
    config_file: Option<String>,
    config_exists: bool,
    sources: Vec<&'static str>,
}

pub fn run_sources(ctx: &Context) -> Result<()> {
    let file = ctx.config.file();
    let report = SourcesReport {
        config_file: file.map(|p| p.display().to_string()),
        config_exists: file.is_some_and(|p| p.exists()),
        sources: ctx.config.available_sources(),
    };
    print_json(&report, OutputFormat::Json)
}

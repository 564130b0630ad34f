// datekit: find events, restaurants, and classes for a night out.
// Parses arguments, sets up logging, and dispatches to command handlers.

mod cache;
mod commands;
mod config;
mod error;
mod http;
mod paths;
mod places;
mod preferences;
mod queries;
mod ticketmaster;
mod venues;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

use crate::commands::Context;
use crate::commands::classes::{ClassesArgs, QueriesArgs};
use crate::commands::events::EventsArgs;
use crate::commands::maintenance::CacheCommand;
use crate::commands::restaurants::RestaurantsArgs;
use crate::commands::venues::VenuesCommand;
use crate::config::Config;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upcoming events from Ticketmaster
    Events(EventsArgs),
    /// Restaurant search through Google Places
    Restaurants(RestaurantsArgs),
    /// Web search suggestions for classes and experiences
    Classes(ClassesArgs),
    /// Web search suggestions for comedy, theater, food, and museums
    Queries(QueriesArgs),
    /// Maintain the local venue registry
    #[command(subcommand)]
    Venues(VenuesCommand),
    /// Manage cached API responses
    #[command(subcommand)]
    Cache(CacheCommand),
    /// Show which data sources are configured
    Sources,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    // Only fails if a subscriber is already installed.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

async fn run(cli: Cli) -> error::Result<()> {
    let config = Config::load()?;
    let today = chrono::Local::now().date_naive();
    let ctx = Context::new(config, today)?;

    match cli.command {
        Commands::Events(args) => commands::events::run(&ctx, args).await,
        Commands::Restaurants(args) => commands::restaurants::run(&ctx, args).await,
        Commands::Classes(args) => commands::classes::run_classes(&ctx, args),
        Commands::Queries(args) => commands::classes::run_queries(&ctx, args),
        Commands::Venues(command) => commands::venues::run(&ctx, command).await,
        Commands::Cache(command) => commands::maintenance::run_cache(&ctx, command),
        Commands::Sources => commands::maintenance::run_sources(&ctx),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

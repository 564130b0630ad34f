// `datekit venues`: registry maintenance.
// Reports missing Ticketmaster ids, fills them in, and migrates old registry files.

use std::time::Duration;

use clap::Subcommand;
use tracing::info;

use crate::config::TICKETMASTER_API_KEY;
use crate::error::Result;
use crate::ticketmaster::TicketmasterClient;
use crate::venues::{Migration, Venue, VenueRegistry};

use super::Context;

/// Pause between venue lookups; the API allows 5 requests per second.
const LOOKUP_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Subcommand)]
pub enum VenuesCommand {
    /// Show which Ticketmaster venues still need ids
    Check,
    /// Look up missing Ticketmaster ids and save them to the registry
    Enrich {
        /// State code to narrow the search, e.g. CA
        #[arg(long)]
        state: Option<String>,
    },
    /// Convert a list-style registry to the {"venues": [...]} layout
    Migrate,
}

pub async fn run(ctx: &Context, command: VenuesCommand) -> Result<()> {
    let path = ctx.venues_path();
    match command {
        VenuesCommand::Check => {
            let registry = VenueRegistry::load(&path)?;
            let pending = print_stats(&registry);
            if pending.is_empty() {
                println!("All ticketmaster-platform venues have IDs!");
            } else {
                println!("Venues needing Ticketmaster IDs:");
                for venue in pending {
                    println!("  - {} ({})", venue.name, venue.slug);
                }
            }
            Ok(())
        }
        VenuesCommand::Enrich { state } => {
            let registry = VenueRegistry::load(&path)?;
            enrich(ctx, registry, &state.unwrap_or_default()).await
        }
        VenuesCommand::Migrate => {
            match VenueRegistry::migrate(&path)? {
                Migration::Migrated { venues } => {
                    println!("Migrated {} venue(s) in {}", venues, path.display());
                }
                Migration::AlreadyCanonical => {
                    println!("{} is already in the current layout", path.display());
                }
            }
            Ok(())
        }
    }
}

/// Print registry counts and return the venues still missing ids.
fn print_stats(registry: &VenueRegistry) -> Vec<&Venue> {
    let pending = registry.missing_platform_ids();
    println!(
        "Venue stats: {} have TM IDs, {} need TM IDs",
        registry.with_platform_ids().len(),
        pending.len()
    );
    println!("Total venues: {}", registry.venues().len());
    println!();
    pending
}

async fn enrich(ctx: &Context, mut registry: VenueRegistry, state: &str) -> Result<()> {
    let pending: Vec<(String, String)> = print_stats(&registry)
        .into_iter()
        .map(|v| (v.slug.clone(), v.name.clone()))
        .collect();

    if ctx.config.ticketmaster_key().is_none() {
        println!("Error: No {} configured.", TICKETMASTER_API_KEY);
        println!("Add to ~/.config/datekit/.env:");
        println!("  {}=your-key-here", TICKETMASTER_API_KEY);
        println!();
        println!("Get a free key at: https://developer.ticketmaster.com");
        return Ok(());
    }

    if pending.is_empty() {
        println!("All ticketmaster-platform venues already have IDs.");
        return Ok(());
    }

    println!("Searching Ticketmaster for {} venues...", pending.len());
    if !state.is_empty() {
        println!("  State filter: {}", state);
    }
    println!();

    let client = TicketmasterClient::from_config(&ctx.config, ctx.http.clone(), ctx.cache.clone());
    let mut updated = 0;
    for (slug, name) in &pending {
        match client.resolve_venue_id(name, state).await {
            Some(id) => {
                println!("  Found: {} -> {}", name, id);
                registry.set_platform_id(slug, id);
                updated += 1;
            }
            None => println!("  Not found: {}", name),
        }
        tokio::time::sleep(LOOKUP_INTERVAL).await;
    }

    registry.save()?;
    info!(updated, path = %registry.path().display(), "saved venue registry");
    println!("\nUpdated {} venue(s).", updated);
    Ok(())
}

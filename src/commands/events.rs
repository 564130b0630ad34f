// `datekit events`: upcoming events from Ticketmaster by category, venue, or artist.

use clap::{ArgGroup, Args, ValueEnum};
use serde::Serialize;

use crate::error::{DatekitError, Result};
use crate::ticketmaster::{EventQuery, EventSearch, TicketmasterClient};
use crate::venues::VenueRegistry;

use super::{Context, OutputFormat, print_json, warn_missing_city};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventCategory {
    Music,
    Comedy,
    #[value(alias = "theater")]
    Theatre,
}

impl EventCategory {
    /// Ticketmaster classification name.
    pub fn classification(&self) -> &'static str {
        match self {
            EventCategory::Music => "Music",
            EventCategory::Comedy => "Comedy",
            EventCategory::Theatre => "Theatre",
        }
    }
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["category", "venue", "artist", "all"])
))]
pub struct EventsArgs {
    /// Event category to search
    #[arg(long, value_enum)]
    pub category: Option<EventCategory>,
    /// Venue slug from venues.json
    #[arg(long)]
    pub venue: Option<String>,
    /// Search for an artist's events
    #[arg(long)]
    pub artist: Option<String>,
    /// Fetch every category
    #[arg(long)]
    pub all: bool,
    /// Days ahead to search (at most ten years)
    #[arg(long, default_value_t = 14, value_parser = clap::value_parser!(u32).range(..=3650))]
    pub days: u32,
    /// City to search in (default: from preferences.json)
    #[arg(long)]
    pub city: Option<String>,
    /// State code, e.g. CA or NY
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct AllCategories {
    music: EventSearch,
    comedy: EventSearch,
    theatre: EventSearch,
}

pub async fn run(ctx: &Context, args: EventsArgs) -> Result<()> {
    let client = TicketmasterClient::from_config(&ctx.config, ctx.http.clone(), ctx.cache.clone());

    if let Some(slug) = &args.venue {
        let result = fetch_by_venue(ctx, &client, slug, args.days).await?;
        return print_json(&result, args.format);
    }

    let city = ctx.resolve_city(args.city.as_deref())?;
    if city.is_empty() {
        warn_missing_city();
    }
    let state = args.state.clone().unwrap_or_default();

    if let Some(artist) = &args.artist {
        let result = client.search_artist(artist, &city, &state).await;
        return print_json(&result, args.format);
    }

    if let Some(category) = args.category {
        let result = fetch_by_category(ctx, &client, category, args.days, &city, &state).await;
        return print_json(&result, args.format);
    }

    let all = AllCategories {
        music: fetch_by_category(ctx, &client, EventCategory::Music, args.days, &city, &state)
            .await,
        comedy: fetch_by_category(ctx, &client, EventCategory::Comedy, args.days, &city, &state)
            .await,
        theatre: fetch_by_category(ctx, &client, EventCategory::Theatre, args.days, &city, &state)
            .await,
    };
    print_json(&all, args.format)
}

async fn fetch_by_category(
    ctx: &Context,
    client: &TicketmasterClient,
    category: EventCategory,
    days: u32,
    city: &str,
    state: &str,
) -> EventSearch {
    let query = EventQuery {
        classification: Some(category.classification().to_string()),
        city: city.to_string(),
        state_code: state.to_string(),
        ..EventQuery::default()
    }
    .between(ctx.today, days);
    client.search_events(&query).await
}

/// Events at a registry venue. An unknown slug yields an error result;
/// an unreadable registry is an error for the whole command.
async fn fetch_by_venue(
    ctx: &Context,
    client: &TicketmasterClient,
    slug: &str,
    days: u32,
) -> Result<EventSearch> {
    let registry = VenueRegistry::load(&ctx.venues_path())?;

    let Some(venue) = registry.find(slug) else {
        return Ok(EventSearch::failed(
            DatekitError::VenueNotFound(slug.to_string()).to_string(),
        ));
    };

    let Some(platform_id) = venue.platform_id() else {
        return Ok(EventSearch {
            venue: Some(venue.name.clone()),
            note: Some(format!(
                "No Ticketmaster ID for {}. Check website: {}",
                venue.name,
                venue.website.as_deref().unwrap_or("N/A")
            )),
            ..EventSearch::default()
        });
    };

    let mut result = client.venue_events(platform_id, days, ctx.today).await;
    result.venue = Some(venue.name.clone());
    Ok(result)
}

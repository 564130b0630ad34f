// `datekit restaurants`: restaurant search through Google Places.

use clap::Args;

use crate::error::Result;
use crate::places::{PlacesClient, RestaurantQuery};

use super::{Context, OutputFormat, print_json, warn_missing_city};

#[derive(Debug, Args)]
pub struct RestaurantsArgs {
    /// Cuisine or mood, e.g. "Thai" or "romantic dinner"
    pub query: String,
    /// City to search in (default: from preferences.json)
    #[arg(long)]
    pub city: Option<String>,
    /// Neighborhood to focus on
    #[arg(long)]
    pub neighborhood: Option<String>,
    /// Only places open right now
    #[arg(long)]
    pub open_now: bool,
    #[arg(long, default_value_t = 10)]
    pub max_results: u32,
    #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
    pub format: OutputFormat,
}

pub async fn run(ctx: &Context, args: RestaurantsArgs) -> Result<()> {
    let city = ctx.resolve_city(args.city.as_deref())?;
    if city.is_empty() {
        warn_missing_city();
    }

    let query = RestaurantQuery {
        city,
        neighborhood: args.neighborhood,
        open_now: args.open_now,
        max_results: args.max_results,
        ..RestaurantQuery::new(args.query)
    };

    let client = PlacesClient::from_config(&ctx.config, ctx.http.clone(), ctx.cache.clone());
    let result = client.search_restaurants(&query).await;
    print_json(&result, args.format)
}

// `datekit classes` and `datekit queries`: web search suggestions, no API calls.

use clap::{ArgGroup, Args, ValueEnum};
use serde::Serialize;

use crate::error::Result;
use crate::queries::{
    CLASS_PLATFORMS, Platform, class_search_queries, comedy_search_queries,
    food_event_search_queries, museum_exhibition_queries, theater_search_queries,
};

use super::{Context, OutputFormat, print_json, warn_missing_city};

const CATEGORY_HELP: &str = "Available categories:
  martial-arts  BJJ, taekwondo, kickboxing intro classes
  cooking       Thai, Italian, sushi, pasta making
  pottery       Ceramics, wheel throwing
  art           Paint & sip, stained glass, drawing
  general       Browse all class types";

#[derive(Debug, Args)]
#[command(
    group(ArgGroup::new("search").required(true).args(["category", "query"])),
    after_help = CATEGORY_HELP
)]
pub struct ClassesArgs {
    /// Class category
    #[arg(long, value_parser = ["martial-arts", "cooking", "pottery", "art", "general"])]
    pub category: Option<String>,
    /// Custom search query
    #[arg(long)]
    pub query: Option<String>,
    /// City to search in (default: from preferences.json)
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct ClassSuggestions {
    category: String,
    city: String,
    search_queries: Vec<String>,
    platforms: &'static [Platform],
}

pub fn run_classes(ctx: &Context, args: ClassesArgs) -> Result<()> {
    let city = ctx.resolve_city(args.city.as_deref())?;
    if city.is_empty() {
        warn_missing_city();
    }

    let output = suggest_classes(args.category.as_deref(), args.query.as_deref(), &city);
    print_json(&output, args.format)
}

fn suggest_classes(category: Option<&str>, query: Option<&str>, city: &str) -> ClassSuggestions {
    let (category, search_queries) = match query {
        Some(query) if city.is_empty() => ("custom".to_string(), vec![query.to_string()]),
        Some(query) => ("custom".to_string(), vec![format!("{query} {city}")]),
        None => {
            let category = category.unwrap_or("general");
            (category.to_string(), class_search_queries(category, city))
        }
    };

    ClassSuggestions {
        category,
        city: city.to_string(),
        search_queries,
        platforms: &CLASS_PLATFORMS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Comedy,
    Theater,
    Food,
    Museum,
}

#[derive(Debug, Args)]
pub struct QueriesArgs {
    /// Kind of outing to search for
    #[arg(long, value_enum)]
    pub kind: QueryKind,
    /// City to search in (default: from preferences.json)
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct QuerySuggestions {
    kind: QueryKind,
    city: String,
    search_queries: Vec<String>,
}

pub fn run_queries(ctx: &Context, args: QueriesArgs) -> Result<()> {
    let city = ctx.resolve_city(args.city.as_deref())?;
    if city.is_empty() {
        warn_missing_city();
    }

    let search_queries = match args.kind {
        QueryKind::Comedy => comedy_search_queries(&city, ctx.today),
        QueryKind::Theater => theater_search_queries(&city),
        QueryKind::Food => food_event_search_queries(&city, ctx.today),
        QueryKind::Museum => museum_exhibition_queries(&city, ctx.today),
    };

    print_json(
        &QuerySuggestions {
            kind: args.kind,
            city,
            search_queries,
        },
        args.format,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_custom_query_appends_city() {
        let output = suggest_classes(None, Some("pottery class couples"), "Austin");
        assert_eq!(output.category, "custom");
        assert_eq!(output.search_queries, vec!["pottery class couples Austin"]);

        let output = suggest_classes(None, Some("pottery class couples"), "");
        assert_eq!(output.search_queries, vec!["pottery class couples"]);
    }

    #[test]
    fn test_category_output_shape() {
        let output = suggest_classes(Some("art"), None, "Denver");
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["category"], json!("art"));
        assert_eq!(value["city"], json!("Denver"));
        assert_eq!(value["search_queries"][0], json!("paint and sip Denver"));
        assert_eq!(value["platforms"].as_array().unwrap().len(), 4);
        assert_eq!(value["platforms"][0]["name"], json!("ClassBento"));
    }

    #[test]
    fn test_query_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_value(QueryKind::Museum).unwrap(), json!("museum"));
    }
}

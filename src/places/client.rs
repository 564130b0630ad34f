// Google Places text search client for restaurant discovery.
// Uses the Places API (New) v1 with a field mask to keep responses small.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use crate::cache::{DiskCache, PLACES_TTL, cache_key};
use crate::config::{Config, GOOGLE_PLACES_API_KEY};
use crate::error::{DatekitError, Result};
use crate::http::HttpClient;

use super::types::{PlaceSearch, SearchTextRequest, SearchTextResponse};

const SEARCH_TEXT_URL: &str = "https://places.googleapis.com/v1/places:searchText";
const CACHE_SOURCE: &str = "google_places";
const DEFAULT_MAX_RESULTS: u32 = 10;

const API_KEY_HEADER: &str = "x-goog-api-key";
const FIELD_MASK_HEADER: &str = "x-goog-fieldmask";
const FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.priceLevel,\
places.rating,places.userRatingCount,places.websiteUri,places.googleMapsUri,\
places.regularOpeningHours";

/// Parameters of a restaurant search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantQuery {
    /// Cuisine or mood, e.g. "Thai" or "romantic dinner".
    pub query: String,
    pub city: String,
    pub neighborhood: Option<String>,
    pub open_now: bool,
    pub max_results: u32,
}

impl RestaurantQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            city: String::new(),
            neighborhood: None,
            open_now: false,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Free-text query sent upstream.
    pub fn text_query(&self) -> String {
        let mut text = if self.city.is_empty() {
            format!("{} restaurant", self.query)
        } else {
            format!("{} restaurant {}", self.query, self.city)
        };
        if let Some(neighborhood) = self.neighborhood.as_deref().filter(|n| !n.is_empty()) {
            text.push(' ');
            text.push_str(neighborhood);
        }
        text
    }

    pub fn cache_key(&self) -> String {
        let open_now = self.open_now.to_string();
        let max_results = self.max_results.to_string();
        cache_key(&[
            "gp",
            &self.query,
            &self.city,
            self.neighborhood.as_deref().unwrap_or_default(),
            &open_now,
            &max_results,
            CACHE_SOURCE,
        ])
    }

    fn request(&self) -> SearchTextRequest {
        SearchTextRequest {
            text_query: self.text_query(),
            max_result_count: self.max_results,
            open_now: self.open_now.then_some(true),
        }
    }
}

/// Places client. Never fails outright: errors come back inside results.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: HttpClient,
    cache: DiskCache,
    api_key: Option<String>,
    endpoint: String,
}

impl PlacesClient {
    pub fn new(http: HttpClient, cache: DiskCache, api_key: Option<String>) -> Self {
        Self {
            http,
            cache,
            api_key,
            endpoint: SEARCH_TEXT_URL.to_string(),
        }
    }

    pub fn from_config(config: &Config, http: HttpClient, cache: DiskCache) -> Self {
        Self::new(http, cache, config.google_places_key().map(str::to_string))
    }

    /// Point the client at a different search endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Search restaurants, serving from cache when a fresh result exists.
    pub async fn search_restaurants(&self, query: &RestaurantQuery) -> PlaceSearch {
        let Some(api_key) = self.api_key.as_deref() else {
            return PlaceSearch::failed(
                DatekitError::MissingCredential(GOOGLE_PLACES_API_KEY).to_string(),
            );
        };

        let key = query.cache_key();
        if let Some(cached) = self.cache.load::<PlaceSearch>(&key, PLACES_TTL) {
            return cached;
        }

        match self.fetch_places(api_key, query).await {
            Ok(result) => {
                self.cache.save(&key, &result);
                result
            }
            Err(err) => {
                warn!(%err, "google places search failed");
                PlaceSearch::failed(err.to_string())
            }
        }
    }

    async fn fetch_places(&self, api_key: &str, query: &RestaurantQuery) -> Result<PlaceSearch> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(api_key)?,
        );
        headers.insert(
            HeaderName::from_static(FIELD_MASK_HEADER),
            HeaderValue::from_static(FIELD_MASK),
        );

        let response: SearchTextResponse = self
            .http
            .post_json(&self.endpoint, headers, &query.request())
            .await?;
        let result = PlaceSearch::from(response);
        debug!(count = result.places.len(), "fetched places");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::cache_entry_path;
    use serde_json::json;
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(temp_dir: &TempDir, api_key: Option<&str>) -> PlacesClient {
        PlacesClient::new(
            HttpClient::new().unwrap(),
            DiskCache::new(temp_dir.path()),
            api_key.map(str::to_string),
        )
    }

    #[test]
    fn test_text_query() {
        let mut query = RestaurantQuery::new("Thai");
        assert_eq!(query.text_query(), "Thai restaurant");

        query.city = "Los Angeles".to_string();
        assert_eq!(query.text_query(), "Thai restaurant Los Angeles");

        query.neighborhood = Some("Silver Lake".to_string());
        assert_eq!(query.text_query(), "Thai restaurant Los Angeles Silver Lake");
    }

    #[test]
    fn test_cache_key_tracks_options() {
        let base = RestaurantQuery::new("sushi");
        let open = RestaurantQuery {
            open_now: true,
            ..base.clone()
        };
        let more = RestaurantQuery {
            max_results: 20,
            ..base.clone()
        };

        assert_eq!(base.cache_key(), RestaurantQuery::new("sushi").cache_key());
        assert_ne!(base.cache_key(), open.cache_key());
        assert_ne!(base.cache_key(), more.cache_key());
    }

    #[test]
    fn test_cache_key_keeps_fields_apart() {
        let split_city = RestaurantQuery {
            city: "Winston-Salem".to_string(),
            ..RestaurantQuery::new("korean")
        };
        let split_query = RestaurantQuery {
            city: "Salem".to_string(),
            ..RestaurantQuery::new("korean-Winston")
        };

        assert_ne!(split_city.text_query(), split_query.text_query());
        assert_ne!(split_city.cache_key(), split_query.cache_key());
    }

    #[tokio::test]
    async fn test_missing_key_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = client(&temp_dir, None)
            .search_restaurants(&RestaurantQuery::new("tacos"))
            .await;

        assert!(result.places.is_empty());
        assert!(result.error.unwrap().contains(GOOGLE_PLACES_API_KEY));
    }

    #[tokio::test]
    async fn test_search_posts_body_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/places:searchText"))
            .and(header("x-goog-api-key", "gk"))
            .and(body_json(json!({
                "textQuery": "ramen restaurant Austin",
                "maxResultCount": 5,
                "openNow": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "places": [{"displayName": {"text": "Ramen Tatsu-Ya"}, "rating": 4.6}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let places = client(&temp_dir, Some("gk"))
            .with_endpoint(format!("{}/v1/places:searchText", server.uri()));
        let query = RestaurantQuery {
            city: "Austin".to_string(),
            open_now: true,
            max_results: 5,
            ..RestaurantQuery::new("ramen")
        };

        let first = places.search_restaurants(&query).await;
        assert_eq!(first.error, None);
        assert_eq!(first.places[0].name.as_deref(), Some("Ramen Tatsu-Ya"));
        assert_eq!(first.places[0].rating, Some(4.6));

        let second = places.search_restaurants(&query).await;
        assert_eq!(second, first);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].headers.get(FIELD_MASK_HEADER).unwrap(),
            FIELD_MASK
        );
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let temp_dir = TempDir::new().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "places": [{"displayName": {"text": "Old Spot"}}]
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "places": [{"displayName": {"text": "New Spot"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let places = client(&temp_dir, Some("gk")).with_endpoint(server.uri());
        let query = RestaurantQuery::new("dim sum");

        let first = places.search_restaurants(&query).await;
        assert_eq!(first.places[0].name.as_deref(), Some("Old Spot"));

        let entry = cache_entry_path(temp_dir.path(), &query.cache_key());
        let expired = SystemTime::now() - (PLACES_TTL + Duration::from_secs(60));
        fs::File::options()
            .write(true)
            .open(&entry)
            .unwrap()
            .set_modified(expired)
            .unwrap();

        let second = places.search_restaurants(&query).await;
        assert_eq!(second.places[0].name.as_deref(), Some("New Spot"));

        let stored: PlaceSearch =
            serde_json::from_str(&fs::read_to_string(&entry).unwrap()).unwrap();
        assert_eq!(stored, second);
    }

    #[tokio::test]
    async fn test_upstream_failure_becomes_error_field() {
        let temp_dir = TempDir::new().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .mount(&server)
            .await;

        let places = client(&temp_dir, Some("gk")).with_endpoint(server.uri());
        let result = places
            .search_restaurants(&RestaurantQuery::new("pizza"))
            .await;

        assert!(result.places.is_empty());
        assert!(result.error.unwrap().contains("429"));
    }
}

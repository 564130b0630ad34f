// Ticketmaster Discovery API client.
// Builds search parameters, consults the disk cache, and normalizes responses.
//
// API docs: https://developer.ticketmaster.com/products-and-docs/apis/discovery-api/v2/

use chrono::{Days, NaiveDate};
use tracing::{debug, warn};

use crate::cache::{DiskCache, EVENTS_TTL, cache_key};
use crate::config::{Config, TICKETMASTER_API_KEY};
use crate::error::{DatekitError, Result};
use crate::http::HttpClient;

use super::types::{EventSearch, EventsResponse, VenuesResponse, select_venue};

const TICKETMASTER_API_BASE: &str = "https://app.ticketmaster.com/discovery/v2";
const CACHE_SOURCE: &str = "ticketmaster";
const DEFAULT_SIZE: u32 = 20;
const DEFAULT_SORT: &str = "date,asc";
const ARTIST_SEARCH_SIZE: u32 = 10;
const VENUE_LOOKUP_SIZE: u32 = 5;

/// Parameters of an event search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub venue_id: Option<String>,
    pub keyword: Option<String>,
    /// Classification such as "Music", "Comedy", or "Theatre".
    pub classification: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub city: String,
    pub state_code: String,
    pub size: u32,
    pub sort: String,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            venue_id: None,
            keyword: None,
            classification: None,
            start_date: None,
            end_date: None,
            city: String::new(),
            state_code: String::new(),
            size: DEFAULT_SIZE,
            sort: DEFAULT_SORT.to_string(),
        }
    }
}

impl EventQuery {
    /// Search window from `today` through `today + days`, capped at the last representable date.
    pub fn between(mut self, today: NaiveDate, days: u32) -> Self {
        self.start_date = Some(today);
        self.end_date = Some(
            today
                .checked_add_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MAX),
        );
        self
    }

    /// Cache fingerprint. Covers every parameter except the credential.
    pub fn cache_key(&self) -> String {
        let size = self.size.to_string();
        let start = format_date(self.start_date);
        let end = format_date(self.end_date);
        cache_key(&[
            "tm",
            self.venue_id.as_deref().unwrap_or_default(),
            self.keyword.as_deref().unwrap_or_default(),
            self.classification.as_deref().unwrap_or_default(),
            &self.city,
            &self.state_code,
            &size,
            &self.sort,
            &start,
            &end,
            CACHE_SOURCE,
        ])
    }

    /// Query string for the events endpoint, credential included.
    fn params(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("apikey", api_key.to_string()),
            ("size", self.size.to_string()),
            ("sort", self.sort.clone()),
        ];

        if !self.city.is_empty() {
            params.push(("city", self.city.clone()));
        }
        if !self.state_code.is_empty() {
            params.push(("stateCode", self.state_code.clone()));
        }
        if let Some(venue_id) = non_empty(&self.venue_id) {
            params.push(("venueId", venue_id.to_string()));
        }
        if let Some(keyword) = non_empty(&self.keyword) {
            params.push(("keyword", keyword.to_string()));
        }
        if let Some(classification) = non_empty(&self.classification) {
            params.push(("classificationName", classification.to_string()));
        }
        if let Some(start) = self.start_date {
            params.push(("startDateTime", format!("{}T00:00:00Z", start.format("%Y-%m-%d"))));
        }
        if let Some(end) = self.end_date {
            params.push(("endDateTime", format!("{}T23:59:59Z", end.format("%Y-%m-%d"))));
        }

        params
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Ticketmaster client. Never fails outright: errors come back inside results.
#[derive(Debug, Clone)]
pub struct TicketmasterClient {
    http: HttpClient,
    cache: DiskCache,
    api_key: Option<String>,
    base_url: String,
}

impl TicketmasterClient {
    pub fn new(http: HttpClient, cache: DiskCache, api_key: Option<String>) -> Self {
        Self {
            http,
            cache,
            api_key,
            base_url: TICKETMASTER_API_BASE.to_string(),
        }
    }

    pub fn from_config(config: &Config, http: HttpClient, cache: DiskCache) -> Self {
        Self::new(http, cache, config.ticketmaster_key().map(str::to_string))
    }

    /// Point the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search events, serving from cache when a fresh result exists.
    pub async fn search_events(&self, query: &EventQuery) -> EventSearch {
        let Some(api_key) = self.api_key.as_deref() else {
            return EventSearch::failed(
                DatekitError::MissingCredential(TICKETMASTER_API_KEY).to_string(),
            );
        };

        let key = query.cache_key();
        if let Some(cached) = self.cache.load::<EventSearch>(&key, EVENTS_TTL) {
            return cached;
        }

        match self.fetch_events(api_key, query).await {
            Ok(result) => {
                self.cache.save(&key, &result);
                result
            }
            Err(err) => {
                warn!(%err, "ticketmaster event search failed");
                EventSearch::failed(err.to_string())
            }
        }
    }

    async fn fetch_events(&self, api_key: &str, query: &EventQuery) -> Result<EventSearch> {
        let url = format!("{}/events.json", self.base_url);
        let response: EventsResponse = self.http.get_json(&url, &query.params(api_key)).await?;
        let result = EventSearch::from(response);
        debug!(count = result.events.len(), "fetched ticketmaster events");
        Ok(result)
    }

    /// Upcoming events at a venue over the next `days_ahead` days.
    pub async fn venue_events(
        &self,
        venue_id: &str,
        days_ahead: u32,
        today: NaiveDate,
    ) -> EventSearch {
        let query = EventQuery {
            venue_id: Some(venue_id.to_string()),
            ..EventQuery::default()
        }
        .between(today, days_ahead);
        self.search_events(&query).await
    }

    /// Events for an artist, optionally near a city.
    pub async fn search_artist(&self, artist: &str, city: &str, state_code: &str) -> EventSearch {
        let query = EventQuery {
            keyword: Some(artist.to_string()),
            city: city.to_string(),
            state_code: state_code.to_string(),
            size: ARTIST_SEARCH_SIZE,
            ..EventQuery::default()
        };
        self.search_events(&query).await
    }

    /// Look up the Ticketmaster id for a venue name.
    /// Returns `None` without a credential or on any failure.
    pub async fn resolve_venue_id(&self, venue_name: &str, state_code: &str) -> Option<String> {
        let api_key = self.api_key.as_deref()?;

        let mut params = vec![
            ("apikey", api_key.to_string()),
            ("keyword", venue_name.to_string()),
            ("size", VENUE_LOOKUP_SIZE.to_string()),
        ];
        if !state_code.is_empty() {
            params.push(("stateCode", state_code.to_string()));
        }

        let url = format!("{}/venues.json", self.base_url);
        let venues = match self.http.get_json::<_, VenuesResponse>(&url, &params).await {
            Ok(response) => response.into_venues(),
            Err(err) => {
                debug!(venue = venue_name, %err, "venue lookup failed");
                return None;
            }
        };

        select_venue(&venues, venue_name).and_then(|v| v.id.clone())
    }
}

// Ticketmaster Discovery API types.
// Loose upstream payload shapes and the normalized event schema printed by the CLI.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};

/// Image ratio preferred for event artwork.
const PREFERRED_IMAGE_RATIO: &str = "16_9";
/// Minimum width for a preferred image.
const PREFERRED_IMAGE_WIDTH: u64 = 500;

/// Normalized event. Every field may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(
        default,
        serialize_with = "serialize_venue",
        deserialize_with = "deserialize_venue"
    )]
    pub venue: Option<VenueRef>,
    pub price_range: Option<PriceRange>,
    pub url: Option<String>,
    pub genre: Option<String>,
    pub image: Option<String>,
}

/// Venue hosting an event. Both keys are always written, null when unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueRef {
    pub name: Option<String>,
    pub id: Option<String>,
}

// An event without a venue is written as `{}`.
fn serialize_venue<S>(venue: &Option<VenueRef>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match venue {
        Some(venue) => venue.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

fn deserialize_venue<'de, D>(deserializer: D) -> Result<Option<VenueRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let fields = Option::<BTreeMap<String, Option<String>>>::deserialize(deserializer)?;
    Ok(fields.filter(|f| !f.is_empty()).map(|mut f| VenueRef {
        name: f.remove("name").flatten(),
        id: f.remove("id").flatten(),
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: String,
}

/// Result of an event search, successful or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl EventSearch {
    /// A failed search: the message and no events.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Response wrapper for the events search.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EventsResponse {
    #[serde(rename = "_embedded")]
    embedded: Option<EmbeddedEvents>,
    page: Option<PageInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct EmbeddedEvents {
    events: Option<Vec<RawEvent>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    total_elements: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEvent {
    name: Option<String>,
    url: Option<String>,
    dates: Option<RawDates>,
    price_ranges: Option<Vec<RawPriceRange>>,
    classifications: Option<Vec<RawClassification>>,
    images: Option<Vec<RawImage>>,
    #[serde(rename = "_embedded")]
    embedded: Option<RawEventEmbedded>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDates {
    start: Option<RawStart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStart {
    local_date: Option<String>,
    local_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPriceRange {
    min: Option<f64>,
    max: Option<f64>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawClassification {
    genre: Option<Named>,
}

#[derive(Debug, Default, Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawImage {
    ratio: Option<String>,
    width: Option<u64>,
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEventEmbedded {
    venues: Option<Vec<RawVenue>>,
}

/// Venue as returned by the venues and events endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawVenue {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Response wrapper for the venues search.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct VenuesResponse {
    #[serde(rename = "_embedded")]
    embedded: Option<EmbeddedVenues>,
}

#[derive(Debug, Default, Deserialize)]
struct EmbeddedVenues {
    venues: Option<Vec<RawVenue>>,
}

impl VenuesResponse {
    pub(crate) fn into_venues(self) -> Vec<RawVenue> {
        self.embedded.and_then(|e| e.venues).unwrap_or_default()
    }
}

impl From<EventsResponse> for EventSearch {
    fn from(response: EventsResponse) -> Self {
        let events = response
            .embedded
            .and_then(|e| e.events)
            .unwrap_or_default()
            .into_iter()
            .map(Event::from)
            .collect();

        Self {
            events,
            total: Some(
                response
                    .page
                    .and_then(|p| p.total_elements)
                    .unwrap_or_default(),
            ),
            ..Self::default()
        }
    }
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        let start = raw.dates.and_then(|d| d.start).unwrap_or_default();

        let venue = raw
            .embedded
            .and_then(|e| e.venues)
            .and_then(|venues| venues.into_iter().next())
            .map(|v| VenueRef {
                name: v.name,
                id: v.id,
            });

        let price_range = raw
            .price_ranges
            .and_then(|ranges| ranges.into_iter().next())
            .map(|r| PriceRange {
                min: r.min,
                max: r.max,
                currency: r.currency.unwrap_or_else(|| "USD".to_string()),
            });

        let genre = raw
            .classifications
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.genre)
            .and_then(|g| g.name);

        Self {
            name: raw.name,
            date: start.local_date,
            time: start.local_time,
            venue,
            price_range,
            url: raw.url,
            genre,
            image: pick_image(raw.images.unwrap_or_default()),
        }
    }
}

/// Prefer a wide 16:9 image, else take whatever comes first.
fn pick_image(images: Vec<RawImage>) -> Option<String> {
    let preferred = images.iter().position(|img| {
        img.ratio.as_deref() == Some(PREFERRED_IMAGE_RATIO)
            && img.width.unwrap_or(0) >= PREFERRED_IMAGE_WIDTH
    });

    images
        .into_iter()
        .nth(preferred.unwrap_or(0))
        .and_then(|img| img.url)
}

/// Pick the venue matching a name.
///
/// The first candidate whose name contains `query` (case-insensitive) wins.
/// With no match the first candidate is returned; an empty list yields `None`.
pub(crate) fn select_venue<'a>(candidates: &'a [RawVenue], query: &str) -> Option<&'a RawVenue> {
    let needle = query.to_lowercase();
    candidates
        .iter()
        .find(|v| {
            v.name
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&needle)
        })
        .or_else(|| candidates.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> EventSearch {
        let response: EventsResponse = serde_json::from_value(value).unwrap();
        EventSearch::from(response)
    }

    fn venue(name: &str, id: &str) -> RawVenue {
        RawVenue {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
        }
    }

    #[test]
    fn test_full_event() {
        let result = parse(json!({
            "_embedded": {"events": [{
                "name": "Radiohead",
                "url": "https://tm.example/e/1",
                "dates": {"start": {"localDate": "2026-11-01", "localTime": "20:00:00"}},
                "priceRanges": [{"min": 45.0, "max": 120.5, "currency": "EUR"}],
                "classifications": [{"genre": {"name": "Rock"}}],
                "images": [
                    {"ratio": "4_3", "width": 1024, "url": "https://img/4x3.jpg"},
                    {"ratio": "16_9", "width": 305, "url": "https://img/small.jpg"},
                    {"ratio": "16_9", "width": 640, "url": "https://img/wide.jpg"}
                ],
                "_embedded": {"venues": [{"name": "Hollywood Bowl", "id": "KovZpZA7AAEA"}]}
            }]},
            "page": {"totalElements": 37}
        }));

        assert_eq!(result.total, Some(37));
        assert_eq!(result.error, None);
        let event = &result.events[0];
        assert_eq!(event.name.as_deref(), Some("Radiohead"));
        assert_eq!(event.date.as_deref(), Some("2026-11-01"));
        assert_eq!(event.time.as_deref(), Some("20:00:00"));
        let venue = event.venue.as_ref().unwrap();
        assert_eq!(venue.name.as_deref(), Some("Hollywood Bowl"));
        assert_eq!(venue.id.as_deref(), Some("KovZpZA7AAEA"));
        assert_eq!(
            event.price_range,
            Some(PriceRange {
                min: Some(45.0),
                max: Some(120.5),
                currency: "EUR".to_string(),
            })
        );
        assert_eq!(event.genre.as_deref(), Some("Rock"));
        assert_eq!(event.image.as_deref(), Some("https://img/wide.jpg"));
    }

    #[test]
    fn test_sparse_event_normalizes_to_none() {
        let result = parse(json!({
            "_embedded": {"events": [{"name": "Mystery Show"}]}
        }));

        let event = &result.events[0];
        assert_eq!(event.name.as_deref(), Some("Mystery Show"));
        assert_eq!(event.price_range, None);
        assert_eq!(event.genre, None);
        assert_eq!(event.image, None);
        assert_eq!(event.date, None);
        assert_eq!(event.venue, None);
        assert_eq!(result.total, Some(0));
    }

    #[test]
    fn test_partial_nested_fields() {
        let result = parse(json!({
            "_embedded": {"events": [{
                "dates": {},
                "priceRanges": [{"min": 10}],
                "classifications": [{"segment": {"name": "Music"}}],
                "images": [{"url": "https://img/only.jpg"}],
                "_embedded": {"venues": []}
            }]}
        }));

        let event = &result.events[0];
        assert_eq!(event.name, None);
        assert_eq!(event.date, None);
        let price = event.price_range.as_ref().unwrap();
        assert_eq!(price.min, Some(10.0));
        assert_eq!(price.max, None);
        assert_eq!(price.currency, "USD");
        assert_eq!(event.genre, None);
        assert_eq!(event.image.as_deref(), Some("https://img/only.jpg"));
        assert_eq!(event.venue, None);
    }

    #[test]
    fn test_missing_embedded_means_no_events() {
        let result = parse(json!({"page": {"totalElements": 0}}));
        assert!(result.events.is_empty());
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_empty_venue_serializes_as_empty_object() {
        let value = serde_json::to_value(Event::default()).unwrap();
        assert_eq!(value["venue"], json!({}));
        assert_eq!(value["price_range"], serde_json::Value::Null);
    }

    #[test]
    fn test_known_venue_keeps_null_keys() {
        let result = parse(json!({
            "_embedded": {"events": [{
                "name": "Open Mic",
                "_embedded": {"venues": [{"name": "The Basement"}]}
            }]}
        }));

        let value = serde_json::to_value(&result.events[0]).unwrap();
        assert_eq!(value["venue"], json!({"name": "The Basement", "id": null}));

        let back: Event = serde_json::from_value(value).unwrap();
        assert_eq!(back, result.events[0]);
        let empty: Event = serde_json::from_value(json!({"venue": {}})).unwrap();
        assert_eq!(empty.venue, None);
    }

    #[test]
    fn test_failed_search_shape() {
        let value = serde_json::to_value(EventSearch::failed("boom")).unwrap();
        assert_eq!(value, json!({"error": "boom", "events": []}));
    }

    #[test]
    fn test_select_venue_prefers_substring_match() {
        let candidates = vec![
            venue("Hollywood Bowl Amphitheater", "first"),
            venue("The Bowl Room", "second"),
        ];

        let hit = select_venue(&candidates, "hollywood bowl").unwrap();
        assert_eq!(hit.id.as_deref(), Some("first"));

        let hit = select_venue(&candidates, "bowl room").unwrap();
        assert_eq!(hit.id.as_deref(), Some("second"));
    }

    #[test]
    fn test_select_venue_falls_back_to_first() {
        let candidates = vec![
            venue("Hollywood Bowl Amphitheater", "first"),
            venue("The Bowl Room", "second"),
        ];

        let hit = select_venue(&candidates, "xyz-unmatched").unwrap();
        assert_eq!(hit.id.as_deref(), Some("first"));
        assert!(select_venue(&[], "bowl").is_none());
    }

    #[test]
    fn test_venues_response_without_embedded() {
        let response: VenuesResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.into_venues().is_empty());
    }
}

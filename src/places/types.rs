// Google Places (New) API types.

use serde::{Deserialize, Serialize};

/// Normalized place. Every field may be missing upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: Option<String>,
    pub address: Option<String>,
    pub price_level: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub website: Option<String>,
    pub maps_url: Option<String>,
}

/// Result of a place search, successful or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub places: Vec<Place>,
}

impl PlaceSearch {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            places: Vec::new(),
        }
    }
}

/// Request body for `places:searchText`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchTextRequest {
    pub text_query: String,
    pub max_result_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchTextResponse {
    places: Option<Vec<RawPlace>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlace {
    display_name: Option<LocalizedText>,
    formatted_address: Option<String>,
    price_level: Option<String>,
    rating: Option<f64>,
    user_rating_count: Option<u64>,
    website_uri: Option<String>,
    google_maps_uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LocalizedText {
    text: Option<String>,
}

impl From<SearchTextResponse> for PlaceSearch {
    fn from(response: SearchTextResponse) -> Self {
        Self {
            error: None,
            places: response
                .places
                .unwrap_or_default()
                .into_iter()
                .map(Place::from)
                .collect(),
        }
    }
}

impl From<RawPlace> for Place {
    fn from(raw: RawPlace) -> Self {
        Self {
            name: raw.display_name.and_then(|d| d.text),
            address: raw.formatted_address,
            price_level: raw.price_level,
            rating: raw.rating,
            review_count: raw.user_rating_count,
            website: raw.website_uri,
            maps_url: raw.google_maps_uri,
        }
    }
}

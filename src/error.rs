// Error types for datekit.
// Covers upstream API failures, local file problems, and missing configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatekitError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("No {0} configured. Add to ~/.config/datekit/.env")]
    MissingCredential(&'static str),

    #[error("Venue not found: {0}. Use a slug from venues.json")]
    VenueNotFound(String),

    #[error("Venue registry {0} uses the legacy list layout; run `datekit venues migrate`")]
    LegacyRegistry(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DatekitError>;

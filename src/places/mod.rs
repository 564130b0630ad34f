// Google Places API module.
// Provides the restaurant search client and the normalized place schema.

pub mod client;
pub mod types;

pub use client::{PlacesClient, RestaurantQuery};

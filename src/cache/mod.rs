// Cache module for local filesystem caching.
// Stores normalized API results so repeated queries skip the network.

pub mod store;

pub use store::{DiskCache, EVENTS_TTL, PLACES_TTL, cache_key};

// Ticketmaster Discovery API module.
// Provides the event search client and the normalized event schema.

pub mod client;
pub mod types;

pub use client::{EventQuery, TicketmasterClient};
pub use types::EventSearch;

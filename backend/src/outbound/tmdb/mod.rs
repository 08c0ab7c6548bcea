//! TMDB outbound adapter for the film and series catalogue ports.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_TMDB_BASE_URL, TmdbHttpSource};

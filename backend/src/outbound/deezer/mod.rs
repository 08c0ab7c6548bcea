//! Deezer outbound adapter for the music catalogue port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_DEEZER_BASE_URL, DeezerHttpSource};

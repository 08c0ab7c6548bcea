//! OpenLibrary outbound adapter for the book catalogue port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_OPENLIBRARY_BASE_URL, OpenLibraryHttpSource};

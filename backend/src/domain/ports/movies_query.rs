//! Driving port for film lookups with local filtering.

use async_trait::async_trait;

use crate::domain::{Error, MovieDetails, MovieFilters, MovieSearchPage, MovieSummary, SearchQuery};

/// Search input: the provider query plus filters applied to the returned
/// page.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSearchRequest {
    pub query: SearchQuery,
    pub page: u32,
    pub filters: MovieFilters,
}

#[async_trait]
pub trait MoviesQuery: Send + Sync {
    async fn search(&self, request: MovieSearchRequest) -> Result<MovieSearchPage, Error>;

    async fn details(&self, id: u64) -> Result<MovieDetails, Error>;

    /// Top title matches for type-ahead.
    async fn suggestions(&self, query: &SearchQuery) -> Result<Vec<MovieSummary>, Error>;

    /// A random existing film.
    async fn random(&self) -> Result<MovieDetails, Error>;
}

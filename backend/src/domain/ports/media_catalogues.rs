//! Driven ports for series, book and music metadata providers.
//!
//! Handlers call these directly; there is no domain logic on top beyond
//! error mapping.
use async_trait::async_trait;

use crate::domain::{BookDetails, BookSummary, SearchQuery, Track, TvShow};

use super::UpstreamError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TvCatalogue: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<TvShow>, UpstreamError>;

    /// Today's trending series, most popular first.
    async fn trending(&self) -> Result<Vec<TvShow>, UpstreamError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookCatalogue: Send + Sync {
    async fn search(
        &self,
        query: &SearchQuery,
        limit: usize,
    ) -> Result<Vec<BookSummary>, UpstreamError>;

    /// Look up a work by its key, with or without the `/works/` prefix.
    async fn details(&self, work_id: &str) -> Result<BookDetails, UpstreamError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MusicCatalogue: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Track>, UpstreamError>;

    async fn track(&self, id: u64) -> Result<Track, UpstreamError>;
}

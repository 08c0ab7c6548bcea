//! Driven port for the film metadata provider.
use async_trait::async_trait;

use crate::domain::{MovieDetails, MovieSearchPage, SearchQuery};

use super::UpstreamError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieCatalogue: Send + Sync {
    /// One page of title matches, with genre names resolved.
    async fn search(&self, query: &SearchQuery, page: u32)
    -> Result<MovieSearchPage, UpstreamError>;

    /// Full record with up to [`crate::domain::CAST_LIMIT`] cast members.
    async fn details(&self, id: u64) -> Result<MovieDetails, UpstreamError>;

    /// Identifier of the most recently added film, used as the upper bound
    /// for random picks.
    async fn latest_id(&self) -> Result<u64, UpstreamError>;
}

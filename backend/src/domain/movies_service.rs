//! Film lookups on top of the movie catalogue port.
//!
//! The provider's search endpoint has no year, score or genre filters, so
//! the service applies them to each returned page.
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::domain::ports::{
    MovieCatalogue, MovieSearchRequest, MoviesQuery, UpstreamError, map_upstream_error,
};
use crate::domain::{
    Error, MovieDetails, MovieSearchPage, MovieSummary, SUGGESTION_LIMIT, SearchQuery,
};

/// Random identifiers tried before giving up on a random pick.
pub const RANDOM_MOVIE_ATTEMPTS: usize = 10;

const MOVIE_NOT_FOUND: &str = "Movie not found";

/// Movie service implementing [`MoviesQuery`].
pub struct MoviesService<C> {
    catalogue: Arc<C>,
    rng: Mutex<SmallRng>,
}

impl<C> MoviesService<C> {
    pub fn new(catalogue: Arc<C>) -> Self {
        Self {
            catalogue,
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Build a service whose random picks are reproducible.
    pub fn with_seed(catalogue: Arc<C>, seed: u64) -> Self {
        Self {
            catalogue,
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    fn roll(&self, upper: u64) -> u64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(1..=upper)
    }
}

#[async_trait]
impl<C> MoviesQuery for MoviesService<C>
where
    C: MovieCatalogue,
{
    async fn search(&self, request: MovieSearchRequest) -> Result<MovieSearchPage, Error> {
        let MovieSearchRequest {
            query,
            page,
            filters,
        } = request;
        let mut results = self
            .catalogue
            .search(&query, page)
            .await
            .map_err(|err| map_upstream_error(err, MOVIE_NOT_FOUND))?;
        if !filters.is_empty() {
            results.movies.retain(|movie| filters.matches(movie));
        }
        Ok(results)
    }

    async fn details(&self, id: u64) -> Result<MovieDetails, Error> {
        self.catalogue
            .details(id)
            .await
            .map_err(|err| map_upstream_error(err, MOVIE_NOT_FOUND))
    }

    async fn suggestions(&self, query: &SearchQuery) -> Result<Vec<MovieSummary>, Error> {
        let page = self
            .catalogue
            .search(query, 1)
            .await
            .map_err(|err| map_upstream_error(err, MOVIE_NOT_FOUND))?;
        Ok(page.movies.into_iter().take(SUGGESTION_LIMIT).collect())
    }

    async fn random(&self) -> Result<MovieDetails, Error> {
        let latest = self
            .catalogue
            .latest_id()
            .await
            .map_err(|err| map_upstream_error(err, MOVIE_NOT_FOUND))?;
        if latest == 0 {
            return Err(Error::not_found(MOVIE_NOT_FOUND));
        }

        for attempt in 1..=RANDOM_MOVIE_ATTEMPTS {
            let id = self.roll(latest);
            match self.catalogue.details(id).await {
                Ok(movie) => return Ok(movie),
                Err(UpstreamError::NotFound { .. }) => {
                    debug!(id, attempt, "random movie id missing upstream; rerolling");
                }
                Err(err @ UpstreamError::NotConfigured { .. }) => {
                    return Err(map_upstream_error(err, MOVIE_NOT_FOUND));
                }
                Err(err) => {
                    warn!(id, attempt, error = %err, "random movie lookup failed; rerolling");
                }
            }
        }
        Err(Error::not_found(format!(
            "No movie found after {RANDOM_MOVIE_ATTEMPTS} attempts"
        )))
    }
}

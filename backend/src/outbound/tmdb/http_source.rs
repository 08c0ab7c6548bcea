//! Reqwest-backed TMDB adapter for films and series.
//!
//! Requests authenticate with a v4 read token sent as a bearer header. A
//! missing token is reported per call as `NotConfigured` so the rest of the
//! API keeps serving.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use zeroize::Zeroizing;

use super::dto::{LatestMovieDto, MovieDetailsDto, MoviePageDto, TvPageDto};
use crate::domain::ports::{MovieCatalogue, TvCatalogue, UpstreamError};
use crate::domain::{MovieDetails, MovieSearchPage, SearchQuery, TvShow};
use crate::outbound::http_support::{build_client, fetch_json};

const PROVIDER: &str = "TMDB";
const LANGUAGE: &str = "en-US";

/// Default TMDB API root.
pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// TMDB adapter implementing [`MovieCatalogue`] and [`TvCatalogue`].
pub struct TmdbHttpSource {
    client: Client,
    base_url: Url,
    api_key: Option<Zeroizing<String>>,
}

impl TmdbHttpSource {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: Option<Zeroizing<String>>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    fn get(&self, path: &str) -> Result<RequestBuilder, UpstreamError> {
        let key = self
            .api_key
            .as_ref()
            .ok_or_else(|| UpstreamError::not_configured(PROVIDER))?;
        let url = format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'));
        Ok(self
            .client
            .get(url)
            .bearer_auth(key.as_str())
            .query(&[("language", LANGUAGE)]))
    }
}

#[async_trait]
impl MovieCatalogue for TmdbHttpSource {
    async fn search(
        &self,
        query: &SearchQuery,
        page: u32,
    ) -> Result<MovieSearchPage, UpstreamError> {
        let page = page.max(1).to_string();
        let request = self.get("search/movie")?.query(&[
            ("query", query.as_ref()),
            ("page", page.as_str()),
            ("include_adult", "false"),
        ]);
        let decoded: MoviePageDto = fetch_json(PROVIDER, request).await?;
        Ok(decoded.into_domain())
    }

    async fn details(&self, id: u64) -> Result<MovieDetails, UpstreamError> {
        let request = self
            .get(&format!("movie/{id}"))?
            .query(&[("append_to_response", "credits")]);
        let decoded: MovieDetailsDto = fetch_json(PROVIDER, request).await?;
        Ok(decoded.into_domain())
    }

    async fn latest_id(&self) -> Result<u64, UpstreamError> {
        let decoded: LatestMovieDto = fetch_json(PROVIDER, self.get("movie/latest")?).await?;
        Ok(decoded.id)
    }
}

#[async_trait]
impl TvCatalogue for TmdbHttpSource {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<TvShow>, UpstreamError> {
        let request = self
            .get("search/tv")?
            .query(&[("query", query.as_ref()), ("include_adult", "false")]);
        let decoded: TvPageDto = fetch_json(PROVIDER, request).await?;
        Ok(decoded.into_domain())
    }

    async fn trending(&self) -> Result<Vec<TvShow>, UpstreamError> {
        let decoded: TvPageDto = fetch_json(PROVIDER, self.get("trending/tv/day")?).await?;
        Ok(most_popular_first(decoded.into_domain()))
    }
}

fn most_popular_first(mut shows: Vec<TvShow>) -> Vec<TvShow> {
    shows.sort_by(|left, right| right.popularity.total_cmp(&left.popularity));
    shows
}

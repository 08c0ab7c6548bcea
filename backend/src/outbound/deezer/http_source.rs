//! Reqwest-backed Deezer adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::dto::{ErrorEnvelopeDto, SearchResponseDto, TrackDto};
use crate::domain::ports::{MusicCatalogue, UpstreamError};
use crate::domain::{SearchQuery, Track};
use crate::outbound::http_support::{build_client, decode_json, fetch_bytes};

const PROVIDER: &str = "Deezer";

/// Default Deezer API root.
pub const DEFAULT_DEEZER_BASE_URL: &str = "https://api.deezer.com";

/// Deezer adapter implementing [`MusicCatalogue`].
pub struct DeezerHttpSource {
    client: Client,
    base_url: Url,
}

impl DeezerHttpSource {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let base = self.base_url.as_str().trim_end_matches('/');
        self.client.get(format!("{base}/{path}"))
    }

    async fn fetch<T>(&self, request: RequestBuilder) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
    {
        let body = fetch_bytes(PROVIDER, request).await?;
        decode_payload(&body)
    }
}

/// Decode a Deezer body, surfacing in-band error objects first.
fn decode_payload<T>(body: &[u8]) -> Result<T, UpstreamError>
where
    T: DeserializeOwned,
{
    let envelope: ErrorEnvelopeDto = decode_json(PROVIDER, body)?;
    if let Some(error) = envelope.error {
        return Err(error.into_upstream());
    }
    decode_json(PROVIDER, body)
}

#[async_trait]
impl MusicCatalogue for DeezerHttpSource {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Track>, UpstreamError> {
        let request = self.get("search").query(&[("q", query.as_ref())]);
        let decoded: SearchResponseDto = self.fetch(request).await?;
        Ok(decoded
            .data
            .into_iter()
            .map(TrackDto::into_domain)
            .collect())
    }

    async fn track(&self, id: u64) -> Result<Track, UpstreamError> {
        let decoded: TrackDto = self.fetch(self.get(&format!("track/{id}"))).await?;
        Ok(decoded.into_domain())
    }
}

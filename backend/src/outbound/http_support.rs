//! Transport helpers shared by the reqwest-backed provider adapters.
//!
//! Each adapter owns its own `Client` and endpoint layout; this module only
//! turns transport failures and non-success statuses into [`UpstreamError`]
//! values and decodes JSON bodies.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::domain::ports::UpstreamError;

const PREVIEW_CHAR_LIMIT: usize = 160;
const USER_AGENT: &str = concat!("encyclomedia/", env!("CARGO_PKG_VERSION"));

/// Build a client with the shared user agent and a request timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Send `request` and return the body of a successful response.
///
/// `provider` prefixes every error message so logs identify the upstream.
pub(crate) async fn fetch_bytes(
    provider: &str,
    request: RequestBuilder,
) -> Result<Vec<u8>, UpstreamError> {
    let response = request
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|err| map_transport_error(provider, err))?;
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| map_transport_error(provider, err))?;
    if !status.is_success() {
        return Err(map_status_error(provider, status, body.as_ref()));
    }
    Ok(body.to_vec())
}

/// Send `request` and decode a JSON body into `T`.
pub(crate) async fn fetch_json<T>(provider: &str, request: RequestBuilder) -> Result<T, UpstreamError>
where
    T: DeserializeOwned,
{
    let body = fetch_bytes(provider, request).await?;
    decode_json(provider, &body)
}

pub(crate) fn decode_json<T>(provider: &str, body: &[u8]) -> Result<T, UpstreamError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body)
        .map_err(|err| UpstreamError::decode(format!("invalid {provider} JSON payload: {err}")))
}

pub(crate) fn map_transport_error(provider: &str, error: reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::timeout(format!("{provider}: {error}"))
    } else {
        UpstreamError::transport(format!("{provider}: {error}"))
    }
}

pub(crate) fn map_status_error(provider: &str, status: StatusCode, body: &[u8]) -> UpstreamError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("{provider} status {}", status.as_u16())
    } else {
        format!("{provider} status {}: {preview}", status.as_u16())
    };

    match status {
        StatusCode::NOT_FOUND => UpstreamError::not_found(message),
        StatusCode::TOO_MANY_REQUESTS => UpstreamError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            UpstreamError::timeout(message)
        }
        _ if status.is_client_error() => UpstreamError::rejected(message),
        _ => UpstreamError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

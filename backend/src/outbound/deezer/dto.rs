//! Transport DTOs for Deezer search and track payloads.

use serde::Deserialize;

use crate::domain::Track;
use crate::domain::ports::UpstreamError;

/// Deezer reports "no data" for unknown identifiers.
const NO_DATA_CODE: u32 = 800;
const QUOTA_CODE: u32 = 4;

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponseDto {
    #[serde(default)]
    pub(super) data: Vec<TrackDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TrackDto {
    pub(super) id: u64,
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) duration: u32,
    pub(super) preview: Option<String>,
    pub(super) artist: Option<ArtistDto>,
    pub(super) album: Option<AlbumDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ArtistDto {
    #[serde(default)]
    pub(super) name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AlbumDto {
    #[serde(default)]
    pub(super) title: String,
    pub(super) cover_medium: Option<String>,
}

/// Deezer answers failures with HTTP 200 and an `error` object.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: Option<DeezerErrorDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DeezerErrorDto {
    #[serde(rename = "type", default)]
    pub(super) kind: String,
    #[serde(default)]
    pub(super) message: String,
    #[serde(default)]
    pub(super) code: u32,
}

impl DeezerErrorDto {
    pub(super) fn into_upstream(self) -> UpstreamError {
        let message = format!("Deezer {} ({}): {}", self.kind, self.code, self.message);
        match self.code {
            NO_DATA_CODE => UpstreamError::not_found(message),
            QUOTA_CODE => UpstreamError::rate_limited(message),
            _ => UpstreamError::rejected(message),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl TrackDto {
    pub(super) fn into_domain(self) -> Track {
        let (album, cover_url) = match self.album {
            Some(album) => (album.title, non_blank(album.cover_medium)),
            None => (String::new(), None),
        };
        Track {
            id: self.id,
            title: self.title,
            artist: self.artist.map(|artist| artist.name).unwrap_or_default(),
            album,
            cover_url,
            preview_url: non_blank(self.preview),
            duration_secs: self.duration,
        }
    }
}

//! Media kinds and opaque media references.
//!
//! The backend never owns catalogue data: lists, reviews and logs point at
//! provider records through a `(kind, id)` pair plus optional display hints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The media families tracked by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Films, resolved through TMDB.
    Movie,
    /// Television series, resolved through TMDB.
    Tv,
    /// Books, resolved through OpenLibrary.
    Book,
    /// Music tracks, resolved through Deezer.
    Music,
}

impl MediaKind {
    /// All supported kinds, in display order.
    pub const ALL: [Self; 4] = [Self::Movie, Self::Tv, Self::Book, Self::Music];

    /// Stable lowercase label used in URLs and storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Book => "book",
            Self::Music => "music",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a media kind label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown media type: {0}")]
pub struct UnknownMediaKind(pub String);

impl FromStr for MediaKind {
    type Err = UnknownMediaKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMediaKind(s.to_owned()))
    }
}

/// Validation errors for [`MediaRef`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaRefValidationError {
    /// The provider identifier was blank.
    #[error("media id must not be empty")]
    EmptyId,
    /// The media type label was not recognised.
    #[error(transparent)]
    UnknownKind(#[from] UnknownMediaKind),
}

/// Reference to a single catalogue record held by a list.
///
/// # Examples
/// ```
/// use encyclomedia::domain::{MediaKind, MediaRef};
///
/// let item = MediaRef::new(MediaKind::Movie, "603").expect("valid reference");
/// assert_eq!(item.media_id(), "603");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    media_type: MediaKind,
    media_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

impl MediaRef {
    /// Build a reference, rejecting blank identifiers.
    pub fn new(
        media_type: MediaKind,
        media_id: impl Into<String>,
    ) -> Result<Self, MediaRefValidationError> {
        let media_id = media_id.into().trim().to_owned();
        if media_id.is_empty() {
            return Err(MediaRefValidationError::EmptyId);
        }
        Ok(Self {
            media_type,
            media_id,
            title: None,
            image_url: None,
        })
    }

    /// Parse a reference from raw request parts.
    pub fn try_from_parts(
        media_type: &str,
        media_id: &str,
        title: Option<String>,
        image_url: Option<String>,
    ) -> Result<Self, MediaRefValidationError> {
        let kind = media_type.parse::<MediaKind>()?;
        Ok(Self::new(kind, media_id)?
            .with_title(title)
            .with_image_url(image_url))
    }

    /// Attach a display title.
    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|value| !value.trim().is_empty());
        self
    }

    /// Attach an image URL.
    #[must_use]
    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url.filter(|value| !value.trim().is_empty());
        self
    }

    pub fn media_type(&self) -> MediaKind {
        self.media_type
    }

    pub fn media_id(&self) -> &str {
        self.media_id.as_str()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

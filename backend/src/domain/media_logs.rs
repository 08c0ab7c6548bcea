//! Personal media logs: what a user has watched, read or listened to, and
//! what they plan to.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MediaKind, Username, reviews::require_text};

/// Message returned when a consumption date cannot be parsed.
pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Use YYYY-MM-DD.";

/// Highest personal score accepted on a log entry.
pub const LOG_RATING_MAX: u8 = 10;

/// The two per-kind collections a user keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shelf {
    /// Already consumed.
    Log,
    /// Saved for later.
    Later,
}

impl Shelf {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Later => "later",
        }
    }
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shelf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "later" => Ok(Self::Later),
            other => Err(format!("unknown shelf: {other}")),
        }
    }
}

/// Identifier of a single log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntryId(Uuid);

impl LogEntryId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for LogEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for LogEntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Validation errors for log entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogEntryValidationError {
    #[error("{field} must not be empty")]
    Blank { field: &'static str },
    #[error("{INVALID_DATE_MESSAGE}")]
    InvalidDate,
    #[error("rating must be between 0 and {LOG_RATING_MAX}")]
    RatingOutOfRange,
}

/// Parse a `YYYY-MM-DD` consumption date.
pub fn parse_log_date(raw: &str) -> Result<NaiveDate, LogEntryValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| LogEntryValidationError::InvalidDate)
}

/// One item on a user's shelf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: LogEntryId,
    pub owner: Username,
    pub kind: MediaKind,
    pub shelf: Shelf,
    pub media_id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub consumed_on: Option<NaiveDate>,
    pub rating: Option<u8>,
    pub tags: Vec<String>,
    pub added_at: DateTime<Utc>,
}

/// Fields supplied when adding to a shelf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    pub owner: Username,
    pub kind: MediaKind,
    pub shelf: Shelf,
    pub media_id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub consumed_on: Option<NaiveDate>,
    pub rating: Option<u8>,
    pub tags: Vec<String>,
}

/// Raw values for [`NewLogEntry::try_new`].
#[derive(Debug, Clone, Default)]
pub struct LogEntryDraft<'a> {
    pub media_id: &'a str,
    pub title: &'a str,
    pub image_url: Option<&'a str>,
    pub consumed_on: Option<&'a str>,
    pub rating: Option<i64>,
    pub tags: Vec<String>,
}

impl NewLogEntry {
    /// Validate a shelf addition.
    ///
    /// Consumption dates and ratings only make sense on the `log` shelf and
    /// are dropped for `later`. Tags are trimmed and de-duplicated.
    pub fn try_new(
        owner: Username,
        kind: MediaKind,
        shelf: Shelf,
        draft: LogEntryDraft<'_>,
    ) -> Result<Self, LogEntryValidationError> {
        let media_id = require_text(draft.media_id, "mediaId")
            .map_err(|_| LogEntryValidationError::Blank { field: "mediaId" })?;
        let title = require_text(draft.title, "title")
            .map_err(|_| LogEntryValidationError::Blank { field: "title" })?;
        let consumed_on = draft.consumed_on.map(parse_log_date).transpose()?;
        let rating = draft
            .rating
            .map(|value| {
                u8::try_from(value)
                    .ok()
                    .filter(|score| *score <= LOG_RATING_MAX)
                    .ok_or(LogEntryValidationError::RatingOutOfRange)
            })
            .transpose()?;

        let mut tags: Vec<String> = Vec::new();
        for tag in draft.tags {
            let trimmed = tag.trim();
            if !trimmed.is_empty() && !tags.iter().any(|existing| existing == trimmed) {
                tags.push(trimmed.to_owned());
            }
        }

        let is_log = shelf == Shelf::Log;
        Ok(Self {
            owner,
            kind,
            shelf,
            media_id,
            title,
            image_url: draft
                .image_url
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
            consumed_on: consumed_on.filter(|_| is_log),
            rating: rating.filter(|_| is_log),
            tags,
        })
    }

    pub fn into_entry(self, added_at: DateTime<Utc>) -> LogEntry {
        LogEntry {
            id: LogEntryId::random(),
            owner: self.owner,
            kind: self.kind,
            shelf: self.shelf,
            media_id: self.media_id,
            title: self.title,
            image_url: self.image_url,
            consumed_on: self.consumed_on,
            rating: self.rating,
            tags: self.tags,
            added_at,
        }
    }
}

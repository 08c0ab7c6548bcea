//! Reviews, threaded comments and reactions.
//!
//! Each user may review a given media item once. Comments carry a single level
//! of replies, and a user's like and dislike are mutually exclusive.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MediaKind, Username};

/// Title recorded when a review is created without a media title.
pub const UNKNOWN_MEDIA_TITLE: &str = "Unknown Title";

/// Number of reviews returned by the "recent" feed.
pub const RECENT_REVIEWS_LIMIT: usize = 20;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
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

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

uuid_id! {
    /// Stable review identifier.
    ReviewId
}

uuid_id! {
    /// Identifier shared by comments and replies.
    CommentId
}

/// Validation errors for review fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("rating must be between {min} and {max}")]
    RatingOutOfRange { min: u8, max: u8 },
    #[error("{field} must not be empty")]
    Blank { field: &'static str },
}

/// Star rating from one to five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, ReviewValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|stars| (Self::MIN..=Self::MAX).contains(stars))
            .map(Self)
            .ok_or(ReviewValidationError::RatingOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
            })
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = ReviewValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Trimmed, non-blank text.
pub(crate) fn require_text(
    value: &str,
    field: &'static str,
) -> Result<String, ReviewValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ReviewValidationError::Blank { field });
    }
    Ok(trimmed.to_owned())
}

/// A reply to a comment. Replies cannot themselves be replied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: CommentId,
    pub author: Username,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A top-level comment on a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub author: Username,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Comment {
    /// Build a comment with a validated body.
    pub fn new(
        author: Username,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ReviewValidationError> {
        Ok(Self {
            id: CommentId::random(),
            author,
            content: require_text(content, "content")?,
            created_at,
            replies: Vec::new(),
        })
    }
}

impl Reply {
    /// Build a reply with a validated body.
    pub fn new(
        author: Username,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ReviewValidationError> {
        Ok(Self {
            id: CommentId::random(),
            author,
            content: require_text(content, "content")?,
            created_at,
        })
    }
}

/// Like or dislike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Like,
    Dislike,
}

/// Reaction sets after a toggle, plus the caller's resulting reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionOutcome {
    pub likes: BTreeSet<Username>,
    pub dislikes: BTreeSet<Username>,
    pub reaction: Option<Reaction>,
}

/// A user's rated critique of one media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub author: Username,
    pub media_type: MediaKind,
    pub media_id: String,
    pub media_title: String,
    pub title: String,
    pub content: String,
    pub rating: Rating,
    pub comments: Vec<Comment>,
    pub likes: BTreeSet<Username>,
    pub dislikes: BTreeSet<Username>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn create(draft: NewReview, now: DateTime<Utc>) -> Self {
        Self {
            id: ReviewId::random(),
            author: draft.author,
            media_type: draft.media_type,
            media_id: draft.media_id,
            media_title: draft
                .media_title
                .unwrap_or_else(|| UNKNOWN_MEDIA_TITLE.to_owned()),
            title: draft.title,
            content: draft.content,
            rating: draft.rating,
            comments: Vec::new(),
            likes: BTreeSet::new(),
            dislikes: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Toggle `reaction` for `user`.
    ///
    /// Reacting again with the same reaction removes it. Switching reaction
    /// moves the user from one set to the other, so both sets never contain
    /// the same user.
    pub fn react(&mut self, user: &Username, reaction: Reaction) -> ReactionOutcome {
        let (target, opposite) = match reaction {
            Reaction::Like => (&mut self.likes, &mut self.dislikes),
            Reaction::Dislike => (&mut self.dislikes, &mut self.likes),
        };
        opposite.remove(user);
        let current = if target.remove(user) {
            None
        } else {
            target.insert(user.clone());
            Some(reaction)
        };
        ReactionOutcome {
            likes: self.likes.clone(),
            dislikes: self.dislikes.clone(),
            reaction: current,
        }
    }

    pub fn find_comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|comment| &comment.id == id)
    }

    pub fn find_comment_mut(&mut self, id: &CommentId) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|comment| &comment.id == id)
    }
}

/// Fields supplied when creating a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub author: Username,
    pub media_type: MediaKind,
    pub media_id: String,
    pub media_title: Option<String>,
    pub title: String,
    pub content: String,
    pub rating: Rating,
}

impl NewReview {
    /// Validate the free-text fields of a review draft.
    pub fn try_new(
        author: Username,
        media_type: MediaKind,
        media_id: &str,
        media_title: Option<&str>,
        title: &str,
        content: &str,
        rating: Rating,
    ) -> Result<Self, ReviewValidationError> {
        Ok(Self {
            author,
            media_type,
            media_id: require_text(media_id, "mediaId")?,
            media_title: media_title
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
            title: require_text(title, "title")?,
            content: require_text(content, "content")?,
            rating,
        })
    }
}

/// Ordering applied to a media item's reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewSort {
    #[default]
    Recent,
    Highest,
    Lowest,
}

impl ReviewSort {
    /// Sort reviews in place; ties fall back to newest first.
    pub fn apply(self, reviews: &mut [Review]) {
        reviews.sort_by(|a, b| {
            let by_rating = match self {
                Self::Recent => std::cmp::Ordering::Equal,
                Self::Highest => b.rating.cmp(&a.rating),
                Self::Lowest => a.rating.cmp(&b.rating),
            };
            by_rating.then_with(|| b.created_at.cmp(&a.created_at))
        });
    }
}

impl FromStr for ReviewSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "recent" => Ok(Self::Recent),
            "highest" => Ok(Self::Highest),
            "lowest" => Ok(Self::Lowest),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

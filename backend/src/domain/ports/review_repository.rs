//! Driven port for reviews and their discussion threads.
use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Comment, CommentId, MediaKind, Reply, Review, ReviewId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by review repository adapters.
    pub enum ReviewPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
    }
}

/// Storage for reviews.
///
/// Comment and reply appends are single-statement operations so concurrent
/// commenters do not overwrite each other. Mutators return `false` when the
/// target review (or comment) no longer exists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError>;

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError>;

    /// Whether `author` has already reviewed the media item.
    async fn exists_for(
        &self,
        author: &Username,
        media_type: MediaKind,
        media_id: &str,
    ) -> Result<bool, ReviewPersistenceError>;

    /// All reviews of one media item, in no particular order.
    async fn list_for_media(
        &self,
        media_type: MediaKind,
        media_id: &str,
    ) -> Result<Vec<Review>, ReviewPersistenceError>;

    /// Reviews written by `author`, newest first.
    async fn list_by_author(&self, author: &Username)
    -> Result<Vec<Review>, ReviewPersistenceError>;

    /// The `limit` most recent reviews across the site.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Review>, ReviewPersistenceError>;

    async fn push_comment(
        &self,
        id: &ReviewId,
        comment: &Comment,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ReviewPersistenceError>;

    async fn push_reply(
        &self,
        id: &ReviewId,
        comment_id: &CommentId,
        reply: &Reply,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ReviewPersistenceError>;

    /// Replace both reaction sets in one write.
    async fn set_reactions(
        &self,
        id: &ReviewId,
        likes: &BTreeSet<Username>,
        dislikes: &BTreeSet<Username>,
    ) -> Result<bool, ReviewPersistenceError>;

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewPersistenceError>;
}
